//! Fern animation engine.
//!
//! Turns declarative property animation descriptors into native layer
//! animations: affine descriptors that share a view and timing are merged
//! into a single transform animation, each descriptor is lowered to native
//! arguments against the live native state, and completion/cancellation is
//! coordinated back through native stop callbacks into a settle-once future.
//!
//! The engine is confined to the UI thread; shared state is `Rc`-based and
//! deliberately not `Send`.

pub mod builder;
pub mod completion;
pub mod curve;
pub mod descriptor;
pub mod diagnostics;
pub mod error;
pub mod group;
pub mod merge;
pub mod native;
pub mod registry;
pub mod transform;

pub use completion::Completion;
pub use curve::{AnimationCurve, NativeCurve, SpringParams, TimingFunction};
pub use descriptor::{
    AnimationValue, IterationCount, Property, PropertyAnimation, TransformSet, Vec2, Vec3,
};
pub use error::{AnimationError, Cancelled};
pub use group::{Animation, GroupState};
pub use native::headless::HeadlessBackend;
pub use native::{ExecutionStrategy, NativeAnimationArgs, NativeBackend};
pub use transform::Transform3D;

use static_assertions::assert_not_impl_any;

// UI-thread confinement is part of the contract.
assert_not_impl_any!(Animation: Send, Sync);
assert_not_impl_any!(Completion: Send, Sync);
