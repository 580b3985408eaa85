//! The boundary between the engine and a native animation layer.
//!
//! The engine never talks to a platform directly; it produces
//! [`NativeAnimationArgs`] and hands them to a [`NativeBackend`]. Lifecycle
//! notifications come back through an [`AnimationDelegate`], which the group
//! runtime holds weakly from the backend side so a dropped group silently
//! detaches from still-running native animations.

pub mod headless;

use std::rc::Rc;

use fern_ir::{Bounds, Color, ViewHandle};

use crate::curve::NativeCurve;
use crate::transform::Transform3D;

/// The native key paths the engine animates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeKeyPath {
    /// The whole layer transform matrix.
    Transform,
    /// Per-axis layer rotation, driven as grouped sub-animations.
    Rotation,
    /// The layer bounds (width/height animation).
    Bounds,
    Opacity,
    BackgroundColor,
    /// A registered custom scalar, addressed by name.
    Custom(String),
}

/// A rotation axis for grouped sub-animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// An endpoint value in native units.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    Scalar(f64),
    /// Per-axis rotation in radians.
    Rotation { x: f64, y: f64, z: f64 },
    Transform(Transform3D),
    Bounds(Bounds),
    Color(Color),
}

impl NativeValue {
    /// The rotation component for one axis; zero for non-rotation values.
    pub fn axis(&self, axis: Axis) -> f64 {
        match self {
            Self::Rotation { x, y, z } => match axis {
                Axis::X => *x,
                Axis::Y => *y,
                Axis::Z => *z,
            },
            _ => 0.0,
        }
    }
}

/// How the native layer should execute an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// View-level animation block; the common path.
    Block,
    /// Explicit layer animation; required for bounds changes and grouped
    /// rotation sub-animations.
    Layer,
    /// Physically simulated spring; duration is a hint, not a bound.
    Spring,
}

/// Everything the native layer needs to run one animation.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeAnimationArgs {
    pub key_path: NativeKeyPath,
    pub from: NativeValue,
    pub to: NativeValue,
    /// Present when the animation is a grouped set of per-axis
    /// sub-animations instead of a single key path.
    pub sub_axes: Option<Vec<Axis>>,
    pub duration_s: f64,
    pub delay_s: f64,
    pub repeat_count: f32,
}

/// Lifecycle callbacks from the native layer back into the engine.
pub trait AnimationDelegate {
    /// The native animation began executing.
    fn animation_did_start(&self);
    /// The native animation stopped. `finished` is false when it was removed
    /// before reaching its end.
    fn animation_did_stop(&self, finished: bool);
}

/// One animation handed to the backend.
pub struct NativeLaunch {
    pub args: NativeAnimationArgs,
    pub strategy: ExecutionStrategy,
    pub curve: NativeCurve,
    pub delegate: Rc<dyn AnimationDelegate>,
}

/// Readable snapshot of one view's native presentation state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NativeViewState {
    pub transform: Transform3D,
    /// Per-axis rotation in radians, as the native layer tracks it.
    pub rotation: [f64; 3],
    pub bounds: Bounds,
    pub opacity: f64,
    pub background_color: Color,
    pub custom: std::collections::HashMap<String, f64>,
}

/// A native animation layer.
///
/// All methods take `&self`; implementations use interior mutability since
/// the engine is confined to the UI thread.
pub trait NativeBackend {
    /// Current native state of a view, creating it on first touch.
    fn native_state(&self, view: &ViewHandle) -> NativeViewState;

    /// Begin executing one animation on a view.
    fn start_animation(&self, view: &ViewHandle, launch: NativeLaunch);

    /// Remove every running animation from a view without completing it.
    /// Each removed animation reports `animation_did_stop(false)`.
    fn remove_all_animations(&self, view: &ViewHandle);
}
