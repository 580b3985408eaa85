//! Declarative view model for the Fern UI framework.
//!
//! This crate defines the property system the animation engine reconciles
//! against: view handles with style slots, colors, and percent lengths.
//! Rendering, layout, and the native view hierarchy live elsewhere; the
//! engine only reads and writes the declarative values defined here.

pub mod color;
pub mod geometry;
pub mod view;

pub use color::Color;
pub use geometry::{Bounds, PercentLength, Size};
pub use view::{StyleSlot, ValueSource, ViewHandle, ViewState, ViewStyle};
