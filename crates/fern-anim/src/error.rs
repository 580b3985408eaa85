//! Error types for the animation engine.
//!
//! Cancellation is deliberately not a member of [`AnimationError`]: it is a
//! routine terminal outcome communicated through the rejected branch of the
//! completion future, not an exceptional condition.

use thiserror::Error;

/// Usage errors surfaced to the immediate caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnimationError {
    /// `play` was called on a group that is already playing.
    #[error("animation group is already playing")]
    AlreadyPlaying,

    /// The requested property cannot be animated on this view.
    #[error("animating property '{property}' is unsupported")]
    UnsupportedProperty { property: String },

    /// Width/height animation requires a parent to resolve lengths against.
    #[error("cannot animate {property} on a view with no parent")]
    NoParent { property: String },

    /// The descriptor's value does not fit the requested property.
    #[error("value of kind '{found}' does not fit property '{property}'")]
    ValueMismatch {
        property: String,
        found: &'static str,
    },
}

/// Rejection value carried by a settled completion when the group was
/// cancelled instead of finishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("animation was cancelled")]
pub struct Cancelled;
