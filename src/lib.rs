//! Fern — a cross-platform mobile UI framework.
//!
//! This facade crate re-exports the animation engine and the declarative
//! view model it drives. See `fern-anim` for the engine itself.

pub use fern_anim as anim;
pub use fern_config as config;
pub use fern_ir as ir;
