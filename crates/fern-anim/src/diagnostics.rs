//! Transform consistency diagnostics.
//!
//! The declarative style is the source of truth for a view's transform; the
//! native matrix is derived. [`transform_mismatch_message`] recomputes the
//! expected matrix from the declarative values and compares it against the
//! live native one, producing a human-readable report when they diverge.
//! Comparison is on canonical strings, so any component difference counts.

use fern_ir::ViewHandle;

use crate::native::NativeBackend;
use crate::transform::{Transform3D, ZERO_SCALE_EPSILON, compose_affine};

/// The matrix the declarative style says a view should have: translate,
/// rotate and scale composed in that order, with the zero-scale guard and
/// the perspective term for 3D rotation.
pub fn declared_transform(view: &ViewHandle) -> Transform3D {
    let state = view.state();
    let style = &state.style;
    compose_affine(
        Some((style.translate_x.effective(), style.translate_y.effective())),
        Some((
            style.rotate_x.effective(),
            style.rotate_y.effective(),
            style.rotate.effective(),
        )),
        Some((style.scale_x.effective(), style.scale_y.effective())),
        state.perspective,
        ZERO_SCALE_EPSILON,
    )
}

/// Compare a view's native transform against its declarative style.
/// `None` means they agree.
pub fn transform_mismatch_message(
    view: &ViewHandle,
    backend: &dyn NativeBackend,
) -> Option<String> {
    let expected = declared_transform(view).canonical_string();
    let actual = backend.native_state(view).transform.canonical_string();
    if expected == actual {
        None
    } else {
        Some(format!(
            "View and native transforms do not match.\nActual: {actual};\nExpected: {expected}"
        ))
    }
}
