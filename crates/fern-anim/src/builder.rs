//! Translation of descriptors into native animation arguments.
//!
//! For each property the builder decides the native key path, captures the
//! from-value out of the live native state, computes the to-value in native
//! units, snapshots the declarative originals for reset, and picks an
//! execution strategy.

use fern_config::AnimationConfig;

use crate::curve::{self, AnimationCurve, NativeCurve};
use crate::descriptor::{AnimationValue, Property, PropertyAnimation};
use crate::error::AnimationError;
use crate::native::{
    Axis, ExecutionStrategy, NativeAnimationArgs, NativeBackend, NativeKeyPath, NativeValue,
};
use crate::registry::{ResetAction, ResetEntry};
use crate::transform::compose_affine;

/// A descriptor lowered to everything the native layer needs.
#[derive(Debug)]
pub struct BuiltAnimation {
    pub args: NativeAnimationArgs,
    pub strategy: ExecutionStrategy,
    pub curve: NativeCurve,
    pub reset: ResetEntry,
}

/// The from-value for one rotation axis.
///
/// Normally the live native radians. When the declarative value is a nonzero
/// multiple of 360 degrees the native layer has already wrapped it to zero,
/// which would make a full-turn animation a no-op; back-compute from the
/// declarative degrees instead so the turn actually plays.
fn rotation_from(declared_degrees: f64, native_radians: f64) -> f64 {
    if declared_degrees != 0.0 && declared_degrees % 360.0 == 0.0 {
        declared_degrees.to_radians()
    } else {
        native_radians
    }
}

fn mismatch(animation: &PropertyAnimation) -> AnimationError {
    AnimationError::ValueMismatch {
        property: animation.property.name().to_string(),
        found: animation.value.kind(),
    }
}

/// Lower one descriptor against the current native state.
pub fn build(
    animation: &PropertyAnimation,
    backend: &dyn NativeBackend,
    config: &AnimationConfig,
) -> Result<BuiltAnimation, AnimationError> {
    let view = &animation.target;
    let native = backend.native_state(view);

    let (key_path, from, to, sub_axes, action) = match (&animation.property, &animation.value) {
        (Property::Opacity, AnimationValue::Scalar { value }) => (
            NativeKeyPath::Opacity,
            NativeValue::Scalar(native.opacity),
            NativeValue::Scalar(*value),
            None,
            ResetAction::Opacity(view.state().style.opacity.effective()),
        ),
        (Property::BackgroundColor, AnimationValue::Color { value }) => (
            NativeKeyPath::BackgroundColor,
            NativeValue::Color(native.background_color),
            NativeValue::Color(*value),
            None,
            ResetAction::BackgroundColor(view.state().style.background_color.effective()),
        ),
        (Property::Translate, AnimationValue::Vec2 { value }) => {
            let state = view.state();
            let style = &state.style;
            let action = ResetAction::Translate {
                x: style.translate_x.effective(),
                y: style.translate_y.effective(),
            };
            drop(state);
            (
                NativeKeyPath::Transform,
                NativeValue::Transform(native.transform),
                NativeValue::Transform(native.transform.translated(value.x, value.y, 0.0)),
                None,
                action,
            )
        }
        (Property::Scale, AnimationValue::Vec2 { value }) => {
            let state = view.state();
            let style = &state.style;
            let action = ResetAction::Scale {
                x: style.scale_x.effective(),
                y: style.scale_y.effective(),
            };
            drop(state);
            let eps = config.zero_scale_epsilon;
            (
                NativeKeyPath::Transform,
                NativeValue::Transform(native.transform),
                NativeValue::Transform(native.transform.scaled(
                    crate::transform::nonzero_scale(value.x, eps),
                    crate::transform::nonzero_scale(value.y, eps),
                    1.0,
                )),
                None,
                action,
            )
        }
        (Property::Rotate, AnimationValue::Vec3 { value }) => {
            let state = view.state();
            let style = &state.style;
            let declared = (
                style.rotate_x.effective(),
                style.rotate_y.effective(),
                style.rotate.effective(),
            );
            drop(state);
            let action = ResetAction::Rotate {
                x: declared.0,
                y: declared.1,
                z: declared.2,
            };
            (
                NativeKeyPath::Rotation,
                NativeValue::Rotation {
                    x: rotation_from(declared.0, native.rotation[0]),
                    y: rotation_from(declared.1, native.rotation[1]),
                    z: rotation_from(declared.2, native.rotation[2]),
                },
                NativeValue::Rotation {
                    x: value.x.to_radians(),
                    y: value.y.to_radians(),
                    z: value.z.to_radians(),
                },
                Some(vec![Axis::X, Axis::Y, Axis::Z]),
                action,
            )
        }
        (Property::CombinedTransform, AnimationValue::Transform { value }) => {
            let (perspective, action) = {
                let state = view.state();
                let style = &state.style;
                let action = ResetAction::Transform {
                    translate: value.translate.map(|_| {
                        (style.translate_x.effective(), style.translate_y.effective())
                    }),
                    rotate: value.rotate.map(|_| {
                        (
                            style.rotate_x.effective(),
                            style.rotate_y.effective(),
                            style.rotate.effective(),
                        )
                    }),
                    scale: value
                        .scale
                        .map(|_| (style.scale_x.effective(), style.scale_y.effective())),
                };
                (state.perspective, action)
            };
            let to = compose_affine(
                value.translate.map(|v| (v.x, v.y)),
                value.rotate.map(|v| (v.x, v.y, v.z)),
                value.scale.map(|v| (v.x, v.y)),
                perspective,
                config.zero_scale_epsilon,
            );
            (
                NativeKeyPath::Transform,
                NativeValue::Transform(native.transform),
                NativeValue::Transform(to),
                None,
                action,
            )
        }
        (Property::Width, AnimationValue::Length { value }) => {
            let parent = view.parent().ok_or_else(|| AnimationError::NoParent {
                property: "width".to_string(),
            })?;
            let extent = parent.state().measured_size.width;
            let target = value.to_dips(extent).ok_or(AnimationError::ValueMismatch {
                property: "width".to_string(),
                found: "auto",
            })?;
            (
                NativeKeyPath::Bounds,
                NativeValue::Bounds(native.bounds),
                NativeValue::Bounds(native.bounds.with_width(target)),
                None,
                ResetAction::Width(view.state().style.width.effective()),
            )
        }
        (Property::Height, AnimationValue::Length { value }) => {
            let parent = view.parent().ok_or_else(|| AnimationError::NoParent {
                property: "height".to_string(),
            })?;
            let extent = parent.state().measured_size.height;
            let target = value.to_dips(extent).ok_or(AnimationError::ValueMismatch {
                property: "height".to_string(),
                found: "auto",
            })?;
            (
                NativeKeyPath::Bounds,
                NativeValue::Bounds(native.bounds),
                NativeValue::Bounds(native.bounds.with_height(target)),
                None,
                ResetAction::Height(view.state().style.height.effective()),
            )
        }
        (Property::Custom { name }, AnimationValue::Scalar { value }) => {
            let current = view.state().style.custom(name).ok_or_else(|| {
                AnimationError::UnsupportedProperty {
                    property: name.clone(),
                }
            })?;
            let from = native.custom.get(name).copied().unwrap_or(current);
            (
                NativeKeyPath::Custom(name.clone()),
                NativeValue::Scalar(from),
                NativeValue::Scalar(*value),
                None,
                ResetAction::Custom {
                    name: name.clone(),
                    value: current,
                },
            )
        }
        _ => return Err(mismatch(animation)),
    };

    let strategy = if animation.curve == AnimationCurve::Spring {
        ExecutionStrategy::Spring
    } else if key_path == NativeKeyPath::Bounds || sub_axes.is_some() {
        ExecutionStrategy::Layer
    } else {
        ExecutionStrategy::Block
    };

    Ok(BuiltAnimation {
        args: NativeAnimationArgs {
            key_path,
            from,
            to,
            sub_axes,
            // Durations and delays are non-negative; clamp rather than hand
            // the native layer a negative interval.
            duration_s: animation
                .duration_ms
                .unwrap_or(config.default_duration_ms)
                .max(0.0)
                / 1000.0,
            delay_s: animation.delay_ms.max(0.0) / 1000.0,
            repeat_count: animation.iterations.native_repeat_count(),
        },
        strategy,
        curve: curve::resolve(animation.curve, config),
        reset: ResetEntry {
            view: view.clone(),
            action,
        },
    })
}
