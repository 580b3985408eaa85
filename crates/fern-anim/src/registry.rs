//! Declarative property writes and the reset registry.
//!
//! When a native animation starts, the declarative model is moved to the
//! target value immediately ([`apply_target`]); the native layer animates the
//! presentation toward it. Cancellation has to undo that early write, so the
//! builder snapshots the original declarative value of every launched
//! descriptor into a [`ResetAction`]. Resets write into the same
//! [`ValueSource`] slot the animation disturbed and are fire-and-forget.

use fern_ir::{Color, PercentLength, ValueSource, ViewHandle};
use tracing::trace;

use crate::descriptor::{AnimationValue, Property, PropertyAnimation};

/// Write a descriptor's target value into the declarative model.
///
/// Scale values are written exactly as requested, including zero; only the
/// native matrix substitutes an epsilon for zero scale.
pub fn apply_target(animation: &PropertyAnimation, source: ValueSource) {
    let mut state = animation.target.state_mut();
    let style = &mut state.style;
    match (&animation.property, &animation.value) {
        (Property::Opacity, AnimationValue::Scalar { value }) => {
            style.opacity.set(source, *value);
        }
        (Property::BackgroundColor, AnimationValue::Color { value }) => {
            style.background_color.set(source, *value);
        }
        (Property::Translate, AnimationValue::Vec2 { value }) => {
            style.translate_x.set(source, value.x);
            style.translate_y.set(source, value.y);
        }
        (Property::Rotate, AnimationValue::Vec3 { value }) => {
            style.rotate_x.set(source, value.x);
            style.rotate_y.set(source, value.y);
            style.rotate.set(source, value.z);
        }
        (Property::Scale, AnimationValue::Vec2 { value }) => {
            style.scale_x.set(source, value.x);
            style.scale_y.set(source, value.y);
        }
        (Property::Width, AnimationValue::Length { value }) => {
            style.width.set(source, *value);
        }
        (Property::Height, AnimationValue::Length { value }) => {
            style.height.set(source, *value);
        }
        (Property::Custom { name }, AnimationValue::Scalar { value }) => {
            style.set_custom(name, source, *value);
        }
        (Property::CombinedTransform, AnimationValue::Transform { value }) => {
            if let Some(translate) = value.translate {
                style.translate_x.set(source, translate.x);
                style.translate_y.set(source, translate.y);
            }
            if let Some(rotate) = value.rotate {
                style.rotate_x.set(source, rotate.x);
                style.rotate_y.set(source, rotate.y);
                style.rotate.set(source, rotate.z);
            }
            if let Some(scale) = value.scale {
                style.scale_x.set(source, scale.x);
                style.scale_y.set(source, scale.y);
            }
        }
        // Mismatches are rejected by the builder before anything launches.
        _ => {}
    }
}

/// A snapshot of the declarative values one animation disturbs.
#[derive(Debug, Clone, PartialEq)]
pub enum ResetAction {
    Opacity(f64),
    BackgroundColor(Color),
    Translate { x: f64, y: f64 },
    Rotate { x: f64, y: f64, z: f64 },
    Scale { x: f64, y: f64 },
    Transform {
        translate: Option<(f64, f64)>,
        rotate: Option<(f64, f64, f64)>,
        scale: Option<(f64, f64)>,
    },
    Width(PercentLength),
    Height(PercentLength),
    Custom { name: String, value: f64 },
}

/// One registered reset: the view plus the values to restore.
#[derive(Debug, Clone)]
pub struct ResetEntry {
    pub view: ViewHandle,
    pub action: ResetAction,
}

impl ResetEntry {
    /// Restore the snapshotted values into the slot selected by `source`.
    pub fn apply(&self, source: ValueSource) {
        trace!(view = %self.view.id(), action = ?self.action, "reset property");
        let mut state = self.view.state_mut();
        let style = &mut state.style;
        match &self.action {
            ResetAction::Opacity(value) => style.opacity.set(source, *value),
            ResetAction::BackgroundColor(value) => style.background_color.set(source, *value),
            ResetAction::Translate { x, y } => {
                style.translate_x.set(source, *x);
                style.translate_y.set(source, *y);
            }
            ResetAction::Rotate { x, y, z } => {
                style.rotate_x.set(source, *x);
                style.rotate_y.set(source, *y);
                style.rotate.set(source, *z);
            }
            ResetAction::Scale { x, y } => {
                style.scale_x.set(source, *x);
                style.scale_y.set(source, *y);
            }
            ResetAction::Transform {
                translate,
                rotate,
                scale,
            } => {
                if let Some((x, y)) = translate {
                    style.translate_x.set(source, *x);
                    style.translate_y.set(source, *y);
                }
                if let Some((x, y, z)) = rotate {
                    style.rotate_x.set(source, *x);
                    style.rotate_y.set(source, *y);
                    style.rotate.set(source, *z);
                }
                if let Some((x, y)) = scale {
                    style.scale_x.set(source, *x);
                    style.scale_y.set(source, *y);
                }
            }
            ResetAction::Width(value) => style.width.set(source, *value),
            ResetAction::Height(value) => style.height.set(source, *value),
            ResetAction::Custom { name, value } => {
                style.set_custom(name, source, *value);
            }
        }
    }
}

/// The resets registered by launched descriptors of one play, keyed by
/// descriptor index.
///
/// A descriptor that finishes normally keeps its applied value, so its
/// entry is discarded on completion; only in-flight descriptors are rolled
/// back by a cancel.
#[derive(Debug, Clone, Default)]
pub struct PropertyResetRegistry {
    entries: Vec<(usize, ResetEntry)>,
}

impl PropertyResetRegistry {
    pub fn record(&mut self, index: usize, entry: ResetEntry) {
        self.entries.push((index, entry));
    }

    /// Drop the entry for a descriptor that completed.
    pub fn discard(&mut self, index: usize) {
        self.entries.retain(|(i, _)| *i != index);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply every remaining reset in registration order.
    pub fn apply_all(&self, source: ValueSource) {
        for (_, entry) in &self.entries {
            entry.apply(source);
        }
    }
}
