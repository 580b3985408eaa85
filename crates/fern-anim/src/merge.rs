//! Affine animation merging.
//!
//! Translate, rotate and scale all animate the same native transform matrix,
//! so running them as separate native animations on one view would have the
//! later ones stomp the earlier. When a group plays in parallel, every run of
//! affine descriptors that shares target view and timing is fused into one
//! [`Property::CombinedTransform`] descriptor carrying a [`TransformSet`].
//! Sequential groups are never merged; their descriptors cannot overlap.

use tracing::debug;

use crate::descriptor::{AnimationValue, Property, PropertyAnimation, TransformSet, Vec3};

/// Fuse mergeable affine descriptors; non-affine descriptors pass through in
/// their original relative order.
pub fn merge_affine_animations(animations: &[PropertyAnimation]) -> Vec<PropertyAnimation> {
    let mut consumed = vec![false; animations.len()];
    let mut result = Vec::with_capacity(animations.len());

    for i in 0..animations.len() {
        if consumed[i] {
            continue;
        }
        let anchor = &animations[i];
        if !anchor.property.is_affine() {
            result.push(anchor.clone());
            continue;
        }

        let mut set = TransformSet::default();
        if !fold_into(&mut set, anchor) {
            // The value kind does not fit the property. Pass the descriptor
            // through unmerged so the builder rejects it; folding it would
            // silently drop the sub-property from the combined transform.
            result.push(anchor.clone());
            continue;
        }
        let mut fused = 1usize;
        for j in (i + 1)..animations.len() {
            let candidate = &animations[j];
            if consumed[j] || !candidate.property.is_affine() {
                continue;
            }
            if anchor.same_timing_and_target(candidate) && fold_into(&mut set, candidate) {
                consumed[j] = true;
                fused += 1;
            }
        }
        if fused > 1 {
            debug!(view = %anchor.target.id(), fused, "merged affine animations");
        }

        let mut merged = anchor.clone();
        merged.property = Property::CombinedTransform;
        merged.value = AnimationValue::Transform { value: set };
        result.push(merged);
    }

    result
}

/// Fold one affine descriptor into the set. Returns false when the value
/// kind does not fit the property, leaving the set untouched.
fn fold_into(set: &mut TransformSet, animation: &PropertyAnimation) -> bool {
    match (&animation.property, &animation.value) {
        (Property::Translate, AnimationValue::Vec2 { value }) => set.translate = Some(*value),
        (Property::Scale, AnimationValue::Vec2 { value }) => set.scale = Some(*value),
        (Property::Rotate, AnimationValue::Vec3 { value }) => set.rotate = Some(*value),
        // Shorthand: a scalar rotate is rotation about z only.
        (Property::Rotate, AnimationValue::Scalar { value }) => {
            set.rotate = Some(Vec3::new(0.0, 0.0, *value));
        }
        (Property::CombinedTransform, AnimationValue::Transform { value }) => {
            if let Some(translate) = value.translate {
                set.translate = Some(translate);
            }
            if let Some(rotate) = value.rotate {
                set.rotate = Some(rotate);
            }
            if let Some(scale) = value.scale {
                set.scale = Some(scale);
            }
        }
        _ => return false,
    }
    true
}
