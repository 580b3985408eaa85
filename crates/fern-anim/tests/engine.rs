//! End-to-end engine tests against the headless backend.

use std::rc::Rc;

use fern_anim::diagnostics::transform_mismatch_message;
use fern_anim::native::{NativeKeyPath, NativeValue};
use fern_anim::{
    Animation, AnimationCurve, AnimationValue, Cancelled, ExecutionStrategy, GroupState,
    HeadlessBackend, NativeBackend, Property, PropertyAnimation,
};
use fern_config::AnimationConfig;
use fern_ir::{Color, PercentLength, ValueSource, ViewHandle};

fn parallel(backend: &Rc<HeadlessBackend>, descriptors: Vec<PropertyAnimation>) -> Animation {
    Animation::new(
        backend.clone() as Rc<dyn NativeBackend>,
        AnimationConfig::default(),
        descriptors,
        false,
    )
}

fn sequential(backend: &Rc<HeadlessBackend>, descriptors: Vec<PropertyAnimation>) -> Animation {
    Animation::new(
        backend.clone() as Rc<dyn NativeBackend>,
        AnimationConfig::default(),
        descriptors,
        true,
    )
}

#[test]
fn merged_transform_plays_as_one_native_animation() {
    let backend = Rc::new(HeadlessBackend::new());
    let view = ViewHandle::new("card");

    let animation = parallel(
        &backend,
        vec![
            PropertyAnimation::new(
                view.clone(),
                Property::Translate,
                AnimationValue::vec2(100.0, 50.0),
            )
            .with_duration_ms(200.0),
            PropertyAnimation::new(
                view.clone(),
                Property::Rotate,
                AnimationValue::vec3(0.0, 0.0, 90.0),
            )
            .with_duration_ms(200.0),
            PropertyAnimation::new(
                view.clone(),
                Property::Scale,
                AnimationValue::vec2(2.0, 2.0),
            )
            .with_duration_ms(200.0),
        ],
    );

    let completion = animation.play().unwrap();
    assert_eq!(backend.running_count(), 1);
    assert_eq!(
        backend.running_args()[0].key_path,
        NativeKeyPath::Transform
    );

    // Declarative targets are written when the native animation starts.
    {
        let state = view.state();
        assert_eq!(state.style.translate_x.effective(), 100.0);
        assert_eq!(state.style.rotate.effective(), 90.0);
        assert_eq!(state.style.scale_x.effective(), 2.0);
    }

    backend.finish_all();
    assert_eq!(completion.outcome(), Some(Ok(())));
    assert_eq!(animation.state(), GroupState::Finished);

    // The settled native matrix agrees with the declarative style.
    assert_eq!(transform_mismatch_message(&view, backend.as_ref()), None);
}

#[test]
fn zero_scale_declarative_exact_native_guarded() {
    let backend = Rc::new(HeadlessBackend::new());
    let view = ViewHandle::new("v");

    let animation = parallel(
        &backend,
        vec![
            PropertyAnimation::new(
                view.clone(),
                Property::Translate,
                AnimationValue::vec2(10.0, 0.0),
            ),
            PropertyAnimation::new(
                view.clone(),
                Property::Scale,
                AnimationValue::vec2(0.0, 2.0),
            ),
        ],
    );

    let completion = animation.play().unwrap();
    assert_eq!(backend.running_count(), 1);
    match &backend.running_args()[0].to {
        NativeValue::Transform(t) => {
            assert_eq!(t.m11, 1e-6);
            assert_eq!(t.m22, 2.0);
            assert_eq!(t.m41, 10.0);
        }
        other => panic!("expected transform endpoint, got {other:?}"),
    }
    // The declarative value keeps the exact zero.
    assert_eq!(view.state().style.scale_x.effective(), 0.0);

    backend.finish_all();
    assert_eq!(completion.outcome(), Some(Ok(())));
    // Post-completion, the declarative value still reports exactly zero.
    assert_eq!(view.state().style.scale_x.effective(), 0.0);
    // Declarative zero and native epsilon still count as matching, since
    // the expected matrix applies the same guard.
    assert_eq!(transform_mismatch_message(&view, backend.as_ref()), None);
}

#[test]
fn rotation_settles_consistent_with_declarative() {
    let backend = Rc::new(HeadlessBackend::new());
    let view = ViewHandle::new("v");

    let animation = parallel(
        &backend,
        vec![
            PropertyAnimation::new(
                view.clone(),
                Property::Rotate,
                AnimationValue::vec3(60.0, 0.0, 0.0),
            )
            .with_duration_ms(1000.0),
        ],
    );

    let completion = animation.play().unwrap();
    backend.finish_all();
    assert_eq!(completion.outcome(), Some(Ok(())));

    let state = view.state();
    assert_eq!(state.style.rotate_x.effective(), 60.0);
    assert_eq!(state.style.rotate_y.effective(), 0.0);
    assert_eq!(state.style.rotate.effective(), 0.0);
    drop(state);
    assert_eq!(transform_mismatch_message(&view, backend.as_ref()), None);
}

#[test]
fn parallel_group_finishes_when_all_finish() {
    let backend = Rc::new(HeadlessBackend::new());
    let a = ViewHandle::new("a");
    let b = ViewHandle::new("b");

    let animation = parallel(
        &backend,
        vec![
            PropertyAnimation::new(a, Property::Opacity, AnimationValue::scalar(0.0)),
            PropertyAnimation::new(
                b,
                Property::BackgroundColor,
                AnimationValue::color(Color::BLACK),
            ),
        ],
    );

    let completion = animation.play().unwrap();
    assert_eq!(backend.running_count(), 2);

    assert!(backend.finish_next());
    assert_eq!(completion.outcome(), None);
    assert!(animation.is_playing());

    assert!(backend.finish_next());
    assert_eq!(completion.outcome(), Some(Ok(())));
    assert_eq!(animation.state(), GroupState::Finished);
}

#[test]
fn cancel_rejects_and_resets_declarative_values() {
    let backend = Rc::new(HeadlessBackend::new());
    let view = ViewHandle::new("v");

    let animation = parallel(
        &backend,
        vec![
            PropertyAnimation::new(
                view.clone(),
                Property::Opacity,
                AnimationValue::scalar(0.1),
            ),
            PropertyAnimation::new(
                view.clone(),
                Property::Translate,
                AnimationValue::vec2(80.0, 0.0),
            ),
        ],
    );

    let completion = animation.play().unwrap();
    // Start callbacks already moved the declarative model.
    assert_eq!(view.state().style.opacity.effective(), 0.1);
    assert_eq!(view.state().style.translate_x.effective(), 80.0);

    animation.cancel();
    assert_eq!(completion.outcome(), Some(Err(Cancelled)));
    assert_eq!(animation.state(), GroupState::Cancelled);
    assert_eq!(backend.running_count(), 0);

    // Original values are restored.
    assert_eq!(view.state().style.opacity.effective(), 1.0);
    assert_eq!(view.state().style.translate_x.effective(), 0.0);

    // The native side never committed, so it still matches the restored
    // declarative style.
    assert_eq!(transform_mismatch_message(&view, backend.as_ref()), None);
}

#[test]
fn one_cancelled_sibling_dominates_three_finished() {
    let backend = Rc::new(HeadlessBackend::new());
    let views: Vec<ViewHandle> = (0..4)
        .map(|i| ViewHandle::new(format!("v{i}")))
        .collect();

    let animation = parallel(
        &backend,
        views
            .iter()
            .map(|v| {
                PropertyAnimation::new(v.clone(), Property::Opacity, AnimationValue::scalar(0.0))
            })
            .collect(),
    );

    let completion = animation.play().unwrap();
    assert!(backend.finish_next());
    assert!(backend.finish_next());
    assert!(backend.finish_next());
    assert_eq!(completion.outcome(), None);
    assert!(animation.is_playing());

    // The last descriptor is torn down without finishing.
    backend.remove_all_animations(&views[3]);
    assert_eq!(completion.outcome(), Some(Err(Cancelled)));
    assert_eq!(animation.state(), GroupState::Cancelled);
}

#[test]
fn sequential_group_chains_and_settles_from_last() {
    let backend = Rc::new(HeadlessBackend::new());
    let view = ViewHandle::new("v");

    let animation = sequential(
        &backend,
        vec![
            PropertyAnimation::new(
                view.clone(),
                Property::Translate,
                AnimationValue::vec2(10.0, 0.0),
            ),
            PropertyAnimation::new(
                view.clone(),
                Property::Opacity,
                AnimationValue::scalar(0.5),
            ),
        ],
    );

    let completion = animation.play().unwrap();
    // Sequential groups launch one native animation at a time, unmerged.
    assert_eq!(backend.running_count(), 1);
    assert_eq!(
        backend.running_args()[0].key_path,
        NativeKeyPath::Transform
    );

    assert!(backend.finish_next());
    assert_eq!(completion.outcome(), None);
    assert_eq!(backend.running_count(), 1);
    assert_eq!(backend.running_args()[0].key_path, NativeKeyPath::Opacity);

    assert!(backend.finish_next());
    assert_eq!(completion.outcome(), Some(Ok(())));
    assert_eq!(animation.state(), GroupState::Finished);
}

#[test]
fn sequential_rotation_uses_grouped_axes() {
    let backend = Rc::new(HeadlessBackend::new());
    let view = ViewHandle::new("v");

    let animation = sequential(
        &backend,
        vec![PropertyAnimation::new(
            view,
            Property::Rotate,
            AnimationValue::vec3(60.0, 0.0, 0.0),
        )],
    );

    let completion = animation.play().unwrap();
    let args = backend.running_args();
    assert_eq!(args[0].key_path, NativeKeyPath::Rotation);
    assert!(args[0].sub_axes.is_some());
    assert_eq!(backend.running_strategies()[0], ExecutionStrategy::Layer);

    backend.finish_all();
    assert_eq!(completion.outcome(), Some(Ok(())));
}

#[test]
fn sequential_cancel_keeps_finished_values_and_resets_in_flight() {
    let backend = Rc::new(HeadlessBackend::new());
    let first = ViewHandle::new("first");
    let second = ViewHandle::new("second");
    let third = ViewHandle::new("third");

    let animation = sequential(
        &backend,
        vec![
            PropertyAnimation::new(
                first.clone(),
                Property::Opacity,
                AnimationValue::scalar(0.1),
            ),
            PropertyAnimation::new(
                second.clone(),
                Property::Translate,
                AnimationValue::vec2(50.0, 0.0),
            ),
            PropertyAnimation::new(
                third.clone(),
                Property::Opacity,
                AnimationValue::scalar(0.3),
            ),
        ],
    );

    let completion = animation.play().unwrap();
    // First descriptor completes; second is now in flight.
    assert!(backend.finish_next());
    assert_eq!(second.state().style.translate_x.effective(), 50.0);

    animation.cancel();
    assert_eq!(completion.outcome(), Some(Err(Cancelled)));
    // The third descriptor never launched.
    assert_eq!(backend.running_count(), 0);
    assert_eq!(third.state().style.opacity.effective(), 1.0);
    // The finished descriptor keeps its applied value; only the in-flight
    // one rolls back to its snapshot.
    assert_eq!(first.state().style.opacity.effective(), 0.1);
    assert_eq!(second.state().style.translate_x.effective(), 0.0);
}

#[test]
fn second_cancel_is_a_noop() {
    let backend = Rc::new(HeadlessBackend::new());
    let view = ViewHandle::new("v");

    let animation = parallel(
        &backend,
        vec![PropertyAnimation::new(
            view.clone(),
            Property::Opacity,
            AnimationValue::scalar(0.5),
        )],
    );

    let completion = animation.play().unwrap();
    animation.cancel();
    let opacity_after_first = view.state().style.opacity.effective();

    animation.cancel();
    assert_eq!(view.state().style.opacity.effective(), opacity_after_first);
    assert_eq!(completion.outcome(), Some(Err(Cancelled)));
    assert_eq!(animation.state(), GroupState::Cancelled);
}

#[test]
fn sequential_cancel_short_circuits_chain() {
    let backend = Rc::new(HeadlessBackend::new());
    let view = ViewHandle::new("v");

    let animation = sequential(
        &backend,
        vec![
            PropertyAnimation::new(
                view.clone(),
                Property::Opacity,
                AnimationValue::scalar(0.5),
            ),
            PropertyAnimation::new(
                view.clone(),
                Property::Opacity,
                AnimationValue::scalar(0.0),
            ),
        ],
    );

    let completion = animation.play().unwrap();
    animation.cancel();

    assert_eq!(completion.outcome(), Some(Err(Cancelled)));
    assert_eq!(animation.state(), GroupState::Cancelled);
    // The second descriptor never launches.
    assert_eq!(backend.running_count(), 0);
    // The disturbed opacity is restored.
    assert_eq!(view.state().style.opacity.effective(), 1.0);
}

#[test]
fn width_animation_resolves_percent_and_resizes() {
    let backend = Rc::new(HeadlessBackend::new());
    let parent_view = ViewHandle::new("parent");
    parent_view.set_measured_size(400.0, 600.0);
    let child = ViewHandle::new_child("child", &parent_view);
    child.set_measured_size(100.0, 100.0);

    let animation = parallel(
        &backend,
        vec![PropertyAnimation::new(
            child.clone(),
            Property::Width,
            AnimationValue::length(PercentLength::percent(0.5)),
        )],
    );

    let completion = animation.play().unwrap();
    assert_eq!(backend.running_strategies()[0], ExecutionStrategy::Layer);
    match &backend.running_args()[0].to {
        NativeValue::Bounds(bounds) => assert_eq!(bounds.width, 200.0),
        other => panic!("expected bounds endpoint, got {other:?}"),
    }

    backend.finish_all();
    assert_eq!(completion.outcome(), Some(Ok(())));
    assert_eq!(backend.native_state(&child).bounds.width, 200.0);
    // Height untouched.
    assert_eq!(backend.native_state(&child).bounds.height, 100.0);
}

#[test]
fn width_animation_without_parent_cancels_group() {
    let backend = Rc::new(HeadlessBackend::new());
    let orphan = ViewHandle::new("orphan");

    let animation = parallel(
        &backend,
        vec![PropertyAnimation::new(
            orphan,
            Property::Width,
            AnimationValue::length(PercentLength::dip(50.0)),
        )],
    );

    let completion = animation.play().unwrap();
    assert_eq!(completion.outcome(), Some(Err(Cancelled)));
    assert_eq!(backend.running_count(), 0);
}

#[test]
fn keyframe_value_source_resets_override_slot() {
    let backend = Rc::new(HeadlessBackend::new());
    let view = ViewHandle::new("v");
    view.state_mut()
        .style
        .opacity
        .set(ValueSource::Keyframe, 0.8);

    let animation = parallel(
        &backend,
        vec![
            PropertyAnimation::new(
                view.clone(),
                Property::Opacity,
                AnimationValue::scalar(0.2),
            )
            .with_value_source(ValueSource::Keyframe),
        ],
    );

    let _completion = animation.play().unwrap();
    assert_eq!(view.state().style.opacity.effective(), 0.2);

    animation.cancel();
    // The keyframe override is restored; the base value was never touched.
    assert_eq!(view.state().style.opacity.effective(), 0.8);
    assert_eq!(*view.state().style.opacity.base(), 1.0);
}

#[test]
fn double_play_rejects_without_launching_more() {
    let backend = Rc::new(HeadlessBackend::new());
    let view = ViewHandle::new("v");

    let animation = parallel(
        &backend,
        vec![PropertyAnimation::new(
            view,
            Property::Opacity,
            AnimationValue::scalar(0.0),
        )],
    );

    let completion = animation.play().unwrap();
    assert_eq!(backend.running_count(), 1);

    assert!(animation.play().is_err());
    assert_eq!(backend.running_count(), 1);
    assert_eq!(completion.outcome(), None);
    assert!(animation.is_playing());
}

#[test]
fn spring_curve_selects_spring_strategy() {
    let backend = Rc::new(HeadlessBackend::new());
    let view = ViewHandle::new("v");

    let animation = parallel(
        &backend,
        vec![
            PropertyAnimation::new(
                view,
                Property::Translate,
                AnimationValue::vec2(0.0, 40.0),
            )
            .with_curve(AnimationCurve::Spring),
        ],
    );

    let completion = animation.play().unwrap();
    assert_eq!(backend.running_strategies()[0], ExecutionStrategy::Spring);
    backend.finish_all();
    assert_eq!(completion.outcome(), Some(Ok(())));
}

#[test]
fn custom_property_round_trip() {
    let backend = Rc::new(HeadlessBackend::new());
    let view = ViewHandle::new("v");
    view.state_mut().style.register_custom("blur_radius", 0.0);

    let animation = parallel(
        &backend,
        vec![PropertyAnimation::new(
            view.clone(),
            Property::Custom {
                name: "blur_radius".to_string(),
            },
            AnimationValue::scalar(8.0),
        )],
    );

    let completion = animation.play().unwrap();
    backend.finish_all();
    assert_eq!(completion.outcome(), Some(Ok(())));
    assert_eq!(view.state().style.custom("blur_radius"), Some(8.0));
    assert_eq!(
        backend.native_state(&view).custom.get("blur_radius"),
        Some(&8.0)
    );
}

#[test]
fn timing_fields_reach_the_native_layer() {
    let backend = Rc::new(HeadlessBackend::new());
    let view = ViewHandle::new("v");

    let animation = parallel(
        &backend,
        vec![
            PropertyAnimation::new(view, Property::Opacity, AnimationValue::scalar(0.0))
                .with_duration_ms(450.0)
                .with_delay_ms(120.0),
        ],
    );

    let _completion = animation.play().unwrap();
    let args = &backend.running_args()[0];
    assert_eq!(args.duration_s, 0.45);
    assert_eq!(args.delay_s, 0.12);
    assert_eq!(args.repeat_count, 1.0);
}

#[test]
fn dropped_group_leaves_native_animation_unobserved() {
    let backend = Rc::new(HeadlessBackend::new());
    let view = ViewHandle::new("v");

    let completion = {
        let animation = parallel(
            &backend,
            vec![PropertyAnimation::new(
                view,
                Property::Opacity,
                AnimationValue::scalar(0.0),
            )],
        );
        animation.play().unwrap()
    };

    // The group is gone; completing the native animation must not panic and
    // the completion can no longer settle.
    assert!(backend.finish_next());
    assert_eq!(completion.outcome(), None);
}

#[test]
fn mismatched_affine_value_cancels_group() {
    let backend = Rc::new(HeadlessBackend::new());
    let view = ViewHandle::new("card");
    {
        let mut state = view.state_mut();
        state.style.scale_x.set(ValueSource::Animation, 2.0);
        state.style.scale_y.set(ValueSource::Animation, 2.0);
    }

    // A translate carrying a scalar cannot contribute to a combined
    // transform; it must reach the builder and be rejected there.
    let animation = parallel(
        &backend,
        vec![PropertyAnimation::new(
            view.clone(),
            Property::Translate,
            AnimationValue::scalar(10.0),
        )],
    );

    let completion = animation.play().unwrap();
    assert_eq!(backend.running_count(), 0);
    assert_eq!(completion.outcome(), Some(Err(Cancelled)));
    assert_eq!(animation.state(), GroupState::Cancelled);
    // The declarative scale was never disturbed.
    assert_eq!(view.state().style.scale_x.effective(), 2.0);
}
