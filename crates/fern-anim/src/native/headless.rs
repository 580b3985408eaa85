//! In-process native backend.
//!
//! Models the native layer faithfully enough for the engine to run without a
//! platform: animations queue instead of playing on a clock, and the driver
//! (usually a test) delivers completions. Like a real layer model, a finished
//! animation leaves the native state at the value dictated by the declarative
//! tree, and a removed animation leaves it untouched since intermediate
//! frames are never committed.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use fern_ir::{Bounds, ViewHandle};
use tracing::trace;

use crate::diagnostics::declared_transform;
use crate::native::{
    ExecutionStrategy, NativeAnimationArgs, NativeBackend, NativeLaunch, NativeViewState,
};

struct Running {
    view: ViewHandle,
    launch: NativeLaunch,
}

#[derive(Default)]
struct Inner {
    views: HashMap<String, NativeViewState>,
    running: VecDeque<Running>,
}

/// A platform-free [`NativeBackend`].
#[derive(Default)]
pub struct HeadlessBackend {
    inner: RefCell<Inner>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of animations currently running.
    pub fn running_count(&self) -> usize {
        self.inner.borrow().running.len()
    }

    /// Arguments of every running animation, oldest first.
    pub fn running_args(&self) -> Vec<NativeAnimationArgs> {
        self.inner
            .borrow()
            .running
            .iter()
            .map(|r| r.launch.args.clone())
            .collect()
    }

    /// Execution strategies of every running animation, oldest first.
    pub fn running_strategies(&self) -> Vec<ExecutionStrategy> {
        self.inner
            .borrow()
            .running
            .iter()
            .map(|r| r.launch.strategy)
            .collect()
    }

    /// Complete the oldest running animation. Returns false when none are
    /// running.
    pub fn finish_next(&self) -> bool {
        let Some(running) = self.inner.borrow_mut().running.pop_front() else {
            return false;
        };
        self.commit(&running.view);
        running.launch.delegate.animation_did_stop(true);
        true
    }

    /// Complete every running animation, including ones started by
    /// completion callbacks (sequential chains).
    pub fn finish_all(&self) {
        while self.finish_next() {}
    }

    fn ensure_view(&self, view: &ViewHandle) {
        let id = view.id();
        if self.inner.borrow().views.contains_key(&id) {
            return;
        }
        let mut state = NativeViewState {
            opacity: 1.0,
            ..NativeViewState::default()
        };
        let measured = view.state().measured_size;
        state.bounds = Bounds::new(0.0, 0.0, measured.width, measured.height);
        sync_from_declarative(view, &mut state);
        self.inner.borrow_mut().views.insert(id, state);
    }

    /// Snap a view's native state to the declarative model. Called when an
    /// animation finishes, mirroring how a layer model settles.
    fn commit(&self, view: &ViewHandle) {
        self.ensure_view(view);
        let mut inner = self.inner.borrow_mut();
        if let Some(state) = inner.views.get_mut(&view.id()) {
            sync_from_declarative(view, state);
        }
    }
}

fn sync_from_declarative(view: &ViewHandle, state: &mut NativeViewState) {
    let view_state = view.state();
    let style = &view_state.style;

    state.transform = declared_transform(view);
    state.rotation = [
        style.rotate_x.effective().to_radians(),
        style.rotate_y.effective().to_radians(),
        style.rotate.effective().to_radians(),
    ];
    state.opacity = style.opacity.effective();
    state.background_color = style.background_color.effective();

    if let Some(parent) = view.parent() {
        let parent_size = parent.state().measured_size;
        if let Some(width) = style.width.effective().to_dips(parent_size.width) {
            state.bounds = state.bounds.with_width(width);
        }
        if let Some(height) = style.height.effective().to_dips(parent_size.height) {
            state.bounds = state.bounds.with_height(height);
        }
    }

    state.custom.clear();
    for (name, value) in style.custom_properties() {
        state.custom.insert(name.to_string(), value);
    }
}

impl NativeBackend for HeadlessBackend {
    fn native_state(&self, view: &ViewHandle) -> NativeViewState {
        self.ensure_view(view);
        self.inner.borrow().views[&view.id()].clone()
    }

    fn start_animation(&self, view: &ViewHandle, launch: NativeLaunch) {
        self.ensure_view(view);
        trace!(view = %view.id(), key_path = ?launch.args.key_path, "start animation");
        let delegate = std::rc::Rc::clone(&launch.delegate);
        self.inner.borrow_mut().running.push_back(Running {
            view: view.clone(),
            launch,
        });
        delegate.animation_did_start();
    }

    fn remove_all_animations(&self, view: &ViewHandle) {
        loop {
            let removed = {
                let mut inner = self.inner.borrow_mut();
                let index = inner.running.iter().position(|r| r.view.ptr_eq(view));
                index.and_then(|i| inner.running.remove(i))
            };
            match removed {
                // Native state stays put: no intermediate frame was ever
                // committed for this animation.
                Some(running) => running.launch.delegate.animation_did_stop(false),
                None => break,
            }
        }
    }
}
