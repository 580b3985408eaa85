//! Animation groups: play, completion counting and cancellation.
//!
//! A group owns a list of descriptors and drives them either in parallel or
//! sequentially. Terminal outcomes are decided purely from native stop
//! callbacks: a parallel group finishes when every descriptor reports
//! finished, and is cancelled when at least one reports unfinished and all
//! have reported. A sequential group chains each finish into the next launch
//! and settles from the last descriptor; any unfinished stop short-circuits
//! the chain. Descriptors that fail to build are folded into the cancelled
//! count so a group always settles.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use fern_config::AnimationConfig;
use fern_ir::{ValueSource, ViewHandle};
use tracing::{debug, error, warn};

use crate::completion::{Completion, SettlementCell};
use crate::descriptor::PropertyAnimation;
use crate::error::{AnimationError, Cancelled};
use crate::native::{AnimationDelegate, NativeBackend, NativeLaunch};
use crate::registry::{self, PropertyResetRegistry};
use crate::{builder, merge};

/// Lifecycle of one play of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupState {
    Idle,
    Playing,
    Finished,
    Cancelled,
}

struct GroupRuntime {
    state: GroupState,
    finished: usize,
    cancelled: usize,
    total: usize,
    cancel_requested: bool,
    settlement: SettlementCell,
    resets: PropertyResetRegistry,
    started_views: Vec<ViewHandle>,
}

struct GroupShared {
    backend: Rc<dyn NativeBackend>,
    config: AnimationConfig,
    animations: Vec<PropertyAnimation>,
    play_sequentially: bool,
    value_source: ValueSource,
    runtime: RefCell<GroupRuntime>,
}

/// A playable group of property animations.
pub struct Animation {
    shared: Rc<GroupShared>,
}

impl Animation {
    /// Build a group from descriptors.
    ///
    /// Parallel groups have their affine descriptors merged up front;
    /// sequential descriptors never overlap so they are kept as-is. The
    /// group writes declarative values into the slot named by the first
    /// descriptor's value source.
    pub fn new(
        backend: Rc<dyn NativeBackend>,
        config: AnimationConfig,
        descriptors: Vec<PropertyAnimation>,
        play_sequentially: bool,
    ) -> Self {
        let value_source = descriptors
            .first()
            .map(|d| d.value_source)
            .unwrap_or_default();
        let before = descriptors.len();
        let animations = if play_sequentially {
            descriptors
        } else {
            merge::merge_affine_animations(&descriptors)
        };
        if animations.len() != before {
            debug!(before, after = animations.len(), "merged affine descriptors");
        }
        Self {
            shared: Rc::new(GroupShared {
                backend,
                config,
                animations,
                play_sequentially,
                value_source,
                runtime: RefCell::new(GroupRuntime {
                    state: GroupState::Idle,
                    finished: 0,
                    cancelled: 0,
                    total: 0,
                    cancel_requested: false,
                    settlement: SettlementCell::new(),
                    resets: PropertyResetRegistry::default(),
                    started_views: Vec::new(),
                }),
            }),
        }
    }

    pub fn state(&self) -> GroupState {
        self.shared.runtime.borrow().state
    }

    pub fn is_playing(&self) -> bool {
        self.state() == GroupState::Playing
    }

    /// The descriptors the group will drive, after any merging.
    pub fn animations(&self) -> &[PropertyAnimation] {
        &self.shared.animations
    }

    /// Start the group and return its completion future.
    ///
    /// A group that is already playing rejects the call. Replaying a settled
    /// group starts a fresh run with a fresh completion; earlier completions
    /// stay settled with their original outcome.
    pub fn play(&self) -> Result<Completion, AnimationError> {
        let settlement = {
            let mut runtime = self.shared.runtime.borrow_mut();
            if runtime.state == GroupState::Playing {
                error!("play called on a group that is already playing");
                return Err(AnimationError::AlreadyPlaying);
            }
            runtime.state = GroupState::Playing;
            runtime.finished = 0;
            runtime.cancelled = 0;
            runtime.total = self.shared.animations.len();
            runtime.cancel_requested = false;
            runtime.settlement = SettlementCell::new();
            runtime.resets.clear();
            runtime.started_views.clear();
            runtime.settlement.clone()
        };
        let completion = settlement.completion();

        if self.shared.animations.is_empty() {
            // Nothing to run; settle as finished right away.
            self.shared.runtime.borrow_mut().state = GroupState::Finished;
            settlement.settle(Ok(()));
            return Ok(completion);
        }

        if self.shared.play_sequentially {
            GroupShared::launch(&self.shared, 0);
        } else {
            for index in 0..self.shared.animations.len() {
                GroupShared::launch(&self.shared, index);
            }
        }
        Ok(completion)
    }

    /// Cancel a playing group.
    ///
    /// Removes the native animations and restores the declarative values
    /// each launched descriptor disturbed. Cancelling a group that is not
    /// playing warns and does nothing.
    pub fn cancel(&self) {
        {
            let mut runtime = self.shared.runtime.borrow_mut();
            if runtime.state != GroupState::Playing {
                warn!("cancel called on a group that is not playing");
                return;
            }
            runtime.cancel_requested = true;
        }

        // Snapshot outside the borrow: stop callbacks re-enter the runtime.
        let (views, resets) = {
            let runtime = self.shared.runtime.borrow();
            (
                runtime.started_views.clone(),
                runtime.resets.clone(),
            )
        };
        for view in &views {
            self.shared.backend.remove_all_animations(view);
        }
        resets.apply_all(self.shared.value_source);
    }
}

impl GroupShared {
    fn launch(shared: &Rc<Self>, index: usize) {
        let animation = &shared.animations[index];
        match builder::build(animation, shared.backend.as_ref(), &shared.config) {
            Ok(built) => {
                {
                    let mut runtime = shared.runtime.borrow_mut();
                    runtime.resets.record(index, built.reset);
                    runtime.started_views.push(animation.target.clone());
                }
                let delegate = Rc::new(GroupDelegate {
                    shared: Rc::downgrade(shared),
                    index,
                });
                shared.backend.start_animation(
                    &animation.target,
                    NativeLaunch {
                        args: built.args,
                        strategy: built.strategy,
                        curve: built.curve,
                        delegate,
                    },
                );
            }
            Err(err) => {
                error!(
                    property = animation.property.name(),
                    view = %animation.target.id(),
                    %err,
                    "animation failed to start"
                );
                // A descriptor that never ran counts as an unfinished stop,
                // so the group still settles.
                Self::descriptor_stopped(shared, index, false);
            }
        }
    }

    /// Apply the declarative target values for a descriptor. Runs from the
    /// native start callback.
    fn descriptor_started(&self, index: usize) {
        registry::apply_target(&self.animations[index], self.value_source);
    }

    fn descriptor_stopped(shared: &Rc<Self>, index: usize, finished: bool) {
        let mut runtime = shared.runtime.borrow_mut();
        if runtime.state != GroupState::Playing {
            // A callback arriving after settlement is stale.
            return;
        }

        if finished {
            // A completed descriptor keeps its applied value even if the
            // group is cancelled later.
            runtime.resets.discard(index);
        }

        if shared.play_sequentially {
            if finished && !runtime.cancel_requested {
                runtime.finished += 1;
                if index + 1 < shared.animations.len() {
                    drop(runtime);
                    Self::launch(shared, index + 1);
                    return;
                }
                runtime.state = GroupState::Finished;
                let settlement = runtime.settlement.clone();
                drop(runtime);
                debug!("sequential animation group finished");
                settlement.settle(Ok(()));
            } else {
                runtime.cancelled += 1;
                runtime.state = GroupState::Cancelled;
                let settlement = runtime.settlement.clone();
                drop(runtime);
                debug!("sequential animation group cancelled");
                settlement.settle(Err(Cancelled));
            }
            return;
        }

        if finished {
            runtime.finished += 1;
        } else {
            runtime.cancelled += 1;
        }
        if runtime.finished + runtime.cancelled < runtime.total {
            return;
        }
        let outcome = if runtime.cancelled > 0 {
            runtime.state = GroupState::Cancelled;
            Err(Cancelled)
        } else {
            runtime.state = GroupState::Finished;
            Ok(())
        };
        let settlement = runtime.settlement.clone();
        drop(runtime);
        debug!(?outcome, "animation group settled");
        settlement.settle(outcome);
    }
}

struct GroupDelegate {
    shared: Weak<GroupShared>,
    index: usize,
}

impl AnimationDelegate for GroupDelegate {
    fn animation_did_start(&self) {
        // A dropped group leaves the native animation to run out unobserved.
        if let Some(shared) = self.shared.upgrade() {
            shared.descriptor_started(self.index);
        }
    }

    fn animation_did_stop(&self, finished: bool) {
        if let Some(shared) = self.shared.upgrade() {
            GroupShared::descriptor_stopped(&shared, self.index, finished);
        }
    }
}
