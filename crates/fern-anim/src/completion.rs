//! Completion futures for animation groups.
//!
//! Each `play` hands back a [`Completion`] that settles exactly once, from
//! inside a native stop callback: resolved when every descriptor finished,
//! rejected with [`Cancelled`] otherwise. The engine is single-threaded, so
//! the shared settlement state is `Rc<RefCell<..>>` rather than anything
//! atomic.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use crate::error::Cancelled;

#[derive(Debug, Default)]
struct Settlement {
    outcome: Option<Result<(), Cancelled>>,
    // One waker per task with a pending poll; clones of a completion can be
    // awaited independently.
    wakers: Vec<Waker>,
}

/// Shared settlement slot owned by the group runtime.
#[derive(Debug, Clone, Default)]
pub(crate) struct SettlementCell {
    inner: Rc<RefCell<Settlement>>,
}

impl SettlementCell {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Settle the cell. The first settlement wins; later calls are ignored.
    pub(crate) fn settle(&self, outcome: Result<(), Cancelled>) {
        let mut inner = self.inner.borrow_mut();
        if inner.outcome.is_some() {
            return;
        }
        inner.outcome = Some(outcome);
        let wakers = std::mem::take(&mut inner.wakers);
        drop(inner);
        for waker in wakers {
            waker.wake();
        }
    }

    pub(crate) fn completion(&self) -> Completion {
        Completion {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// A future resolving when the animation group reaches a terminal state.
#[derive(Debug, Clone)]
pub struct Completion {
    inner: Rc<RefCell<Settlement>>,
}

impl Completion {
    /// The settled outcome, if any, without polling.
    pub fn outcome(&self) -> Option<Result<(), Cancelled>> {
        self.inner.borrow().outcome
    }

    pub fn is_settled(&self) -> bool {
        self.outcome().is_some()
    }
}

impl Future for Completion {
    type Output = Result<(), Cancelled>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut inner = self.inner.borrow_mut();
        match inner.outcome {
            Some(outcome) => Poll::Ready(outcome),
            None => {
                let incoming = cx.waker();
                if !inner.wakers.iter().any(|w| w.will_wake(incoming)) {
                    inner.wakers.push(incoming.clone());
                }
                Poll::Pending
            }
        }
    }
}
