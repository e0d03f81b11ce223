//! Observable state containers.
//!
//! A [`Container`] owns one immutable state snapshot behind a
//! `tokio::sync::watch` channel. Handlers produce a new snapshot per event;
//! observers see it only when something changed.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, trace};

use crate::context::EngineContext;
use crate::events::StateUpdateEvent;

/// Container state that knows how to fold update events.
pub trait ApplyEvent: Send + Sync + Sized + 'static {
    /// Does this remote event concern this container at all?
    fn matches_scope(&self, event: &StateUpdateEvent) -> bool;

    /// The state after `event`, or `None` when the event changes nothing.
    fn apply(&self, event: &StateUpdateEvent, ctx: &EngineContext) -> Option<Self>;
}

/// An observable, single-writer state holder.
///
/// Cloning shares the channel: every clone sees the same snapshots.
pub struct Container<S> {
    tx: Arc<watch::Sender<Arc<S>>>,
    ctx: EngineContext,
}

impl<S> Clone for Container<S> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
            ctx: self.ctx.clone(),
        }
    }
}

impl<S: ApplyEvent> Container<S> {
    pub fn new(state: S, ctx: EngineContext) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(state));
        Self { tx: Arc::new(tx), ctx }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<S> {
        Arc::clone(&self.tx.borrow())
    }

    /// A receiver notified on every published change. Drop it to
    /// unsubscribe.
    pub fn subscribe(&self) -> watch::Receiver<Arc<S>> {
        self.tx.subscribe()
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    /// Apply a pushed event if its scope matches. Returns whether the state
    /// changed.
    pub fn apply_remote(&self, event: &StateUpdateEvent) -> bool {
        if !self.snapshot().matches_scope(event) {
            trace!(kind = event.kind(), "scope mismatch, skipped");
            return false;
        }
        self.apply(event)
    }

    /// Apply a locally-originated event. Scope is not checked.
    pub fn apply_local(&self, event: &StateUpdateEvent) -> bool {
        self.apply(event)
    }

    /// Replace the state wholesale (e.g. after a refetch).
    pub fn replace(&self, state: S) {
        self.tx.send_replace(Arc::new(state));
    }

    /// Replace the state with `f(current)` when it returns `Some`.
    pub fn update(&self, f: impl FnOnce(&S) -> Option<S>) -> bool {
        match f(&self.snapshot()) {
            Some(next) => {
                self.tx.send_replace(Arc::new(next));
                true
            }
            None => false,
        }
    }

    fn apply(&self, event: &StateUpdateEvent) -> bool {
        let changed = self.update(|state| state.apply(event, &self.ctx));
        if changed {
            debug!(kind = event.kind(), "applied");
        } else {
            trace!(kind = event.kind(), "no-op");
        }
        changed
    }
}
