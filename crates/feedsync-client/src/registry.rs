//! Live containers keyed by subscription.
//!
//! The registry is owned by the dispatcher task, so it needs no locking:
//! register, unregister, and dispatch all happen on one task in order.

use std::fmt;

use feedsync_engine::{StateHandler, StateUpdateEvent};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

/// A registered container's handle (UUIDv7).
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(uuid::Uuid);

impl SubscriptionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// First 8 hex characters, for display only.
    pub fn short(&self) -> String {
        self.0.as_simple().to_string()[..8].to_string()
    }

    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        uuid::Uuid::parse_str(s).map(Self)
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubscriptionId({})", self.short())
    }
}

#[derive(Debug, Default)]
pub struct HandlerRegistry {
    handlers: IndexMap<SubscriptionId, StateHandler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: impl Into<StateHandler>) -> SubscriptionId {
        let id = SubscriptionId::new();
        let handler = handler.into();
        info!(subscription = %id, kind = handler.kind(), "registered container");
        self.handlers.insert(id, handler);
        id
    }

    /// Drop a container. Its observers keep their last snapshot.
    pub fn unregister(&mut self, id: SubscriptionId) -> Option<StateHandler> {
        let removed = self.handlers.shift_remove(&id);
        if let Some(handler) = &removed {
            info!(subscription = %id, kind = handler.kind(), "unregistered container");
        }
        removed
    }

    pub fn get(&self, id: SubscriptionId) -> Option<&StateHandler> {
        self.handlers.get(&id)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Fan a pushed event out to every container, in registration order.
    /// Returns how many changed.
    pub fn dispatch_remote(&self, event: &StateUpdateEvent) -> usize {
        if event.is_unhandled() {
            trace!("skipping unhandled event");
            return 0;
        }
        let changed = self.handlers.values().filter(|h| h.apply_remote(event)).count();
        debug!(kind = event.kind(), changed, of = self.handlers.len(), "dispatched remote event");
        changed
    }

    /// Apply a local optimistic event to one container. `None` when the
    /// subscription is unknown.
    pub fn apply_local(&self, id: SubscriptionId, event: &StateUpdateEvent) -> Option<bool> {
        let handler = self.handlers.get(&id)?;
        Some(handler.apply_local(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedsync_engine::state::{BookmarkListState, MemberListState};
    use feedsync_engine::{Container, EngineContext, Scope};
    use feedsync_types::{FeedId, FeedMemberData, UserData};

    fn member(user: &str) -> FeedMemberData {
        FeedMemberData {
            user: UserData::with_id(user),
            ..Default::default()
        }
    }

    #[test]
    fn test_register_unregister() {
        let mut registry = HandlerRegistry::new();
        let ctx = EngineContext::new("me");
        let a = registry.register(Container::new(BookmarkListState::new(), ctx.clone()));
        let b = registry.register(Container::new(BookmarkListState::new(), ctx));
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert!(registry.unregister(a).is_some());
        assert!(registry.unregister(a).is_none());
        assert!(registry.get(b).is_some());
    }

    #[test]
    fn test_dispatch_counts_changed_containers() {
        let mut registry = HandlerRegistry::new();
        let ctx = EngineContext::new("me");
        let rust = Container::new(MemberListState::new(FeedId::new("group", "rust")), ctx.clone());
        let go = Container::new(MemberListState::new(FeedId::new("group", "go")), ctx);
        registry.register(rust.clone());
        registry.register(go.clone());

        let event = StateUpdateEvent::MemberAdded {
            scope: Scope::Specific(FeedId::new("group", "rust")),
            member: member("bob"),
        };
        assert_eq!(registry.dispatch_remote(&event), 1);
        assert_eq!(rust.snapshot().members.len(), 1);
        assert!(go.snapshot().members.is_empty());

        assert_eq!(registry.dispatch_remote(&event), 0);
        assert_eq!(registry.dispatch_remote(&StateUpdateEvent::Unhandled), 0);
    }

    #[test]
    fn test_apply_local_targets_one() {
        let mut registry = HandlerRegistry::new();
        let ctx = EngineContext::new("me");
        let rust = Container::new(MemberListState::new(FeedId::new("group", "rust")), ctx);
        let id = registry.register(rust.clone());

        let event = StateUpdateEvent::MemberAdded {
            scope: Scope::Unknown,
            member: member("me"),
        };
        assert_eq!(registry.apply_local(id, &event), Some(true));
        assert_eq!(registry.apply_local(SubscriptionId::new(), &event), None);
        assert_eq!(rust.snapshot().members.len(), 1);
    }

    #[test]
    fn test_subscription_id_parse_display() {
        let id = SubscriptionId::new();
        assert_eq!(SubscriptionId::parse(&id.to_string()).unwrap(), id);
        assert_eq!(id.short().len(), 8);
    }
}
