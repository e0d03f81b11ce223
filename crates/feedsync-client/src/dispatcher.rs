//! The dispatcher task: one writer for every registered container.
//!
//! ```text
//!   DispatcherHandle (Clone)      mpsc       EventDispatcher (tokio task)
//!   ┌─────────────────────┐   ────────▶   ┌───────────────────────────────┐
//!   │ .register()         │               │ normalize → enrich → dispatch │
//!   │ .dispatch()         │   ◀────────   │ HandlerRegistry               │
//!   │ .apply_local()      │    oneshot    │                               │
//!   └─────────────────────┘               └───────────────────────────────┘
//! ```
//!
//! Commands are processed strictly in arrival order, so remote events and
//! local writes interleave exactly as they were sent. Observers never talk to
//! the task; they hold [`feedsync_engine::Container`] clones and read
//! snapshots or subscribe.

use std::sync::Arc;

use feedsync_engine::{StateHandler, StateUpdateEvent};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::enrich::{CapabilitySource, Enricher};
use crate::normalize::{normalize, normalize_json};
use crate::registry::{HandlerRegistry, SubscriptionId};
use crate::wire::WireEnvelope;

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("dispatcher shut down")]
    Shutdown,
    #[error("no container registered as {0}")]
    UnknownSubscription(SubscriptionId),
}

// ============================================================================
// Commands (internal)
// ============================================================================

enum DispatchCommand {
    Register {
        handler: StateHandler,
        reply: oneshot::Sender<SubscriptionId>,
    },
    Unregister {
        id: SubscriptionId,
        reply: oneshot::Sender<bool>,
    },
    /// `reply` is `None` for fire-and-forget pushes.
    Remote {
        envelope: Box<WireEnvelope>,
        reply: Option<oneshot::Sender<usize>>,
    },
    RemoteJson {
        text: String,
        reply: oneshot::Sender<usize>,
    },
    Local {
        id: SubscriptionId,
        event: Box<StateUpdateEvent>,
        reply: oneshot::Sender<Result<bool, DispatchError>>,
    },
}

// ============================================================================
// DispatcherHandle (Send + Sync public API)
// ============================================================================

/// Cloneable handle to a running [`EventDispatcher`].
///
/// Every method except [`DispatcherHandle::push`] waits for the dispatcher
/// to process the command and returns its result.
#[derive(Clone, Debug)]
pub struct DispatcherHandle {
    tx: mpsc::Sender<DispatchCommand>,
}

impl DispatcherHandle {
    /// Start routing events to a container. Keep a clone of the container to
    /// observe it.
    pub async fn register(&self, handler: impl Into<StateHandler>) -> Result<SubscriptionId, DispatchError> {
        let (reply, rx) = oneshot::channel();
        self.send(DispatchCommand::Register {
            handler: handler.into(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| DispatchError::Shutdown)
    }

    /// Stop routing events to a container. `false` if it was not registered.
    pub async fn unregister(&self, id: SubscriptionId) -> Result<bool, DispatchError> {
        let (reply, rx) = oneshot::channel();
        self.send(DispatchCommand::Unregister { id, reply }).await?;
        rx.await.map_err(|_| DispatchError::Shutdown)
    }

    /// Run a pushed event through the pipeline; returns how many containers
    /// changed.
    pub async fn dispatch(&self, envelope: WireEnvelope) -> Result<usize, DispatchError> {
        let (reply, rx) = oneshot::channel();
        self.send(DispatchCommand::Remote {
            envelope: Box::new(envelope),
            reply: Some(reply),
        })
        .await?;
        rx.await.map_err(|_| DispatchError::Shutdown)
    }

    /// Like [`DispatcherHandle::dispatch`] for raw JSON. Malformed input
    /// changes nothing.
    pub async fn dispatch_json(&self, text: impl Into<String>) -> Result<usize, DispatchError> {
        let (reply, rx) = oneshot::channel();
        self.send(DispatchCommand::RemoteJson {
            text: text.into(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| DispatchError::Shutdown)
    }

    /// Queue a pushed event without waiting for it to be applied.
    pub async fn push(&self, envelope: WireEnvelope) -> Result<(), DispatchError> {
        self.send(DispatchCommand::Remote {
            envelope: Box::new(envelope),
            reply: None,
        })
        .await
    }

    /// Apply a local optimistic write to one container, skipping scope checks.
    pub async fn apply_local(&self, id: SubscriptionId, event: StateUpdateEvent) -> Result<bool, DispatchError> {
        let (reply, rx) = oneshot::channel();
        self.send(DispatchCommand::Local {
            id,
            event: Box::new(event),
            reply,
        })
        .await?;
        rx.await.map_err(|_| DispatchError::Shutdown)?
    }

    async fn send(&self, cmd: DispatchCommand) -> Result<(), DispatchError> {
        self.tx.send(cmd).await.map_err(|_| DispatchError::Shutdown)
    }
}

// ============================================================================
// EventDispatcher (owns the registry)
// ============================================================================

#[derive(Debug, Default)]
pub struct EventDispatcher {
    registry: HandlerRegistry,
    enricher: Option<Enricher>,
}

impl EventDispatcher {
    pub fn new(enricher: Option<Enricher>) -> Self {
        Self {
            registry: HandlerRegistry::new(),
            enricher,
        }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut HandlerRegistry {
        &mut self.registry
    }

    /// Normalize, enrich, and fan out one pushed event.
    pub fn process(&self, envelope: WireEnvelope) -> usize {
        self.process_event(normalize(envelope))
    }

    fn process_event(&self, event: StateUpdateEvent) -> usize {
        let event = match &self.enricher {
            Some(enricher) => enricher.enrich(event),
            None => event,
        };
        self.registry.dispatch_remote(&event)
    }

    /// Process commands until every handle is dropped.
    async fn run(mut self, mut rx: mpsc::Receiver<DispatchCommand>) {
        while let Some(cmd) = rx.recv().await {
            self.handle_command(cmd);
        }
        debug!(containers = self.registry.len(), "dispatcher shutting down: channel closed");
    }

    fn handle_command(&mut self, cmd: DispatchCommand) {
        match cmd {
            DispatchCommand::Register { handler, reply } => {
                let _ = reply.send(self.registry.register(handler));
            }
            DispatchCommand::Unregister { id, reply } => {
                let _ = reply.send(self.registry.unregister(id).is_some());
            }
            DispatchCommand::Remote { envelope, reply } => {
                let changed = self.process(*envelope);
                if let Some(reply) = reply {
                    let _ = reply.send(changed);
                }
            }
            DispatchCommand::RemoteJson { text, reply } => {
                let _ = reply.send(self.process_event(normalize_json(&text)));
            }
            DispatchCommand::Local { id, event, reply } => {
                let result = self.registry.apply_local(id, &event).ok_or_else(|| {
                    warn!(subscription = %id, kind = event.kind(), "local event for unknown container");
                    DispatchError::UnknownSubscription(id)
                });
                let _ = reply.send(result);
            }
        }
    }
}

// ============================================================================
// Public spawn function
// ============================================================================

/// Spawn a dispatcher on the current tokio runtime.
///
/// `capabilities` is consulted only when `config.enrich_capabilities` is set.
pub fn spawn_dispatcher(
    config: &ClientConfig,
    capabilities: Option<Arc<dyn CapabilitySource>>,
) -> DispatcherHandle {
    let enricher = capabilities
        .filter(|_| config.enrich_capabilities)
        .map(Enricher::new);
    let (tx, rx) = mpsc::channel(config.event_buffer.max(1));
    tokio::spawn(EventDispatcher::new(enricher).run(rx));
    DispatcherHandle { tx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::CapabilityCache;
    use crate::wire::WireEvent;
    use feedsync_engine::state::{ActivityState, FeedState};
    use feedsync_engine::{ActivityQuery, Container, EngineContext, Scope};
    use feedsync_types::{ActivityData, FeedData, FeedId, FeedOwnCapability, FeedsReactionData, UserData};

    fn config() -> ClientConfig {
        ClientConfig::default().with_user("me")
    }

    fn fid() -> FeedId {
        FeedId::new("user", "me")
    }

    fn activity(id: &str, author: &str, at: u64) -> ActivityData {
        ActivityData {
            feeds: vec![fid()],
            ..ActivityData::new(id, UserData::with_id(author), at)
        }
    }

    fn feed_container() -> Container<FeedState> {
        Container::new(FeedState::new(fid(), ActivityQuery::default()), config().context())
    }

    // ========================================================================
    // Pipeline
    // ========================================================================

    #[tokio::test]
    async fn test_remote_pipeline_updates_feed() {
        let handle = spawn_dispatcher(&config(), None);
        let feed = feed_container();
        handle.register(feed.clone()).await.unwrap();

        let added = WireEnvelope::new(
            Some("user:me"),
            1,
            WireEvent::ActivityAdded {
                activity: activity("a1", "me", 1),
            },
        );
        assert_eq!(handle.dispatch(added.clone()).await.unwrap(), 1);
        assert_eq!(handle.dispatch(added).await.unwrap(), 0);

        let reaction = FeedsReactionData {
            activity_id: "a1".into(),
            reaction_type: "like".into(),
            user: UserData::with_id("bob"),
            created_at: 2,
            updated_at: 2,
            ..Default::default()
        };
        let json = serde_json::to_string(&WireEnvelope::new(
            Some("user:me"),
            2,
            WireEvent::ActivityReactionAdded {
                activity: None,
                reaction,
            },
        ))
        .unwrap();
        assert_eq!(handle.dispatch_json(json).await.unwrap(), 1);
        assert_eq!(handle.dispatch_json("garbage").await.unwrap(), 0);

        let snapshot = feed.snapshot();
        assert_eq!(snapshot.activities.activities.len(), 1);
        assert_eq!(snapshot.activities.activities[0].reaction_count, 1);
    }

    #[tokio::test]
    async fn test_events_apply_in_order() {
        let handle = spawn_dispatcher(&config(), None);
        let feed = feed_container();
        let mut rx = feed.subscribe();
        handle.register(feed.clone()).await.unwrap();

        for i in 0..5 {
            let envelope = WireEnvelope::new(
                Some("user:me"),
                i,
                WireEvent::ActivityAdded {
                    activity: activity(&format!("a{i}"), "me", i),
                },
            );
            handle.push(envelope).await.unwrap();
        }
        let deleted = WireEnvelope::new(
            Some("user:me"),
            9,
            WireEvent::ActivityDeleted {
                activity: activity("a2", "me", 2),
            },
        );
        assert_eq!(handle.dispatch(deleted).await.unwrap(), 1);

        assert!(rx.has_changed().unwrap());
        let ids: Vec<String> = rx
            .borrow_and_update()
            .activities
            .activities
            .iter()
            .map(|a| a.id.clone())
            .collect();
        assert_eq!(ids, ["a4", "a3", "a1", "a0"]);
    }

    #[tokio::test]
    async fn test_local_and_unregister() {
        let handle = spawn_dispatcher(&config(), None);
        let single = Container::new(
            ActivityState::seeded(activity("a1", "bob", 1), Some(fid()), Default::default(), Default::default()),
            config().context(),
        );
        let id = handle.register(single.clone()).await.unwrap();

        let reaction = FeedsReactionData {
            activity_id: "a1".into(),
            reaction_type: "like".into(),
            user: UserData::with_id("me"),
            ..Default::default()
        };
        let local = StateUpdateEvent::ActivityReactionUpserted {
            scope: Scope::Unknown,
            reaction,
            enforce_unique: false,
        };
        assert!(handle.apply_local(id, local.clone()).await.unwrap());
        let own = single.snapshot().activity.as_ref().map(|a| a.own_reactions.len());
        assert_eq!(own, Some(1));

        assert!(handle.unregister(id).await.unwrap());
        assert!(!handle.unregister(id).await.unwrap());
        assert_eq!(
            handle.apply_local(id, local).await,
            Err(DispatchError::UnknownSubscription(id))
        );
    }

    // ========================================================================
    // Enrichment
    // ========================================================================

    #[tokio::test]
    async fn test_enrichment_before_dispatch() {
        let cache = Arc::new(CapabilityCache::new());
        cache.put(fid(), [FeedOwnCapability::UpdateFeed].into_iter().collect());
        let handle = spawn_dispatcher(&config(), Some(cache as Arc<dyn CapabilitySource>));
        let feed = feed_container();
        handle.register(feed.clone()).await.unwrap();

        let updated = WireEnvelope::new(
            Some("user:me"),
            1,
            WireEvent::FeedUpdated {
                feed: FeedData {
                    name: "Mine".into(),
                    ..FeedData::new(fid())
                },
            },
        );
        assert_eq!(handle.dispatch(updated).await.unwrap(), 1);
        let snapshot = feed.snapshot();
        let data = snapshot.feed.as_ref().unwrap();
        assert_eq!(data.name, "Mine");
        assert!(data.own_capabilities.contains(&FeedOwnCapability::UpdateFeed));
    }

    #[tokio::test]
    async fn test_dropped_dispatcher_reports_shutdown() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let handle = DispatcherHandle { tx };
        assert_eq!(
            handle.register(feed_container()).await,
            Err(DispatchError::Shutdown)
        );
    }
}
