//! Capability enrichment.
//!
//! Push events carry feeds without the current user's `own_capabilities`
//! (the server computes those per request). Before dispatch, embedded feeds
//! get their capabilities from whatever the repository layer last cached.

use std::sync::Arc;

use dashmap::DashMap;
use feedsync_engine::StateUpdateEvent;
use feedsync_types::{CapabilitySet, FeedData, FeedId};
use tracing::trace;

/// Read side of the capability cache.
pub trait CapabilitySource: Send + Sync {
    fn get(&self, fid: &FeedId) -> Option<CapabilitySet>;
}

/// Concurrent fid → capabilities map, written by the repository layer.
#[derive(Debug, Default)]
pub struct CapabilityCache {
    entries: DashMap<FeedId, CapabilitySet>,
}

impl CapabilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, fid: FeedId, capabilities: CapabilitySet) {
        self.entries.insert(fid, capabilities);
    }

    /// Cache every feed in a fetched page that came with capabilities.
    pub fn put_from_feeds<'a>(&self, feeds: impl IntoIterator<Item = &'a FeedData>) {
        for feed in feeds {
            if !feed.own_capabilities.is_empty() {
                self.put(feed.fid.clone(), feed.own_capabilities.clone());
            }
        }
    }

    pub fn remove(&self, fid: &FeedId) -> Option<CapabilitySet> {
        self.entries.remove(fid).map(|(_, caps)| caps)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CapabilitySource for CapabilityCache {
    fn get(&self, fid: &FeedId) -> Option<CapabilitySet> {
        self.entries.get(fid).map(|entry| entry.value().clone())
    }
}

#[derive(Clone)]
pub struct Enricher {
    source: Arc<dyn CapabilitySource>,
}

impl Enricher {
    pub fn new(source: Arc<dyn CapabilitySource>) -> Self {
        Self { source }
    }

    /// Rewrite embedded feed capabilities from the cache. Events without an
    /// embedded feed, or whose feed is not cached, pass through unchanged.
    pub fn enrich(&self, mut event: StateUpdateEvent) -> StateUpdateEvent {
        use StateUpdateEvent::*;
        let feed = match &mut event {
            ActivityAdded { activity, .. } | ActivityUpdated { activity, .. } => activity.current_feed.as_mut(),
            ActivityPinned { pin, .. } => pin.activity.current_feed.as_mut(),
            FeedUpdated { feed, .. } => Some(feed),
            _ => None,
        };
        if let Some(feed) = feed
            && let Some(caps) = self.source.get(&feed.fid)
        {
            trace!(fid = %feed.fid, "enriched own_capabilities");
            feed.own_capabilities = caps;
        }
        event
    }
}

impl std::fmt::Debug for Enricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Enricher").finish_non_exhaustive()
    }
}
