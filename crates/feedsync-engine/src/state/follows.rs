//! Follow lists: followers, following, or pending requests of a feed.

use feedsync_types::{FeedId, FollowData, FollowStatus, PaginationData, PaginationResult};

use crate::collections::{remove_first, upsert_sorted_with};
use crate::container::ApplyEvent;
use crate::context::EngineContext;
use crate::events::StateUpdateEvent;
use crate::sort::follows_newest_first;

/// Which follow edges a list holds. Unset fields match anything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FollowQuery {
    pub source: Option<FeedId>,
    pub target: Option<FeedId>,
    pub status: Option<FollowStatus>,
}

impl FollowQuery {
    pub fn followers_of(fid: FeedId) -> Self {
        Self {
            target: Some(fid),
            status: Some(FollowStatus::Accepted),
            ..Default::default()
        }
    }

    pub fn following_of(fid: FeedId) -> Self {
        Self {
            source: Some(fid),
            status: Some(FollowStatus::Accepted),
            ..Default::default()
        }
    }

    pub fn requests_to(fid: FeedId) -> Self {
        Self {
            target: Some(fid),
            status: Some(FollowStatus::Pending),
            ..Default::default()
        }
    }

    pub fn matches(&self, follow: &FollowData) -> bool {
        self.source.as_ref().is_none_or(|fid| *fid == follow.source_feed.fid)
            && self.target.as_ref().is_none_or(|fid| *fid == follow.target_feed.fid)
            && self.status.is_none_or(|status| status == follow.status)
    }

    fn touches(&self, fid: &FeedId) -> bool {
        self.source.as_ref() == Some(fid) || self.target.as_ref() == Some(fid)
    }
}

#[derive(Clone, Debug)]
pub struct FollowListState {
    pub query: FollowQuery,
    pub follows: Vec<FollowData>,
    pub pagination: PaginationData,
}

impl FollowListState {
    pub fn new(query: FollowQuery) -> Self {
        Self {
            query,
            follows: Vec::new(),
            pagination: PaginationData::default(),
        }
    }

    pub fn with_page(&self, page: PaginationResult<FollowData>) -> Self {
        let cmp = follows_newest_first();
        let follows = page
            .models
            .into_iter()
            .filter(|f| self.query.matches(f))
            .fold(self.follows.clone(), |acc, f| upsert_sorted_with(&acc, f, FollowData::same_edge, &cmp));
        Self {
            follows,
            pagination: page.pagination,
            ..self.clone()
        }
    }

    fn with_follows(&self, follows: Vec<FollowData>) -> Self {
        Self {
            follows,
            ..self.clone()
        }
    }

    fn removed(&self, follow: &FollowData) -> Option<Self> {
        remove_first(&self.follows, |f| f.same_edge(follow)).map(|f| self.with_follows(f))
    }
}

impl ApplyEvent for FollowListState {
    fn matches_scope(&self, _event: &StateUpdateEvent) -> bool {
        true
    }

    fn apply(&self, event: &StateUpdateEvent, _ctx: &EngineContext) -> Option<Self> {
        use StateUpdateEvent::*;
        match event {
            // An update can move an edge out of the list (e.g. accepted out
            // of a pending-requests list).
            FollowAdded { follow, .. } | FollowUpdated { follow, .. } => {
                if !self.query.matches(follow) {
                    return self.removed(follow);
                }
                let follows = upsert_sorted_with(&self.follows, follow.clone(), FollowData::same_edge, &follows_newest_first());
                (follows != self.follows).then(|| self.with_follows(follows))
            }
            FollowDeleted { follow, .. } => self.removed(follow),
            FeedDeleted { scope } => {
                let fid = scope.fid()?;
                if self.query.touches(fid) {
                    return (!self.follows.is_empty()).then(|| self.with_follows(Vec::new()));
                }
                let follows: Vec<FollowData> = self
                    .follows
                    .iter()
                    .filter(|f| f.source_feed.fid != *fid && f.target_feed.fid != *fid)
                    .cloned()
                    .collect();
                (follows.len() != self.follows.len()).then(|| self.with_follows(follows))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Scope;
    use feedsync_types::FeedData;

    fn follow(source: &str, target: &str, status: FollowStatus, at: u64) -> FollowData {
        FollowData {
            source_feed: FeedData::new(FeedId::new("timeline", source)),
            target_feed: FeedData::new(FeedId::new("user", target)),
            status,
            created_at: at,
            ..Default::default()
        }
    }

    fn event(follow: FollowData) -> StateUpdateEvent {
        StateUpdateEvent::FollowUpdated {
            scope: Scope::Unknown,
            follow,
        }
    }

    #[test]
    fn test_accept_moves_between_lists() {
        let ctx = EngineContext::new("me");
        let alice = FeedId::new("user", "alice");
        let requests = FollowListState::new(FollowQuery::requests_to(alice.clone()));
        let followers = FollowListState::new(FollowQuery::followers_of(alice));

        let pending = follow("bob", "alice", FollowStatus::Pending, 1);
        let requests = requests.apply(&event(pending.clone()), &ctx).unwrap();
        assert!(followers.apply(&event(pending.clone()), &ctx).is_none());

        let accepted = FollowData {
            status: FollowStatus::Accepted,
            ..pending
        };
        assert!(requests.apply(&event(accepted.clone()), &ctx).unwrap().follows.is_empty());
        assert_eq!(followers.apply(&event(accepted), &ctx).unwrap().follows.len(), 1);
    }

    #[test]
    fn test_feed_deleted_drops_edges() {
        let ctx = EngineContext::new("me");
        let list = FollowListState::new(FollowQuery::following_of(FeedId::new("timeline", "me")));
        let list = list
            .apply(&event(follow("me", "alice", FollowStatus::Accepted, 1)), &ctx)
            .unwrap();
        let list = list
            .apply(&event(follow("me", "bob", FollowStatus::Accepted, 2)), &ctx)
            .unwrap();
        let deleted = StateUpdateEvent::FeedDeleted {
            scope: FeedId::new("user", "alice").into(),
        };
        let list = list.apply(&deleted, &ctx).unwrap();
        assert_eq!(list.follows.len(), 1);
        assert_eq!(list.follows[0].target_feed.fid, FeedId::new("user", "bob"));
    }
}
