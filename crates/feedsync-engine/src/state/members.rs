//! Feed member lists.

use feedsync_types::{FeedId, FeedMemberData, PaginationData, PaginationResult};

use crate::collections::{remove_first, upsert_all_sorted, upsert_sorted};
use crate::container::ApplyEvent;
use crate::context::EngineContext;
use crate::events::StateUpdateEvent;
use crate::sort::members_newest_first;

#[derive(Clone, Debug)]
pub struct MemberListState {
    pub fid: FeedId,
    pub members: Vec<FeedMemberData>,
    pub pagination: PaginationData,
}

impl MemberListState {
    pub fn new(fid: FeedId) -> Self {
        Self {
            fid,
            members: Vec::new(),
            pagination: PaginationData::default(),
        }
    }

    pub fn with_page(&self, page: PaginationResult<FeedMemberData>) -> Self {
        Self {
            members: upsert_all_sorted(&self.members, page.models, FeedMemberData::id, &members_newest_first()),
            pagination: page.pagination,
            ..self.clone()
        }
    }

    fn with_members(&self, members: Vec<FeedMemberData>) -> Self {
        Self {
            members,
            ..self.clone()
        }
    }
}

impl ApplyEvent for MemberListState {
    /// Membership is per feed: unscoped member events apply nowhere.
    fn matches_scope(&self, event: &StateUpdateEvent) -> bool {
        event.scope().strictly_matches(&self.fid)
    }

    fn apply(&self, event: &StateUpdateEvent, _ctx: &EngineContext) -> Option<Self> {
        use StateUpdateEvent::*;
        match event {
            MemberAdded { member, .. } | MemberUpdated { member, .. } => {
                let members = upsert_sorted(&self.members, member.clone(), FeedMemberData::id, &members_newest_first());
                (members != self.members).then(|| self.with_members(members))
            }
            MemberRemoved { member_id, .. } => {
                remove_first(&self.members, |m| m.id() == member_id).map(|m| self.with_members(m))
            }
            FeedDeleted { .. } if !self.members.is_empty() => Some(self.with_members(Vec::new())),
            _ => None,
        }
    }
}
