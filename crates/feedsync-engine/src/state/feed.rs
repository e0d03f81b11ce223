//! A feed: its record, its activities, pins, and follow edges.

use feedsync_types::{
    ActivityData, ActivityPinData, FeedData, FeedId, FollowData, PaginationResult,
};

use crate::collections::{remove_first, upsert_sorted, upsert_sorted_with};
use crate::container::ApplyEvent;
use crate::context::EngineContext;
use crate::events::StateUpdateEvent;
use crate::mutations;
use crate::own_data::{FeedOwn, OwnData, merge_remote};
use crate::policy::ActivityQuery;
use crate::sort::{Comparator, Sort, SortField, follows_newest_first};
use crate::state::activity::reconcile;
use crate::state::activity_list::ActivityListState;

fn pins_newest_first() -> Comparator<ActivityPinData> {
    Comparator::new(vec![Sort::reverse(SortField::new("created_at", |p: &ActivityPinData| p.created_at))])
}

#[derive(Clone, Debug)]
pub struct FeedState {
    pub fid: FeedId,
    pub feed: Option<FeedData>,
    pub activities: ActivityListState,
    pub pinned_activities: Vec<ActivityPinData>,
    /// Accepted follows into this feed.
    pub followers: Vec<FollowData>,
    /// Accepted follows out of this feed.
    pub following: Vec<FollowData>,
    /// Pending follows into this feed.
    pub follow_requests: Vec<FollowData>,
    pub deleted: bool,
}

impl FeedState {
    /// An empty feed state. The query's `fid` is forced to `fid`.
    pub fn new(fid: FeedId, query: ActivityQuery) -> Self {
        let query = ActivityQuery {
            fid: Some(fid.clone()),
            ..query
        };
        Self {
            fid,
            feed: None,
            activities: ActivityListState::new(query),
            pinned_activities: Vec::new(),
            followers: Vec::new(),
            following: Vec::new(),
            follow_requests: Vec::new(),
            deleted: false,
        }
    }

    /// Seed from a feed fetch.
    pub fn seeded(feed: FeedData, query: ActivityQuery, page: PaginationResult<ActivityData>) -> Self {
        let mut state = Self::new(feed.fid.clone(), query);
        state.activities = state.activities.with_page(page);
        state.feed = Some(feed);
        state
    }

    pub fn with_page(&self, page: PaginationResult<ActivityData>) -> Self {
        Self {
            activities: self.activities.with_page(page),
            ..self.clone()
        }
    }

    /// Merge fetched pins. A known pin keeps its activity's own data.
    pub fn with_pins(&self, pins: Vec<ActivityPinData>) -> Self {
        let cmp = pins_newest_first();
        let pinned_activities = pins.into_iter().fold(self.pinned_activities.clone(), |acc, pin| {
            let pin = match acc.iter().find(|p| p.id() == pin.id()) {
                Some(existing) => ActivityPinData {
                    activity: merge_remote(&existing.activity, pin.activity.clone(), None),
                    ..pin
                },
                None => pin,
            };
            upsert_sorted(&acc, pin, |p| p.id(), &cmp)
        });
        Self {
            pinned_activities,
            ..self.clone()
        }
    }

    pub fn activity(&self, id: &str) -> Option<&ActivityData> {
        self.activities.get(id)
    }

    // ------------------------------------------------------------------------
    // Pieces
    // ------------------------------------------------------------------------

    fn reconcile_pins(&self, event: &StateUpdateEvent, ctx: &EngineContext) -> Option<Vec<ActivityPinData>> {
        let mut any = false;
        let pins: Vec<ActivityPinData> = self
            .pinned_activities
            .iter()
            .map(|pin| match reconcile(&pin.activity, event, ctx) {
                Some(activity) => {
                    any = true;
                    ActivityPinData {
                        activity,
                        ..pin.clone()
                    }
                }
                None => pin.clone(),
            })
            .collect();
        any.then_some(pins)
    }

    fn map_feed(&self, f: impl FnOnce(&FeedData) -> Option<FeedData>) -> Option<Self> {
        let feed = f(self.feed.as_ref()?)?;
        Some(Self {
            feed: Some(feed),
            ..self.clone()
        })
    }

    fn apply_pin(&self, pin: &ActivityPinData, pinned: bool) -> Option<Self> {
        if pin.fid != self.fid {
            return None;
        }
        let known = self.pinned_activities.iter().any(|p| p.id() == pin.id());
        let pinned_activities = if pinned {
            upsert_sorted(&self.pinned_activities, pin.clone(), |p| p.id(), &pins_newest_first())
        } else {
            remove_first(&self.pinned_activities, |p| p.id() == pin.id())?
        };
        let feed = self.feed.as_ref().map(|feed| {
            let pin_count = match (pinned, known) {
                (true, false) => feed.pin_count.saturating_add(1),
                (false, true) => feed.pin_count.saturating_sub(1),
                _ => feed.pin_count,
            };
            FeedData {
                pin_count,
                ..feed.clone()
            }
        });
        Some(Self {
            pinned_activities,
            feed,
            ..self.clone()
        })
    }

    /// Sort a follow into the edge lists it belongs to, out of the rest.
    fn file_follow(&self, follow: &FollowData, present: bool) -> (Vec<FollowData>, Vec<FollowData>, Vec<FollowData>) {
        let cmp = follows_newest_first();
        let file = |list: &[FollowData], belongs: bool| {
            if present && belongs {
                upsert_sorted_with(list, follow.clone(), FollowData::same_edge, &cmp)
            } else {
                remove_first(list, |f| f.same_edge(follow)).unwrap_or_else(|| list.to_vec())
            }
        };
        (
            file(&self.followers, follow.is_follower_of(&self.fid)),
            file(&self.following, follow.is_following_from(&self.fid)),
            file(&self.follow_requests, follow.is_request_to(&self.fid)),
        )
    }

    fn apply_follow(&self, follow: &FollowData, present: bool, ctx: &EngineContext) -> Option<Self> {
        if follow.source_feed.fid != self.fid && follow.target_feed.fid != self.fid {
            return None;
        }
        let (followers, following, follow_requests) = self.file_follow(follow, present);
        let feed = self.feed.as_ref().and_then(|feed| {
            if present {
                mutations::apply_follow(feed, follow, ctx)
            } else {
                mutations::remove_follow(feed, follow, ctx)
            }
        });
        Some(Self {
            feed: feed.or_else(|| self.feed.clone()),
            followers,
            following,
            follow_requests,
            ..self.clone()
        })
    }
}

impl ApplyEvent for FeedState {
    fn matches_scope(&self, event: &StateUpdateEvent) -> bool {
        use StateUpdateEvent::*;
        match event {
            ActivityPinned { scope, .. }
            | ActivityUnpinned { scope, .. }
            | ActivityRemovedFromFeed { scope, .. }
            | MemberAdded { scope, .. }
            | MemberUpdated { scope, .. }
            | MemberRemoved { scope, .. } => scope.strictly_matches(&self.fid),
            _ => event.scope().matches(&self.fid),
        }
    }

    fn apply(&self, event: &StateUpdateEvent, ctx: &EngineContext) -> Option<Self> {
        use StateUpdateEvent::*;
        match event {
            ActivityPinned { pin, .. } => self.apply_pin(pin, true),
            ActivityUnpinned { pin, .. } => self.apply_pin(pin, false),

            FeedUpdated { feed, .. } if feed.fid == self.fid => {
                // Capabilities on the event come from enrichment and are
                // fresher than the local copy; an empty set means "not sent".
                let merged = match &self.feed {
                    Some(current) if feed.own_capabilities.is_empty() => merge_remote(current, feed.clone(), None),
                    Some(current) => {
                        let own = FeedOwn {
                            capabilities: feed.own_capabilities.clone(),
                            ..current.own()
                        };
                        merge_remote(current, feed.clone(), Some(own))
                    }
                    None => feed.clone(),
                };
                (self.feed.as_ref() != Some(&merged)).then(|| Self {
                    feed: Some(merged),
                    ..self.clone()
                })
            }
            FeedDeleted { .. } if !self.deleted => Some(Self {
                deleted: true,
                activities: ActivityListState::new(self.activities.query.clone()),
                pinned_activities: Vec::new(),
                ..self.clone()
            }),

            FollowAdded { follow, .. } | FollowUpdated { follow, .. } => self.apply_follow(follow, true, ctx),
            FollowDeleted { follow, .. } => self.apply_follow(follow, false, ctx),

            MemberAdded { member, .. } => self.map_feed(|f| mutations::apply_member(f, member, true, ctx)),
            MemberUpdated { member, .. } => self.map_feed(|f| mutations::apply_member(f, member, false, ctx)),
            MemberRemoved { member_id, .. } => self.map_feed(|f| mutations::remove_member(f, member_id, ctx)),

            ActivityDeleted { activity_id, .. } | ActivityRemovedFromFeed { activity_id, .. } => {
                let activities = self.activities.apply(event, ctx);
                let pins = remove_first(&self.pinned_activities, |p| p.id() == activity_id);
                if activities.is_none() && pins.is_none() {
                    return None;
                }
                Some(Self {
                    activities: activities.unwrap_or_else(|| self.activities.clone()),
                    pinned_activities: pins.unwrap_or_else(|| self.pinned_activities.clone()),
                    ..self.clone()
                })
            }
            _ => {
                let activities = self.activities.apply(event, ctx);
                let pins = self.reconcile_pins(event, ctx);
                if activities.is_none() && pins.is_none() {
                    return None;
                }
                Some(Self {
                    activities: activities.unwrap_or_else(|| self.activities.clone()),
                    pinned_activities: pins.unwrap_or_else(|| self.pinned_activities.clone()),
                    ..self.clone()
                })
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
