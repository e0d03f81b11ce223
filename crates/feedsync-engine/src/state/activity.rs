//! A single activity and its comment thread.

use feedsync_types::{ActivityData, CommentData, FeedId, PaginationResult, PollData};

use crate::container::ApplyEvent;
use crate::context::EngineContext;
use crate::events::StateUpdateEvent;
use crate::mutations;
use crate::own_data::merge_remote;
use crate::sort::CommentSort;
use crate::state::comments::CommentThreadState;

/// Fold one event into one activity record.
///
/// Shared by every container that holds activities. `None` when the event is
/// not about this activity or changes nothing.
pub fn reconcile(activity: &ActivityData, event: &StateUpdateEvent, ctx: &EngineContext) -> Option<ActivityData> {
    use StateUpdateEvent::*;
    match event {
        ActivityAdded { activity: remote, .. } | ActivityUpdated { activity: remote, .. } => {
            if remote.id != activity.id {
                return None;
            }
            let merged = merge_remote(activity, remote.clone(), None);
            (merged != *activity).then_some(merged)
        }
        ActivityReactionUpserted {
            reaction,
            enforce_unique,
            ..
        } => mutations::add_reaction(activity, reaction, *enforce_unique, ctx),
        ActivityReactionDeleted { reaction, .. } => mutations::remove_reaction(activity, reaction, ctx),

        CommentAdded { comment, .. } => mutations::add_comment(activity, comment),
        CommentUpdated { comment, .. } => mutations::update_comment(activity, comment),
        CommentDeleted { comment, .. } => mutations::remove_comment(activity, comment),
        CommentReactionUpserted {
            comment,
            reaction,
            enforce_unique,
            ..
        } => mutations::update_comment_reaction(activity, comment, |c| {
            mutations::add_reaction(c, reaction, *enforce_unique, ctx)
        }),
        CommentReactionDeleted { comment, reaction, .. } => {
            mutations::update_comment_reaction(activity, comment, |c| mutations::remove_reaction(c, reaction, ctx))
        }

        BookmarkAdded { bookmark } => mutations::add_bookmark(activity, bookmark, ctx),
        BookmarkUpdated { bookmark } => mutations::update_bookmark(activity, bookmark, ctx),
        BookmarkDeleted { bookmark } => mutations::remove_bookmark(activity, bookmark, ctx),

        PollUpdated { poll, .. } => mutations::replace_activity_poll(activity, poll),
        PollClosed { poll, .. } => mutations::update_activity_poll(activity, &poll.id, |current| {
            let merged = merge_remote(current, poll.clone(), None);
            mutations::close_poll(&merged)
                .or(Some(merged))
                .filter(|next: &PollData| next != current)
        }),
        PollDeleted { poll_id, .. } => mutations::remove_activity_poll(activity, poll_id),
        PollVoteCasted { poll, vote, .. } => {
            mutations::update_activity_poll(activity, &poll.id, |p| mutations::cast_vote(p, vote, ctx))
        }
        PollVoteChanged { poll, vote, .. } => {
            mutations::update_activity_poll(activity, &poll.id, |p| mutations::change_vote(p, vote, ctx))
        }
        PollVoteRemoved { poll, vote, .. } => {
            mutations::update_activity_poll(activity, &poll.id, |p| mutations::remove_vote(p, vote, ctx))
        }
        _ => None,
    }
}

/// One activity, loaded by id, with its full comment thread.
#[derive(Clone, Debug)]
pub struct ActivityState {
    pub activity_id: String,
    /// Feed the activity was opened from. Scopes remote events when set.
    pub fid: Option<FeedId>,
    pub activity: Option<ActivityData>,
    pub comments: CommentThreadState,
    pub deleted: bool,
}

impl ActivityState {
    pub fn new(activity_id: impl Into<String>, fid: Option<FeedId>, sort: CommentSort) -> Self {
        let activity_id = activity_id.into();
        Self {
            comments: CommentThreadState::new(activity_id.clone(), None, sort),
            activity_id,
            fid,
            activity: None,
            deleted: false,
        }
    }

    /// Seed from a fetched activity and its first page of comments.
    pub fn seeded(activity: ActivityData, fid: Option<FeedId>, sort: CommentSort, comments: PaginationResult<CommentData>) -> Self {
        let mut state = Self::new(activity.id.clone(), fid, sort);
        state.comments = state.comments.with_page(comments);
        state.activity = Some(activity);
        state
    }

    pub fn with_comment_page(&self, page: PaginationResult<CommentData>) -> Self {
        Self {
            comments: self.comments.with_page(page),
            ..self.clone()
        }
    }
}

impl ApplyEvent for ActivityState {
    fn matches_scope(&self, event: &StateUpdateEvent) -> bool {
        self.fid.as_ref().is_none_or(|fid| event.scope().matches(fid))
    }

    fn apply(&self, event: &StateUpdateEvent, ctx: &EngineContext) -> Option<Self> {
        match event {
            StateUpdateEvent::ActivityDeleted { activity_id, .. } if *activity_id == self.activity_id => {
                if self.deleted {
                    return None;
                }
                Some(Self {
                    activity: None,
                    deleted: true,
                    ..self.clone()
                })
            }
            // A deleted activity stays deleted; late adds and updates are stale.
            StateUpdateEvent::ActivityAdded { activity, .. } | StateUpdateEvent::ActivityUpdated { activity, .. }
                if self.activity.is_none() && activity.id == self.activity_id =>
            {
                (!self.deleted).then(|| Self {
                    activity: Some(activity.clone()),
                    ..self.clone()
                })
            }
            _ => {
                let activity = self.activity.as_ref().and_then(|a| reconcile(a, event, ctx));
                let comments = self.comments.apply(event, ctx);
                if activity.is_none() && comments.is_none() {
                    return None;
                }
                Some(Self {
                    activity: activity.or_else(|| self.activity.clone()),
                    comments: comments.unwrap_or_else(|| self.comments.clone()),
                    ..self.clone()
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Scope;
    use feedsync_types::{FeedsReactionData, PollVoteData, UserData};

    fn ctx() -> EngineContext {
        EngineContext::new("me")
    }

    fn state() -> ActivityState {
        let activity = ActivityData {
            poll: Some(PollData {
                id: "p1".into(),
                ..Default::default()
            }),
            ..ActivityData::new("a1", UserData::with_id("author"), 1)
        };
        ActivityState::seeded(activity, None, CommentSort::First, PaginationResult::default())
    }

    #[test]
    fn test_remote_update_keeps_own_reactions() {
        let like = FeedsReactionData {
            activity_id: "a1".into(),
            reaction_type: "like".into(),
            user: UserData::with_id("me"),
            created_at: 5,
            ..Default::default()
        };
        let s = state()
            .apply(
                &StateUpdateEvent::ActivityReactionUpserted {
                    scope: Scope::Unknown,
                    reaction: like,
                    enforce_unique: false,
                },
                &ctx(),
            )
            .unwrap();
        let remote = ActivityData {
            text: Some("edited".into()),
            ..ActivityData::new("a1", UserData::with_id("author"), 1)
        };
        let s = s
            .apply(
                &StateUpdateEvent::ActivityUpdated {
                    scope: Scope::Unknown,
                    activity: remote,
                },
                &ctx(),
            )
            .unwrap();
        let activity = s.activity.unwrap();
        assert_eq!(activity.text.as_deref(), Some("edited"));
        assert_eq!(activity.own_reactions.len(), 1);
    }

    #[test]
    fn test_comment_goes_to_thread_and_preview() {
        let comment = CommentData::new("c1", "a1", UserData::with_id("bob"), 3);
        let s = state()
            .apply(
                &StateUpdateEvent::CommentAdded {
                    scope: Scope::Unknown,
                    comment,
                },
                &ctx(),
            )
            .unwrap();
        assert_eq!(s.comments.comments.len(), 1);
        assert_eq!(s.activity.as_ref().unwrap().comment_count, 1);
    }

    #[test]
    fn test_vote_on_embedded_poll() {
        let vote = PollVoteData::new("v1", "p1", "yes", "me", 3);
        let s = state()
            .apply(
                &StateUpdateEvent::PollVoteCasted {
                    scope: Scope::Unknown,
                    poll: PollData {
                        id: "p1".into(),
                        ..Default::default()
                    },
                    vote,
                },
                &ctx(),
            )
            .unwrap();
        let poll = s.activity.unwrap().poll.unwrap();
        assert_eq!(poll.vote_count, 1);
        assert_eq!(poll.own_votes.len(), 1);
    }

    #[test]
    fn test_poll_closed() {
        let event = StateUpdateEvent::PollClosed {
            scope: Scope::Unknown,
            poll: PollData {
                id: "p1".into(),
                ..Default::default()
            },
        };
        let s = state().apply(&event, &ctx()).unwrap();
        assert!(s.activity.as_ref().unwrap().poll.as_ref().unwrap().is_closed);
        assert!(s.apply(&event, &ctx()).is_none());
    }

    #[test]
    fn test_deleted_once() {
        let event = StateUpdateEvent::ActivityDeleted {
            scope: Scope::Unknown,
            activity_id: "a1".into(),
        };
        let s = state().apply(&event, &ctx()).unwrap();
        assert!(s.deleted);
        assert!(s.activity.is_none());
        assert!(s.apply(&event, &ctx()).is_none());
    }

    #[test]
    fn test_late_update_after_delete_ignored() {
        let deleted = StateUpdateEvent::ActivityDeleted {
            scope: Scope::Unknown,
            activity_id: "a1".into(),
        };
        let s = state().apply(&deleted, &ctx()).unwrap();
        let late = ActivityData::new("a1", UserData::with_id("author"), 1);
        let updated = StateUpdateEvent::ActivityUpdated {
            scope: Scope::Unknown,
            activity: late.clone(),
        };
        let added = StateUpdateEvent::ActivityAdded {
            scope: Scope::Unknown,
            activity: late,
        };
        assert!(s.apply(&updated, &ctx()).is_none());
        assert!(s.apply(&added, &ctx()).is_none());
        assert!(s.deleted);
    }

    #[test]
    fn test_scope_bound_to_feed() {
        let fid = FeedId::new("user", "alice");
        let s = ActivityState::new("a1", Some(fid.clone()), CommentSort::First);
        let other = StateUpdateEvent::FeedDeleted {
            scope: FeedId::new("user", "bob").into(),
        };
        assert!(!s.matches_scope(&other));
        assert!(s.matches_scope(&StateUpdateEvent::FeedDeleted { scope: fid.into() }));
    }
}
