//! Snapshot input and final-state output for the replay tool.

use anyhow::{Result, bail};
use feedsync_engine::ActivityQuery;
use feedsync_engine::state::{ActivityState, FeedState};
use feedsync_types::{
    ActivityData, ActivityPinData, CommentData, FeedData, FeedId, FollowData, PaginationData, PaginationResult,
};
use serde::{Deserialize, Serialize};

/// What a feed fetch returned: the feed record, a page of activities, pins.
/// `comments` is the first comment page of the activity opened with
/// `--activity`, if any.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct FeedSnapshot {
    pub feed: Option<FeedData>,
    pub activities: PaginationResult<ActivityData>,
    pub pinned_activities: Vec<ActivityPinData>,
    pub comments: PaginationResult<CommentData>,
}

impl FeedSnapshot {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn activity(&self, id: &str) -> Option<&ActivityData> {
        self.activities.models.iter().find(|a| a.id == id)
    }

    /// Seed a feed state. The snapshot's feed, if any, must be `fid`.
    pub fn into_state(self, fid: FeedId) -> Result<FeedState> {
        let state = match self.feed {
            Some(feed) if feed.fid != fid => {
                bail!("snapshot is for feed {}, not {fid}", feed.fid)
            }
            Some(feed) => FeedState::seeded(feed, ActivityQuery::default(), self.activities),
            None => FeedState::new(fid, ActivityQuery::default()).with_page(self.activities),
        };
        Ok(state.with_pins(self.pinned_activities))
    }
}

/// Serializable view of a [`FeedState`].
#[derive(Debug, Serialize)]
pub struct FeedView<'a> {
    pub fid: String,
    pub deleted: bool,
    pub feed: Option<&'a FeedData>,
    pub activities: &'a [ActivityData],
    pub pagination: &'a PaginationData,
    pub pinned_activities: &'a [ActivityPinData],
    pub followers: &'a [FollowData],
    pub following: &'a [FollowData],
    pub follow_requests: &'a [FollowData],
}

impl<'a> From<&'a FeedState> for FeedView<'a> {
    fn from(state: &'a FeedState) -> Self {
        Self {
            fid: state.fid.to_string(),
            deleted: state.deleted,
            feed: state.feed.as_ref(),
            activities: &state.activities.activities,
            pagination: &state.activities.pagination,
            pinned_activities: &state.pinned_activities,
            followers: &state.followers,
            following: &state.following,
            follow_requests: &state.follow_requests,
        }
    }
}

/// Serializable view of an [`ActivityState`].
#[derive(Debug, Serialize)]
pub struct ActivityView<'a> {
    pub activity_id: &'a str,
    pub deleted: bool,
    pub activity: Option<&'a ActivityData>,
    pub comments: &'a [CommentData],
}

impl<'a> From<&'a ActivityState> for ActivityView<'a> {
    fn from(state: &'a ActivityState) -> Self {
        Self {
            activity_id: &state.activity_id,
            deleted: state.deleted,
            activity: state.activity.as_ref(),
            comments: &state.comments.comments,
        }
    }
}

/// Everything the replay prints.
#[derive(Debug, Serialize)]
pub struct ReplayOutput<'a> {
    pub feed: FeedView<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<ActivityView<'a>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_seeds_state() {
        let snapshot = FeedSnapshot::from_json(
            r#"{
                "feed": {"fid": "user:alice", "name": "Alice"},
                "activities": {
                    "models": [{"id": "a1", "user": {"id": "alice"}, "created_at": 1}],
                    "pagination": {"next": "cursor-2"}
                }
            }"#,
        )
        .unwrap();
        let state = snapshot.into_state(FeedId::new("user", "alice")).unwrap();
        assert_eq!(state.activities.activities.len(), 1);
        assert!(state.activities.pagination.has_next());

        let view = serde_json::to_value(FeedView::from(&state)).unwrap();
        assert_eq!(view["fid"], "user:alice");
        assert_eq!(view["feed"]["name"], "Alice");
        assert_eq!(view["activities"][0]["id"], "a1");
    }

    #[test]
    fn test_activity_view_lists_comments() {
        let snapshot = FeedSnapshot::from_json(
            r#"{
                "activities": {"models": [{"id": "a1", "user": {"id": "alice"}, "created_at": 1}]},
                "comments": {"models": [
                    {"id": "c1", "object_id": "a1", "user": {"id": "bob"}, "created_at": 1},
                    {"id": "c2", "object_id": "a1", "user": {"id": "bob"}, "created_at": 2}
                ]}
            }"#,
        )
        .unwrap();
        let activity = snapshot.activity("a1").cloned().unwrap();
        let state = ActivityState::seeded(
            activity,
            None,
            feedsync_engine::CommentSort::Last,
            snapshot.comments.clone(),
        );
        let view = serde_json::to_value(ActivityView::from(&state)).unwrap();
        assert_eq!(view["activity_id"], "a1");
        assert_eq!(view["comments"][0]["id"], "c2");
        assert!(snapshot.activity("a9").is_none());
    }

    #[test]
    fn test_snapshot_for_other_feed_rejected() {
        let snapshot = FeedSnapshot::from_json(r#"{"feed": {"fid": "user:bob"}}"#).unwrap();
        assert!(snapshot.into_state(FeedId::new("user", "alice")).is_err());
    }

    #[test]
    fn test_empty_snapshot() {
        let state = FeedSnapshot::from_json("{}")
            .unwrap()
            .into_state(FeedId::new("user", "alice"))
            .unwrap();
        assert!(state.feed.is_none());
        assert!(state.activities.activities.is_empty());
    }
}
