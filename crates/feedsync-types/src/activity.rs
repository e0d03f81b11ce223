//! Activities: the posts that make up feeds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::bookmark::BookmarkData;
use crate::comment::CommentData;
use crate::feed::FeedData;
use crate::ids::FeedId;
use crate::poll::PollData;
use crate::reaction::{FeedsReactionData, ReactionGroup};
use crate::user::UserData;

/// An activity as returned by queries and embedded in push events.
///
/// `comments` is the server's preview of recent comments, not the full
/// thread; threads live in their own containers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityData {
    pub id: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub user: UserData,
    pub text: Option<String>,
    /// Feeds this activity was posted to.
    pub feeds: Vec<FeedId>,
    pub visibility: Option<String>,
    pub popularity: i64,
    pub score: f64,
    pub created_at: u64,
    pub updated_at: u64,
    pub edited_at: Option<u64>,
    pub deleted_at: Option<u64>,

    pub reaction_groups: BTreeMap<String, ReactionGroup>,
    pub reaction_count: u32,
    pub latest_reactions: Vec<FeedsReactionData>,
    /// Own-data: the current user's reactions.
    pub own_reactions: Vec<FeedsReactionData>,

    pub comments: Vec<CommentData>,
    pub comment_count: u32,

    pub bookmark_count: u32,
    /// Own-data: the current user's bookmarks of this activity.
    pub own_bookmarks: Vec<BookmarkData>,

    pub poll: Option<PollData>,
    /// The feed this activity was read through, with the current user's
    /// capabilities in it. Not reliably populated on the wire.
    pub current_feed: Option<FeedData>,

    pub custom: BTreeMap<String, serde_json::Value>,
}

impl ActivityData {
    pub fn new(id: impl Into<String>, user: UserData, created_at: u64) -> Self {
        Self {
            id: id.into(),
            activity_type: "post".to_string(),
            user,
            created_at,
            updated_at: created_at,
            ..Default::default()
        }
    }

    /// Whether the activity was posted to `fid`.
    pub fn is_in_feed(&self, fid: &FeedId) -> bool {
        self.feeds.iter().any(|f| f == fid)
    }

    /// Whether `user_id` authored the activity.
    pub fn is_authored_by(&self, user_id: &str) -> bool {
        self.user.id == user_id
    }
}

/// A pin of an activity to the top of one feed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityPinData {
    pub activity: ActivityData,
    pub fid: FeedId,
    pub user: UserData,
    pub created_at: u64,
    pub updated_at: u64,
}

impl ActivityPinData {
    /// Pins are keyed by the pinned activity.
    pub fn id(&self) -> &str {
        &self.activity.id
    }
}
