//! Push-channel wire events.
//!
//! Every pushed message is a JSON object with a `type` tag, a `created_at`
//! timestamp, an optional `fid`, and a variant payload:
//!
//! ```json
//! {"type": "feeds.activity.reaction.added", "created_at": 1700000000000,
//!  "fid": "user:alice", "activity": {...}, "reaction": {...}}
//! ```
//!
//! Tags this client does not know (including `health.check`) deserialize to
//! [`WireEvent::Unknown`] rather than failing.

use feedsync_types::{
    ActivityData, ActivityPinData, BookmarkData, BookmarkFolderData, CommentData, FeedData,
    FeedMemberData, FeedsReactionData, FollowData, PollData, PollVoteData,
};
use serde::{Deserialize, Serialize};

/// One pushed message: envelope fields plus the tagged payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireEnvelope {
    #[serde(default)]
    pub created_at: u64,
    /// Feed the event was published on, as `group:id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fid: Option<String>,
    #[serde(flatten)]
    pub event: WireEvent,
}

impl WireEnvelope {
    pub fn new(fid: Option<&str>, created_at: u64, event: WireEvent) -> Self {
        Self {
            created_at,
            fid: fid.map(str::to_string),
            event,
        }
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WireEvent {
    // ── Activities ───────────────────────────────────────────────────────
    #[serde(rename = "feeds.activity.added")]
    ActivityAdded { activity: ActivityData },
    #[serde(rename = "feeds.activity.updated")]
    ActivityUpdated { activity: ActivityData },
    #[serde(rename = "feeds.activity.deleted")]
    ActivityDeleted { activity: ActivityData },
    #[serde(rename = "feeds.activity.removed_from_feed")]
    ActivityRemovedFromFeed { activity: ActivityData },
    #[serde(rename = "feeds.activity.pinned")]
    ActivityPinned { pinned_activity: ActivityPinData },
    #[serde(rename = "feeds.activity.unpinned")]
    ActivityUnpinned { pinned_activity: ActivityPinData },
    #[serde(rename = "feeds.activity.reaction.added")]
    ActivityReactionAdded {
        #[serde(default)]
        activity: Option<ActivityData>,
        reaction: FeedsReactionData,
    },
    #[serde(rename = "feeds.activity.reaction.updated")]
    ActivityReactionUpdated {
        #[serde(default)]
        activity: Option<ActivityData>,
        reaction: FeedsReactionData,
    },
    #[serde(rename = "feeds.activity.reaction.deleted")]
    ActivityReactionDeleted {
        #[serde(default)]
        activity: Option<ActivityData>,
        reaction: FeedsReactionData,
    },

    // ── Bookmarks ────────────────────────────────────────────────────────
    #[serde(rename = "feeds.bookmark.added")]
    BookmarkAdded { bookmark: BookmarkData },
    #[serde(rename = "feeds.bookmark.updated")]
    BookmarkUpdated { bookmark: BookmarkData },
    #[serde(rename = "feeds.bookmark.deleted")]
    BookmarkDeleted { bookmark: BookmarkData },
    #[serde(rename = "feeds.bookmark_folder.updated")]
    BookmarkFolderUpdated { bookmark_folder: BookmarkFolderData },
    #[serde(rename = "feeds.bookmark_folder.deleted")]
    BookmarkFolderDeleted { bookmark_folder: BookmarkFolderData },

    // ── Comments ─────────────────────────────────────────────────────────
    #[serde(rename = "feeds.comment.added")]
    CommentAdded { comment: CommentData },
    #[serde(rename = "feeds.comment.updated")]
    CommentUpdated { comment: CommentData },
    #[serde(rename = "feeds.comment.deleted")]
    CommentDeleted { comment: CommentData },
    #[serde(rename = "feeds.comment.reaction.added")]
    CommentReactionAdded {
        comment: CommentData,
        reaction: FeedsReactionData,
    },
    #[serde(rename = "feeds.comment.reaction.updated")]
    CommentReactionUpdated {
        comment: CommentData,
        reaction: FeedsReactionData,
    },
    #[serde(rename = "feeds.comment.reaction.deleted")]
    CommentReactionDeleted {
        comment: CommentData,
        reaction: FeedsReactionData,
    },

    // ── Feeds, follows, members ──────────────────────────────────────────
    #[serde(rename = "feeds.feed.updated")]
    FeedUpdated { feed: FeedData },
    #[serde(rename = "feeds.feed.deleted")]
    FeedDeleted {},
    #[serde(rename = "feeds.follow.created")]
    FollowCreated { follow: FollowData },
    #[serde(rename = "feeds.follow.updated")]
    FollowUpdated { follow: FollowData },
    #[serde(rename = "feeds.follow.deleted")]
    FollowDeleted { follow: FollowData },
    #[serde(rename = "feeds.feed_member.added")]
    MemberAdded { member: FeedMemberData },
    #[serde(rename = "feeds.feed_member.updated")]
    MemberUpdated { member: FeedMemberData },
    #[serde(rename = "feeds.feed_member.removed")]
    MemberRemoved { member_id: String },

    // ── Polls ────────────────────────────────────────────────────────────
    #[serde(rename = "feeds.poll.updated")]
    PollUpdated { poll: PollData },
    #[serde(rename = "feeds.poll.closed")]
    PollClosed { poll: PollData },
    #[serde(rename = "feeds.poll.deleted")]
    PollDeleted { poll: PollData },
    #[serde(rename = "feeds.poll.vote_casted")]
    PollVoteCasted { poll: PollData, poll_vote: PollVoteData },
    #[serde(rename = "feeds.poll.vote_changed")]
    PollVoteChanged { poll: PollData, poll_vote: PollVoteData },
    #[serde(rename = "feeds.poll.vote_removed")]
    PollVoteRemoved { poll: PollData, poll_vote: PollVoteData },

    /// Any tag this client does not recognize.
    #[serde(other)]
    Unknown,
}
