//! Entity records and typed identifiers for feedsync.
//!
//! This crate is the data foundation: the record shapes returned by snapshot
//! fetches and embedded in push events. It has **no internal feedsync
//! dependencies**; a pure leaf crate the engine and client build on.
//!
//! # Entity-Relationship Overview
//!
//! ```text
//! Feed (FeedId = group:id)
//!     └── holds Activities (posted to one or more feeds)
//!     └── has Members (FeedMemberData, keyed by user id)
//!     └── has Follows in and out (FollowData, keyed by source+target fid)
//!
//! Activity (id)
//!     └── ReactionGroups (type → count) + latest/own Reactions
//!     └── Comments (preview) ── each Comment has Replies (a tree)
//!     └── Poll ── Votes (by option) + own Votes
//!     └── own Bookmarks ── optional BookmarkFolder
//! ```
//!
//! # Key Types
//!
//! |-----------------------|------------------------------------------------|
//! | Type                  | Purpose                                        |
//! |-----------------------|------------------------------------------------|
//! | [`FeedId`]            | Which feed (`group:id`)                        |
//! | [`ActivityData`]      | A post, with reactions/comments/poll/bookmarks |
//! | [`CommentData`]       | A comment or reply, with its loaded replies    |
//! | [`FeedsReactionData`] | A reaction on an activity or comment           |
//! | [`ReactionGroup`]     | Per-type aggregate count with time bounds      |
//! | [`PollData`]          | A poll with tallies and own votes              |
//! | [`FeedData`]          | A feed record with own capabilities            |
//! | [`PaginationResult`]  | Snapshot page + cursor pair                    |
//! |-----------------------|------------------------------------------------|
//!
//! All timestamps are Unix milliseconds.

pub mod activity;
pub mod bookmark;
pub mod comment;
pub mod feed;
pub mod ids;
pub mod pagination;
pub mod poll;
pub mod reaction;
pub mod user;

// Re-export primary types at crate root for convenience.
pub use activity::{ActivityData, ActivityPinData};
pub use bookmark::{BookmarkData, BookmarkFolderData};
pub use comment::CommentData;
pub use feed::{
    CapabilitySet, FeedData, FeedMemberData, FeedOwnCapability, FollowData, FollowStatus,
    MemberStatus,
};
pub use ids::{FeedId, FeedIdError};
pub use pagination::{PaginationData, PaginationResult};
pub use poll::{PollData, PollOptionData, PollVoteData};
pub use reaction::{FeedsReactionData, ReactionGroup};
pub use user::UserData;
