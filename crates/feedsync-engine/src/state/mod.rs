//! Container states, one module per kind.
//!
//! | State                     | Bound to                         |
//! |---------------------------|----------------------------------|
//! | [`FeedState`]             | feed id + activity query         |
//! | [`ActivityState`]         | activity id (+ optional fid)     |
//! | [`ActivityListState`]     | activity query                   |
//! | [`CommentThreadState`]    | object id + optional parent      |
//! | [`ReactionListState`]     | activity or comment              |
//! | [`MemberListState`]       | feed id (strict scope)           |
//! | [`FollowListState`]       | follow query                     |
//! | [`PollVoteListState`]     | poll id                          |
//! | [`BookmarkListState`]     | current user                     |
//! | [`BookmarkFolderListState`] | current user                   |

pub mod activity;
pub mod activity_list;
pub mod bookmarks;
pub mod comments;
pub mod feed;
pub mod follows;
pub mod members;
pub mod poll_votes;
pub mod reactions;

pub use activity::ActivityState;
pub use activity_list::ActivityListState;
pub use bookmarks::{BookmarkFolderListState, BookmarkListState};
pub use comments::CommentThreadState;
pub use feed::FeedState;
pub use follows::{FollowListState, FollowQuery};
pub use members::MemberListState;
pub use poll_votes::PollVoteListState;
pub use reactions::{ReactionListState, ReactionTarget};
