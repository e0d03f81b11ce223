//! The normalized update-event algebra.
//!
//! Every state change a container can observe, local or remote, is one
//! [`StateUpdateEvent`]. Wire parsing lives in the client crate; by the time
//! an event reaches a container it is one of these variants, and anything the
//! client could not interpret arrives as [`StateUpdateEvent::Unhandled`].

use feedsync_types::{
    ActivityData, ActivityPinData, BookmarkData, BookmarkFolderData, CommentData, FeedData,
    FeedMemberData, FeedsReactionData, FollowData, PollData, PollVoteData,
};
use strum::IntoStaticStr;

use crate::scope::Scope;

const UNSCOPED: &Scope = &Scope::Unknown;

#[derive(Clone, Debug, PartialEq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum StateUpdateEvent {
    // ------------------------------------------------------------------------
    // Activities
    // ------------------------------------------------------------------------
    ActivityAdded {
        scope: Scope,
        activity: ActivityData,
    },
    ActivityUpdated {
        scope: Scope,
        activity: ActivityData,
    },
    ActivityDeleted {
        scope: Scope,
        activity_id: String,
    },
    /// The activity left one feed but still exists elsewhere.
    ActivityRemovedFromFeed {
        scope: Scope,
        activity_id: String,
    },
    ActivityPinned {
        scope: Scope,
        pin: ActivityPinData,
    },
    ActivityUnpinned {
        scope: Scope,
        pin: ActivityPinData,
    },
    /// `enforce_unique` drops the reacting user's other reactions on the
    /// same target first.
    ActivityReactionUpserted {
        scope: Scope,
        reaction: FeedsReactionData,
        enforce_unique: bool,
    },
    ActivityReactionDeleted {
        scope: Scope,
        reaction: FeedsReactionData,
    },

    // ------------------------------------------------------------------------
    // Bookmarks (user level, never feed scoped)
    // ------------------------------------------------------------------------
    BookmarkAdded {
        bookmark: BookmarkData,
    },
    BookmarkUpdated {
        bookmark: BookmarkData,
    },
    BookmarkDeleted {
        bookmark: BookmarkData,
    },
    BookmarkFolderUpdated {
        folder: BookmarkFolderData,
    },
    BookmarkFolderDeleted {
        folder_id: String,
    },

    // ------------------------------------------------------------------------
    // Comments
    // ------------------------------------------------------------------------
    CommentAdded {
        scope: Scope,
        comment: CommentData,
    },
    CommentUpdated {
        scope: Scope,
        comment: CommentData,
    },
    CommentDeleted {
        scope: Scope,
        comment: CommentData,
    },
    CommentReactionUpserted {
        scope: Scope,
        comment: CommentData,
        reaction: FeedsReactionData,
        enforce_unique: bool,
    },
    CommentReactionDeleted {
        scope: Scope,
        comment: CommentData,
        reaction: FeedsReactionData,
    },

    // ------------------------------------------------------------------------
    // Feeds, follows, members
    // ------------------------------------------------------------------------
    FeedUpdated {
        scope: Scope,
        feed: FeedData,
    },
    FeedDeleted {
        scope: Scope,
    },
    FollowAdded {
        scope: Scope,
        follow: FollowData,
    },
    FollowUpdated {
        scope: Scope,
        follow: FollowData,
    },
    FollowDeleted {
        scope: Scope,
        follow: FollowData,
    },
    MemberAdded {
        scope: Scope,
        member: FeedMemberData,
    },
    MemberUpdated {
        scope: Scope,
        member: FeedMemberData,
    },
    MemberRemoved {
        scope: Scope,
        member_id: String,
    },

    // ------------------------------------------------------------------------
    // Polls
    // ------------------------------------------------------------------------
    PollUpdated {
        scope: Scope,
        poll: PollData,
    },
    PollClosed {
        scope: Scope,
        poll: PollData,
    },
    PollDeleted {
        scope: Scope,
        poll_id: String,
    },
    PollVoteCasted {
        scope: Scope,
        poll: PollData,
        vote: PollVoteData,
    },
    PollVoteChanged {
        scope: Scope,
        poll: PollData,
        vote: PollVoteData,
    },
    PollVoteRemoved {
        scope: Scope,
        poll: PollData,
        vote: PollVoteData,
    },

    /// Anything unrecognized. Every container ignores it.
    Unhandled,
}

impl StateUpdateEvent {
    /// The feed this event concerns, or [`Scope::Unknown`].
    pub fn scope(&self) -> &Scope {
        use StateUpdateEvent::*;
        match self {
            ActivityAdded { scope, .. }
            | ActivityUpdated { scope, .. }
            | ActivityDeleted { scope, .. }
            | ActivityRemovedFromFeed { scope, .. }
            | ActivityPinned { scope, .. }
            | ActivityUnpinned { scope, .. }
            | ActivityReactionUpserted { scope, .. }
            | ActivityReactionDeleted { scope, .. }
            | CommentAdded { scope, .. }
            | CommentUpdated { scope, .. }
            | CommentDeleted { scope, .. }
            | CommentReactionUpserted { scope, .. }
            | CommentReactionDeleted { scope, .. }
            | FeedUpdated { scope, .. }
            | FeedDeleted { scope }
            | FollowAdded { scope, .. }
            | FollowUpdated { scope, .. }
            | FollowDeleted { scope, .. }
            | MemberAdded { scope, .. }
            | MemberUpdated { scope, .. }
            | MemberRemoved { scope, .. }
            | PollUpdated { scope, .. }
            | PollClosed { scope, .. }
            | PollDeleted { scope, .. }
            | PollVoteCasted { scope, .. }
            | PollVoteChanged { scope, .. }
            | PollVoteRemoved { scope, .. } => scope,
            BookmarkAdded { .. }
            | BookmarkUpdated { .. }
            | BookmarkDeleted { .. }
            | BookmarkFolderUpdated { .. }
            | BookmarkFolderDeleted { .. }
            | Unhandled => UNSCOPED,
        }
    }

    /// Same event with its scope replaced. Unscoped variants are returned
    /// unchanged.
    pub fn with_scope(mut self, new_scope: Scope) -> Self {
        use StateUpdateEvent::*;
        match &mut self {
            ActivityAdded { scope, .. }
            | ActivityUpdated { scope, .. }
            | ActivityDeleted { scope, .. }
            | ActivityRemovedFromFeed { scope, .. }
            | ActivityPinned { scope, .. }
            | ActivityUnpinned { scope, .. }
            | ActivityReactionUpserted { scope, .. }
            | ActivityReactionDeleted { scope, .. }
            | CommentAdded { scope, .. }
            | CommentUpdated { scope, .. }
            | CommentDeleted { scope, .. }
            | CommentReactionUpserted { scope, .. }
            | CommentReactionDeleted { scope, .. }
            | FeedUpdated { scope, .. }
            | FeedDeleted { scope }
            | FollowAdded { scope, .. }
            | FollowUpdated { scope, .. }
            | FollowDeleted { scope, .. }
            | MemberAdded { scope, .. }
            | MemberUpdated { scope, .. }
            | MemberRemoved { scope, .. }
            | PollUpdated { scope, .. }
            | PollClosed { scope, .. }
            | PollDeleted { scope, .. }
            | PollVoteCasted { scope, .. }
            | PollVoteChanged { scope, .. }
            | PollVoteRemoved { scope, .. } => *scope = new_scope,
            BookmarkAdded { .. }
            | BookmarkUpdated { .. }
            | BookmarkDeleted { .. }
            | BookmarkFolderUpdated { .. }
            | BookmarkFolderDeleted { .. }
            | Unhandled => {}
        }
        self
    }

    /// Short snake_case name for logs.
    pub fn kind(&self) -> &'static str {
        self.into()
    }

    pub fn is_unhandled(&self) -> bool {
        matches!(self, StateUpdateEvent::Unhandled)
    }
}
