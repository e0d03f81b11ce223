//! Own-data preservation across remote snapshots.
//!
//! Push events and query responses routinely omit or truncate the current
//! user's own reactions, bookmarks, votes, and capabilities. Taking a remote
//! snapshot as-is would silently erase them, so every remote replacement goes
//! through [`merge_remote`]: the snapshot wins for shared fields, and the own
//! subset comes from an explicit override or from the local copy.

use feedsync_types::{
    ActivityData, BookmarkData, CapabilitySet, CommentData, FeedData, FeedMemberData,
    FeedsReactionData, FollowData, PollData, PollVoteData,
};

/// A record with a per-user slice that remote snapshots must not clobber.
pub trait OwnData: Sized {
    type Own;

    /// Copy out the own-data slice.
    fn own(&self) -> Self::Own;

    /// Replace the own-data slice.
    fn with_own(self, own: Self::Own) -> Self;
}

/// `remote` with its own-data replaced by `own_override`, or by `current`'s
/// own-data when no override is given.
pub fn merge_remote<T: OwnData>(current: &T, remote: T, own_override: Option<T::Own>) -> T {
    let own = own_override.unwrap_or_else(|| current.own());
    remote.with_own(own)
}

/// Own slice of an activity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActivityOwn {
    pub reactions: Vec<FeedsReactionData>,
    pub bookmarks: Vec<BookmarkData>,
    /// Own votes of the embedded poll, when there is one locally.
    pub poll_votes: Option<Vec<PollVoteData>>,
}

impl OwnData for ActivityData {
    type Own = ActivityOwn;

    fn own(&self) -> ActivityOwn {
        ActivityOwn {
            reactions: self.own_reactions.clone(),
            bookmarks: self.own_bookmarks.clone(),
            poll_votes: self.poll.as_ref().map(|p| p.own_votes.clone()),
        }
    }

    fn with_own(self, own: ActivityOwn) -> Self {
        let poll = match (self.poll, own.poll_votes) {
            (Some(poll), Some(votes)) => Some(poll.with_own(votes)),
            (poll, _) => poll,
        };
        Self {
            own_reactions: own.reactions,
            own_bookmarks: own.bookmarks,
            poll,
            ..self
        }
    }
}

impl OwnData for CommentData {
    type Own = Vec<FeedsReactionData>;

    fn own(&self) -> Self::Own {
        self.own_reactions.clone()
    }

    fn with_own(self, own: Self::Own) -> Self {
        Self {
            own_reactions: own,
            ..self
        }
    }
}

impl OwnData for PollData {
    type Own = Vec<PollVoteData>;

    fn own(&self) -> Self::Own {
        self.own_votes.clone()
    }

    fn with_own(self, own: Self::Own) -> Self {
        Self { own_votes: own, ..self }
    }
}

/// Own slice of a feed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeedOwn {
    pub capabilities: CapabilitySet,
    pub follows: Vec<FollowData>,
    pub membership: Option<FeedMemberData>,
}

impl OwnData for FeedData {
    type Own = FeedOwn;

    fn own(&self) -> FeedOwn {
        FeedOwn {
            capabilities: self.own_capabilities.clone(),
            follows: self.own_follows.clone(),
            membership: self.own_membership.clone(),
        }
    }

    fn with_own(self, own: FeedOwn) -> Self {
        Self {
            own_capabilities: own.capabilities,
            own_follows: own.follows,
            own_membership: own.membership,
            ..self
        }
    }
}
