//! Enum-dispatched container handlers.
//!
//! The registry stores heterogeneous containers; [`StateHandler`] closes over
//! every kind so dispatch is a plain `match` instead of a trait object.

use strum::IntoStaticStr;

use crate::container::Container;
use crate::events::StateUpdateEvent;
use crate::state::{
    ActivityListState, ActivityState, BookmarkFolderListState, BookmarkListState, CommentThreadState, FeedState,
    FollowListState, MemberListState, PollVoteListState, ReactionListState,
};

#[derive(Clone, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum StateHandler {
    Feed(Container<FeedState>),
    Activity(Container<ActivityState>),
    ActivityList(Container<ActivityListState>),
    CommentThread(Container<CommentThreadState>),
    ReactionList(Container<ReactionListState>),
    MemberList(Container<MemberListState>),
    FollowList(Container<FollowListState>),
    PollVoteList(Container<PollVoteListState>),
    BookmarkList(Container<BookmarkListState>),
    BookmarkFolderList(Container<BookmarkFolderListState>),
}

macro_rules! each_container {
    ($handler:expr, $c:ident => $body:expr) => {
        match $handler {
            StateHandler::Feed($c) => $body,
            StateHandler::Activity($c) => $body,
            StateHandler::ActivityList($c) => $body,
            StateHandler::CommentThread($c) => $body,
            StateHandler::ReactionList($c) => $body,
            StateHandler::MemberList($c) => $body,
            StateHandler::FollowList($c) => $body,
            StateHandler::PollVoteList($c) => $body,
            StateHandler::BookmarkList($c) => $body,
            StateHandler::BookmarkFolderList($c) => $body,
        }
    };
}

impl StateHandler {
    /// Scope-checked apply of a pushed event.
    pub fn apply_remote(&self, event: &StateUpdateEvent) -> bool {
        each_container!(self, c => c.apply_remote(event))
    }

    /// Unchecked apply of a local optimistic event.
    pub fn apply_local(&self, event: &StateUpdateEvent) -> bool {
        each_container!(self, c => c.apply_local(event))
    }

    /// Container kind, for logs.
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

impl std::fmt::Debug for StateHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StateHandler").field(&self.kind()).finish()
    }
}

macro_rules! handler_from {
    ($($variant:ident => $state:ty),* $(,)?) => {
        $(
            impl From<Container<$state>> for StateHandler {
                fn from(container: Container<$state>) -> Self {
                    StateHandler::$variant(container)
                }
            }
        )*
    };
}

handler_from! {
    Feed => FeedState,
    Activity => ActivityState,
    ActivityList => ActivityListState,
    CommentThread => CommentThreadState,
    ReactionList => ReactionListState,
    MemberList => MemberListState,
    FollowList => FollowListState,
    PollVoteList => PollVoteListState,
    BookmarkList => BookmarkListState,
    BookmarkFolderList => BookmarkFolderListState,
}
