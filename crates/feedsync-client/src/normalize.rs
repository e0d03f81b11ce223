//! Wire event → update event.
//!
//! Total and pure: every [`WireEnvelope`] maps to exactly one
//! [`StateUpdateEvent`], with [`StateUpdateEvent::Unhandled`] for tags the
//! engine has no handler for.

use feedsync_engine::{Scope, StateUpdateEvent};
use feedsync_types::FeedsReactionData;
use tracing::warn;

use crate::wire::{WireEnvelope, WireEvent};

pub fn normalize(envelope: WireEnvelope) -> StateUpdateEvent {
    use StateUpdateEvent as E;
    use WireEvent as W;

    let scope = Scope::from_fid(envelope.fid.as_deref());
    match envelope.event {
        W::ActivityAdded { activity } => E::ActivityAdded { scope, activity },
        W::ActivityUpdated { activity } => E::ActivityUpdated { scope, activity },
        W::ActivityDeleted { activity } => E::ActivityDeleted {
            scope,
            activity_id: activity.id,
        },
        W::ActivityRemovedFromFeed { activity } => E::ActivityRemovedFromFeed {
            scope,
            activity_id: activity.id,
        },
        W::ActivityPinned { pinned_activity } => E::ActivityPinned {
            scope,
            pin: pinned_activity,
        },
        W::ActivityUnpinned { pinned_activity } => E::ActivityUnpinned {
            scope,
            pin: pinned_activity,
        },
        W::ActivityReactionAdded { reaction, .. } => E::ActivityReactionUpserted {
            scope,
            reaction,
            enforce_unique: false,
        },
        // An update replaces the user's reaction of another type.
        W::ActivityReactionUpdated { reaction, .. } => E::ActivityReactionUpserted {
            scope,
            reaction,
            enforce_unique: true,
        },
        W::ActivityReactionDeleted { reaction, .. } => E::ActivityReactionDeleted { scope, reaction },

        W::BookmarkAdded { bookmark } => E::BookmarkAdded { bookmark },
        W::BookmarkUpdated { bookmark } => E::BookmarkUpdated { bookmark },
        W::BookmarkDeleted { bookmark } => E::BookmarkDeleted { bookmark },
        W::BookmarkFolderUpdated { bookmark_folder } => E::BookmarkFolderUpdated {
            folder: bookmark_folder,
        },
        W::BookmarkFolderDeleted { bookmark_folder } => E::BookmarkFolderDeleted {
            folder_id: bookmark_folder.id,
        },

        W::CommentAdded { comment } => E::CommentAdded { scope, comment },
        W::CommentUpdated { comment } => E::CommentUpdated { scope, comment },
        W::CommentDeleted { comment } => E::CommentDeleted { scope, comment },
        W::CommentReactionAdded { comment, reaction } => E::CommentReactionUpserted {
            scope,
            reaction: comment_reaction(reaction, &comment.id, &comment.object_id),
            comment,
            enforce_unique: false,
        },
        W::CommentReactionUpdated { comment, reaction } => E::CommentReactionUpserted {
            scope,
            reaction: comment_reaction(reaction, &comment.id, &comment.object_id),
            comment,
            enforce_unique: true,
        },
        W::CommentReactionDeleted { comment, reaction } => E::CommentReactionDeleted {
            scope,
            reaction: comment_reaction(reaction, &comment.id, &comment.object_id),
            comment,
        },

        W::FeedUpdated { feed } => E::FeedUpdated { scope, feed },
        W::FeedDeleted {} => E::FeedDeleted { scope },
        W::FollowCreated { follow } => E::FollowAdded { scope, follow },
        W::FollowUpdated { follow } => E::FollowUpdated { scope, follow },
        W::FollowDeleted { follow } => E::FollowDeleted { scope, follow },
        W::MemberAdded { member } => E::MemberAdded { scope, member },
        W::MemberUpdated { member } => E::MemberUpdated { scope, member },
        W::MemberRemoved { member_id } => E::MemberRemoved { scope, member_id },

        W::PollUpdated { poll } => E::PollUpdated { scope, poll },
        W::PollClosed { poll } => E::PollClosed { scope, poll },
        W::PollDeleted { poll } => E::PollDeleted { scope, poll_id: poll.id },
        W::PollVoteCasted { poll, poll_vote } => E::PollVoteCasted {
            scope,
            poll,
            vote: poll_vote,
        },
        W::PollVoteChanged { poll, poll_vote } => E::PollVoteChanged {
            scope,
            poll,
            vote: poll_vote,
        },
        W::PollVoteRemoved { poll, poll_vote } => E::PollVoteRemoved {
            scope,
            poll,
            vote: poll_vote,
        },

        W::Unknown => E::Unhandled,
    }
}

/// Parse and normalize one JSON message. Malformed input is `Unhandled`.
pub fn normalize_json(text: &str) -> StateUpdateEvent {
    match WireEnvelope::from_json(text) {
        Ok(envelope) => normalize(envelope),
        Err(e) => {
            warn!("dropping malformed wire event: {e}");
            StateUpdateEvent::Unhandled
        }
    }
}

/// Comment reactions sometimes arrive without their target filled in.
fn comment_reaction(mut reaction: FeedsReactionData, comment_id: &str, object_id: &str) -> FeedsReactionData {
    if reaction.comment_id.is_none() {
        reaction.comment_id = Some(comment_id.to_string());
    }
    if reaction.activity_id.is_empty() {
        reaction.activity_id = object_id.to_string();
    }
    reaction
}
