//! Entity-level reconciliation: reactions, comment previews, bookmarks, poll
//! votes, follows, and membership.
//!
//! Each function takes the current record and one change and returns the
//! updated record, or `None` when the change does not apply (wrong target,
//! duplicate, already removed). Containers use `None` to skip publishing.

use feedsync_types::{
    ActivityData, BookmarkData, CommentData, FeedData, FeedMemberData, FeedsReactionData, FollowData,
    PollData, PollVoteData,
};

use crate::collections::{remove_first, upsert, upsert_sorted, upsert_sorted_with, upsert_with};
use crate::comment_tree;
use crate::context::EngineContext;
use crate::counters::{self, GroupMap};
use crate::own_data::{OwnData, merge_remote};
use crate::sort::{reactions_newest_first, votes_newest_first};

// ============================================================================
// Reactions
// ============================================================================

/// Records carrying reaction aggregates: activities and comments.
pub trait Reactable: Clone {
    fn reaction_target_id(&self) -> &str;
    fn reaction_groups(&self) -> &GroupMap;
    fn latest_reactions(&self) -> &[FeedsReactionData];
    fn own_reactions(&self) -> &[FeedsReactionData];

    /// Rebuild with new aggregates. `reaction_count` is recomputed from the
    /// groups.
    fn with_reactions(&self, groups: GroupMap, latest: Vec<FeedsReactionData>, own: Vec<FeedsReactionData>) -> Self;
}

impl Reactable for ActivityData {
    fn reaction_target_id(&self) -> &str {
        &self.id
    }

    fn reaction_groups(&self) -> &GroupMap {
        &self.reaction_groups
    }

    fn latest_reactions(&self) -> &[FeedsReactionData] {
        &self.latest_reactions
    }

    fn own_reactions(&self) -> &[FeedsReactionData] {
        &self.own_reactions
    }

    fn with_reactions(&self, groups: GroupMap, latest: Vec<FeedsReactionData>, own: Vec<FeedsReactionData>) -> Self {
        Self {
            reaction_count: counters::total(&groups),
            reaction_groups: groups,
            latest_reactions: latest,
            own_reactions: own,
            ..self.clone()
        }
    }
}

impl Reactable for CommentData {
    fn reaction_target_id(&self) -> &str {
        &self.id
    }

    fn reaction_groups(&self) -> &GroupMap {
        &self.reaction_groups
    }

    fn latest_reactions(&self) -> &[FeedsReactionData] {
        &self.latest_reactions
    }

    fn own_reactions(&self) -> &[FeedsReactionData] {
        &self.own_reactions
    }

    fn with_reactions(&self, groups: GroupMap, latest: Vec<FeedsReactionData>, own: Vec<FeedsReactionData>) -> Self {
        Self {
            reaction_count: counters::total(&groups),
            reaction_groups: groups,
            latest_reactions: latest,
            own_reactions: own,
            ..self.clone()
        }
    }
}

/// Fold a reaction into `entity`.
///
/// - A reaction for another target is `None`.
/// - With `enforce_unique`, the reacting user's other reactions on the target
///   are dropped first, each decrementing its group.
/// - A reaction already present in own or latest reactions refreshes the
///   stored copy without counting again.
///
/// `latest_reactions` is not trimmed: it is what recognises a re-delivered
/// reaction from another user, so dropping entries would count it twice.
pub fn add_reaction<T: Reactable>(
    entity: &T,
    reaction: &FeedsReactionData,
    enforce_unique: bool,
    ctx: &EngineContext,
) -> Option<T> {
    if entity.reaction_target_id() != reaction.target_id() {
        return None;
    }
    let is_own = ctx.is_current_user(&reaction.user.id);
    let mut groups = entity.reaction_groups().clone();
    let mut latest = entity.latest_reactions().to_vec();
    let mut own = entity.own_reactions().to_vec();

    if enforce_unique {
        let displaced = |r: &FeedsReactionData| r.user.id == reaction.user.id && r.reaction_type != reaction.reaction_type;
        let mut previous: Vec<FeedsReactionData> = latest.iter().filter(|r| displaced(*r)).cloned().collect();
        if is_own {
            for r in own.iter().filter(|r| displaced(*r)) {
                if !previous.iter().any(|p| p.same_identity(r)) {
                    previous.push(r.clone());
                }
            }
            own.retain(|r| !displaced(r));
        }
        latest.retain(|r| !displaced(r));
        for r in &previous {
            groups = counters::remove_from_groups(&groups, &r.reaction_type, r.created_at);
        }
    }

    let known = own.iter().chain(latest.iter()).any(|r| r.same_identity(reaction));
    if !known {
        groups = counters::add_to_groups(&groups, &reaction.reaction_type, reaction.created_at);
    }
    latest = upsert_sorted_with(&latest, reaction.clone(), FeedsReactionData::same_identity, &reactions_newest_first());
    if is_own {
        own = upsert_with(&own, reaction.clone(), FeedsReactionData::same_identity);
    }

    Some(entity.with_reactions(groups, latest, own))
}

/// Remove a reaction from `entity`.
///
/// The current user's reaction is only counted down while it is still in
/// `own_reactions`, so a second delete for the same reaction is `None`.
pub fn remove_reaction<T: Reactable>(entity: &T, reaction: &FeedsReactionData, ctx: &EngineContext) -> Option<T> {
    if entity.reaction_target_id() != reaction.target_id() {
        return None;
    }
    let is_own = ctx.is_current_user(&reaction.user.id);
    let own = entity.own_reactions();
    if is_own && !own.iter().any(|r| r.same_identity(reaction)) {
        return None;
    }
    let groups = counters::remove_from_groups(entity.reaction_groups(), &reaction.reaction_type, reaction.created_at);
    let latest = remove_first(entity.latest_reactions(), |r| r.same_identity(reaction))
        .unwrap_or_else(|| entity.latest_reactions().to_vec());
    let own = remove_first(own, |r| r.same_identity(reaction)).unwrap_or_else(|| own.to_vec());

    let unchanged = groups == *entity.reaction_groups()
        && latest.len() == entity.latest_reactions().len()
        && own.len() == entity.own_reactions().len();
    if unchanged {
        return None;
    }
    Some(entity.with_reactions(groups, latest, own))
}

// ============================================================================
// Comment previews on activities
// ============================================================================

/// A new comment on `activity`. The count moves only when the comment is new
/// to the preview; replies land under their loaded parent. The preview keeps
/// every pushed comment for the same reason `latest_reactions` is untrimmed.
pub fn add_comment(activity: &ActivityData, comment: &CommentData) -> Option<ActivityData> {
    if comment.object_id != activity.id || comment_tree::contains(&activity.comments, &comment.id) {
        return None;
    }
    let comments = comment_tree::add(&activity.comments, comment.clone(), None, None)
        .unwrap_or_else(|| activity.comments.clone());
    Some(ActivityData {
        comments,
        comment_count: activity.comment_count.saturating_add(1),
        ..activity.clone()
    })
}

pub fn update_comment(activity: &ActivityData, comment: &CommentData) -> Option<ActivityData> {
    if comment.object_id != activity.id {
        return None;
    }
    let comments = comment_tree::update(&activity.comments, comment, None)?;
    Some(ActivityData {
        comments,
        ..activity.clone()
    })
}

/// Drop a comment from the preview. The count moves only when the comment
/// was in the preview.
pub fn remove_comment(activity: &ActivityData, comment: &CommentData) -> Option<ActivityData> {
    if comment.object_id != activity.id {
        return None;
    }
    let comments = comment_tree::remove(&activity.comments, comment)?;
    Some(ActivityData {
        comments,
        comment_count: activity.comment_count.saturating_sub(1),
        ..activity.clone()
    })
}

/// Apply a comment reaction to the preview copy of `comment`.
pub fn update_comment_reaction(
    activity: &ActivityData,
    comment: &CommentData,
    apply: impl FnOnce(&CommentData) -> Option<CommentData>,
) -> Option<ActivityData> {
    if comment.object_id != activity.id {
        return None;
    }
    let comments = comment_tree::update_with(&activity.comments, &comment.id, None, apply)?;
    Some(ActivityData {
        comments,
        ..activity.clone()
    })
}

// ============================================================================
// Bookmarks
// ============================================================================

/// Another bookmark on `activity`. Own bookmarks are deduplicated; others
/// can only be counted.
pub fn add_bookmark(activity: &ActivityData, bookmark: &BookmarkData, ctx: &EngineContext) -> Option<ActivityData> {
    if bookmark.activity.id != activity.id {
        return None;
    }
    if !ctx.is_current_user(&bookmark.user.id) {
        return Some(ActivityData {
            bookmark_count: activity.bookmark_count.saturating_add(1),
            ..activity.clone()
        });
    }
    if activity.own_bookmarks.iter().any(|b| b.same_identity(bookmark)) {
        return None;
    }
    let mut own_bookmarks = activity.own_bookmarks.clone();
    own_bookmarks.push(bookmark.clone());
    Some(ActivityData {
        own_bookmarks,
        bookmark_count: activity.bookmark_count.saturating_add(1),
        ..activity.clone()
    })
}

pub fn update_bookmark(activity: &ActivityData, bookmark: &BookmarkData, ctx: &EngineContext) -> Option<ActivityData> {
    if bookmark.activity.id != activity.id || !ctx.is_current_user(&bookmark.user.id) {
        return None;
    }
    // A folder move changes identity, so match on activity + user only.
    let own_bookmarks = upsert_with(&activity.own_bookmarks, bookmark.clone(), |a, b| a.user.id == b.user.id);
    Some(ActivityData {
        own_bookmarks,
        ..activity.clone()
    })
}

pub fn remove_bookmark(activity: &ActivityData, bookmark: &BookmarkData, ctx: &EngineContext) -> Option<ActivityData> {
    if bookmark.activity.id != activity.id {
        return None;
    }
    if !ctx.is_current_user(&bookmark.user.id) {
        return Some(ActivityData {
            bookmark_count: activity.bookmark_count.saturating_sub(1),
            ..activity.clone()
        });
    }
    let own_bookmarks = remove_first(&activity.own_bookmarks, |b| b.same_identity(bookmark))?;
    Some(ActivityData {
        own_bookmarks,
        bookmark_count: activity.bookmark_count.saturating_sub(1),
        ..activity.clone()
    })
}

// ============================================================================
// Polls
// ============================================================================

fn recount(poll: PollData) -> PollData {
    let vote_count = poll.vote_counts_by_option.values().fold(0u32, |acc, n| acc.saturating_add(*n));
    PollData { vote_count, ..poll }
}

fn is_tracked(poll: &PollData, vote: &PollVoteData) -> bool {
    poll.own_votes.iter().any(|v| v.id == vote.id)
        || poll.latest_answers.iter().any(|v| v.id == vote.id)
        || poll
            .latest_votes_by_option
            .values()
            .any(|votes| votes.iter().any(|v| v.id == vote.id))
}

/// Take `vote` out of every tally and list. Counts drop only for a vote the
/// poll was tracking, unless `force` says the vote is known to exist.
fn drop_vote(mut poll: PollData, vote: &PollVoteData, force: bool) -> PollData {
    let tracked = force || is_tracked(&poll, vote);
    if vote.is_answer {
        if tracked {
            poll.answers_count = poll.answers_count.saturating_sub(1);
        }
        poll.latest_answers.retain(|v| v.id != vote.id);
    } else {
        // The tracked copy knows which option the vote was on.
        let option_id = poll
            .latest_votes_by_option
            .iter()
            .find(|(_, votes)| votes.iter().any(|v| v.id == vote.id))
            .map(|(option, _)| option.clone())
            .or_else(|| poll.own_votes.iter().find(|v| v.id == vote.id).map(|v| v.option_id.clone()))
            .unwrap_or_else(|| vote.option_id.clone());
        if tracked && let Some(n) = poll.vote_counts_by_option.get_mut(&option_id) {
            *n = n.saturating_sub(1);
            if *n == 0 {
                poll.vote_counts_by_option.remove(&option_id);
            }
        }
        for votes in poll.latest_votes_by_option.values_mut() {
            votes.retain(|v| v.id != vote.id);
        }
        poll.latest_votes_by_option.retain(|_, votes| !votes.is_empty());
    }
    poll.own_votes.retain(|v| v.id != vote.id);
    poll
}

/// Record a cast vote (or answer).
///
/// On single-vote polls the voter's earlier votes are withdrawn first. A vote
/// already tracked refreshes in place without counting twice.
pub fn cast_vote(poll: &PollData, vote: &PollVoteData, ctx: &EngineContext) -> Option<PollData> {
    if vote.poll_id != poll.id {
        return None;
    }
    let is_own = ctx.is_current_user(&vote.user_id);
    let mut next = poll.clone();

    if poll.enforce_unique_vote && !vote.is_answer {
        let previous: Vec<PollVoteData> = next
            .latest_votes_by_option
            .values()
            .flatten()
            .chain(next.own_votes.iter())
            .filter(|v| v.user_id == vote.user_id && v.id != vote.id && !v.is_answer)
            .cloned()
            .collect();
        for old in previous {
            next = drop_vote(next, &old, false);
        }
    }

    let known = is_tracked(&next, vote);
    if vote.is_answer {
        if !known {
            next.answers_count = next.answers_count.saturating_add(1);
        }
        next.latest_answers = upsert_sorted(&next.latest_answers, vote.clone(), |v| v.id.as_str(), &votes_newest_first());
    } else {
        if !known {
            let n = next.vote_counts_by_option.entry(vote.option_id.clone()).or_insert(0);
            *n = n.saturating_add(1);
        }
        let latest = next.latest_votes_by_option.entry(vote.option_id.clone()).or_default();
        *latest = upsert_sorted(latest, vote.clone(), |v| v.id.as_str(), &votes_newest_first());
    }
    if is_own {
        next.own_votes = upsert(&next.own_votes, vote.clone(), |v| v.id.as_str());
    }
    Some(recount(next))
}

/// A vote moved to another option (or its answer text changed).
pub fn change_vote(poll: &PollData, vote: &PollVoteData, ctx: &EngineContext) -> Option<PollData> {
    if vote.poll_id != poll.id {
        return None;
    }
    let withdrawn = if is_tracked(poll, vote) {
        drop_vote(poll.clone(), vote, false)
    } else {
        poll.clone()
    };
    cast_vote(&withdrawn, vote, ctx)
}

/// Withdraw a vote. The current user's vote only counts down while it is in
/// `own_votes`.
pub fn remove_vote(poll: &PollData, vote: &PollVoteData, ctx: &EngineContext) -> Option<PollData> {
    if vote.poll_id != poll.id {
        return None;
    }
    let is_own = ctx.is_current_user(&vote.user_id);
    if is_own && !poll.own_votes.iter().any(|v| v.id == vote.id) {
        return None;
    }
    let force = !is_own && !is_tracked(poll, vote);
    Some(recount(drop_vote(poll.clone(), vote, force)))
}

pub fn close_poll(poll: &PollData) -> Option<PollData> {
    if poll.is_closed {
        return None;
    }
    Some(PollData {
        is_closed: true,
        ..poll.clone()
    })
}

/// Apply `f` to the activity's poll when it is poll `poll_id`.
pub fn update_activity_poll(
    activity: &ActivityData,
    poll_id: &str,
    f: impl FnOnce(&PollData) -> Option<PollData>,
) -> Option<ActivityData> {
    let poll = activity.poll.as_ref().filter(|p| p.id == poll_id)?;
    let poll = f(poll)?;
    Some(ActivityData {
        poll: Some(poll),
        ..activity.clone()
    })
}

/// Remote poll snapshot onto the activity, keeping own votes.
pub fn replace_activity_poll(activity: &ActivityData, remote: &PollData) -> Option<ActivityData> {
    update_activity_poll(activity, &remote.id, |current| Some(merge_remote(current, remote.clone(), None)))
}

pub fn remove_activity_poll(activity: &ActivityData, poll_id: &str) -> Option<ActivityData> {
    activity.poll.as_ref().filter(|p| p.id == poll_id)?;
    Some(ActivityData {
        poll: None,
        ..activity.clone()
    })
}

// ============================================================================
// Follows and membership on a feed record
// ============================================================================

/// Whether the follow originates from a feed the current user owns.
fn is_own_follow(follow: &FollowData, ctx: &EngineContext) -> bool {
    ctx.is_current_user(&follow.source_feed.created_by.id)
}

/// Fold a created or updated follow into `feed`.
///
/// The follow carries server snapshots of both ends; the end that is this
/// feed supplies the authoritative counts. Own follows are tracked when the
/// follow points at this feed.
pub fn apply_follow(feed: &FeedData, follow: &FollowData, ctx: &EngineContext) -> Option<FeedData> {
    let as_target = follow.target_feed.fid == feed.fid;
    let as_source = follow.source_feed.fid == feed.fid;
    if !as_target && !as_source {
        return None;
    }
    let mut own = feed.own();
    if as_target && is_own_follow(follow, ctx) {
        own.follows = upsert_with(&own.follows, follow.clone(), FollowData::same_edge);
    }
    let snapshot = if as_target { &follow.target_feed } else { &follow.source_feed };
    Some(merge_remote(feed, snapshot.clone(), Some(own)))
}

pub fn remove_follow(feed: &FeedData, follow: &FollowData, ctx: &EngineContext) -> Option<FeedData> {
    let as_target = follow.target_feed.fid == feed.fid;
    let as_source = follow.source_feed.fid == feed.fid;
    if !as_target && !as_source {
        return None;
    }
    let mut own = feed.own();
    if as_target && is_own_follow(follow, ctx) {
        own.follows = remove_first(&own.follows, |f| f.same_edge(follow)).unwrap_or(own.follows);
    }
    let snapshot = if as_target { &follow.target_feed } else { &follow.source_feed };
    Some(merge_remote(feed, snapshot.clone(), Some(own)))
}

/// A member joined or changed. New members count once; the current user's
/// membership is tracked as own data.
pub fn apply_member(feed: &FeedData, member: &FeedMemberData, added: bool, ctx: &EngineContext) -> Option<FeedData> {
    let is_own = ctx.is_current_user(member.id());
    if added && is_own && feed.own_membership.is_some() {
        return None;
    }
    let mut next = feed.clone();
    if added {
        next.member_count = next.member_count.saturating_add(1);
    }
    if is_own {
        next.own_membership = Some(member.clone());
    }
    (next != *feed).then_some(next)
}

pub fn remove_member(feed: &FeedData, member_id: &str, ctx: &EngineContext) -> Option<FeedData> {
    let is_own = ctx.is_current_user(member_id);
    if is_own && feed.own_membership.is_none() {
        return None;
    }
    let mut next = feed.clone();
    next.member_count = next.member_count.saturating_sub(1);
    if is_own {
        next.own_membership = None;
    }
    Some(next)
}

// ============================================================================
// Tests
// ============================================================================
