//! Comment forests: top-level comments with nested, loaded replies.
//!
//! Used both for an activity's comment preview and for full comment threads.
//! A level is kept ordered when a comparator is given; otherwise new comments
//! are appended. Parents' `reply_count` follows adds and removes of their
//! loaded replies.

use feedsync_types::CommentData;

use crate::collections::{insert_sorted, tree_remove_first, tree_update_first, try_tree_update_first};
use crate::own_data::merge_remote;
use crate::sort::Comparator;

fn children(comment: &CommentData) -> &[CommentData] {
    &comment.replies
}

fn with_children(comment: &CommentData, replies: Vec<CommentData>) -> CommentData {
    CommentData {
        replies,
        ..comment.clone()
    }
}

fn insert_level(level: &[CommentData], comment: CommentData, comparator: Option<&Comparator<CommentData>>) -> Vec<CommentData> {
    match comparator {
        Some(comparator) => insert_sorted(level, comment, comparator),
        None => {
            let mut out = level.to_vec();
            out.push(comment);
            out
        }
    }
}

/// First comment with `id`, anywhere in the forest.
pub fn find<'a>(comments: &'a [CommentData], id: &str) -> Option<&'a CommentData> {
    comments.iter().find_map(|c| {
        if c.id == id {
            Some(c)
        } else {
            find(&c.replies, id)
        }
    })
}

pub fn contains(comments: &[CommentData], id: &str) -> bool {
    find(comments, id).is_some()
}

/// Add a comment the forest has not seen.
///
/// `root_parent` names the parent whose replies form the top level (`None`
/// for an activity's own comments). A comment whose parent is the root goes
/// in the top level; a deeper reply goes under its loaded parent, bumping
/// that parent's `reply_count`. Returns `None` for a comment already present
/// or a reply whose parent is not loaded.
pub fn add(
    comments: &[CommentData],
    comment: CommentData,
    root_parent: Option<&str>,
    comparator: Option<&Comparator<CommentData>>,
) -> Option<Vec<CommentData>> {
    if contains(comments, &comment.id) {
        return None;
    }
    let parent_id = comment.parent_id.clone();
    match parent_id.as_deref() {
        parent if parent == root_parent => Some(insert_level(comments, comment, comparator)),
        None => None,
        Some(parent) => {
            try_tree_update_first(
                comments,
                |c| c.id == parent,
                |c| CommentData {
                    replies: insert_level(&c.replies, comment.clone(), comparator),
                    reply_count: c.reply_count.saturating_add(1),
                    ..c.clone()
                },
                children,
                with_children,
                comparator,
            )
        }
    }
}

/// Remote copy of `current` with its own reactions kept. Loaded replies
/// survive a remote copy that carries none.
pub fn refresh(current: &CommentData, remote: CommentData) -> CommentData {
    let mut merged = merge_remote(current, remote, None);
    if merged.replies.is_empty() {
        merged.replies = current.replies.clone();
    }
    merged
}

/// Replace a loaded comment with a remote copy, keeping own reactions and
/// the replies loaded locally. `None` when the comment is not loaded.
pub fn update(
    comments: &[CommentData],
    comment: &CommentData,
    comparator: Option<&Comparator<CommentData>>,
) -> Option<Vec<CommentData>> {
    let merged = refresh(find(comments, &comment.id)?, comment.clone());
    Some(tree_update_first(
        comments,
        |c| c.id == merged.id,
        |_| merged.clone(),
        children,
        with_children,
        comparator,
    ))
}

/// Apply `f` to the loaded comment with `id`. `None` when the comment is not
/// loaded or `f` declines.
pub fn update_with(
    comments: &[CommentData],
    id: &str,
    comparator: Option<&Comparator<CommentData>>,
    f: impl FnOnce(&CommentData) -> Option<CommentData>,
) -> Option<Vec<CommentData>> {
    let updated = f(find(comments, id)?)?;
    Some(tree_update_first(
        comments,
        |c| c.id == id,
        |_| updated.clone(),
        children,
        with_children,
        comparator,
    ))
}

/// Remove a loaded comment (and its loaded replies). The parent's
/// `reply_count` drops by one. `None` when the comment is not loaded.
pub fn remove(comments: &[CommentData], comment: &CommentData) -> Option<Vec<CommentData>> {
    let removed = tree_remove_first(comments, |c| c.id == comment.id, children, with_children)?;
    let Some(parent) = comment.parent_id.as_deref() else {
        return Some(removed);
    };
    Some(tree_update_first(
        &removed,
        |c| c.id == parent,
        |c| CommentData {
            reply_count: c.reply_count.saturating_sub(1),
            ..c.clone()
        },
        children,
        with_children,
        None,
    ))
}

/// Number of comments in the forest, replies included.
pub fn len(comments: &[CommentData]) -> usize {
    comments.iter().map(|c| 1 + len(&c.replies)).sum()
}

// ============================================================================
// Tests
// ============================================================================
