//! Comment threads: the comments on one object, optionally rooted at one
//! parent comment.

use feedsync_types::{CommentData, PaginationData, PaginationResult};

use crate::collections::upsert_sorted;
use crate::comment_tree;
use crate::container::ApplyEvent;
use crate::context::EngineContext;
use crate::events::StateUpdateEvent;
use crate::mutations;
use crate::sort::{CommentSort, Comparator};

#[derive(Clone, Debug)]
pub struct CommentThreadState {
    /// Activity (or other object) the comments belong to.
    pub object_id: String,
    /// When set, the top level holds this comment's replies.
    pub parent_id: Option<String>,
    pub sort: CommentSort,
    pub comments: Vec<CommentData>,
    pub pagination: PaginationData,
    comparator: Comparator<CommentData>,
}

impl CommentThreadState {
    pub fn new(object_id: impl Into<String>, parent_id: Option<String>, sort: CommentSort) -> Self {
        Self {
            object_id: object_id.into(),
            parent_id,
            sort,
            comments: Vec::new(),
            pagination: PaginationData::default(),
            comparator: sort.comparator(),
        }
    }

    /// Merge a fetched page into the top level. Known comments keep their
    /// own reactions and loaded replies.
    pub fn with_page(&self, page: PaginationResult<CommentData>) -> Self {
        let comments = page.models.into_iter().fold(self.comments.clone(), |acc, remote| {
            let remote = match acc.iter().find(|c| c.id == remote.id) {
                Some(current) => comment_tree::refresh(current, remote),
                None => remote,
            };
            upsert_sorted(&acc, remote, |c| c.id.as_str(), &self.comparator)
        });
        Self {
            comments,
            pagination: page.pagination,
            ..self.clone()
        }
    }

    pub fn get(&self, id: &str) -> Option<&CommentData> {
        comment_tree::find(&self.comments, id)
    }

    fn owns(&self, comment: &CommentData) -> bool {
        comment.object_id == self.object_id
    }

    fn with_comments(&self, comments: Vec<CommentData>) -> Self {
        Self {
            comments,
            ..self.clone()
        }
    }
}

impl ApplyEvent for CommentThreadState {
    fn matches_scope(&self, _event: &StateUpdateEvent) -> bool {
        true
    }

    fn apply(&self, event: &StateUpdateEvent, ctx: &EngineContext) -> Option<Self> {
        use StateUpdateEvent::*;
        let cmp = Some(&self.comparator);
        let comments = match event {
            CommentAdded { comment, .. } if self.owns(comment) => {
                comment_tree::add(&self.comments, comment.clone(), self.parent_id.as_deref(), cmp)
            }
            CommentUpdated { comment, .. } if self.owns(comment) => comment_tree::update(&self.comments, comment, cmp),
            CommentDeleted { comment, .. } if self.owns(comment) => comment_tree::remove(&self.comments, comment),
            CommentReactionUpserted {
                comment,
                reaction,
                enforce_unique,
                ..
            } if self.owns(comment) => comment_tree::update_with(&self.comments, &comment.id, cmp, |c| {
                mutations::add_reaction(c, reaction, *enforce_unique, ctx)
            }),
            CommentReactionDeleted { comment, reaction, .. } if self.owns(comment) => {
                comment_tree::update_with(&self.comments, &comment.id, cmp, |c| {
                    mutations::remove_reaction(c, reaction, ctx)
                })
            }
            ActivityDeleted { activity_id, .. } if *activity_id == self.object_id && !self.comments.is_empty() => {
                Some(Vec::new())
            }
            _ => None,
        }?;
        Some(self.with_comments(comments))
    }
}
