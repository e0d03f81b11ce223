//! Threaded comments.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::reaction::{FeedsReactionData, ReactionGroup};
use crate::user::UserData;

/// A comment on an object (usually an activity), possibly a reply.
///
/// `replies` holds the locally loaded part of the thread below this comment;
/// `reply_count` is the server-side total and can exceed `replies.len()`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentData {
    pub id: String,
    pub object_id: String,
    pub object_type: String,
    pub parent_id: Option<String>,
    pub user: UserData,
    pub text: Option<String>,
    pub created_at: u64,
    pub updated_at: u64,
    pub deleted_at: Option<u64>,

    pub reaction_groups: BTreeMap<String, ReactionGroup>,
    pub reaction_count: u32,
    pub latest_reactions: Vec<FeedsReactionData>,
    /// Own-data: the current user's reactions.
    pub own_reactions: Vec<FeedsReactionData>,

    pub upvote_count: u32,
    pub downvote_count: u32,
    pub score: i64,
    pub confidence_score: f64,
    pub controversy_score: f64,

    pub reply_count: u32,
    pub replies: Vec<CommentData>,
}

impl CommentData {
    pub fn new(id: impl Into<String>, object_id: impl Into<String>, user: UserData, created_at: u64) -> Self {
        Self {
            id: id.into(),
            object_id: object_id.into(),
            object_type: "activity".to_string(),
            user,
            created_at,
            updated_at: created_at,
            ..Default::default()
        }
    }

    /// A reply to `parent_id`.
    pub fn reply_to(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}
