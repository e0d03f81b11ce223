//! Reactions and their per-type aggregate groups.

use serde::{Deserialize, Serialize};

use crate::user::UserData;

/// A reaction on an activity, or on a comment when `comment_id` is set.
///
/// The server does not assign reaction ids. Identity is the triple
/// `(target, type, user)`; see [`FeedsReactionData::id`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedsReactionData {
    pub activity_id: String,
    pub comment_id: Option<String>,
    #[serde(rename = "type")]
    pub reaction_type: String,
    pub user: UserData,
    pub created_at: u64,
    pub updated_at: u64,
}

impl FeedsReactionData {
    /// The comment id for comment reactions, else the activity id.
    pub fn target_id(&self) -> &str {
        self.comment_id.as_deref().unwrap_or(&self.activity_id)
    }

    /// Same target, same type, same user, without allocating the id.
    pub fn same_identity(&self, other: &Self) -> bool {
        self.activity_id == other.activity_id
            && self.comment_id == other.comment_id
            && self.reaction_type == other.reaction_type
            && self.user.id == other.user.id
    }
}

/// Aggregate count of one reaction type on one entity.
///
/// `first_reaction_at` / `last_reaction_at` bound the span of reactions already
/// folded into `count`; they guard against re-applying stale push events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionGroup {
    pub count: u32,
    pub first_reaction_at: u64,
    pub last_reaction_at: u64,
}

impl ReactionGroup {
    /// A fresh group holding a single reaction made at `at`.
    pub fn single(at: u64) -> Self {
        Self {
            count: 1,
            first_reaction_at: at,
            last_reaction_at: at,
        }
    }
}
