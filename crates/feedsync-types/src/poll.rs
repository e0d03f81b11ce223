//! Polls attached to activities, and votes on them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::user::UserData;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollOptionData {
    pub id: String,
    pub text: String,
}

/// A poll. Vote tallies are keyed by option id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollData {
    pub id: String,
    pub name: String,
    pub description: String,
    pub options: Vec<PollOptionData>,
    /// Each user holds at most one option vote at a time.
    pub enforce_unique_vote: bool,
    pub max_votes_allowed: Option<u32>,
    pub allow_answers: bool,
    pub is_closed: bool,
    pub created_by_id: String,
    pub created_at: u64,
    pub updated_at: u64,

    pub vote_count: u32,
    pub vote_counts_by_option: BTreeMap<String, u32>,
    pub latest_votes_by_option: BTreeMap<String, Vec<PollVoteData>>,
    pub answers_count: u32,
    pub latest_answers: Vec<PollVoteData>,
    /// Own-data: the current user's votes and answers.
    pub own_votes: Vec<PollVoteData>,
}

/// A vote for an option, or a free-text answer when `is_answer` is set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollVoteData {
    pub id: String,
    pub poll_id: String,
    pub option_id: String,
    pub user_id: String,
    pub user: Option<UserData>,
    pub is_answer: bool,
    pub answer_text: Option<String>,
    pub created_at: u64,
    pub updated_at: u64,
}

impl PollVoteData {
    pub fn new(
        id: impl Into<String>,
        poll_id: impl Into<String>,
        option_id: impl Into<String>,
        user_id: impl Into<String>,
        created_at: u64,
    ) -> Self {
        Self {
            id: id.into(),
            poll_id: poll_id.into(),
            option_id: option_id.into(),
            user_id: user_id.into(),
            created_at,
            updated_at: created_at,
            ..Default::default()
        }
    }
}
