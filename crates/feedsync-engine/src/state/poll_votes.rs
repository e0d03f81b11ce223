//! Vote lists for one poll.

use feedsync_types::{PaginationData, PaginationResult, PollVoteData};

use crate::collections::{remove_first, upsert_all_sorted, upsert_sorted};
use crate::container::ApplyEvent;
use crate::context::EngineContext;
use crate::events::StateUpdateEvent;
use crate::sort::votes_newest_first;

#[derive(Clone, Debug)]
pub struct PollVoteListState {
    pub poll_id: String,
    pub votes: Vec<PollVoteData>,
    pub pagination: PaginationData,
    pub deleted: bool,
}

fn vote_id(vote: &PollVoteData) -> &str {
    &vote.id
}

impl PollVoteListState {
    pub fn new(poll_id: impl Into<String>) -> Self {
        Self {
            poll_id: poll_id.into(),
            votes: Vec::new(),
            pagination: PaginationData::default(),
            deleted: false,
        }
    }

    pub fn with_page(&self, page: PaginationResult<PollVoteData>) -> Self {
        Self {
            votes: upsert_all_sorted(&self.votes, page.models, vote_id, &votes_newest_first()),
            pagination: page.pagination,
            ..self.clone()
        }
    }

    fn with_votes(&self, votes: Vec<PollVoteData>) -> Option<Self> {
        (votes != self.votes).then(|| Self {
            votes,
            ..self.clone()
        })
    }
}

impl ApplyEvent for PollVoteListState {
    fn matches_scope(&self, _event: &StateUpdateEvent) -> bool {
        true
    }

    fn apply(&self, event: &StateUpdateEvent, _ctx: &EngineContext) -> Option<Self> {
        use StateUpdateEvent::*;
        match event {
            PollVoteCasted { poll, vote, .. } | PollVoteChanged { poll, vote, .. } if vote.poll_id == self.poll_id => {
                let mut votes = self.votes.clone();
                // Single-vote polls: the voter's other votes are gone.
                if poll.enforce_unique_vote && !vote.is_answer {
                    votes.retain(|v| v.user_id != vote.user_id || v.id == vote.id || v.is_answer);
                }
                self.with_votes(upsert_sorted(&votes, vote.clone(), vote_id, &votes_newest_first()))
            }
            PollVoteRemoved { vote, .. } if vote.poll_id == self.poll_id => {
                remove_first(&self.votes, |v| v.id == vote.id).and_then(|votes| self.with_votes(votes))
            }
            PollDeleted { poll_id, .. } if *poll_id == self.poll_id && !self.deleted => Some(Self {
                votes: Vec::new(),
                deleted: true,
                ..self.clone()
            }),
            _ => None,
        }
    }
}
