//! Paged reaction lists for one activity or one comment.

use feedsync_types::{FeedsReactionData, PaginationData, PaginationResult};

use crate::collections::{remove_first, upsert_sorted_with};
use crate::container::ApplyEvent;
use crate::context::EngineContext;
use crate::events::StateUpdateEvent;
use crate::sort::reactions_newest_first;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReactionTarget {
    Activity(String),
    Comment(String),
}

impl ReactionTarget {
    pub fn accepts(&self, reaction: &FeedsReactionData) -> bool {
        match self {
            ReactionTarget::Activity(id) => reaction.comment_id.is_none() && reaction.activity_id == *id,
            ReactionTarget::Comment(id) => reaction.comment_id.as_deref() == Some(id.as_str()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ReactionListState {
    pub target: ReactionTarget,
    pub reactions: Vec<FeedsReactionData>,
    pub pagination: PaginationData,
}

impl ReactionListState {
    pub fn new(target: ReactionTarget) -> Self {
        Self {
            target,
            reactions: Vec::new(),
            pagination: PaginationData::default(),
        }
    }

    pub fn with_page(&self, page: PaginationResult<FeedsReactionData>) -> Self {
        let cmp = reactions_newest_first();
        let reactions = page
            .models
            .into_iter()
            .filter(|r| self.target.accepts(r))
            .fold(self.reactions.clone(), |acc, r| {
                upsert_sorted_with(&acc, r, FeedsReactionData::same_identity, &cmp)
            });
        Self {
            reactions,
            pagination: page.pagination,
            ..self.clone()
        }
    }

    fn upserted(&self, reaction: &FeedsReactionData, enforce_unique: bool) -> Option<Self> {
        if !self.target.accepts(reaction) {
            return None;
        }
        let mut reactions = self.reactions.clone();
        if enforce_unique {
            reactions.retain(|r| r.user.id != reaction.user.id || r.reaction_type == reaction.reaction_type);
        }
        let reactions = upsert_sorted_with(
            &reactions,
            reaction.clone(),
            FeedsReactionData::same_identity,
            &reactions_newest_first(),
        );
        (reactions != self.reactions).then(|| Self {
            reactions,
            ..self.clone()
        })
    }

    fn removed(&self, reaction: &FeedsReactionData) -> Option<Self> {
        if !self.target.accepts(reaction) {
            return None;
        }
        let reactions = remove_first(&self.reactions, |r| r.same_identity(reaction))?;
        Some(Self {
            reactions,
            ..self.clone()
        })
    }

    fn cleared(&self) -> Option<Self> {
        (!self.reactions.is_empty()).then(|| Self {
            reactions: Vec::new(),
            ..self.clone()
        })
    }
}

impl ApplyEvent for ReactionListState {
    fn matches_scope(&self, _event: &StateUpdateEvent) -> bool {
        true
    }

    fn apply(&self, event: &StateUpdateEvent, _ctx: &EngineContext) -> Option<Self> {
        use StateUpdateEvent::*;
        match (event, &self.target) {
            (
                ActivityReactionUpserted {
                    reaction,
                    enforce_unique,
                    ..
                }
                | CommentReactionUpserted {
                    reaction,
                    enforce_unique,
                    ..
                },
                _,
            ) => self.upserted(reaction, *enforce_unique),
            (ActivityReactionDeleted { reaction, .. } | CommentReactionDeleted { reaction, .. }, _) => {
                self.removed(reaction)
            }
            (ActivityDeleted { activity_id, .. }, ReactionTarget::Activity(id)) if activity_id == id => self.cleared(),
            (CommentDeleted { comment, .. }, ReactionTarget::Comment(id)) if comment.id == *id => self.cleared(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Scope;
    use feedsync_types::UserData;

    fn ctx() -> EngineContext {
        EngineContext::new("me")
    }

    fn reaction(user: &str, kind: &str, at: u64) -> FeedsReactionData {
        FeedsReactionData {
            activity_id: "a1".into(),
            reaction_type: kind.into(),
            user: UserData::with_id(user),
            created_at: at,
            ..Default::default()
        }
    }

    fn upsert(reaction: FeedsReactionData, enforce_unique: bool) -> StateUpdateEvent {
        StateUpdateEvent::ActivityReactionUpserted {
            scope: Scope::Unknown,
            reaction,
            enforce_unique,
        }
    }

    #[test]
    fn test_newest_first_and_dedup() {
        let list = ReactionListState::new(ReactionTarget::Activity("a1".into()));
        let list = list.apply(&upsert(reaction("bob", "like", 1), false), &ctx()).unwrap();
        let list = list.apply(&upsert(reaction("eve", "like", 2), false), &ctx()).unwrap();
        assert_eq!(list.reactions[0].user.id, "eve");
        assert!(list.apply(&upsert(reaction("eve", "like", 2), false), &ctx()).is_none());
    }

    #[test]
    fn test_enforce_unique_replaces_users_reaction() {
        let list = ReactionListState::new(ReactionTarget::Activity("a1".into()));
        let list = list.apply(&upsert(reaction("bob", "like", 1), false), &ctx()).unwrap();
        let list = list.apply(&upsert(reaction("bob", "love", 2), true), &ctx()).unwrap();
        assert_eq!(list.reactions.len(), 1);
        assert_eq!(list.reactions[0].reaction_type, "love");
    }

    #[test]
    fn test_comment_target_ignores_activity_reactions() {
        let list = ReactionListState::new(ReactionTarget::Comment("c1".into()));
        assert!(list.apply(&upsert(reaction("bob", "like", 1), false), &ctx()).is_none());
        let on_comment = FeedsReactionData {
            comment_id: Some("c1".into()),
            ..reaction("bob", "like", 1)
        };
        let event = StateUpdateEvent::CommentReactionUpserted {
            scope: Scope::Unknown,
            comment: Default::default(),
            reaction: on_comment.clone(),
            enforce_unique: false,
        };
        let list = list.apply(&event, &ctx()).unwrap();
        let deleted = StateUpdateEvent::CommentReactionDeleted {
            scope: Scope::Unknown,
            comment: Default::default(),
            reaction: on_comment,
        };
        assert!(list.apply(&deleted, &ctx()).unwrap().reactions.is_empty());
    }
}
