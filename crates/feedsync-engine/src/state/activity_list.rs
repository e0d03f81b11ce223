//! Activity lists: the ordered result of an activity query.

use feedsync_types::{ActivityData, PaginationData, PaginationResult};

use crate::collections::{remove_first, upsert_sorted};
use crate::container::ApplyEvent;
use crate::context::EngineContext;
use crate::events::StateUpdateEvent;
use crate::own_data::merge_remote;
use crate::policy::{ActivityQuery, InsertionAction, on_new_activity};
use crate::state::activity::reconcile;

#[derive(Clone, Debug, Default)]
pub struct ActivityListState {
    pub query: ActivityQuery,
    pub activities: Vec<ActivityData>,
    pub pagination: PaginationData,
}

impl ActivityListState {
    pub fn new(query: ActivityQuery) -> Self {
        Self {
            query,
            ..Default::default()
        }
    }

    pub fn seeded(query: ActivityQuery, page: PaginationResult<ActivityData>) -> Self {
        Self::new(query).with_page(page)
    }

    /// Merge a fetched page. Known activities are refreshed (own data kept);
    /// new ones are placed by the query's sort, or appended.
    pub fn with_page(&self, page: PaginationResult<ActivityData>) -> Self {
        let activities = page.models.into_iter().fold(self.activities.clone(), |acc, remote| {
            let remote = match acc.iter().find(|a| a.id == remote.id) {
                Some(current) => merge_remote(current, remote, None),
                None => remote,
            };
            self.place(&acc, remote, InsertionAction::InsertAtEnd)
        });
        Self {
            activities,
            pagination: page.pagination,
            ..self.clone()
        }
    }

    pub fn get(&self, id: &str) -> Option<&ActivityData> {
        self.activities.iter().find(|a| a.id == id)
    }

    /// Upsert `activity`. An explicit sort decides the position; otherwise a
    /// known activity stays put and a new one goes to the requested end.
    fn place(&self, activities: &[ActivityData], activity: ActivityData, action: InsertionAction) -> Vec<ActivityData> {
        if let Some(sort) = &self.query.sort {
            return upsert_sorted(activities, activity, |a| a.id.as_str(), sort);
        }
        if let Some(index) = activities.iter().position(|a| a.id == activity.id) {
            let mut out = activities.to_vec();
            out[index] = activity;
            return out;
        }
        let mut out = Vec::with_capacity(activities.len() + 1);
        match action {
            InsertionAction::InsertAtStart => {
                out.push(activity);
                out.extend_from_slice(activities);
            }
            _ => {
                out.extend_from_slice(activities);
                out.push(activity);
            }
        }
        out
    }

    fn with_activities(&self, activities: Vec<ActivityData>) -> Self {
        Self {
            activities,
            ..self.clone()
        }
    }

    /// Run `reconcile` over every activity; `None` when none changed.
    fn reconcile_all(&self, event: &StateUpdateEvent, ctx: &EngineContext) -> Option<Vec<ActivityData>> {
        let mut changed = None::<Vec<(usize, ActivityData)>>;
        for (index, activity) in self.activities.iter().enumerate() {
            if let Some(updated) = reconcile(activity, event, ctx) {
                changed.get_or_insert_with(Vec::new).push((index, updated));
            }
        }
        let changed = changed?;
        let mut out = self.activities.clone();
        for (index, updated) in changed {
            out[index] = updated;
        }
        if let Some(sort) = &self.query.sort {
            out.sort_by(|a, b| sort.compare(a, b));
        }
        Some(out)
    }
}

impl ApplyEvent for ActivityListState {
    fn matches_scope(&self, event: &StateUpdateEvent) -> bool {
        match (&self.query.fid, event) {
            (Some(fid), StateUpdateEvent::ActivityRemovedFromFeed { scope, .. }) => scope.strictly_matches(fid),
            (Some(fid), _) => event.scope().matches(fid),
            (None, _) => true,
        }
    }

    fn apply(&self, event: &StateUpdateEvent, ctx: &EngineContext) -> Option<Self> {
        use StateUpdateEvent::*;
        match event {
            ActivityAdded { activity, .. } if self.get(&activity.id).is_none() => {
                match on_new_activity(&self.query, activity, ctx.current_user_id()) {
                    InsertionAction::Ignore => None,
                    action => Some(self.with_activities(self.place(&self.activities, activity.clone(), action))),
                }
            }
            ActivityDeleted { activity_id, .. } => {
                remove_first(&self.activities, |a| a.id == *activity_id).map(|a| self.with_activities(a))
            }
            ActivityRemovedFromFeed { scope, activity_id } => {
                let fid = self.query.fid.as_ref()?;
                if !scope.strictly_matches(fid) {
                    return None;
                }
                remove_first(&self.activities, |a| a.id == *activity_id).map(|a| self.with_activities(a))
            }
            _ => self.reconcile_all(event, ctx).map(|a| self.with_activities(a)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::Scope;
    use crate::sort::activities_newest_first;
    use feedsync_types::{FeedId, FeedsReactionData, UserData};

    fn ctx() -> EngineContext {
        EngineContext::new("me")
    }

    fn activity(id: &str, author: &str, at: u64) -> ActivityData {
        ActivityData::new(id, UserData::with_id(author), at)
    }

    fn added(activity: ActivityData) -> StateUpdateEvent {
        StateUpdateEvent::ActivityAdded {
            scope: Scope::Unknown,
            activity,
        }
    }

    #[test]
    fn test_own_activity_prepended() {
        let list = ActivityListState::seeded(
            ActivityQuery::default(),
            PaginationResult::new(vec![activity("a1", "bob", 1)], PaginationData::default()),
        );
        let list = list.apply(&added(activity("a2", "me", 2)), &ctx()).unwrap();
        assert_eq!(list.activities[0].id, "a2");
        assert!(list.apply(&added(activity("a3", "bob", 3)), &ctx()).is_none());
    }

    #[test]
    fn test_sorted_list_places_by_comparator() {
        let query = ActivityQuery::default()
            .with_sort(activities_newest_first())
            .with_policy(|_, _, _| InsertionAction::InsertAtEnd);
        let list = ActivityListState::seeded(
            query,
            PaginationResult::new(vec![activity("a3", "bob", 3), activity("a1", "bob", 1)], PaginationData::default()),
        );
        let list = list.apply(&added(activity("a2", "bob", 2)), &ctx()).unwrap();
        let ids: Vec<_> = list.activities.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["a3", "a2", "a1"]);
    }

    #[test]
    fn test_reaction_reaches_listed_activity() {
        let list = ActivityListState::seeded(
            ActivityQuery::default(),
            PaginationResult::new(vec![activity("a1", "bob", 1)], PaginationData::default()),
        );
        let event = StateUpdateEvent::ActivityReactionUpserted {
            scope: Scope::Unknown,
            reaction: FeedsReactionData {
                activity_id: "a1".into(),
                reaction_type: "like".into(),
                user: UserData::with_id("bob"),
                created_at: 2,
                ..Default::default()
            },
            enforce_unique: false,
        };
        let list = list.apply(&event, &ctx()).unwrap();
        assert_eq!(list.activities[0].reaction_count, 1);
    }

    #[test]
    fn test_removed_from_feed_needs_strict_scope() {
        let fid = FeedId::new("user", "alice");
        let list = ActivityListState::seeded(
            ActivityQuery::for_feed(fid.clone()),
            PaginationResult::new(vec![activity("a1", "bob", 1)], PaginationData::default()),
        );
        let unscoped = StateUpdateEvent::ActivityRemovedFromFeed {
            scope: Scope::Unknown,
            activity_id: "a1".into(),
        };
        assert!(!list.matches_scope(&unscoped));
        assert!(list.apply(&unscoped, &ctx()).is_none());

        let scoped = unscoped.with_scope(fid.into());
        assert!(list.matches_scope(&scoped));
        assert!(list.apply(&scoped, &ctx()).unwrap().activities.is_empty());
    }

    #[test]
    fn test_page_merge_keeps_own_data() {
        let mut mine = activity("a1", "bob", 1);
        mine.own_reactions.push(FeedsReactionData::default());
        let list = ActivityListState::seeded(
            ActivityQuery::default(),
            PaginationResult::new(vec![mine], PaginationData::default()),
        );
        let list = list.with_page(PaginationResult::new(
            vec![activity("a1", "bob", 1), activity("a0", "bob", 0)],
            PaginationData::default(),
        ));
        assert_eq!(list.activities.len(), 2);
        assert_eq!(list.activities[0].own_reactions.len(), 1);
    }
}
