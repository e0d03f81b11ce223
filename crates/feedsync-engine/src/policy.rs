//! Where a newly seen activity goes in a list.
//!
//! A push for a brand-new activity does not say which queries it belongs to.
//! Each activity container asks its [`ActivityQuery`] through
//! [`on_new_activity`]; a query may carry its own policy to override the
//! default.

use std::fmt;
use std::sync::Arc;

use feedsync_types::{ActivityData, FeedId};

use crate::sort::Comparator;

/// What to do with an activity the container has not seen before.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertionAction {
    InsertAtStart,
    InsertAtEnd,
    Ignore,
}

/// The matching half of a query filter. Building filters is the query
/// layer's job; containers only ask whether an activity passes.
pub trait ActivityFilter: Send + Sync {
    fn matches(&self, activity: &ActivityData) -> bool;
}

impl<F> ActivityFilter for F
where
    F: Fn(&ActivityData) -> bool + Send + Sync,
{
    fn matches(&self, activity: &ActivityData) -> bool {
        self(activity)
    }
}

/// Custom placement policy: `(query, activity, current_user_id)`.
pub type NewActivityPolicy = Arc<dyn Fn(&ActivityQuery, &ActivityData, &str) -> InsertionAction + Send + Sync>;

/// What an activity container was loaded with.
#[derive(Clone, Default)]
pub struct ActivityQuery {
    /// Feed the container is bound to, if any.
    pub fid: Option<FeedId>,
    pub filter: Option<Arc<dyn ActivityFilter>>,
    /// Explicit order. Without one, new activities are prepended/appended.
    pub sort: Option<Comparator<ActivityData>>,
    pub policy: Option<NewActivityPolicy>,
}

impl ActivityQuery {
    pub fn for_feed(fid: FeedId) -> Self {
        Self {
            fid: Some(fid),
            ..Default::default()
        }
    }

    pub fn with_filter(mut self, filter: impl ActivityFilter + 'static) -> Self {
        self.filter = Some(Arc::new(filter));
        self
    }

    pub fn with_sort(mut self, sort: Comparator<ActivityData>) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_policy(
        mut self,
        policy: impl Fn(&ActivityQuery, &ActivityData, &str) -> InsertionAction + Send + Sync + 'static,
    ) -> Self {
        self.policy = Some(Arc::new(policy));
        self
    }

    pub fn filter_matches(&self, activity: &ActivityData) -> bool {
        self.filter.as_ref().is_none_or(|f| f.matches(activity))
    }
}

impl fmt::Debug for ActivityQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivityQuery")
            .field("fid", &self.fid)
            .field("filter", &self.filter.is_some())
            .field("sort", &self.sort)
            .field("policy", &self.policy.is_some())
            .finish()
    }
}

/// Placement for an unseen activity.
///
/// Uses the query's own policy when it has one. The default inserts at the
/// start when the activity passes the filter and is either authored by the
/// current user or posted to the bound feed; everything else is ignored.
pub fn on_new_activity(query: &ActivityQuery, activity: &ActivityData, current_user_id: &str) -> InsertionAction {
    if let Some(policy) = &query.policy {
        return policy(query, activity, current_user_id);
    }
    if !query.filter_matches(activity) {
        return InsertionAction::Ignore;
    }
    let targets_feed = query.fid.as_ref().is_some_and(|fid| activity.is_in_feed(fid));
    if activity.is_authored_by(current_user_id) || targets_feed {
        InsertionAction::InsertAtStart
    } else {
        InsertionAction::Ignore
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedsync_types::UserData;

    fn activity(author: &str, feeds: &[FeedId]) -> ActivityData {
        ActivityData {
            feeds: feeds.to_vec(),
            ..ActivityData::new("a1", UserData::with_id(author), 1)
        }
    }

    #[test]
    fn test_own_activity_inserts_at_start() {
        let query = ActivityQuery::default();
        assert_eq!(
            on_new_activity(&query, &activity("me", &[]), "me"),
            InsertionAction::InsertAtStart
        );
    }

    #[test]
    fn test_activity_targeting_bound_feed() {
        let fid = FeedId::new("user", "alice");
        let query = ActivityQuery::for_feed(fid.clone());
        assert_eq!(
            on_new_activity(&query, &activity("alice", &[fid]), "me"),
            InsertionAction::InsertAtStart
        );
        assert_eq!(
            on_new_activity(&query, &activity("alice", &[FeedId::new("user", "bob")]), "me"),
            InsertionAction::Ignore
        );
    }

    #[test]
    fn test_filter_rejects_even_own() {
        let query = ActivityQuery::default().with_filter(|a: &ActivityData| a.activity_type == "photo");
        assert_eq!(on_new_activity(&query, &activity("me", &[]), "me"), InsertionAction::Ignore);
    }

    #[test]
    fn test_custom_policy_overrides() {
        let query = ActivityQuery::default().with_policy(|_, _, _| InsertionAction::InsertAtEnd);
        assert_eq!(
            on_new_activity(&query, &activity("someone", &[]), "me"),
            InsertionAction::InsertAtEnd
        );
    }
}
