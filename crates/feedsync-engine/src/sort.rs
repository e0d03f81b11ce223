//! Sort keys, directions, and composed comparators.
//!
//! A [`SortField`] extracts an ordered key from a record and carries the
//! `remote` field name the query layer sends to the server. A [`Sort`] pairs a
//! field with a [`SortDirection`]; a [`Comparator`] applies a list of sorts
//! left-to-right until one of them differs.
//!
//! Accessors never fail; callers map absent values to a default (zero, empty
//! string) when building a field. Absent *objects* are handled separately by
//! [`Sort::compare_optional`]: a missing object sorts first in `Forward` and
//! last in `Reverse`.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use feedsync_types::{
    ActivityData, BookmarkData, BookmarkFolderData, CommentData, FeedMemberData,
    FeedsReactionData, FollowData, PollVoteData,
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

type CompareFn<T> = dyn Fn(&T, &T) -> Ordering + Send + Sync;

/// Sort direction. Serialized as `1` / `-1` for the query layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[default]
    Forward,
    Reverse,
}

impl SortDirection {
    pub fn as_i8(self) -> i8 {
        match self {
            SortDirection::Forward => 1,
            SortDirection::Reverse => -1,
        }
    }

    /// Flip `ordering` for `Reverse`.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Forward => ordering,
            SortDirection::Reverse => ordering.reverse(),
        }
    }
}

/// Maps a record to an ordered key.
pub struct SortField<T> {
    remote: &'static str,
    compare: Arc<CompareFn<T>>,
}

impl<T> Clone for SortField<T> {
    fn clone(&self) -> Self {
        Self {
            remote: self.remote,
            compare: Arc::clone(&self.compare),
        }
    }
}

impl<T> fmt::Debug for SortField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortField").field("remote", &self.remote).finish()
    }
}

impl<T: 'static> SortField<T> {
    /// A field over any `Ord` key.
    pub fn new<K, F>(remote: &'static str, key: F) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        Self {
            remote,
            compare: Arc::new(move |a: &T, b: &T| key(a).cmp(&key(b))),
        }
    }

    /// A field over an `f64` key, ordered with `total_cmp` so NaN is placed
    /// deterministically instead of comparing equal to everything.
    pub fn float<F>(remote: &'static str, key: F) -> Self
    where
        F: Fn(&T) -> f64 + Send + Sync + 'static,
    {
        Self {
            remote,
            compare: Arc::new(move |a: &T, b: &T| key(a).total_cmp(&key(b))),
        }
    }
}

impl<T> SortField<T> {
    /// Field name understood by the server.
    pub fn remote(&self) -> &'static str {
        self.remote
    }

    /// Ascending comparison of the extracted keys.
    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.compare)(a, b)
    }
}

/// A field plus a direction.
pub struct Sort<T> {
    pub field: SortField<T>,
    pub direction: SortDirection,
}

impl<T> Clone for Sort<T> {
    fn clone(&self) -> Self {
        Self {
            field: self.field.clone(),
            direction: self.direction,
        }
    }
}

impl<T> fmt::Debug for Sort<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sort")
            .field("field", &self.field.remote)
            .field("direction", &self.direction)
            .finish()
    }
}

/// Wire form of a sort for the query layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortRequest {
    pub field: String,
    pub direction: i8,
}

impl<T> Sort<T> {
    pub fn forward(field: SortField<T>) -> Self {
        Self {
            field,
            direction: SortDirection::Forward,
        }
    }

    pub fn reverse(field: SortField<T>) -> Self {
        Self {
            field,
            direction: SortDirection::Reverse,
        }
    }

    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        self.direction.apply(self.field.compare(a, b))
    }

    /// Compare possibly-missing objects.
    ///
    /// A missing object sorts before any present one in `Forward` and after
    /// it in `Reverse`; two missing objects are equal.
    pub fn compare_optional(&self, a: Option<&T>, b: Option<&T>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => self.direction.apply(Ordering::Less),
            (Some(_), None) => self.direction.apply(Ordering::Greater),
            (Some(a), Some(b)) => self.compare(a, b),
        }
    }

    pub fn to_request(&self) -> SortRequest {
        SortRequest {
            field: self.field.remote.to_string(),
            direction: self.direction.as_i8(),
        }
    }
}

/// Composite comparator over a list of sorts.
///
/// Cheap to clone (shared list). An empty comparator considers every pair
/// equal, which makes sorted inserts degrade to appends.
pub struct Comparator<T> {
    sorts: Arc<[Sort<T>]>,
}

impl<T> Clone for Comparator<T> {
    fn clone(&self) -> Self {
        Self {
            sorts: Arc::clone(&self.sorts),
        }
    }
}

impl<T> fmt::Debug for Comparator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.sorts.iter()).finish()
    }
}

impl<T> Comparator<T> {
    pub fn new(sorts: Vec<Sort<T>>) -> Self {
        Self { sorts: sorts.into() }
    }

    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        self.sorts
            .iter()
            .map(|sort| sort.compare(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Null-object aware variant of [`Comparator::compare`], using the first
    /// sort's direction for the missing-object rule.
    pub fn compare_optional(&self, a: Option<&T>, b: Option<&T>) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => self.compare(a, b),
            _ => self
                .sorts
                .first()
                .map(|sort| sort.compare_optional(a, b))
                .unwrap_or(Ordering::Equal),
        }
    }

    pub fn sorts(&self) -> &[Sort<T>] {
        &self.sorts
    }

    pub fn is_empty(&self) -> bool {
        self.sorts.is_empty()
    }

    pub fn to_requests(&self) -> Vec<SortRequest> {
        self.sorts.iter().map(Sort::to_request).collect()
    }

    /// Whether `items` is non-decreasing under this comparator.
    pub fn is_sorted(&self, items: &[T]) -> bool {
        items.windows(2).all(|w| self.compare(&w[0], &w[1]).is_le())
    }
}

impl<T> From<Vec<Sort<T>>> for Comparator<T> {
    fn from(sorts: Vec<Sort<T>>) -> Self {
        Self::new(sorts)
    }
}

// ============================================================================
// Built-in orderings
// ============================================================================

/// Activities, newest first (the default feed order).
pub fn activities_newest_first() -> Comparator<ActivityData> {
    Comparator::new(vec![Sort::reverse(SortField::new("created_at", |a: &ActivityData| a.created_at))])
}

/// Activities by popularity, ties newest first.
pub fn activities_by_popularity() -> Comparator<ActivityData> {
    Comparator::new(vec![
        Sort::reverse(SortField::new("popularity", |a: &ActivityData| a.popularity)),
        Sort::reverse(SortField::new("created_at", |a: &ActivityData| a.created_at)),
    ])
}

/// Comment thread orderings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CommentSort {
    /// Oldest first.
    First,
    /// Newest first.
    #[default]
    Last,
    /// Highest score first.
    Top,
    /// Highest confidence first.
    Best,
    /// Most controversial first.
    Controversial,
}

impl CommentSort {
    pub fn comparator(self) -> Comparator<CommentData> {
        let created_at = || SortField::new("created_at", |c: &CommentData| c.created_at);
        let primary = match self {
            CommentSort::First => return Comparator::new(vec![Sort::forward(created_at())]),
            CommentSort::Last => return Comparator::new(vec![Sort::reverse(created_at())]),
            CommentSort::Top => Sort::reverse(SortField::new("score", |c: &CommentData| c.score)),
            CommentSort::Best => {
                Sort::reverse(SortField::float("confidence_score", |c: &CommentData| c.confidence_score))
            }
            CommentSort::Controversial => {
                Sort::reverse(SortField::float("controversy_score", |c: &CommentData| c.controversy_score))
            }
        };
        Comparator::new(vec![primary, Sort::reverse(created_at())])
    }
}

pub fn reactions_newest_first() -> Comparator<FeedsReactionData> {
    Comparator::new(vec![Sort::reverse(SortField::new("created_at", |r: &FeedsReactionData| r.created_at))])
}

pub fn votes_newest_first() -> Comparator<PollVoteData> {
    Comparator::new(vec![Sort::reverse(SortField::new("created_at", |v: &PollVoteData| v.created_at))])
}

pub fn members_newest_first() -> Comparator<FeedMemberData> {
    Comparator::new(vec![Sort::reverse(SortField::new("created_at", |m: &FeedMemberData| m.created_at))])
}

pub fn follows_newest_first() -> Comparator<FollowData> {
    Comparator::new(vec![Sort::reverse(SortField::new("created_at", |f: &FollowData| f.created_at))])
}

pub fn bookmarks_newest_first() -> Comparator<BookmarkData> {
    Comparator::new(vec![Sort::reverse(SortField::new("created_at", |b: &BookmarkData| b.created_at))])
}

pub fn folders_recently_updated() -> Comparator<BookmarkFolderData> {
    Comparator::new(vec![Sort::reverse(SortField::new("updated_at", |f: &BookmarkFolderData| {
        f.updated_at
    }))])
}

// ============================================================================
// Tests
// ============================================================================
