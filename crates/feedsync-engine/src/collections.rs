//! Id-keyed maintenance of immutable ordered collections.
//!
//! Every function here takes a slice and returns a fresh `Vec`; the input is
//! never touched. An update for an unknown id is an insert, and an empty input
//! always yields a single-element result.
//!
//! # Tree updates
//!
//! [`tree_update_first`] walks a forest pre-order, first branch first, and
//! updates only the first node the matcher accepts. When a comparator is
//! given, the level holding the updated node is re-sorted, and so is every
//! ancestor level on the way back up: a child update can move its parent.

use std::cmp::Ordering;

use crate::sort::Comparator;

/// Replace the element `same` identifies with `item`, in place; else append.
pub fn upsert_with<T: Clone>(items: &[T], item: T, same: impl Fn(&T, &T) -> bool) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len() + 1);
    let mut item = Some(item);
    for existing in items {
        match item.take() {
            Some(new) if same(existing, &new) => out.push(new),
            other => {
                item = other;
                out.push(existing.clone());
            }
        }
    }
    if let Some(new) = item {
        out.push(new);
    }
    out
}

/// Replace the element with `item`'s id, in place; else append.
pub fn upsert<T: Clone>(items: &[T], item: T, id_of: impl Fn(&T) -> &str) -> Vec<T> {
    upsert_with(items, item, |a, b| id_of(a) == id_of(b))
}

/// Insert `item` at its sorted position, rightmost among equal elements.
///
/// No id check: the item is always added.
pub fn insert_sorted<T: Clone>(items: &[T], item: T, comparator: &Comparator<T>) -> Vec<T> {
    insert_sorted_by(items, item, |a, b| comparator.compare(a, b))
}

fn insert_sorted_by<T: Clone>(items: &[T], item: T, compare: impl Fn(&T, &T) -> Ordering) -> Vec<T> {
    let at = items.partition_point(|existing| compare(existing, &item) != Ordering::Greater);
    let mut out = Vec::with_capacity(items.len() + 1);
    out.extend_from_slice(&items[..at]);
    out.push(item);
    out.extend_from_slice(&items[at..]);
    out
}

/// Remove the element `same` identifies (if any), then insert `item` at its
/// sorted position. An update whose sort key changed moves the item.
pub fn upsert_sorted_with<T: Clone>(
    items: &[T],
    item: T,
    same: impl Fn(&T, &T) -> bool,
    comparator: &Comparator<T>,
) -> Vec<T> {
    let rest: Vec<T> = match items.iter().position(|existing| same(existing, &item)) {
        Some(index) => {
            let mut rest = items.to_vec();
            rest.remove(index);
            rest
        }
        None => items.to_vec(),
    };
    insert_sorted(&rest, item, comparator)
}

/// [`upsert_sorted_with`] keyed by id.
pub fn upsert_sorted<T: Clone>(
    items: &[T],
    item: T,
    id_of: impl Fn(&T) -> &str,
    comparator: &Comparator<T>,
) -> Vec<T> {
    upsert_sorted_with(items, item, |a, b| id_of(a) == id_of(b), comparator)
}

/// Merge a page of records into a sorted collection, one sorted upsert each.
pub fn upsert_all_sorted<T: Clone>(
    items: &[T],
    page: impl IntoIterator<Item = T>,
    id_of: impl Fn(&T) -> &str,
    comparator: &Comparator<T>,
) -> Vec<T> {
    page.into_iter()
        .fold(items.to_vec(), |acc, item| upsert_sorted(&acc, item, &id_of, comparator))
}

/// Drop the first element `matcher` accepts. `None` when nothing matched.
pub fn remove_first<T: Clone>(items: &[T], matcher: impl Fn(&T) -> bool) -> Option<Vec<T>> {
    let index = items.iter().position(matcher)?;
    let mut out = items.to_vec();
    out.remove(index);
    Some(out)
}

/// Stable re-sort of one level.
fn resort<T>(items: &mut [T], comparator: Option<&Comparator<T>>) {
    if let Some(comparator) = comparator {
        items.sort_by(|a, b| comparator.compare(a, b));
    }
}

/// Update the first node in a forest that `matcher` accepts.
///
/// - `update_element` produces the replacement node.
/// - `children_of` exposes a node's children; `update_children` rebuilds a
///   node around a new children list.
/// - With a `comparator`, the updated level and every ancestor level on the
///   path are re-sorted.
///
/// Returns the forest unchanged when nothing matches; callers decide whether
/// a miss becomes an insert.
pub fn tree_update_first<T, M, U, C, R>(
    items: &[T],
    matcher: M,
    update_element: U,
    children_of: C,
    update_children: R,
    comparator: Option<&Comparator<T>>,
) -> Vec<T>
where
    T: Clone,
    M: Fn(&T) -> bool,
    U: Fn(&T) -> T,
    C: Fn(&T) -> &[T],
    R: Fn(&T, Vec<T>) -> T,
{
    try_tree_update_first(items, matcher, update_element, children_of, update_children, comparator)
        .unwrap_or_else(|| items.to_vec())
}

/// [`tree_update_first`], but `None` on a miss so the caller can fall back to
/// an insert.
pub fn try_tree_update_first<T, M, U, C, R>(
    items: &[T],
    matcher: M,
    update_element: U,
    children_of: C,
    update_children: R,
    comparator: Option<&Comparator<T>>,
) -> Option<Vec<T>>
where
    T: Clone,
    M: Fn(&T) -> bool,
    U: Fn(&T) -> T,
    C: Fn(&T) -> &[T],
    R: Fn(&T, Vec<T>) -> T,
{
    let ops = TreeOps {
        matcher: &matcher,
        update_element: &update_element,
        children_of: &children_of,
        update_children: &update_children,
    };
    update_level(items, &ops, comparator)
}

/// Remove the first node in a forest that `matcher` accepts, rebuilding its
/// parent through `update_children`. `None` when nothing matched.
pub fn tree_remove_first<T, M, C, R>(
    items: &[T],
    matcher: M,
    children_of: C,
    update_children: R,
) -> Option<Vec<T>>
where
    T: Clone,
    M: Fn(&T) -> bool,
    C: Fn(&T) -> &[T],
    R: Fn(&T, Vec<T>) -> T,
{
    remove_level(items, &matcher, &children_of, &update_children)
}

fn remove_level<T, M, C, R>(items: &[T], matcher: &M, children_of: &C, update_children: &R) -> Option<Vec<T>>
where
    T: Clone,
    M: Fn(&T) -> bool,
    C: Fn(&T) -> &[T],
    R: Fn(&T, Vec<T>) -> T,
{
    for (index, node) in items.iter().enumerate() {
        if matcher(node) {
            let mut out = items.to_vec();
            out.remove(index);
            return Some(out);
        }
        if let Some(children) = remove_level(children_of(node), matcher, children_of, update_children) {
            let mut out = items.to_vec();
            out[index] = update_children(node, children);
            return Some(out);
        }
    }
    None
}

struct TreeOps<'a, M, U, C, R> {
    matcher: &'a M,
    update_element: &'a U,
    children_of: &'a C,
    update_children: &'a R,
}

fn update_level<T, M, U, C, R>(
    items: &[T],
    ops: &TreeOps<'_, M, U, C, R>,
    comparator: Option<&Comparator<T>>,
) -> Option<Vec<T>>
where
    T: Clone,
    M: Fn(&T) -> bool,
    U: Fn(&T) -> T,
    C: Fn(&T) -> &[T],
    R: Fn(&T, Vec<T>) -> T,
{
    for (index, node) in items.iter().enumerate() {
        let replacement = if (ops.matcher)(node) {
            Some((ops.update_element)(node))
        } else {
            update_level((ops.children_of)(node), ops, comparator)
                .map(|children| (ops.update_children)(node, children))
        };
        if let Some(replacement) = replacement {
            let mut out = items.to_vec();
            out[index] = replacement;
            resort(&mut out, comparator);
            return Some(out);
        }
    }
    None
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::{Sort, SortField};

    #[derive(Clone, Debug, PartialEq)]
    struct Scored {
        id: String,
        score: i64,
    }

    fn scored(id: &str, score: i64) -> Scored {
        Scored { id: id.to_string(), score }
    }

    fn by_score() -> Comparator<Scored> {
        Comparator::new(vec![Sort::forward(SortField::new("score", |s: &Scored| s.score))])
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Node {
        id: String,
        rank: i64,
        children: Vec<Node>,
    }

    fn leaf(id: &str) -> Node {
        Node { id: id.to_string(), rank: 0, children: vec![] }
    }

    fn node(id: &str, children: Vec<Node>) -> Node {
        Node { id: id.to_string(), rank: 0, children }
    }

    fn ids(items: &[Scored]) -> Vec<&str> {
        items.iter().map(|s| s.id.as_str()).collect()
    }

    // =========================================================================
    // upsert / upsert_sorted / insert_sorted
    // =========================================================================

    #[test]
    fn test_upsert_replaces_in_place() {
        let items = vec![scored("1", 1), scored("2", 2), scored("3", 3)];
        let out = upsert(&items, scored("2", 20), |s| s.id.as_str());
        assert_eq!(out, vec![scored("1", 1), scored("2", 20), scored("3", 3)]);
        // input untouched
        assert_eq!(items[1].score, 2);
    }

    #[test]
    fn test_upsert_appends_unknown() {
        let items = vec![scored("1", 1)];
        let out = upsert(&items, scored("9", 0), |s| s.id.as_str());
        assert_eq!(ids(&out), vec!["1", "9"]);
    }

    #[test]
    fn test_upsert_on_empty() {
        let out = upsert(&[], scored("1", 1), |s: &Scored| s.id.as_str());
        assert_eq!(out, vec![scored("1", 1)]);
        let out = upsert_sorted(&[], scored("1", 1), |s: &Scored| s.id.as_str(), &by_score());
        assert_eq!(out, vec![scored("1", 1)]);
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let items = vec![scored("1", 5), scored("2", 10)];
        let once = upsert_sorted(&items, scored("3", 7), |s| s.id.as_str(), &by_score());
        let twice = upsert_sorted(&once, scored("3", 7), |s| s.id.as_str(), &by_score());
        assert_eq!(once, twice);

        let once = upsert(&items, scored("1", 6), |s| s.id.as_str());
        let twice = upsert(&once, scored("1", 6), |s| s.id.as_str());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_upsert_sorted_repositions() {
        let items = vec![scored("1", 5), scored("2", 10)];
        let out = upsert_sorted(&items, scored("1", 15), |s| s.id.as_str(), &by_score());
        assert_eq!(out, vec![scored("2", 10), scored("1", 15)]);
    }

    #[test]
    fn test_insert_sorted_rightmost_on_tie() {
        let items = vec![scored("a", 1), scored("b", 2), scored("c", 2), scored("d", 3)];
        let out = insert_sorted(&items, scored("new", 2), &by_score());
        assert_eq!(ids(&out), vec!["a", "b", "c", "new", "d"]);
    }

    #[test]
    fn test_insert_sorted_does_not_dedupe() {
        let items = vec![scored("a", 1)];
        let out = insert_sorted(&items, scored("a", 1), &by_score());
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_empty_comparator_appends() {
        let cmp: Comparator<Scored> = Comparator::new(vec![]);
        let items = vec![scored("a", 9), scored("b", 1)];
        let out = insert_sorted(&items, scored("c", 5), &cmp);
        assert_eq!(ids(&out), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_upsert_all_sorted_merges_page() {
        let items = vec![scored("1", 1), scored("3", 3)];
        let page = vec![scored("2", 2), scored("3", 30), scored("0", 0)];
        let out = upsert_all_sorted(&items, page, |s| s.id.as_str(), &by_score());
        assert_eq!(ids(&out), vec!["0", "1", "2", "3"]);
        assert_eq!(out[3].score, 30);
    }

    #[test]
    fn test_remove_first() {
        let items = vec![scored("1", 1), scored("2", 2)];
        assert_eq!(remove_first(&items, |s| s.id == "2"), Some(vec![scored("1", 1)]));
        assert_eq!(remove_first(&items, |s| s.id == "x"), None);
    }

    // =========================================================================
    // tree_update_first
    // =========================================================================

    fn update_target(forest: &[Node], target: &str, cmp: Option<&Comparator<Node>>) -> Vec<Node> {
        tree_update_first(
            forest,
            |n| n.id == target,
            |n| Node { rank: n.rank + 100, ..n.clone() },
            |n| n.children.as_slice(),
            |n, children| Node { children, ..n.clone() },
            cmp,
        )
    }

    #[test]
    fn test_tree_update_first_only_first_match() {
        let forest = vec![
            node("A", vec![leaf("x")]),
            node("B", vec![leaf("target")]),
            node("C", vec![leaf("target")]),
        ];
        let out = update_target(&forest, "target", None);
        assert_eq!(out[0], forest[0]);
        assert_eq!(out[1].children[0].rank, 100);
        assert_eq!(out[2], forest[2]);
    }

    #[test]
    fn test_tree_update_first_preorder_parent_before_child() {
        let forest = vec![node("dup", vec![leaf("dup")])];
        let out = update_target(&forest, "dup", None);
        assert_eq!(out[0].rank, 100);
        assert_eq!(out[0].children[0].rank, 0);
    }

    #[test]
    fn test_tree_update_first_miss_is_unchanged() {
        let forest = vec![node("A", vec![leaf("x")])];
        assert_eq!(update_target(&forest, "nope", None), forest);
        assert!(update_target(&[], "nope", None).is_empty());
    }

    #[test]
    fn test_tree_update_resorts_level() {
        let by_rank = Comparator::new(vec![Sort::reverse(SortField::new("rank", |n: &Node| n.rank))]);
        let forest = vec![
            Node { rank: 50, ..leaf("a") },
            Node { rank: 10, ..leaf("b") },
        ];
        let out = update_target(&forest, "b", Some(&by_rank));
        let order: Vec<_> = out.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn test_tree_update_propagates_parent_resort() {
        // Parent rank is derived from children: rebuild sums child ranks.
        let by_rank = Comparator::new(vec![Sort::reverse(SortField::new("rank", |n: &Node| n.rank))]);
        let forest = vec![
            Node { rank: 5, ..node("P1", vec![]) },
            Node { rank: 1, ..node("P2", vec![leaf("c1"), leaf("c2")]) },
        ];
        let out = tree_update_first(
            &forest,
            |n| n.id == "c2",
            |n| Node { rank: 100, ..n.clone() },
            |n| n.children.as_slice(),
            |n, children| Node {
                rank: children.iter().map(|c| c.rank).sum(),
                children,
                ..n.clone()
            },
            Some(&by_rank),
        );
        let order: Vec<_> = out.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(order, vec!["P2", "P1"]);
        // The updated child moved to the front of its own level too.
        assert_eq!(out[0].children[0].id, "c2");
    }

    #[test]
    fn test_tree_remove_first() {
        let forest = vec![node("A", vec![leaf("x"), leaf("y")]), node("B", vec![leaf("y")])];
        let out = tree_remove_first(&forest, |n| n.id == "y", |n| n.children.as_slice(), |n, children| Node {
            children,
            ..n.clone()
        })
        .unwrap();
        assert_eq!(out[0].children.len(), 1);
        assert_eq!(out[1].children.len(), 1);
        assert!(tree_remove_first(&forest, |n| n.id == "z", |n| n.children.as_slice(), |n, c| Node {
            children: c,
            ..n.clone()
        })
        .is_none());
    }
}
