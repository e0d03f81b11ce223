//! Time-windowed aggregate counters.
//!
//! A [`ReactionGroup`] counts one reaction type on one entity and remembers the
//! first and last reaction times it has folded in. Push events can arrive late
//! or twice; the time guards turn those into no-ops instead of drift.
//!
//! Groups that reach zero are pruned from their map. The total is always
//! recomputed from the groups, never tracked separately.

use std::collections::BTreeMap;

use feedsync_types::ReactionGroup;

/// Grouped counts keyed by discriminator (reaction type).
pub type GroupMap = BTreeMap<String, ReactionGroup>;

/// Count one more reaction made at `at`.
///
/// Only reactions strictly newer than `first_reaction_at` count; anything
/// older is assumed already folded into the snapshot.
pub fn increment(group: &ReactionGroup, at: u64) -> ReactionGroup {
    if at > group.first_reaction_at {
        ReactionGroup {
            count: group.count.saturating_add(1),
            first_reaction_at: group.first_reaction_at,
            last_reaction_at: group.last_reaction_at.max(at),
        }
    } else {
        *group
    }
}

/// Count one reaction fewer.
///
/// The guard `at >= first || at <= last` is kept exactly as the server-side
/// contract states it, even though it holds for nearly every date once a
/// group spans more than one instant.
pub fn decrement(group: &ReactionGroup, at: u64) -> ReactionGroup {
    if at >= group.first_reaction_at || at <= group.last_reaction_at {
        ReactionGroup {
            count: group.count.saturating_sub(1),
            ..*group
        }
    } else {
        *group
    }
}

/// Add a reaction of `kind` at `at`, creating the group if absent.
pub fn add_to_groups(groups: &GroupMap, kind: &str, at: u64) -> GroupMap {
    let updated = match groups.get(kind) {
        Some(group) => increment(group, at),
        None => ReactionGroup::single(at),
    };
    let mut out = groups.clone();
    out.insert(kind.to_string(), updated);
    out
}

/// Remove a reaction of `kind` at `at`; prune the group when it hits zero.
/// An absent group leaves the map unchanged.
pub fn remove_from_groups(groups: &GroupMap, kind: &str, at: u64) -> GroupMap {
    let Some(group) = groups.get(kind) else {
        return groups.clone();
    };
    let updated = decrement(group, at);
    let mut out = groups.clone();
    if updated.count == 0 {
        out.remove(kind);
    } else {
        out.insert(kind.to_string(), updated);
    }
    out
}

/// Sum of all group counts.
pub fn total(groups: &GroupMap) -> u32 {
    groups.values().fold(0u32, |acc, g| acc.saturating_add(g.count))
}

/// Drop zero-count groups (snapshots from the server may carry them).
pub fn pruned(groups: &GroupMap) -> GroupMap {
    groups
        .iter()
        .filter(|(_, g)| g.count > 0)
        .map(|(k, g)| (k.clone(), *g))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn group(count: u32, first: u64, last: u64) -> ReactionGroup {
        ReactionGroup {
            count,
            first_reaction_at: first,
            last_reaction_at: last,
        }
    }

    #[test]
    fn test_increment_newer_counts() {
        let g = increment(&group(1, 10, 10), 20);
        assert_eq!(g, group(2, 10, 20));
    }

    #[test]
    fn test_increment_keeps_latest_last() {
        let g = increment(&group(3, 10, 50), 30);
        assert_eq!(g, group(4, 10, 50));
    }

    #[test]
    fn test_increment_stale_is_noop() {
        assert_eq!(increment(&group(1, 10, 10), 10), group(1, 10, 10));
        assert_eq!(increment(&group(1, 10, 10), 5), group(1, 10, 10));
    }

    #[test]
    fn test_decrement_never_negative() {
        assert_eq!(decrement(&group(0, 10, 10), 10).count, 0);
        assert_eq!(decrement(&group(2, 10, 20), 15).count, 1);
    }

    #[test]
    fn test_decrement_guard_boundaries() {
        // Pins the literal `at >= first || at <= last` guard.
        let g = group(2, 10, 20);
        assert_eq!(decrement(&g, 10).count, 1, "at == first");
        assert_eq!(decrement(&g, 20).count, 1, "at == last");
        assert_eq!(decrement(&g, 5).count, 1, "before first, still <= last");
        assert_eq!(decrement(&g, 25).count, 1, "after last, still >= first");
        // Only an inverted span can reject a date.
        let inverted = group(2, 20, 10);
        assert_eq!(decrement(&inverted, 15).count, 2);
    }

    #[test]
    fn test_add_then_remove_returns_to_baseline() {
        let empty = GroupMap::new();
        let added = add_to_groups(&empty, "like", 100);
        assert_eq!(added.get("like"), Some(&group(1, 100, 100)));
        assert_eq!(total(&added), 1);

        let removed = remove_from_groups(&added, "like", 100);
        assert!(removed.is_empty());
        assert_eq!(total(&removed), 0);
    }

    #[test]
    fn test_remove_missing_group_is_unchanged() {
        let groups = add_to_groups(&GroupMap::new(), "like", 1);
        assert_eq!(remove_from_groups(&groups, "love", 1), groups);
    }

    #[test]
    fn test_total_sums_groups() {
        let mut groups = GroupMap::new();
        groups.insert("like".into(), group(3, 1, 2));
        groups.insert("love".into(), group(2, 1, 2));
        assert_eq!(total(&groups), 5);
    }

    #[test]
    fn test_pruned_drops_zero_groups() {
        let mut groups = GroupMap::new();
        groups.insert("like".into(), group(0, 1, 2));
        groups.insert("love".into(), group(2, 1, 2));
        let out = pruned(&groups);
        assert_eq!(out.len(), 1);
        assert!(out.contains_key("love"));
    }
}
