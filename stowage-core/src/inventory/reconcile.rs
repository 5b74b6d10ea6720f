//! Re-fitting container contents into a new grid extent.
//!
//! Reconciliation runs in four passes over a private snapshot:
//!
//! 1. classify every entry as retained (in bounds, first at its position) or displaced,
//! 2. pour displaced stacks into compatible retained stacks,
//! 3. move what is left into free slots in row-major order,
//! 4. report whatever still has no slot as ejected.
//!
//! Nothing here touches the live container; the caller swaps the result in.

use rustc_hash::FxHashSet;
use stowage_utils::GridExtent;

use super::{Entry, same_stack};

/// Counters describing what a reconciliation did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Entries that kept their position.
    pub retained: usize,
    /// Displaced entries moved to a free slot.
    pub relocated: usize,
    /// Displaced entries fully merged into retained stacks.
    pub absorbed: usize,
    /// Items moved between stacks by merging.
    pub merged_units: i64,
    /// Entries skipped because their count was not positive.
    pub dropped_empty: usize,
}

/// The outcome of a reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciled {
    /// Entries that remain in the container, all in bounds and on distinct positions.
    ///
    /// Retained entries come first in input order, followed by relocated ones.
    pub placed: Vec<Entry>,
    /// Entries that could not be kept, in the order they were found unplaceable.
    pub ejected: Vec<Entry>,
    /// What happened along the way.
    pub stats: ReconcileStats,
}

/// Re-fits container contents into new extents using a stacking predicate.
pub struct GridReconciler<F = fn(&Entry, &Entry) -> bool> {
    can_stack: F,
}

impl Default for GridReconciler {
    fn default() -> Self {
        Self {
            can_stack: same_stack,
        }
    }
}

impl<F> GridReconciler<F>
where
    F: Fn(&Entry, &Entry) -> bool,
{
    /// Creates a reconciler with a custom stacking predicate.
    ///
    /// `can_stack(retained, displaced)` decides whether `displaced` may be poured
    /// into `retained`.
    #[must_use]
    pub fn new(can_stack: F) -> Self {
        Self { can_stack }
    }

    /// Reconciles `entries` from `old_extent` to `new_extent`.
    #[must_use]
    pub fn reconcile(
        &self,
        entries: Vec<Entry>,
        old_extent: GridExtent,
        new_extent: GridExtent,
    ) -> Reconciled {
        reconcile(entries, old_extent, new_extent, &self.can_stack)
    }
}

/// Reconciles `entries` from `old_extent` to `new_extent`.
///
/// When both extents are equal the entries come back untouched, including any
/// empty ones; this keeps repeated no-op calls from re-merging stacks.
#[must_use]
pub fn reconcile<F>(
    entries: Vec<Entry>,
    old_extent: GridExtent,
    new_extent: GridExtent,
    can_stack: F,
) -> Reconciled
where
    F: Fn(&Entry, &Entry) -> bool,
{
    if old_extent == new_extent {
        let retained = entries.len();
        return Reconciled {
            placed: entries,
            ejected: Vec::new(),
            stats: ReconcileStats {
                retained,
                ..ReconcileStats::default()
            },
        };
    }

    let mut stats = ReconcileStats::default();
    // Occupancy is tracked per entry rather than per slot, extents can be huge.
    let mut occupied = FxHashSet::default();
    occupied.reserve(entries.len());
    let mut retained = Vec::with_capacity(entries.len());
    let mut displaced = Vec::new();

    for entry in entries {
        if entry.is_empty() {
            stats.dropped_empty += 1;
            continue;
        }

        match new_extent.slot_index(entry.pos) {
            Some(slot) if occupied.insert(slot) => retained.push(entry),
            _ => displaced.push(entry),
        }
    }
    stats.retained = retained.len();

    for entry in &mut displaced {
        stats.merged_units += absorb(&mut retained, entry, &can_stack);
        if entry.is_empty() {
            stats.absorbed += 1;
        }
    }

    let mut placed = retained;
    let mut ejected = Vec::new();
    let area = new_extent.area();
    let mut cursor = 0;

    for mut entry in displaced.into_iter().filter(|entry| !entry.is_empty()) {
        // Every slot before the cursor is taken, so the scan never has to restart.
        while cursor < area && occupied.contains(&cursor) {
            cursor += 1;
        }
        if cursor == area {
            ejected.push(entry);
            continue;
        }

        let slot = cursor;
        occupied.insert(slot);
        cursor += 1;
        log::debug!(
            "Relocating {} x{} from {} to {}",
            entry.key.name,
            entry.count,
            entry.pos,
            new_extent.pos_of(slot)
        );
        entry.pos = new_extent.pos_of(slot);
        stats.relocated += 1;
        placed.push(entry);
    }

    log::debug!(
        "Reconciled {old_extent} -> {new_extent}: {} kept, {} relocated, {} absorbed, {} ejected",
        stats.retained,
        stats.relocated,
        stats.absorbed,
        ejected.len()
    );

    Reconciled {
        placed,
        ejected,
        stats,
    }
}

/// Pours `displaced` into compatible retained stacks in order.
///
/// Returns the number of items moved.
fn absorb<F>(retained: &mut [Entry], displaced: &mut Entry, can_stack: &F) -> i64
where
    F: Fn(&Entry, &Entry) -> bool,
{
    let mut moved = 0;

    for target in retained.iter_mut() {
        if displaced.is_empty() {
            break;
        }
        if !target.is_stackable() || target.count >= target.max_stack_size {
            continue;
        }
        if !can_stack(target, displaced) {
            continue;
        }

        let amount = target.remaining_space().min(displaced.count);
        target.grow(amount);
        displaced.shrink(amount);
        moved += i64::from(amount);
    }

    moved
}

#[cfg(test)]
mod tests {
    use stowage_utils::GridPos;

    use super::*;
    use crate::{
        inventory::StackKey,
        size_policy::{Category, CategoryRules, RuleSet, resolve},
    };

    fn entry(name: &str, count: i32, max: i32, x: i32, y: i32) -> Entry {
        Entry::new(StackKey::named(name), count, max, GridPos::new(x, y))
    }

    fn total(entries: &[Entry]) -> i64 {
        entries.iter().map(|e| i64::from(e.count)).sum()
    }

    #[test]
    fn test_same_extent_is_untouched() {
        let entries = vec![
            entry("Wood", 3, 50, 0, 0),
            entry("Wood", 0, 50, 1, 0),
            entry("Wood", 4, 50, 0, 0),
        ];
        let extent = GridExtent::new(2, 2);

        let result = reconcile(entries.clone(), extent, extent, same_stack);

        assert_eq!(result.placed, entries);
        assert!(result.ejected.is_empty());
    }

    #[test]
    fn test_shrink_relocates_single_entry() {
        let result = reconcile(
            vec![entry("Amber", 1, 20, 3, 3)],
            GridExtent::new(4, 4),
            GridExtent::new(2, 2),
            same_stack,
        );

        assert!(result.ejected.is_empty());
        assert_eq!(result.placed.len(), 1);
        assert_eq!(result.placed[0].pos, GridPos::new(0, 0));
        assert_eq!(result.stats.relocated, 1);
    }

    #[test]
    fn test_shrink_full_grid_ejects_overflow() {
        let entries = vec![
            entry("SwordIron", 1, 1, 0, 0),
            entry("AxeBronze", 1, 1, 1, 0),
            entry("Hammer", 1, 1, 0, 1),
            entry("Hoe", 1, 1, 1, 1),
        ];

        let result = reconcile(
            entries,
            GridExtent::new(2, 2),
            GridExtent::new(1, 1),
            same_stack,
        );

        assert_eq!(result.placed.len(), 1);
        assert_eq!(result.placed[0].key.name, "SwordIron");
        let ejected: Vec<_> = result.ejected.iter().map(|e| e.key.name.as_str()).collect();
        assert_eq!(ejected, ["AxeBronze", "Hammer", "Hoe"]);
    }

    #[test]
    fn test_shrink_merges_into_compatible_stack() {
        let result = reconcile(
            vec![entry("Resin", 2, 10, 0, 0), entry("Resin", 3, 10, 1, 1)],
            GridExtent::new(2, 2),
            GridExtent::new(1, 1),
            same_stack,
        );

        assert_eq!(result.placed, vec![entry("Resin", 5, 10, 0, 0)]);
        assert!(result.ejected.is_empty());
        assert_eq!(result.stats.absorbed, 1);
        assert_eq!(result.stats.merged_units, 3);
    }

    #[test]
    fn test_partial_merge_spills_over_multiple_stacks() {
        let result = reconcile(
            vec![
                entry("Stone", 45, 50, 0, 0),
                entry("Stone", 48, 50, 1, 0),
                entry("Stone", 10, 50, 2, 0),
            ],
            GridExtent::new(3, 1),
            GridExtent::new(2, 1),
            same_stack,
        );

        // 5 into the first stack, 2 into the second, 3 left over with no slot.
        assert_eq!(result.placed[0].count, 50);
        assert_eq!(result.placed[1].count, 50);
        assert_eq!(result.ejected, vec![entry("Stone", 3, 50, 2, 0)]);
        assert_eq!(result.stats.merged_units, 7);
    }

    #[test]
    fn test_remainder_after_merge_takes_free_slot() {
        let result = reconcile(
            vec![entry("Stone", 45, 50, 0, 0), entry("Stone", 10, 50, 2, 0)],
            GridExtent::new(3, 1),
            GridExtent::new(2, 1),
            same_stack,
        );

        assert!(result.ejected.is_empty());
        assert_eq!(
            result.placed,
            vec![entry("Stone", 50, 50, 0, 0), entry("Stone", 5, 50, 1, 0)]
        );
    }

    #[test]
    fn test_displaced_does_not_merge_into_relocated() {
        // Both entries are displaced; the second must not be poured into the first
        // after the first was relocated.
        let result = reconcile(
            vec![entry("Coins", 5, 999, 4, 0), entry("Coins", 5, 999, 5, 0)],
            GridExtent::new(6, 1),
            GridExtent::new(2, 1),
            same_stack,
        );

        assert_eq!(result.placed.len(), 2);
        assert_eq!(result.placed[0].pos, GridPos::new(0, 0));
        assert_eq!(result.placed[1].pos, GridPos::new(1, 0));
        assert_eq!(result.stats.merged_units, 0);
    }

    #[test]
    fn test_duplicate_positions_keep_first() {
        let result = reconcile(
            vec![entry("Flint", 1, 1, 0, 0), entry("Bone", 1, 1, 0, 0)],
            GridExtent::new(2, 2),
            GridExtent::new(3, 3),
            same_stack,
        );

        assert_eq!(result.placed[0].key.name, "Flint");
        assert_eq!(result.placed[0].pos, GridPos::new(0, 0));
        assert_eq!(result.placed[1].key.name, "Bone");
        assert_eq!(result.placed[1].pos, GridPos::new(1, 0));
    }

    #[test]
    fn test_empty_entries_are_dropped() {
        let result = reconcile(
            vec![entry("Flint", 0, 10, 0, 0), entry("Flint", -2, 10, 1, 0)],
            GridExtent::new(2, 1),
            GridExtent::new(1, 1),
            same_stack,
        );

        assert!(result.placed.is_empty());
        assert!(result.ejected.is_empty());
        assert_eq!(result.stats.dropped_empty, 2);
    }

    #[test]
    fn test_placement_is_row_major() {
        let result = reconcile(
            vec![
                entry("A", 1, 1, 1, 0),
                entry("B", 1, 1, 9, 9),
                entry("C", 1, 1, 8, 8),
                entry("D", 1, 1, 7, 7),
            ],
            GridExtent::new(10, 10),
            GridExtent::new(2, 2),
            same_stack,
        );

        let positions: Vec<_> = result
            .placed
            .iter()
            .map(|e| (e.key.name.as_str(), e.pos))
            .collect();
        assert_eq!(
            positions,
            [
                ("A", GridPos::new(1, 0)),
                ("B", GridPos::new(0, 0)),
                ("C", GridPos::new(0, 1)),
                ("D", GridPos::new(1, 1)),
            ]
        );
    }

    #[test]
    fn test_predicate_is_respected() {
        let never = GridReconciler::new(|_: &Entry, _: &Entry| false);
        let result = never.reconcile(
            vec![entry("Resin", 2, 10, 0, 0), entry("Resin", 3, 10, 1, 1)],
            GridExtent::new(2, 2),
            GridExtent::new(1, 1),
        );

        assert_eq!(result.placed, vec![entry("Resin", 2, 10, 0, 0)]);
        assert_eq!(result.ejected, vec![entry("Resin", 3, 10, 1, 1)]);
    }

    #[test]
    fn test_unstackable_target_is_skipped_even_if_predicate_allows() {
        let always = GridReconciler::new(|_: &Entry, _: &Entry| true);
        let result = always.reconcile(
            vec![entry("Cape", 1, 1, 0, 0), entry("Cape", 1, 1, 1, 0)],
            GridExtent::new(2, 1),
            GridExtent::new(1, 1),
        );

        assert_eq!(result.placed.len(), 1);
        assert_eq!(result.ejected.len(), 1);
    }

    #[test]
    fn test_payload_survives_relocation() {
        let original = entry("Meat", 2, 20, 5, 5).with_payload(vec![7, 7, 7]);
        let result = GridReconciler::default().reconcile(
            vec![original],
            GridExtent::new(6, 6),
            GridExtent::new(1, 1),
        );

        assert_eq!(result.placed[0].payload, vec![7, 7, 7]);
    }

    #[test]
    fn test_huge_target_extent() {
        let rules = RuleSet {
            chest: CategoryRules::builtin(Category::Chest)
                .with_custom_lists("Foo", "2147483647:2147483647"),
            ..RuleSet::default()
        };
        let from = GridExtent::new(2, 2);
        let to = resolve("Foo", from, &rules);
        assert_eq!(to, GridExtent::new(i32::MAX, i32::MAX));

        let result = reconcile(
            vec![entry("Wood", 1, 50, 0, 0), entry("Wood", 1, 50, 1, 5)],
            from,
            to,
            same_stack,
        );

        assert!(result.ejected.is_empty());
        assert_eq!(result.placed[0].pos, GridPos::new(0, 0));
        assert_eq!(result.placed[1].pos, GridPos::new(1, 5));
        assert_eq!(result.stats.retained, 2);
    }

    #[test]
    fn test_units_are_conserved() {
        let entries = vec![
            entry("Wood", 30, 50, 0, 0),
            entry("Wood", 40, 50, 3, 3),
            entry("Stone", 10, 50, 2, 2),
            entry("Wood", 0, 50, 1, 1),
            entry("Stone", 49, 50, 1, 0),
        ];
        let before = total(&entries);

        let result = reconcile(
            entries,
            GridExtent::new(4, 4),
            GridExtent::new(1, 2),
            same_stack,
        );

        assert_eq!(total(&result.placed) + total(&result.ejected), before);
    }
}
