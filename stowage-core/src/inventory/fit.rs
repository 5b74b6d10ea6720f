//! Growing a target extent to cover saved contents.

use stowage_utils::{GridExtent, GridPos};

use super::Entry;

/// Raises `target` so every positive-count entry in `saved` is in bounds.
///
/// Never lowers either axis. Returns `target` unchanged when `saved` holds no
/// real entries.
///
/// An axis cannot grow past `i32::MAX`, so entries saved at column or row
/// `i32::MAX` (or at a negative position) stay out of bounds. They are logged
/// and left for reconciliation to relocate or eject.
#[must_use]
pub fn ensure_fits(target: GridExtent, saved: &[Entry]) -> GridExtent {
    let furthest = saved
        .iter()
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.pos)
        .reduce(|a, b| GridPos::new(a.x.max(b.x), a.y.max(b.y)));

    let Some(furthest) = furthest else {
        return target;
    };

    let required = GridExtent::new(furthest.x.saturating_add(1), furthest.y.saturating_add(1));
    let fitted = target.max(required);
    if fitted != target {
        log::info!("Raised target extent {target} to {fitted} to fit saved contents");
    }

    let unreachable = saved
        .iter()
        .filter(|entry| !entry.is_empty() && !fitted.contains(entry.pos))
        .count();
    if unreachable > 0 {
        log::warn!("{unreachable} saved entries lie outside any possible extent");
    }
    fitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{StackKey, reconcile, same_stack};

    fn at(x: i32, y: i32, count: i32) -> Entry {
        Entry::new(StackKey::named("Bronze"), count, 30, GridPos::new(x, y))
    }

    #[test]
    fn test_empty_saved_keeps_target() {
        let target = GridExtent::new(5, 2);
        assert_eq!(ensure_fits(target, &[]), target);
    }

    #[test]
    fn test_grows_to_cover_furthest_entry() {
        let target = GridExtent::new(3, 2);
        let saved = [at(0, 0, 1), at(6, 1, 2), at(1, 4, 3)];
        assert_eq!(ensure_fits(target, &saved), GridExtent::new(7, 5));
    }

    #[test]
    fn test_never_shrinks() {
        let target = GridExtent::new(8, 4);
        let saved = [at(1, 1, 1)];
        assert_eq!(ensure_fits(target, &saved), target);
    }

    #[test]
    fn test_ignores_empty_entries() {
        let target = GridExtent::new(2, 2);
        let saved = [at(9, 9, 0), at(12, 0, -1)];
        assert_eq!(ensure_fits(target, &saved), target);
    }

    #[test]
    fn test_raises_one_axis_only() {
        let target = GridExtent::new(8, 2);
        let saved = [at(3, 5, 1)];
        assert_eq!(ensure_fits(target, &saved), GridExtent::new(8, 6));
    }

    #[test]
    fn test_position_at_axis_limit_is_relocated() {
        let target = GridExtent::new(2, 2);
        let saved = [at(i32::MAX, 0, 4)];

        let fitted = ensure_fits(target, &saved);
        assert_eq!(fitted, GridExtent::new(i32::MAX, 2));
        assert!(!fitted.contains(saved[0].pos));

        let result = reconcile(saved.to_vec(), target, fitted, same_stack);
        assert!(result.ejected.is_empty());
        assert_eq!(result.placed, [at(0, 0, 4)]);
    }
}
