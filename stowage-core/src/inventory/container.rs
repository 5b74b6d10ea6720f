//! Container trait for grid storage.

use stowage_utils::GridExtent;

use super::Entry;

/// A trait for objects that store entries on a grid.
///
/// This is the boundary the host implements for its live containers: chests,
/// ship holds, carts, etc. Resizing reads a snapshot through it and writes the
/// reconciled result back with a single [`Container::replace`] call.
pub trait Container: Send + Sync {
    /// Returns the current grid extent.
    fn extent(&self) -> GridExtent;

    /// Returns the stored entries.
    fn entries(&self) -> &[Entry];

    /// Swaps in a new extent and entry set in one step.
    fn replace(&mut self, extent: GridExtent, entries: Vec<Entry>);

    /// Called when the container contents change.
    fn set_changed(&mut self);

    /// Returns the number of slots in this container.
    fn size(&self) -> usize {
        self.extent().area()
    }

    /// Returns true if no real entries are stored.
    fn is_empty(&self) -> bool {
        self.entries().iter().all(Entry::is_empty)
    }

    /// Returns the total number of items stored.
    fn total_count(&self) -> i64 {
        self.entries()
            .iter()
            .filter(|entry| !entry.is_empty())
            .map(|entry| i64::from(entry.count))
            .sum()
    }
}
