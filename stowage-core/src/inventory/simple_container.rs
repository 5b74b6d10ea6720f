//! A simple container implementation backed by a Vec.

use serde::{Deserialize, Serialize};
use stowage_utils::GridExtent;

use super::{Container, Entry};

/// A plain extent plus entry list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleContainer {
    extent: GridExtent,
    entries: Vec<Entry>,
    #[serde(skip)]
    changed: bool,
}

impl SimpleContainer {
    /// Creates a container with the given extent and contents.
    #[must_use]
    pub fn new(extent: GridExtent, entries: Vec<Entry>) -> Self {
        Self {
            extent,
            entries,
            changed: false,
        }
    }

    /// Returns whether the container has been modified since the last check.
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.changed
    }

    /// Clears the changed flag.
    pub fn clear_changed(&mut self) {
        self.changed = false;
    }
}

impl Container for SimpleContainer {
    fn extent(&self) -> GridExtent {
        self.extent
    }

    fn entries(&self) -> &[Entry] {
        &self.entries
    }

    fn replace(&mut self, extent: GridExtent, entries: Vec<Entry>) {
        self.extent = extent;
        self.entries = entries;
        self.set_changed();
    }

    fn set_changed(&mut self) {
        self.changed = true;
    }
}
