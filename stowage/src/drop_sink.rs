use std::mem;

use serde::{Deserialize, Serialize};
use stowage_core::inventory::{EjectError, EjectSink, Entry};
use stowage_utils::WorldPos;

/// Height above the container at which ejected entries are dropped.
const DROP_HEIGHT: f64 = 1.0;

/// An entry lying in the world after being ejected from a container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedEntry {
    /// Normalized name of the container it came from.
    pub container: String,
    /// Where it was dropped.
    pub position: WorldPos,
    /// The entry itself, with its last grid position.
    #[serde(flatten)]
    pub entry: Entry,
}

/// Collects ejected entries as world drops until the store writes them out.
#[derive(Debug, Default)]
pub struct WorldDropSink {
    container: String,
    pending: Vec<DroppedEntry>,
}

impl WorldDropSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the container subsequent drops are attributed to.
    pub fn set_container(&mut self, name: &str) {
        name.clone_into(&mut self.container);
    }

    /// Returns the drops collected so far.
    #[must_use]
    pub fn pending(&self) -> &[DroppedEntry] {
        &self.pending
    }

    /// Takes every collected drop, leaving the sink empty.
    pub fn take_pending(&mut self) -> Vec<DroppedEntry> {
        mem::take(&mut self.pending)
    }
}

impl EjectSink for WorldDropSink {
    fn eject(&mut self, entry: Entry, origin: WorldPos) -> Result<(), EjectError> {
        if entry.key.name.trim().is_empty() {
            return Err(EjectError::Rejected {
                name: entry.key.name,
                count: entry.count,
                reason: "entry has no item name".to_string(),
            });
        }

        self.pending.push(DroppedEntry {
            container: self.container.clone(),
            position: origin.up(DROP_HEIGHT),
            entry,
        });
        Ok(())
    }
}
