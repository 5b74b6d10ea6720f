//! Handing entries that no longer fit over to the world.

use std::io;

use stowage_utils::WorldPos;
use thiserror::Error;

use super::Entry;

/// Why an ejected entry could not be materialized in the world.
#[derive(Debug, Error)]
pub enum EjectError {
    /// The host refused to spawn the entry.
    #[error("failed to materialize {name} x{count}: {reason}")]
    Rejected {
        /// The entry's item name.
        name: String,
        /// The entry's count.
        count: i32,
        /// What the host reported.
        reason: String,
    },
    /// Writing the dropped entry out failed.
    #[error("failed to record dropped entry: {0}")]
    Io(#[from] io::Error),
}

/// Receives entries removed from a container and places them in the world.
pub trait EjectSink {
    /// Materializes `entry` near `origin`, the position of the container it left.
    fn eject(&mut self, entry: Entry, origin: WorldPos) -> Result<(), EjectError>;
}

/// The result of [`eject_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EjectReport {
    /// Entries the sink accepted.
    pub materialized: usize,
    /// Entries the sink failed on. They are gone from the container regardless.
    pub failed: usize,
}

/// Hands every entry to `sink`, logging and skipping individual failures.
///
/// Failed entries are not retried.
pub fn eject_all<S>(sink: &mut S, entries: Vec<Entry>, origin: WorldPos) -> EjectReport
where
    S: EjectSink + ?Sized,
{
    let mut report = EjectReport::default();

    for entry in entries.into_iter().filter(|entry| !entry.is_empty()) {
        let name = entry.key.name.clone();
        let count = entry.count;
        match sink.eject(entry, origin) {
            Ok(()) => {
                log::info!("Ejected {name} x{count} at {origin}");
                report.materialized += 1;
            }
            Err(e) => {
                log::error!("Lost {name} x{count} while ejecting at {origin}: {e}");
                report.failed += 1;
            }
        }
    }

    report
}
