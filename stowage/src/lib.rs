//! # Stowage
//!
//! Host driver for container resizing. Reads container snapshots from a world
//! directory, re-fits each to its configured size and writes it back, dropping
//! whatever no longer fits next to the container.

use base64::{Engine, prelude::BASE64_STANDARD};
use serde::{Deserialize, Serialize};
use stowage_core::{
    inventory::{
        Container, EjectReport, EjectSink, Entry, GridReconciler, ReconcileStats, Reconciled,
        SimpleContainer, eject_all, ensure_fits,
    },
    saved_state,
    size_policy::{RuleSet, is_eligible, normalize_name, resolve},
};
use stowage_utils::{GridExtent, WorldPos};

/// Dropping ejected entries into the world.
pub mod drop_sink;
/// World directory access.
pub mod store;

pub use drop_sink::{DroppedEntry, WorldDropSink};
pub use store::{DirectoryStore, PassReport, StoreError, run_pass};

/// One container as stored in the world directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSnapshot {
    /// Object name as the host reports it, decoration included.
    pub name: String,
    /// Id of the player who built it, 0 for world-generated containers.
    #[serde(default)]
    pub creator: i64,
    /// Where the container stands.
    #[serde(default)]
    pub position: WorldPos,
    /// Whether the host has the contents loaded. When it does not, the saved
    /// blob may hold entries past the current extent.
    #[serde(default = "default_live")]
    pub live: bool,
    /// Current extent and entries.
    #[serde(flatten)]
    pub contents: SimpleContainer,
    /// Base64 encoded saved-state blob.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved: Option<String>,
}

const fn default_live() -> bool {
    true
}

impl ContainerSnapshot {
    /// Decodes the saved blob. Any failure is logged and yields no entries.
    fn saved_entries(&self, name: &str) -> Vec<Entry> {
        let Some(blob) = self.saved.as_deref() else {
            return Vec::new();
        };
        match BASE64_STANDARD.decode(blob) {
            Ok(bytes) => saved_state::entries_or_empty(name, &bytes),
            Err(e) => {
                log::error!("Saved contents of {name} are not base64, treating them as empty: {e}");
                Vec::new()
            }
        }
    }
}

/// What resizing one container did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeOutcome {
    /// Normalized container name.
    pub name: String,
    /// Extent before the resize.
    pub from: GridExtent,
    /// Extent after the resize.
    pub to: GridExtent,
    /// Reconciliation counters.
    pub stats: ReconcileStats,
    /// What happened to the ejected entries.
    pub ejected: EjectReport,
}

impl ResizeOutcome {
    /// Returns whether the container needs to be written back.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Re-fits one container to the size its rules give it.
///
/// Returns `None` for containers that are never resized. Entries that fit
/// nowhere are handed to `sink`, dropped at the container's position.
pub fn resize_container<S>(
    snapshot: &mut ContainerSnapshot,
    rules: &RuleSet,
    sink: &mut S,
) -> Option<ResizeOutcome>
where
    S: EjectSink + ?Sized,
{
    let name = normalize_name(&snapshot.name);
    if !is_eligible(&name, snapshot.creator) {
        log::debug!("Skipping {name}, not eligible for resizing");
        return None;
    }

    let from = snapshot.contents.extent();
    let mut to = resolve(&name, from, rules);
    if !snapshot.live {
        to = ensure_fits(to, &snapshot.saved_entries(&name));
    }

    let entries = snapshot.contents.entries().to_vec();
    let Reconciled {
        placed,
        ejected,
        stats,
    } = GridReconciler::default().reconcile(entries, from, to);

    let ejected = eject_all(sink, ejected, snapshot.position);
    if from != to {
        snapshot.contents.replace(to, placed);
        log::info!(
            "Resized {name} from {from} to {to}: {} kept, {} moved, {} merged, {} ejected",
            stats.retained,
            stats.relocated,
            stats.absorbed,
            ejected.materialized + ejected.failed
        );
    }

    Some(ResizeOutcome {
        name,
        from,
        to,
        stats,
        ejected,
    })
}
