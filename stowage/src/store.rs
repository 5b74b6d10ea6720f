use std::{
    io,
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};
use stowage_core::size_policy::{RuleSet, normalize_name};
use thiserror::Error;
use tokio::fs;
use tracing::Instrument;

use crate::{ContainerSnapshot, DroppedEntry, ResizeOutcome, WorldDropSink, resize_container};

const CONTAINERS_DIR: &str = "containers";
const DROPS_FILE: &str = "drops.json";

/// Failure to read or write the world directory.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem access failed.
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// A file holds malformed JSON.
    #[error("failed to parse {}: {source}", .path.display())]
    Json {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        source: serde_json::Error,
    },
}

impl StoreError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| Self::Io { path, source }
    }

    fn json(path: &Path) -> impl FnOnce(serde_json::Error) -> Self {
        let path = path.to_path_buf();
        move |source| Self::Json { path, source }
    }
}

/// A world directory: one JSON snapshot per container under `containers/`,
/// plus a `drops.json` of entries lying in the world.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Creates a store rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the directory holding container snapshots.
    #[must_use]
    pub fn containers_dir(&self) -> PathBuf {
        self.root.join(CONTAINERS_DIR)
    }

    /// Returns the path of the drops file.
    #[must_use]
    pub fn drops_path(&self) -> PathBuf {
        self.root.join(DROPS_FILE)
    }

    /// Lists container snapshot files in name order.
    pub async fn list(&self) -> Result<Vec<PathBuf>, StoreError> {
        let dir = self.containers_dir();
        let mut reader = fs::read_dir(&dir).await.map_err(StoreError::io(&dir))?;

        let mut paths = Vec::new();
        while let Some(entry) = reader.next_entry().await.map_err(StoreError::io(&dir))? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Reads one container snapshot.
    pub async fn load(&self, path: &Path) -> Result<ContainerSnapshot, StoreError> {
        read_json(path).await
    }

    /// Writes one container snapshot.
    pub async fn save(&self, path: &Path, snapshot: &ContainerSnapshot) -> Result<(), StoreError> {
        write_json(path, snapshot).await
    }

    /// Returns every drop recorded so far.
    pub async fn drops(&self) -> Result<Vec<DroppedEntry>, StoreError> {
        let path = self.drops_path();
        if !fs::try_exists(&path).await.map_err(StoreError::io(&path))? {
            return Ok(Vec::new());
        }
        read_json(&path).await
    }

    /// Appends drops to the drops file.
    pub async fn append_drops(&self, drops: Vec<DroppedEntry>) -> Result<(), StoreError> {
        if drops.is_empty() {
            return Ok(());
        }
        let mut all = self.drops().await?;
        all.extend(drops);
        write_json(&self.drops_path(), &all).await
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let bytes = fs::read(path).await.map_err(StoreError::io(path))?;
    serde_json::from_slice(&bytes).map_err(StoreError::json(path))
}

/// Writes through a sibling temp file and a rename so readers never see a partial file.
async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(value).map_err(StoreError::json(path))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(StoreError::io(parent))?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).await.map_err(StoreError::io(&tmp))?;
    fs::rename(&tmp, path).await.map_err(StoreError::io(path))
}

/// Totals for one pass over a world directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Snapshot files looked at.
    pub visited: usize,
    /// Containers whose extent changed.
    pub resized: usize,
    /// Containers left alone as ineligible.
    pub skipped: usize,
    /// Files that could not be read or written.
    pub failed: usize,
    /// Entries dropped into the world.
    pub dropped: usize,
}

/// Resizes every container in the store, one at a time.
///
/// A container that fails to load or save is logged and counted, and the pass
/// moves on. Only failing to list the directory aborts.
pub async fn run_pass(store: &DirectoryStore, rules: &RuleSet) -> Result<PassReport, StoreError> {
    let mut report = PassReport::default();
    let mut sink = WorldDropSink::new();

    for path in store.list().await? {
        report.visited += 1;
        let span = tracing::info_span!("container", path = %path.display());

        let result = resize_one(store, &path, rules, &mut sink)
            .instrument(span)
            .await;
        match result {
            Ok(None) => report.skipped += 1,
            Ok(Some(outcome)) => {
                if outcome.changed() {
                    report.resized += 1;
                }
                report.dropped += outcome.ejected.materialized;
            }
            Err(e) => {
                log::error!("{e}");
                report.failed += 1;
            }
        }
    }

    log::info!(
        "Resize pass done: {} containers, {} resized, {} skipped, {} failed, {} entries dropped",
        report.visited,
        report.resized,
        report.skipped,
        report.failed,
        report.dropped
    );
    Ok(report)
}

async fn resize_one(
    store: &DirectoryStore,
    path: &Path,
    rules: &RuleSet,
    sink: &mut WorldDropSink,
) -> Result<Option<ResizeOutcome>, StoreError> {
    let mut snapshot = store.load(path).await?;
    sink.set_container(&normalize_name(&snapshot.name));

    let Some(outcome) = resize_container(&mut snapshot, rules, sink) else {
        return Ok(None);
    };

    // Drops go out before the container is rewritten, a failure in between
    // duplicates entries instead of losing them.
    store.append_drops(sink.take_pending()).await?;
    if snapshot.contents.has_changed() {
        store.save(path, &snapshot).await?;
    }
    Ok(Some(outcome))
}

#[cfg(test)]
mod tests {
    use stowage_core::{
        inventory::{Container, Entry, SimpleContainer, StackKey},
        size_policy::{Category, CategoryRules, WOOD_CHEST},
    };
    use stowage_utils::{GridExtent, GridPos, WorldPos};

    use super::*;

    fn wood(count: i32, x: i32, y: i32) -> Entry {
        Entry::new(StackKey::named("Wood"), count, 50, GridPos::new(x, y))
    }

    fn chest(
        name: &str,
        creator: i64,
        extent: GridExtent,
        entries: Vec<Entry>,
    ) -> ContainerSnapshot {
        ContainerSnapshot {
            name: name.to_string(),
            creator,
            position: WorldPos::new(0.0, 30.0, 0.0),
            live: true,
            contents: SimpleContainer::new(extent, entries),
            saved: None,
        }
    }

    #[tokio::test]
    async fn test_pass_resizes_and_records_drops() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = DirectoryStore::new(dir.path());
        let containers = store.containers_dir();

        let shrinking = containers.join("a.json");
        store
            .save(
                &shrinking,
                &chest(
                    "piece_chest_wood(Clone)",
                    3,
                    GridExtent::new(5, 3),
                    vec![wood(5, 0, 0), wood(7, 4, 2)],
                ),
            )
            .await
            .expect("saved");
        let loot = containers.join("b.json");
        let untouched = chest("TreasureChest_swamp", 0, GridExtent::new(1, 1), vec![]);
        store.save(&loot, &untouched).await.expect("saved");
        fs::write(containers.join("c.json"), b"{ not json")
            .await
            .expect("written");

        let rules = RuleSet {
            chest: CategoryRules::builtin(Category::Chest).with_custom_lists(WOOD_CHEST, "1:1"),
            ..RuleSet::default()
        };
        let report = run_pass(&store, &rules).await.expect("pass");

        assert_eq!(
            report,
            PassReport {
                visited: 3,
                resized: 1,
                skipped: 1,
                failed: 1,
                dropped: 0,
            }
        );

        // Both stacks merge into the one remaining slot.
        let resized = store.load(&shrinking).await.expect("loaded");
        assert_eq!(resized.contents.extent(), GridExtent::new(1, 1));
        assert_eq!(resized.contents.entries(), [wood(12, 0, 0)]);
        assert!(store.drops().await.expect("drops").is_empty());
    }

    #[tokio::test]
    async fn test_overflow_is_appended_to_drops() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = DirectoryStore::new(dir.path());
        let path = store.containers_dir().join("cart.json");
        let cart = ContainerSnapshot {
            position: WorldPos::new(1.0, 2.0, 3.0),
            ..chest(
                "Cart",
                9,
                GridExtent::new(6, 3),
                vec![
                    Entry::new(StackKey::named("Sword"), 1, 1, GridPos::new(0, 0)),
                    Entry::new(StackKey::named("Shield"), 1, 1, GridPos::new(5, 2)),
                ],
            )
        };
        store.save(&path, &cart).await.expect("saved");

        let rules = RuleSet {
            vehicle: CategoryRules::builtin(Category::Vehicle).with_custom_lists("Cart", "1:1"),
            ..RuleSet::default()
        };
        run_pass(&store, &rules).await.expect("first pass");
        let report = run_pass(&store, &rules).await.expect("second pass");
        assert_eq!(report.resized, 0);

        let drops = store.drops().await.expect("drops");
        assert_eq!(drops.len(), 1);
        assert_eq!(drops[0].container, "Cart");
        assert_eq!(drops[0].entry.key.name, "Shield");
        assert_eq!(drops[0].position, WorldPos::new(1.0, 3.0, 3.0));
        let tmp = store.drops_path().with_extension("json.tmp");
        assert!(!fs::try_exists(&tmp).await.expect("checked"));
    }

    #[tokio::test]
    async fn test_missing_world_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = DirectoryStore::new(dir.path().join("nowhere"));
        assert!(matches!(
            run_pass(&store, &RuleSet::default()).await,
            Err(StoreError::Io { .. })
        ));
    }
}
