//! Runs one resize pass over a world directory, `world` unless given as the
//! first argument.

use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, anyhow};
use stowage::{DirectoryStore, run_pass};
use stowage_core::config::{CONFIG_PATH, StowageConfig};
use stowage_utils::logger;
use tokio::{select, signal};

const DEFAULT_WORLD: &str = "world";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init(logger::DEFAULT_FILTER).map_err(|e| anyhow!("failed to set up logging: {e}"))?;

    let world = env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_WORLD), PathBuf::from);

    let config = StowageConfig::load_or_create(Path::new(CONFIG_PATH))
        .with_context(|| format!("failed to load {CONFIG_PATH}"))?;
    let rules = config.rule_set();
    let store = DirectoryStore::new(&world);

    log::info!("Resizing containers in {}", world.display());

    select! {
        report = run_pass(&store, &rules) => {
            report.with_context(|| format!("failed to read world at {}", world.display()))?;
        }
        _ = signal::ctrl_c() => {
            log::warn!("Interrupted, resize pass cancelled");
        }
    }

    Ok(())
}
