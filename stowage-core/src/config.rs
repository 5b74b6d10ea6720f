use std::{fs, io, ops::RangeInclusive, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::size_policy::{
    BLACKMETAL_CHEST, CART, Category, CategoryRules, GridSize, IRON_CHEST, KARVE, LONGBOAT,
    PERSONAL_CHEST, RuleSet, WOOD_CHEST, lookup,
};

const DEFAULT_CONFIG: &str = include_str!("../../package-content/stowage_config.json5");

/// Default location of the config file, relative to the working directory.
pub const CONFIG_PATH: &str = "config/stowage_config.json5";

/// Failure to load the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("config file io failed: {0}")]
    Io(#[from] io::Error),
    /// The file is not valid json5 for this config.
    #[error("config file is malformed: {0}")]
    Parse(#[from] serde_json5::Error),
}

/// An on/off switch as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Toggle {
    /// Enabled.
    On,
    /// Disabled.
    Off,
}

impl Toggle {
    /// Returns whether the switch is on.
    #[must_use]
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

/// User facing container size settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct StowageConfig {
    pub chest_control: Toggle,
    pub ship_control: Toggle,
    pub personal_chest: GridSize,
    pub wood_chest: GridSize,
    pub iron_chest: GridSize,
    pub blackmetal_chest: GridSize,
    pub custom_chest_list: String,
    pub custom_chest_sizes: String,
    pub karve: GridSize,
    pub longboat: GridSize,
    pub custom_ship_list: String,
    pub custom_ship_sizes: String,
    pub cart: GridSize,
}

impl StowageConfig {
    /// Reads the config at `path`, writing the default file there first if it is missing.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let config = Self::from_json5(&fs::read_to_string(path)?)?;
            log::info!("Loaded config from {}", path.display());
            return Ok(config);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_CONFIG)?;
        log::info!("Wrote default config to {}", path.display());
        Ok(Self::default())
    }

    /// Parses a json5 document, clamping sizes into their supported ranges.
    pub fn from_json5(source: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json5::from_str(source)?;
        config.clamp_sizes();
        Ok(config)
    }

    /// Clamps every fixed container size into the range it supports.
    ///
    /// Returns how many values had to be adjusted.
    pub fn clamp_sizes(&mut self) -> usize {
        let mut adjusted = 0;
        for (name, size) in self.sizes_mut() {
            let Some(entry) = lookup(name) else {
                continue;
            };
            adjusted += usize::from(clamp_axis(name, "rows", &mut size.rows, &entry.rows));
            adjusted += usize::from(clamp_axis(name, "columns", &mut size.columns, &entry.columns));
        }
        adjusted
    }

    /// Converts the settings into resolution rules.
    #[must_use]
    pub fn rule_set(&self) -> RuleSet {
        let mut chest = CategoryRules::builtin(Category::Chest)
            .enabled(self.chest_control.is_on())
            .with_custom_lists(&self.custom_chest_list, &self.custom_chest_sizes);
        let mut vehicle = CategoryRules::builtin(Category::Vehicle)
            .enabled(self.ship_control.is_on())
            .with_custom_lists(&self.custom_ship_list, &self.custom_ship_sizes);

        for (name, size) in self.sizes() {
            match lookup(name).map(|entry| entry.category) {
                Some(Category::Chest) => chest = chest.with_size(name, size),
                Some(Category::Vehicle) => vehicle = vehicle.with_size(name, size),
                None => {}
            }
        }

        RuleSet { chest, vehicle }
    }

    fn sizes(&self) -> [(&'static str, GridSize); 7] {
        [
            (PERSONAL_CHEST, self.personal_chest),
            (WOOD_CHEST, self.wood_chest),
            (IRON_CHEST, self.iron_chest),
            (BLACKMETAL_CHEST, self.blackmetal_chest),
            (KARVE, self.karve),
            (LONGBOAT, self.longboat),
            (CART, self.cart),
        ]
    }

    fn sizes_mut(&mut self) -> [(&'static str, &mut GridSize); 7] {
        [
            (PERSONAL_CHEST, &mut self.personal_chest),
            (WOOD_CHEST, &mut self.wood_chest),
            (IRON_CHEST, &mut self.iron_chest),
            (BLACKMETAL_CHEST, &mut self.blackmetal_chest),
            (KARVE, &mut self.karve),
            (LONGBOAT, &mut self.longboat),
            (CART, &mut self.cart),
        ]
    }
}

fn clamp_axis(name: &str, axis: &str, value: &mut i32, range: &RangeInclusive<i32>) -> bool {
    let clamped = (*value).clamp(*range.start(), *range.end());
    if clamped == *value {
        return false;
    }

    log::warn!(
        "{name} {axis} {value} is outside {}..={}, using {clamped}",
        range.start(),
        range.end()
    );
    *value = clamped;
    true
}

impl Default for StowageConfig {
    fn default() -> Self {
        Self {
            chest_control: Toggle::On,
            ship_control: Toggle::On,
            personal_chest: GridSize::new(2, 3),
            wood_chest: GridSize::new(2, 5),
            iron_chest: GridSize::new(4, 6),
            blackmetal_chest: GridSize::new(4, 8),
            custom_chest_list: String::new(),
            custom_chest_sizes: String::new(),
            karve: GridSize::new(2, 2),
            longboat: GridSize::new(3, 6),
            custom_ship_list: String::new(),
            custom_ship_sizes: String::new(),
            cart: GridSize::new(3, 6),
        }
    }
}
