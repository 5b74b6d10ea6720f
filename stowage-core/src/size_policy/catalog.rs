//! Built-in container names with their default sizes and accepted ranges.

use std::{
    fmt::{self, Display},
    ops::RangeInclusive,
};

use serde::{Deserialize, Serialize};

/// A rule group with its own on/off switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Placed chests.
    Chest,
    /// Ship holds and carts.
    Vehicle,
}

impl Category {
    /// Every category, in the order rules are applied.
    pub const ALL: [Self; 2] = [Self::Chest, Self::Vehicle];

    /// Returns the name used in diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Chest => "chest",
            Self::Vehicle => "ship",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A configured (rows, columns) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
pub struct GridSize {
    /// Number of rows.
    pub rows: i32,
    /// Number of columns.
    pub columns: i32,
}

impl GridSize {
    /// Creates a new size.
    #[must_use]
    pub const fn new(rows: i32, columns: i32) -> Self {
        Self { rows, columns }
    }
}

/// A built-in container the catalog knows by name.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// Exact container name.
    pub name: &'static str,
    /// Which toggle governs it.
    pub category: Category,
    /// Size used when nothing is configured.
    pub default_size: GridSize,
    /// Accepted row values.
    pub rows: RangeInclusive<i32>,
    /// Accepted column values.
    pub columns: RangeInclusive<i32>,
}

/// Personal chest.
pub const PERSONAL_CHEST: &str = "piece_chest_private";
/// Wood chest.
pub const WOOD_CHEST: &str = "piece_chest_wood";
/// Reinforced (iron) chest.
pub const IRON_CHEST: &str = "piece_chest";
/// Blackmetal chest.
pub const BLACKMETAL_CHEST: &str = "piece_chest_blackmetal";
/// Karve.
pub const KARVE: &str = "Karve";
/// Longboat.
pub const LONGBOAT: &str = "VikingShip";
/// Cart.
pub const CART: &str = "Cart";

/// All built-in containers.
pub static BUILTIN: [CatalogEntry; 7] = [
    CatalogEntry {
        name: PERSONAL_CHEST,
        category: Category::Chest,
        default_size: GridSize::new(2, 3),
        rows: 2..=20,
        columns: 3..=8,
    },
    CatalogEntry {
        name: WOOD_CHEST,
        category: Category::Chest,
        default_size: GridSize::new(2, 5),
        rows: 2..=10,
        columns: 5..=8,
    },
    CatalogEntry {
        name: IRON_CHEST,
        category: Category::Chest,
        default_size: GridSize::new(4, 6),
        rows: 4..=20,
        columns: 6..=8,
    },
    CatalogEntry {
        name: BLACKMETAL_CHEST,
        category: Category::Chest,
        default_size: GridSize::new(4, 8),
        rows: 3..=20,
        columns: 6..=8,
    },
    CatalogEntry {
        name: KARVE,
        category: Category::Vehicle,
        default_size: GridSize::new(2, 2),
        rows: 2..=30,
        columns: 2..=8,
    },
    CatalogEntry {
        name: LONGBOAT,
        category: Category::Vehicle,
        default_size: GridSize::new(3, 6),
        rows: 3..=30,
        columns: 6..=8,
    },
    CatalogEntry {
        name: CART,
        category: Category::Vehicle,
        default_size: GridSize::new(3, 6),
        rows: 3..=30,
        columns: 6..=8,
    },
];

/// Looks up a built-in container by exact name.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static CatalogEntry> {
    BUILTIN.iter().find(|entry| entry.name == name)
}

/// Returns the built-in containers of one category.
pub fn in_category(category: Category) -> impl Iterator<Item = &'static CatalogEntry> {
    BUILTIN
        .iter()
        .filter(move |entry| entry.category == category)
}
