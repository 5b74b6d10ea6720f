//! Target container sizes from configured rules.
//!
//! Resolution starts from a container's current extent, then for every enabled
//! category applies the built-in catalog size and the first matching custom
//! override, and finally clamps both axes to at least one. Malformed rules are
//! reported and skipped; resolution itself never fails.

mod catalog;
mod naming;

pub use catalog::{
    BLACKMETAL_CHEST, BUILTIN, CART, Category, CatalogEntry, GridSize, IRON_CHEST, KARVE,
    LONGBOAT, PERSONAL_CHEST, WOOD_CHEST, in_category, lookup,
};
pub use naming::{is_eligible, normalize_name};

use rustc_hash::FxHashMap;
use stowage_utils::GridExtent;
use thiserror::Error;

/// A malformed size rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizeRuleError {
    /// The row half of a `"rows:cols"` value is not an integer.
    #[error(
        "Custom {category} container rows & columns value for {name} row is not a valid integer: {value:?}"
    )]
    InvalidRows {
        /// The category the rule belongs to.
        category: Category,
        /// The container name.
        name: String,
        /// The offending text.
        value: String,
    },
    /// The column half of a `"rows:cols"` value is missing or not an integer.
    #[error(
        "Custom {category} container rows & columns value for {name} column is not a valid integer: {value:?}"
    )]
    InvalidColumns {
        /// The category the rule belongs to.
        category: Category,
        /// The container name.
        name: String,
        /// The offending text.
        value: String,
    },
    /// The custom name list and size list have different lengths.
    #[error(
        "Custom {category} list and custom {category} container rows & columns length mismatch. Currently you have {names} names and {sizes} row/column sets respectively."
    )]
    LengthMismatch {
        /// The category the lists belong to.
        category: Category,
        /// Number of names.
        names: usize,
        /// Number of sizes.
        sizes: usize,
    },
}

/// The rules of one category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryRules {
    /// When off, nothing in this category is applied.
    pub enabled: bool,
    /// Exact name to size.
    pub catalog: FxHashMap<String, GridSize>,
    /// Custom container names, in declaration order.
    pub custom_names: Vec<String>,
    /// `"rows:cols"` values paired with `custom_names`.
    pub custom_sizes: Vec<String>,
}

impl CategoryRules {
    /// Creates enabled rules holding the category's built-in defaults.
    #[must_use]
    pub fn builtin(category: Category) -> Self {
        Self {
            enabled: true,
            catalog: in_category(category)
                .map(|entry| (entry.name.to_string(), entry.default_size))
                .collect(),
            custom_names: Vec::new(),
            custom_sizes: Vec::new(),
        }
    }

    /// Replaces the custom lists with the parsed comma separated strings.
    #[must_use]
    pub fn with_custom_lists(mut self, names: &str, sizes: &str) -> Self {
        self.custom_names = parse_list(names);
        self.custom_sizes = parse_list(sizes);
        self
    }

    /// Sets the size of a catalog entry.
    #[must_use]
    pub fn with_size(mut self, name: &str, size: GridSize) -> Self {
        self.catalog.insert(name.to_string(), size);
        self
    }

    /// Sets the toggle.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Every configured size rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    /// Chest rules.
    pub chest: CategoryRules,
    /// Ship and cart rules.
    pub vehicle: CategoryRules,
}

impl RuleSet {
    /// Returns the rules of one category.
    #[must_use]
    pub fn category(&self, category: Category) -> &CategoryRules {
        match category {
            Category::Chest => &self.chest,
            Category::Vehicle => &self.vehicle,
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            chest: CategoryRules::builtin(Category::Chest),
            vehicle: CategoryRules::builtin(Category::Vehicle),
        }
    }
}

/// Splits a comma separated config string, trimming each item.
///
/// A blank string is an empty list.
#[must_use]
pub fn parse_list(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(',').map(|item| item.trim().to_string()).collect()
}

/// Resolves the target extent for `name`, logging malformed rules.
#[must_use]
pub fn resolve(name: &str, current: GridExtent, rules: &RuleSet) -> GridExtent {
    resolve_with(name, current, rules, |e| log::error!("{e}"))
}

/// Resolves the target extent for `name`, handing malformed rules to `report`.
pub fn resolve_with<R>(
    name: &str,
    current: GridExtent,
    rules: &RuleSet,
    mut report: R,
) -> GridExtent
where
    R: FnMut(SizeRuleError),
{
    let mut rows = current.rows();
    let mut columns = current.columns();

    for category in Category::ALL {
        let category_rules = rules.category(category);
        if !category_rules.enabled {
            continue;
        }

        if let Some(size) = category_rules.catalog.get(name) {
            rows = size.rows;
            columns = size.columns;
        }

        let names = &category_rules.custom_names;
        let sizes = &category_rules.custom_sizes;
        if names.len() != sizes.len() {
            report(SizeRuleError::LengthMismatch {
                category,
                names: names.len(),
                sizes: sizes.len(),
            });
            continue;
        }

        if let Some(index) = names.iter().position(|custom| custom == name) {
            apply_custom(
                category,
                name,
                &sizes[index],
                &mut rows,
                &mut columns,
                &mut report,
            );
        }
    }

    GridExtent::new(columns, rows)
}

/// Applies one `"rows:cols"` value, leaving a half untouched when it fails to parse.
fn apply_custom<R>(
    category: Category,
    name: &str,
    value: &str,
    rows: &mut i32,
    columns: &mut i32,
    report: &mut R,
) where
    R: FnMut(SizeRuleError),
{
    let mut halves = value.split(':');
    let rows_text = halves.next().unwrap_or_default().trim();
    let columns_text = halves.next().map(str::trim);

    match rows_text.parse::<i32>() {
        Ok(parsed) => *rows = parsed,
        Err(_) => report(SizeRuleError::InvalidRows {
            category,
            name: name.to_string(),
            value: rows_text.to_string(),
        }),
    }

    match columns_text.map(str::parse::<i32>) {
        Some(Ok(parsed)) => *columns = parsed,
        _ => report(SizeRuleError::InvalidColumns {
            category,
            name: name.to_string(),
            value: columns_text.unwrap_or_default().to_string(),
        }),
    }
}
