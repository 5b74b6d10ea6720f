//! Container names as the host reports them.

/// Marker the host appends to instantiated objects.
const CLONE_MARKER: &str = "(Clone)";

/// Prefix of world-generated loot containers, which are never resized.
const TREASURE_PREFIX: &str = "Treasure";

/// Strips host decoration from an object name so it can be matched against rules.
#[must_use]
pub fn normalize_name(raw: &str) -> String {
    raw.trim().replace(CLONE_MARKER, "").trim().to_string()
}

/// Returns whether a container may be resized.
///
/// Loot containers and anything without a creator (not built by a player) are
/// left alone.
#[must_use]
pub fn is_eligible(name: &str, creator: i64) -> bool {
    !name.starts_with(TREASURE_PREFIX) && creator != 0
}
