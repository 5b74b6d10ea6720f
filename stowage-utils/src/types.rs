// Wrapper types making it harder to accidentaly mix up columns, rows and slot indices.

use std::fmt::{self, Display};

use serde::{Deserialize, Deserializer, Serialize};

/// A position inside a container grid, `x` is the column and `y` the row.
///
/// Coordinates are signed so that malformed host data can still be represented;
/// anything negative is simply out of bounds for every extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(Serialize, Deserialize)]
pub struct GridPos {
    /// The column.
    pub x: i32,
    /// The row.
    pub y: i32,
}

impl GridPos {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The (columns, rows) capacity of a container grid.
///
/// Both axes are clamped to at least one on construction, so a container never
/// has zero capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GridExtent {
    columns: i32,
    rows: i32,
}

impl GridExtent {
    /// Creates a new extent, clamping both axes to a minimum of 1.
    #[must_use]
    pub const fn new(columns: i32, rows: i32) -> Self {
        Self {
            columns: if columns < 1 { 1 } else { columns },
            rows: if rows < 1 { 1 } else { rows },
        }
    }

    /// Returns the number of columns.
    #[must_use]
    pub const fn columns(self) -> i32 {
        self.columns
    }

    /// Returns the number of rows.
    #[must_use]
    pub const fn rows(self) -> i32 {
        self.rows
    }

    /// Returns the number of slots in the grid.
    #[must_use]
    pub const fn area(self) -> usize {
        (self.columns as usize).saturating_mul(self.rows as usize)
    }

    /// Returns whether `pos` lies inside this extent.
    #[must_use]
    pub const fn contains(self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.x < self.columns && pos.y >= 0 && pos.y < self.rows
    }

    /// Returns the row-major slot index of `pos`, or `None` if it is out of bounds.
    #[must_use]
    pub const fn slot_index(self, pos: GridPos) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.y as usize * self.columns as usize + pos.x as usize)
        } else {
            None
        }
    }

    /// Returns the position of a row-major slot index.
    #[must_use]
    pub const fn pos_of(self, index: usize) -> GridPos {
        let columns = self.columns as usize;
        GridPos::new((index % columns) as i32, (index / columns) as i32)
    }

    /// Returns an extent at least as large as both `self` and `other` on each axis.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(
            self.columns.max(other.columns),
            self.rows.max(other.rows),
        )
    }
}

impl Default for GridExtent {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl Display for GridExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.columns, self.rows)
    }
}

// Snapshots written by hand may carry zero or negative sizes, route them through the clamp.
impl<'de> Deserialize<'de> for GridExtent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            columns: i32,
            rows: i32,
        }

        let raw = Raw::deserialize(deserializer)?;
        Ok(Self::new(raw.columns, raw.rows))
    }
}

/// A position in the host world, used for where ejected entries land.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPos {
    /// East/west.
    pub x: f64,
    /// Height.
    pub y: f64,
    /// North/south.
    pub z: f64,
}

impl WorldPos {
    /// Creates a new world position.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Returns this position moved by `dy` on the vertical axis.
    #[must_use]
    pub fn up(self, dy: f64) -> Self {
        Self::new(self.x, self.y + dy, self.z)
    }
}

impl Display for WorldPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}
