use thiserror::Error;

use crate::CellCoord;

/// Largest number of cells a map may hold.
///
/// Every cell contributes four vertices to a 16-bit indexed buffer, so the
/// total vertex count of any geometry partition must stay addressable by `u16`.
pub const MAX_MAP_CELLS: usize = (u16::MAX as usize + 1) / 4;

/// Built-in 10x10 map used whenever downloaded data is unavailable.
pub const FALLBACK_MAP_ROWS: [&str; 10] = [
    "xx x     x",
    "    o     ",
    "  1    o  ",
    "     2    ",
    "o     3   ",
    "   o    o ",
    " 2      1 ",
    "      o   ",
    "  3       ",
    "o   oo   o",
];

/// Symbol stored in a single map cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Marker {
    /// Nothing occupies the cell. Unrecognised symbols also map here.
    #[default]
    Empty,
    /// A selectable tank drawn with the sprite texture.
    Tank,
    /// A static object drawn as a filled quad.
    Object,
    /// Numbered marker `1`.
    Digit1,
    /// Numbered marker `2`.
    Digit2,
    /// Numbered marker `3`.
    Digit3,
}

impl Marker {
    /// Decodes a marker from its map symbol.
    #[must_use]
    pub const fn from_symbol(symbol: char) -> Self {
        match symbol {
            'x' => Self::Tank,
            'o' => Self::Object,
            '1' => Self::Digit1,
            '2' => Self::Digit2,
            '3' => Self::Digit3,
            _ => Self::Empty,
        }
    }

    /// Returns `true` for the selectable tank marker.
    #[must_use]
    pub const fn is_tank(self) -> bool {
        matches!(self, Self::Tank)
    }
}

/// Errors raised while ingesting map payloads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MapError {
    /// The payload contained no cells.
    #[error("map payload contains no cells")]
    Empty,
    /// Declared dimensions disagree with the number of cells provided.
    #[error("map of {width}x{height} requires {expected} cells but {actual} were provided")]
    DimensionMismatch {
        /// Declared number of columns.
        width: u32,
        /// Declared number of rows.
        height: u32,
        /// Number of cells implied by the dimensions.
        expected: usize,
        /// Number of cells actually provided.
        actual: usize,
    },
    /// The map holds more cells than 16-bit geometry can address.
    #[error("map of {cells} cells exceeds the limit of {limit} cells")]
    TooLarge {
        /// Number of cells in the rejected map.
        cells: usize,
        /// Largest supported number of cells.
        limit: usize,
    },
}

/// Grid dimensions plus one marker per cell, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapModel {
    width: u32,
    height: u32,
    cells: Vec<Marker>,
}

impl MapModel {
    /// Creates a map after validating that the cell count matches the dimensions.
    pub fn new(width: u32, height: u32, cells: Vec<Marker>) -> Result<Self, MapError> {
        if width == 0 || height == 0 {
            return Err(MapError::Empty);
        }

        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(MapError::DimensionMismatch {
                width,
                height,
                expected,
                actual: cells.len(),
            });
        }

        if expected > MAX_MAP_CELLS {
            return Err(MapError::TooLarge {
                cells: expected,
                limit: MAX_MAP_CELLS,
            });
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Builds a map from textual rows, padding short rows with empty cells.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, MapError> {
        let decoded: Vec<Vec<Marker>> = rows
            .iter()
            .map(|row| row.as_ref().chars().map(Marker::from_symbol).collect())
            .collect();
        Self::from_grid(decoded)
    }

    /// Parses the comma-separated map format served by the map endpoint.
    ///
    /// Each cell is trimmed and only its first character is kept; blank cells
    /// become [`Marker::Empty`] and blank lines are skipped.
    pub fn parse_csv(payload: &str) -> Result<Self, MapError> {
        let grid: Vec<Vec<Marker>> = payload
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                line.split(',')
                    .map(|cell| {
                        cell.trim()
                            .chars()
                            .next()
                            .map_or(Marker::Empty, Marker::from_symbol)
                    })
                    .collect()
            })
            .collect();
        Self::from_grid(grid)
    }

    /// Returns the built-in fallback map.
    #[must_use]
    pub fn fallback() -> Self {
        let cells = FALLBACK_MAP_ROWS
            .iter()
            .flat_map(|row| row.chars().map(Marker::from_symbol))
            .collect();
        Self {
            width: 10,
            height: 10,
            cells,
        }
    }

    fn from_grid(mut grid: Vec<Vec<Marker>>) -> Result<Self, MapError> {
        let width = grid.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut grid {
            row.resize(width, Marker::Empty);
        }

        let height = grid.len();
        let cells: Vec<Marker> = grid.into_iter().flatten().collect();
        if cells.is_empty() {
            return Err(MapError::Empty);
        }
        if cells.len() > MAX_MAP_CELLS {
            return Err(MapError::TooLarge {
                cells: cells.len(),
                limit: MAX_MAP_CELLS,
            });
        }

        Self::new(width as u32, height as u32, cells)
    }

    /// Number of columns in the map.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the map.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Row-major slice of every cell marker.
    #[must_use]
    pub fn cells(&self) -> &[Marker] {
        &self.cells
    }

    /// Returns `true` when the provided cell lies within the map bounds.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    /// Marker stored at the provided cell, or `None` when out of bounds.
    #[must_use]
    pub fn marker_at(&self, cell: CellCoord) -> Option<Marker> {
        if !self.contains(cell) {
            return None;
        }
        let index = cell.row() as usize * self.width as usize + cell.column() as usize;
        self.cells.get(index).copied()
    }

    /// Iterates over every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Marker)> + '_ {
        let width = self.width;
        self.cells.iter().enumerate().map(move |(index, marker)| {
            let index = index as u32;
            (CellCoord::new(index % width, index / width), *marker)
        })
    }

    /// Number of cells holding the provided marker.
    #[must_use]
    pub fn count(&self, marker: Marker) -> usize {
        self.cells.iter().filter(|cell| **cell == marker).count()
    }
}
