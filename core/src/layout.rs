use glam::Vec2;

use crate::{CellCoord, MapModel};

/// Distance between neighbouring cell centers in world units.
pub const CELL_SPACING: f32 = 0.4;

/// Number of cells along each side of the placeholder grid.
pub const PLACEHOLDER_SPAN: u32 = 10;

/// Placement rule shared by geometry construction and tap resolution.
///
/// A grid spanning `N` cells is centered on the origin: cell `(x, y)` sits at
/// `(-extent + (x + 0.5) * S, extent - (y + 0.5) * S)` with
/// `extent = N * S / 2`. Rows grow downwards in screen terms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    span: u32,
    spacing: f32,
}

impl GridLayout {
    /// Creates a layout covering `span` cells per side.
    #[must_use]
    pub const fn new(span: u32, spacing: f32) -> Self {
        Self { span, spacing }
    }

    /// Layout used for the provided map; the span is its larger dimension.
    #[must_use]
    pub fn for_map(map: &MapModel) -> Self {
        Self::new(map.width().max(map.height()), CELL_SPACING)
    }

    /// Layout of the placeholder grid drawn before any map is loaded.
    #[must_use]
    pub const fn placeholder() -> Self {
        Self::new(PLACEHOLDER_SPAN, CELL_SPACING)
    }

    /// Number of cells along each side.
    #[must_use]
    pub const fn span(&self) -> u32 {
        self.span
    }

    /// Distance between neighbouring cell centers.
    #[must_use]
    pub const fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Half of the total side length.
    #[must_use]
    pub fn extent(&self) -> f32 {
        self.span as f32 * self.spacing * 0.5
    }

    /// Center of the provided cell in map-local coordinates.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        let extent = self.extent();
        Vec2::new(
            -extent + (cell.column() as f32 + 0.5) * self.spacing,
            extent - (cell.row() as f32 + 0.5) * self.spacing,
        )
    }

    /// Fractional grid coordinates of a map-local point.
    ///
    /// Integral results coincide with cell centers.
    #[must_use]
    pub fn fractional_cell(&self, local: Vec2) -> Vec2 {
        let extent = self.extent();
        Vec2::new(
            (local.x + extent) / self.spacing - 0.5,
            (extent - local.y) / self.spacing - 0.5,
        )
    }

    /// Nearest cell to a map-local point, rounding each axis half away from zero.
    ///
    /// The result is signed because points left of or above the grid resolve to
    /// negative indices; callers bounds-check against their map.
    #[must_use]
    pub fn nearest_cell(&self, local: Vec2) -> (i64, i64) {
        let fractional = self.fractional_cell(local);
        (fractional.x.round() as i64, fractional.y.round() as i64)
    }

    /// Resolves a map-local point to a cell inside `map`, if any.
    #[must_use]
    pub fn cell_at(&self, map: &MapModel, local: Vec2) -> Option<CellCoord> {
        let (column, row) = self.nearest_cell(local);
        if column < 0 || row < 0 {
            return None;
        }
        let cell = CellCoord::new(u32::try_from(column).ok()?, u32::try_from(row).ok()?);
        map.contains(cell).then_some(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_extent_spans_projection_height() {
        let layout = GridLayout::placeholder();

        assert!((layout.extent() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn first_cell_sits_in_top_left_corner() {
        let layout = GridLayout::placeholder();
        let center = layout.cell_center(CellCoord::new(0, 0));

        assert!((center.x - -1.8).abs() < 1e-6);
        assert!((center.y - 1.8).abs() < 1e-6);
    }

    #[test]
    fn nearest_cell_breaks_interior_ties_towards_higher_index() {
        let layout = GridLayout::new(4, 1.0);
        // Boundary between columns 1 and 2, and between rows 1 and 2.
        let (column, row) = layout.nearest_cell(Vec2::new(0.0, 0.0));

        assert_eq!((column, row), (2, 2));
    }

    #[test]
    fn outer_edges_resolve_outside_the_grid() {
        let layout = GridLayout::new(4, 1.0);

        assert_eq!(layout.nearest_cell(Vec2::new(-2.0, 2.0)), (-1, -1));
        assert_eq!(layout.nearest_cell(Vec2::new(2.0, -2.0)), (4, 4));
    }
}
