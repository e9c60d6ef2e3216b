//! Conversion of maps into drawable vertex and index buffers.

use glam::Vec2;
use scroller_core::{CellCoord, Event, GridLayout, MapModel, Marker, CELL_SPACING};

use crate::{
    Color, ColoredGeometry, ColoredVertex, GeometryBuffers, TexturedGeometry, TexturedVertex,
};

/// Fraction of the cell pitch covered by filled and textured quads.
const INSET_SCALE: f32 = 0.9;

/// Size of the selection outline relative to the cell pitch.
const HIGHLIGHT_SCALE: f32 = 1.1;

/// Depth of the selection outline, drawn above the cells.
pub const HIGHLIGHT_DEPTH: f32 = 0.01;

/// Quad corner offsets in top-left, top-right, bottom-right, bottom-left order.
const CORNERS: [Vec2; 4] = [
    Vec2::new(-1.0, 1.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(1.0, -1.0),
    Vec2::new(-1.0, -1.0),
];

const CORNER_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

const TRIANGLE_INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];

const LINE_INDICES: [u16; 8] = [0, 1, 1, 2, 2, 3, 3, 0];

/// Colors used for each cell treatment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Outline of empty cells.
    pub empty: Color,
    /// Outline framing tank cells, visible with or without a sprite.
    pub tank: Color,
    /// Fill of object cells.
    pub object: Color,
    /// Outlines of digit cells `1`, `2` and `3`.
    pub digits: [Color; 3],
    /// Outline around the selected cell.
    pub highlight: Color,
    /// Outlines of the grid shown before a map is loaded.
    pub placeholder: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            empty: Color::opaque(0.3, 0.3, 0.3),
            tank: Color::opaque(0.6, 0.9, 1.0),
            object: Color::opaque(1.0, 0.5, 0.0),
            digits: [
                Color::opaque(1.0, 0.2, 0.2),
                Color::opaque(0.2, 1.0, 0.2),
                Color::opaque(0.3, 0.5, 1.0),
            ],
            highlight: Color::opaque(1.0, 1.0, 0.0),
            placeholder: Color::WHITE,
        }
    }
}

/// Builds geometry buffers for a map and selection.
#[derive(Clone, Debug, Default)]
pub struct GeometryBuilder {
    palette: Palette,
}

impl GeometryBuilder {
    /// Creates a builder that colors cells with the provided palette.
    #[must_use]
    pub const fn new(palette: Palette) -> Self {
        Self { palette }
    }

    /// Produces the complete buffer set.
    ///
    /// Without a map the placeholder grid is produced instead. The output
    /// depends only on the inputs.
    #[must_use]
    pub fn rebuild(&self, map: Option<&MapModel>, selection: Option<CellCoord>) -> GeometryBuffers {
        let Some(map) = map else {
            return self.placeholder();
        };

        let layout = GridLayout::for_map(map);
        let half = layout.spacing() * 0.5;
        let mut buffers = GeometryBuffers::default();
        for (cell, marker) in map.iter() {
            let center = layout.cell_center(cell);
            match marker {
                Marker::Tank => {
                    push_outline_quad(
                        &mut buffers.outline,
                        center,
                        half,
                        0.0,
                        self.outline_color(marker),
                    );
                    push_textured_quad(&mut buffers.textured, center, half * INSET_SCALE);
                }
                Marker::Object => push_filled_quad(
                    &mut buffers.filled,
                    center,
                    half * INSET_SCALE,
                    self.palette.object,
                ),
                Marker::Digit1 | Marker::Digit2 | Marker::Digit3 | Marker::Empty => {
                    push_outline_quad(
                        &mut buffers.outline,
                        center,
                        half,
                        0.0,
                        self.outline_color(marker),
                    );
                }
            }
        }
        buffers.highlight = self.highlight(Some(map), selection);
        buffers
    }

    /// Produces only the selection outline.
    ///
    /// Empty unless `selection` lies within `map`.
    #[must_use]
    pub fn highlight(&self, map: Option<&MapModel>, selection: Option<CellCoord>) -> ColoredGeometry {
        let mut geometry = ColoredGeometry::lines();
        let (Some(map), Some(cell)) = (map, selection) else {
            return geometry;
        };
        if !map.contains(cell) {
            return geometry;
        }

        let layout = GridLayout::for_map(map);
        push_outline_quad(
            &mut geometry,
            layout.cell_center(cell),
            layout.spacing() * 0.5 * HIGHLIGHT_SCALE,
            HIGHLIGHT_DEPTH,
            self.palette.highlight,
        );
        geometry
    }

    fn placeholder(&self) -> GeometryBuffers {
        let layout = GridLayout::placeholder();
        let mut buffers = GeometryBuffers::default();
        for row in 0..layout.span() {
            for column in 0..layout.span() {
                push_outline_quad(
                    &mut buffers.outline,
                    layout.cell_center(CellCoord::new(column, row)),
                    CELL_SPACING * 0.5,
                    0.0,
                    self.palette.placeholder,
                );
            }
        }
        buffers
    }

    fn outline_color(&self, marker: Marker) -> Color {
        match marker {
            Marker::Digit1 => self.palette.digits[0],
            Marker::Digit2 => self.palette.digits[1],
            Marker::Digit3 => self.palette.digits[2],
            Marker::Tank => self.palette.tank,
            _ => self.palette.empty,
        }
    }
}

fn push_outline_quad(geometry: &mut ColoredGeometry, center: Vec2, half: f32, z: f32, color: Color) {
    push_colored_corners(geometry, center, half, z, color);
    let base = (geometry.vertices.len() - CORNERS.len()) as u16;
    geometry
        .indices
        .extend(LINE_INDICES.iter().map(|index| base + index));
}

fn push_filled_quad(geometry: &mut ColoredGeometry, center: Vec2, half: f32, color: Color) {
    push_colored_corners(geometry, center, half, 0.0, color);
    let base = (geometry.vertices.len() - CORNERS.len()) as u16;
    geometry
        .indices
        .extend(TRIANGLE_INDICES.iter().map(|index| base + index));
}

fn push_colored_corners(geometry: &mut ColoredGeometry, center: Vec2, half: f32, z: f32, color: Color) {
    geometry
        .vertices
        .extend(CORNERS.iter().map(|corner| ColoredVertex {
            position: corner_position(center, *corner, half, z),
            color: color.rgb(),
        }));
}

fn push_textured_quad(geometry: &mut TexturedGeometry, center: Vec2, half: f32) {
    let base = geometry.vertices.len() as u16;
    geometry
        .vertices
        .extend(CORNERS.iter().zip(CORNER_UVS).map(|(corner, uv)| TexturedVertex {
            position: corner_position(center, *corner, half, 0.0),
            uv,
        }));
    geometry
        .indices
        .extend(TRIANGLE_INDICES.iter().map(|index| base + index));
}

fn corner_position(center: Vec2, corner: Vec2, half: f32, z: f32) -> [f32; 3] {
    let position = center + corner * half;
    [position.x, position.y, z]
}

/// Geometry kept in sync with world events, rebuilt at most once per frame.
#[derive(Clone, Debug)]
pub struct GeometryCache {
    builder: GeometryBuilder,
    buffers: GeometryBuffers,
    full_dirty: bool,
    highlight_dirty: bool,
}

impl GeometryCache {
    /// Creates a cache holding the placeholder grid.
    #[must_use]
    pub fn new(builder: GeometryBuilder) -> Self {
        let buffers = builder.rebuild(None, None);
        Self {
            builder,
            buffers,
            full_dirty: false,
            highlight_dirty: false,
        }
    }

    /// Marks partitions stale according to the observed world events.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::MapReplaced { .. } => self.full_dirty = true,
                Event::SelectionChanged { .. } => self.highlight_dirty = true,
                _ => {}
            }
        }
    }

    /// Rebuilds stale partitions and reports whether anything changed.
    pub fn refresh(&mut self, map: Option<&MapModel>, selection: Option<CellCoord>) -> bool {
        if self.full_dirty {
            self.buffers = self.builder.rebuild(map, selection);
        } else if self.highlight_dirty {
            self.buffers.highlight = self.builder.highlight(map, selection);
        } else {
            return false;
        }
        self.full_dirty = false;
        self.highlight_dirty = false;
        true
    }

    /// Buffers reflecting the most recent refresh.
    #[must_use]
    pub const fn buffers(&self) -> &GeometryBuffers {
        &self.buffers
    }
}

impl Default for GeometryCache {
    fn default() -> Self {
        Self::new(GeometryBuilder::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_quads_use_line_list_indices() {
        let mut geometry = ColoredGeometry::lines();
        push_outline_quad(&mut geometry, Vec2::ZERO, 1.0, 0.0, Color::WHITE);
        push_outline_quad(&mut geometry, Vec2::ZERO, 1.0, 0.0, Color::WHITE);

        assert_eq!(
            geometry.indices,
            vec![0, 1, 1, 2, 2, 3, 3, 0, 4, 5, 5, 6, 6, 7, 7, 4]
        );
    }

    #[test]
    fn textured_quads_span_the_unit_uv_square() {
        let mut geometry = TexturedGeometry::default();
        push_textured_quad(&mut geometry, Vec2::new(1.0, 1.0), 0.5);

        let top_left = geometry.vertices[0];
        let bottom_right = geometry.vertices[2];
        assert_eq!(top_left.position, [0.5, 1.5, 0.0]);
        assert_eq!(top_left.uv, [0.0, 0.0]);
        assert_eq!(bottom_right.position, [1.5, 0.5, 0.0]);
        assert_eq!(bottom_right.uv, [1.0, 1.0]);
        assert_eq!(geometry.indices, TRIANGLE_INDICES.to_vec());
    }
}
