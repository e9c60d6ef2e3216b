#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure selection system that resolves taps to grid cells.
//!
//! Taps on tank cells select the cell and produce a [`SelectionReport`];
//! every other tap clears the selection.

use glam::Vec2;
use scroller_core::{
    CellCoord, Command, Event, GridLayout, MapModel, Marker, SelectionReport,
    DEFAULT_SELECTION_MARKER,
};

/// Outcome of mapping a tap onto the active map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapResolution {
    /// The tap landed on a tank.
    Tank(CellCoord),
    /// The tap landed on a cell holding something other than a tank.
    Other {
        /// Cell that was hit.
        cell: CellCoord,
        /// Marker stored in that cell.
        marker: Marker,
    },
    /// The tap landed outside the grid.
    OutOfBounds,
    /// No map has been loaded yet.
    NoMap,
}

/// Maps a tap to the cell it landed on.
///
/// `world` is the tap position before scrolling and `scroll` the camera offset
/// active when the tap landed; the difference is the map-local position.
#[must_use]
pub fn resolve_tap(map: Option<&MapModel>, world: Vec2, scroll: Vec2) -> TapResolution {
    let Some(map) = map else {
        return TapResolution::NoMap;
    };
    let layout = GridLayout::for_map(map);
    let Some(cell) = layout.cell_at(map, world - scroll) else {
        return TapResolution::OutOfBounds;
    };
    match map.marker_at(cell) {
        Some(Marker::Tank) => TapResolution::Tank(cell),
        Some(marker) => TapResolution::Other { cell, marker },
        None => TapResolution::OutOfBounds,
    }
}

/// Selection system turning tap events into selection commands and reports.
#[derive(Clone, Debug)]
pub struct SelectionController {
    marker: String,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new(DEFAULT_SELECTION_MARKER)
    }
}

impl SelectionController {
    /// Creates a controller that tags reports with the provided marker.
    #[must_use]
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// Marker attached to every outgoing report.
    #[must_use]
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Consumes world events and emits selection commands and reports.
    ///
    /// Repeated taps on the same tank produce a command and a report each
    /// time.
    pub fn handle(
        &mut self,
        events: &[Event],
        map: Option<&MapModel>,
        out: &mut Vec<Command>,
        reports: &mut Vec<SelectionReport>,
    ) {
        for event in events {
            if let Event::Tapped { world, scroll } = event {
                match resolve_tap(map, *world, *scroll) {
                    TapResolution::Tank(cell) => {
                        out.push(Command::SelectCell { cell });
                        reports.push(SelectionReport::new(cell, self.marker.as_str()));
                    }
                    TapResolution::Other { .. }
                    | TapResolution::OutOfBounds
                    | TapResolution::NoMap => out.push(Command::ClearSelection),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taps_without_a_map_resolve_to_no_map() {
        assert_eq!(
            resolve_tap(None, Vec2::ZERO, Vec2::ZERO),
            TapResolution::NoMap
        );
    }

    #[test]
    fn scroll_is_removed_before_resolving() {
        let map = MapModel::fallback();
        let layout = GridLayout::for_map(&map);
        let scroll = Vec2::new(3.0, -2.0);
        let tapped = layout.cell_center(CellCoord::new(9, 0)) + scroll;

        assert_eq!(
            resolve_tap(Some(&map), tapped, scroll),
            TapResolution::Tank(CellCoord::new(9, 0))
        );
    }

    #[test]
    fn non_tank_cells_report_their_marker() {
        let map = MapModel::fallback();
        let layout = GridLayout::for_map(&map);
        let center = layout.cell_center(CellCoord::new(4, 1));

        assert_eq!(
            resolve_tap(Some(&map), center, Vec2::ZERO),
            TapResolution::Other {
                cell: CellCoord::new(4, 1),
                marker: Marker::Object,
            }
        );
    }
}
