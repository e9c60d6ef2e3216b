#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative viewer state for Scroller.
//!
//! The world owns the active map, the camera and the current selection. It is
//! mutated exclusively through [`apply`] and inspected through [`query`].

pub mod camera;

use scroller_core::{CellCoord, Command, Event, MapModel};

use crate::camera::{CameraConfig, CameraState, ZoomOutcome};

/// Represents the authoritative viewer state.
#[derive(Debug)]
pub struct World {
    map: Option<MapModel>,
    camera: CameraState,
    selection: Option<CellCoord>,
}

impl World {
    /// Creates an empty world whose camera uses the provided configuration.
    #[must_use]
    pub fn new(config: CameraConfig) -> Self {
        Self {
            map: None,
            camera: CameraState::new(config),
            selection: None,
        }
    }

    fn clear_selection(&mut self, out_events: &mut Vec<Event>) {
        if self.selection.take().is_some() {
            out_events.push(Event::SelectionChanged { cell: None });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ReplaceMap { map } => {
            let (width, height) = (map.width(), map.height());
            world.map = Some(map);
            world.clear_selection(out_events);
            out_events.push(Event::MapReplaced { width, height });
        }
        Command::ResizeViewport { viewport } => {
            if world.camera.viewport() != viewport {
                world.camera.set_viewport(viewport);
                out_events.push(Event::ViewportResized { viewport });
            }
        }
        Command::ScrollCamera { delta } => {
            world.camera.apply_scroll_delta(delta);
            out_events.push(Event::CameraScrolled {
                scroll: world.camera.scroll(),
            });
        }
        Command::ZoomCamera { factor } => match world.camera.apply_zoom_delta(factor) {
            ZoomOutcome::Applied(zoom) => out_events.push(Event::ZoomChanged { factor, zoom }),
            ZoomOutcome::Rejected => out_events.push(Event::ZoomRejected { factor }),
        },
        Command::TapAt { world: position } => {
            out_events.push(Event::Tapped {
                world: position,
                scroll: world.camera.scroll(),
            });
        }
        Command::SelectCell { cell } => {
            let in_bounds = world.map.as_ref().is_some_and(|map| map.contains(cell));
            if in_bounds {
                world.selection = Some(cell);
                out_events.push(Event::SelectionChanged { cell: Some(cell) });
            } else {
                world.clear_selection(out_events);
            }
        }
        Command::ClearSelection => {
            world.selection = None;
            out_events.push(Event::SelectionChanged { cell: None });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use scroller_core::{CellCoord, MapModel, Marker};

    use super::{CameraState, World};

    /// Map currently being displayed, if one has been loaded.
    #[must_use]
    pub fn map(world: &World) -> Option<&MapModel> {
        world.map.as_ref()
    }

    /// Camera describing the current scroll offset and zoom.
    #[must_use]
    pub fn camera(world: &World) -> &CameraState {
        &world.camera
    }

    /// Currently selected cell, if any.
    #[must_use]
    pub fn selection(world: &World) -> Option<CellCoord> {
        world.selection
    }

    /// Marker stored at the provided cell of the active map.
    #[must_use]
    pub fn marker_at(world: &World, cell: CellCoord) -> Option<Marker> {
        world.map.as_ref().and_then(|map| map.marker_at(cell))
    }
}
