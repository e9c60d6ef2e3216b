#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Scroller viewer.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Input adapters feed [`TouchEvent`]
//! batches to the gesture system, systems submit [`Command`] values describing
//! desired mutations, the world executes those commands via its `apply` entry
//! point, and then broadcasts [`Event`] values for the remaining systems and
//! the renderer to react to.

mod layout;
mod map;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use layout::{GridLayout, CELL_SPACING, PLACEHOLDER_SPAN};
pub use map::{MapError, MapModel, Marker, FALLBACK_MAP_ROWS, MAX_MAP_CELLS};

/// Marker value reported to the server when a tank is selected.
pub const DEFAULT_SELECTION_MARKER: &str = "XH";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the current map wholesale with freshly ingested data.
    ReplaceMap {
        /// Validated map that becomes authoritative.
        map: MapModel,
    },
    /// Records the size of the drawable surface.
    ResizeViewport {
        /// Surface dimensions in pixels.
        viewport: Viewport,
    },
    /// Accumulates a scroll offset expressed in world units.
    ScrollCamera {
        /// Offset added to the current scroll position.
        delta: Vec2,
    },
    /// Requests a multiplicative zoom step.
    ZoomCamera {
        /// Ratio applied to the current zoom level.
        factor: f32,
    },
    /// Reports that a contact touched down at the provided world position.
    TapAt {
        /// Position of the contact in world space (scroll not removed).
        world: Vec2,
    },
    /// Marks the provided cell as the active selection.
    SelectCell {
        /// Cell that should become selected.
        cell: CellCoord,
    },
    /// Removes any active selection.
    ClearSelection,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Announces that a new map replaced the previous one.
    MapReplaced {
        /// Number of columns contained in the new map.
        width: u32,
        /// Number of rows contained in the new map.
        height: u32,
    },
    /// Announces that the drawable surface changed size.
    ViewportResized {
        /// New surface dimensions in pixels.
        viewport: Viewport,
    },
    /// Confirms that the camera scroll offset changed.
    CameraScrolled {
        /// Scroll offset after the change.
        scroll: Vec2,
    },
    /// Confirms that a zoom step was accepted.
    ZoomChanged {
        /// Ratio that was applied.
        factor: f32,
        /// Zoom level after the change.
        zoom: f32,
    },
    /// Reports that a zoom step would have left the permitted range.
    ZoomRejected {
        /// Ratio that was refused.
        factor: f32,
    },
    /// Announces a tap together with the scroll offset active when it landed.
    Tapped {
        /// Tap position in world space.
        world: Vec2,
        /// Camera scroll offset at the time of the tap.
        scroll: Vec2,
    },
    /// Announces that the selection was set or cleared.
    SelectionChanged {
        /// Newly selected cell, if any.
        cell: Option<CellCoord>,
    },
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Size of the drawable surface measured in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    /// Creates a new viewport descriptor.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the surface in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the surface in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns `true` when either dimension is zero.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width divided by height, or `1.0` for a degenerate surface.
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        if self.is_degenerate() {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// Identifier assigned by the input system to a single contact point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactId(u64);

impl ContactId {
    /// Creates a new contact identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Lifecycle stage of a contact point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// The contact started touching the surface.
    Down,
    /// The contact moved while touching the surface.
    Move,
    /// The contact was lifted.
    Up,
    /// The platform aborted the gesture.
    Cancel,
}

/// Single raw touch event delivered by the input system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchEvent {
    /// Contact that produced the event.
    pub contact: ContactId,
    /// Position in screen pixels, origin at the top-left corner.
    pub position: Vec2,
    /// Lifecycle stage reported for the contact.
    pub phase: TouchPhase,
}

impl TouchEvent {
    /// Creates a new touch event.
    #[must_use]
    pub const fn new(contact: ContactId, position: Vec2, phase: TouchPhase) -> Self {
        Self {
            contact,
            position,
            phase,
        }
    }
}

/// Outbound record describing a confirmed tank selection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionReport {
    /// Column of the selected cell.
    pub x: u32,
    /// Row of the selected cell.
    pub y: u32,
    /// Marker string identifying the kind of selection.
    pub value: String,
}

impl SelectionReport {
    /// Creates a report for the provided cell.
    #[must_use]
    pub fn new(cell: CellCoord, value: impl Into<String>) -> Self {
        Self {
            x: cell.column(),
            y: cell.row(),
            value: value.into(),
        }
    }
}
