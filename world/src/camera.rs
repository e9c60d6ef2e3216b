//! Camera state: scroll offset, zoom level and the matrices derived from them.

use glam::{Mat4, Vec2, Vec3};
use scroller_core::Viewport;
use thiserror::Error;

/// Half of the visible world height at zoom `1.0`.
pub const PROJECTION_HALF_HEIGHT: f32 = 2.0;

/// Near clipping plane of the orthographic projection.
pub const PROJECTION_NEAR_PLANE: f32 = -1.0;

/// Far clipping plane of the orthographic projection.
pub const PROJECTION_FAR_PLANE: f32 = 1.0;

/// Zoom limits and starting level for a camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraConfig {
    initial_zoom: f32,
    min_zoom: f32,
    max_zoom: f32,
}

impl CameraConfig {
    /// Default starting zoom level.
    pub const DEFAULT_INITIAL_ZOOM: f32 = 1.0;

    /// Default lower zoom bound.
    pub const DEFAULT_MIN_ZOOM: f32 = 0.5;

    /// Default upper zoom bound.
    pub const DEFAULT_MAX_ZOOM: f32 = 4.0;

    /// Creates a validated camera configuration.
    ///
    /// Returns an error unless `0 < min_zoom <= initial_zoom <= max_zoom` and
    /// every value is finite.
    pub fn new(initial_zoom: f32, min_zoom: f32, max_zoom: f32) -> Result<Self, CameraConfigError> {
        let finite = initial_zoom.is_finite() && min_zoom.is_finite() && max_zoom.is_finite();
        if !finite || min_zoom <= 0.0 || min_zoom > max_zoom {
            return Err(CameraConfigError::InvalidBounds { min_zoom, max_zoom });
        }
        if !(min_zoom..=max_zoom).contains(&initial_zoom) {
            return Err(CameraConfigError::InitialOutOfBounds {
                initial_zoom,
                min_zoom,
                max_zoom,
            });
        }

        Ok(Self {
            initial_zoom,
            min_zoom,
            max_zoom,
        })
    }

    /// Zoom level the camera starts at.
    #[must_use]
    pub const fn initial_zoom(&self) -> f32 {
        self.initial_zoom
    }

    /// Lowest permitted zoom level.
    #[must_use]
    pub const fn min_zoom(&self) -> f32 {
        self.min_zoom
    }

    /// Highest permitted zoom level.
    #[must_use]
    pub const fn max_zoom(&self) -> f32 {
        self.max_zoom
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            initial_zoom: Self::DEFAULT_INITIAL_ZOOM,
            min_zoom: Self::DEFAULT_MIN_ZOOM,
            max_zoom: Self::DEFAULT_MAX_ZOOM,
        }
    }
}

/// Errors raised when validating a [`CameraConfig`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum CameraConfigError {
    /// Bounds are non-positive, non-finite or inverted.
    #[error("zoom bounds [{min_zoom}, {max_zoom}] must be finite, positive and ordered")]
    InvalidBounds {
        /// Requested lower bound.
        min_zoom: f32,
        /// Requested upper bound.
        max_zoom: f32,
    },
    /// The starting zoom lies outside the bounds.
    #[error("initial zoom {initial_zoom} lies outside [{min_zoom}, {max_zoom}]")]
    InitialOutOfBounds {
        /// Requested starting zoom.
        initial_zoom: f32,
        /// Lower bound.
        min_zoom: f32,
        /// Upper bound.
        max_zoom: f32,
    },
}

/// Result of a multiplicative zoom request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ZoomOutcome {
    /// The zoom changed to the contained level.
    Applied(f32),
    /// The step would have left the permitted range; zoom is unchanged.
    Rejected,
}

/// Scroll offset and zoom level used to derive the view matrices.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraState {
    scroll: Vec2,
    zoom: f32,
    min_zoom: f32,
    max_zoom: f32,
    viewport: Viewport,
}

impl CameraState {
    /// Creates a camera at the origin using the provided configuration.
    #[must_use]
    pub fn new(config: CameraConfig) -> Self {
        Self {
            scroll: Vec2::ZERO,
            zoom: config.initial_zoom(),
            min_zoom: config.min_zoom(),
            max_zoom: config.max_zoom(),
            viewport: Viewport::default(),
        }
    }

    /// Accumulated scroll offset in world units.
    #[must_use]
    pub const fn scroll(&self) -> Vec2 {
        self.scroll
    }

    /// Current zoom level.
    #[must_use]
    pub const fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Surface dimensions used for screen conversions.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub(crate) fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Half extents of the visible world area, before scroll.
    #[must_use]
    pub fn half_extents(&self) -> Vec2 {
        let half_height = PROJECTION_HALF_HEIGHT / self.zoom;
        Vec2::new(half_height * self.viewport.aspect_ratio(), half_height)
    }

    /// Converts a screen-space pixel position into world space.
    ///
    /// The result ignores the scroll offset, which is applied separately as a
    /// model translation when drawing.
    #[must_use]
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        if self.viewport.is_degenerate() {
            return Vec2::ZERO;
        }
        let normalized = Vec2::new(
            screen.x / self.viewport.width() as f32 * 2.0 - 1.0,
            -(screen.y / self.viewport.height() as f32 * 2.0 - 1.0),
        );
        normalized * self.half_extents()
    }

    /// Converts a world-space position back into screen pixels.
    #[must_use]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let normalized = world / self.half_extents();
        Vec2::new(
            (normalized.x + 1.0) * 0.5 * self.viewport.width() as f32,
            (1.0 - normalized.y) * 0.5 * self.viewport.height() as f32,
        )
    }

    /// Multiplies the zoom level by `factor` when the result stays in bounds.
    ///
    /// Out-of-range and non-finite steps are rejected without clamping.
    pub fn apply_zoom_delta(&mut self, factor: f32) -> ZoomOutcome {
        if !factor.is_finite() || factor <= 0.0 {
            return ZoomOutcome::Rejected;
        }
        let zoom = self.zoom * factor;
        if zoom < self.min_zoom || zoom > self.max_zoom {
            return ZoomOutcome::Rejected;
        }
        self.zoom = zoom;
        ZoomOutcome::Applied(zoom)
    }

    /// Adds `delta` to the scroll offset.
    pub fn apply_scroll_delta(&mut self, delta: Vec2) {
        self.scroll += delta;
    }

    /// Aspect-corrected, zoom-scaled orthographic projection.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        let half = self.half_extents();
        Mat4::orthographic_rh_gl(
            -half.x,
            half.x,
            -half.y,
            half.y,
            PROJECTION_NEAR_PLANE,
            PROJECTION_FAR_PLANE,
        )
    }

    /// Translation by the scroll offset.
    #[must_use]
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(self.scroll.x, self.scroll.y, 0.0))
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}
