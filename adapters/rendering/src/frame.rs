//! Per-frame draw sequencing against a [`DrawBackend`].

use glam::Mat4;
use scroller_core::{Event, Viewport};

use crate::{DrawBackend, GeometryBuffers, RenderingError, ShaderKind};

/// Tracks shader state across frames and issues draw calls in a fixed order.
///
/// The projection matrix is recomputed lazily: only after a resize, an
/// accepted zoom step or a newly attached sprite texture.
#[derive(Clone, Debug)]
pub struct FrameRenderer {
    projection_dirty: bool,
    viewport: Option<Viewport>,
    texture_attached: bool,
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameRenderer {
    /// Creates a renderer that pushes the projection on its first frame.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            projection_dirty: true,
            viewport: None,
            texture_attached: false,
        }
    }

    /// Reports whether a sprite texture has been attached.
    #[must_use]
    pub const fn texture_attached(&self) -> bool {
        self.texture_attached
    }

    /// Reports whether the next frame recomputes the projection.
    #[must_use]
    pub const fn projection_dirty(&self) -> bool {
        self.projection_dirty
    }

    /// Marks the projection stale when the camera zoom or surface changed.
    pub fn observe(&mut self, events: &[Event]) {
        for event in events {
            if matches!(
                event,
                Event::ZoomChanged { .. } | Event::ViewportResized { .. }
            ) {
                self.projection_dirty = true;
            }
        }
    }

    /// Uploads the sprite and activates the textured shader.
    ///
    /// On failure the textured shader stays inactive and tanks are not drawn.
    pub fn attach_sprite<B>(&mut self, backend: &mut B, png: &[u8]) -> Result<(), RenderingError>
    where
        B: DrawBackend + ?Sized,
    {
        backend.upload_sprite(png)?;
        self.texture_attached = true;
        self.projection_dirty = true;
        Ok(())
    }

    /// Draws one frame.
    ///
    /// `projection` is only evaluated when the projection is stale.
    pub fn render<B, P>(
        &mut self,
        backend: &mut B,
        viewport: Viewport,
        projection: P,
        model: Mat4,
        buffers: &GeometryBuffers,
    ) where
        B: DrawBackend + ?Sized,
        P: FnOnce() -> Mat4,
    {
        if self.viewport != Some(viewport) {
            self.viewport = Some(viewport);
            self.projection_dirty = true;
        }

        if self.projection_dirty {
            let matrix = projection().to_cols_array();
            for shader in self.active_shaders() {
                backend.set_projection(*shader, &matrix);
            }
            self.projection_dirty = false;
        }

        let model = model.to_cols_array();
        for shader in self.active_shaders() {
            backend.set_model(*shader, &model);
        }

        if !buffers.outline.is_empty() {
            backend.draw_colored(&buffers.outline);
        }
        if !buffers.filled.is_empty() {
            backend.draw_colored(&buffers.filled);
        }
        if self.texture_attached && !buffers.textured.is_empty() {
            backend.draw_textured(&buffers.textured);
        }
        if !buffers.highlight.is_empty() {
            backend.draw_colored(&buffers.highlight);
        }
    }

    fn active_shaders(&self) -> &'static [ShaderKind] {
        if self.texture_attached {
            &[ShaderKind::Colored, ShaderKind::Textured]
        } else {
            &[ShaderKind::Colored]
        }
    }
}
