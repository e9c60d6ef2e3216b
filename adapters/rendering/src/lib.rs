#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Scroller adapters.
//!
//! Geometry is described as plain vertex and index buffers that any graphics
//! backend can upload. [`frame::FrameRenderer`] drives a [`DrawBackend`]
//! through the per-frame sequence of matrix updates and draw calls, while
//! [`geometry::GeometryCache`] keeps the buffers in sync with world events.

pub mod frame;
pub mod geometry;

use anyhow::Result as AnyResult;
use scroller_core::{TouchEvent, Viewport};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::opaque(1.0, 1.0, 1.0);

    /// Opaque black.
    pub const BLACK: Self = Self::opaque(0.0, 0.0, 0.0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates a fully opaque color.
    #[must_use]
    pub const fn opaque(red: f32, green: f32, blue: f32) -> Self {
        Self::new(red, green, blue, 1.0)
    }

    /// RGB channels as stored in colored vertices.
    #[must_use]
    pub const fn rgb(self) -> [f32; 3] {
        [self.red, self.green, self.blue]
    }
}

/// Vertex consumed by the colored shader.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColoredVertex {
    /// Position in map-local world units.
    pub position: [f32; 3],
    /// RGB color of the vertex.
    pub color: [f32; 3],
}

/// Vertex consumed by the textured shader.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TexturedVertex {
    /// Position in map-local world units.
    pub position: [f32; 3],
    /// Texture coordinate in the unit square.
    pub uv: [f32; 2],
}

/// How indices of a colored buffer are assembled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    /// Every pair of indices forms a line segment.
    Lines,
    /// Every triple of indices forms a triangle.
    Triangles,
}

/// Indexed geometry drawn with the colored shader.
#[derive(Clone, Debug, PartialEq)]
pub struct ColoredGeometry {
    /// Assembly mode for the indices.
    pub primitive: Primitive,
    /// Vertex buffer contents.
    pub vertices: Vec<ColoredVertex>,
    /// Index buffer contents.
    pub indices: Vec<u16>,
}

impl ColoredGeometry {
    /// Creates an empty line list.
    #[must_use]
    pub const fn lines() -> Self {
        Self {
            primitive: Primitive::Lines,
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Creates an empty triangle list.
    #[must_use]
    pub const fn triangles() -> Self {
        Self {
            primitive: Primitive::Triangles,
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Reports whether the buffer holds nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Indexed triangle list drawn with the textured shader.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct TexturedGeometry {
    /// Vertex buffer contents.
    pub vertices: Vec<TexturedVertex>,
    /// Index buffer contents.
    pub indices: Vec<u16>,
}

impl TexturedGeometry {
    /// Reports whether the buffer holds nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Complete set of buffers describing one map, split by draw treatment.
#[derive(Clone, Debug, PartialEq)]
pub struct GeometryBuffers {
    /// Outlined cells: empty cells, digits and the placeholder grid.
    pub outline: ColoredGeometry,
    /// Filled object cells.
    pub filled: ColoredGeometry,
    /// Sprite-textured tank cells.
    pub textured: TexturedGeometry,
    /// Outline around the selected cell.
    pub highlight: ColoredGeometry,
}

impl Default for GeometryBuffers {
    fn default() -> Self {
        Self {
            outline: ColoredGeometry::lines(),
            filled: ColoredGeometry::triangles(),
            textured: TexturedGeometry::default(),
            highlight: ColoredGeometry::lines(),
        }
    }
}

/// Shader program a matrix update targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    /// Program used for colored vertices.
    Colored,
    /// Program used for sprite-textured vertices.
    Textured,
}

/// Low-level drawing surface implemented by graphics backends.
///
/// Matrices are column-major arrays of 16 floats.
pub trait DrawBackend {
    /// Stores the projection matrix used by the provided shader.
    fn set_projection(&mut self, shader: ShaderKind, matrix: &[f32; 16]);

    /// Stores the model matrix used by the provided shader.
    fn set_model(&mut self, shader: ShaderKind, matrix: &[f32; 16]);

    /// Draws a colored buffer with the current matrices.
    fn draw_colored(&mut self, geometry: &ColoredGeometry);

    /// Draws a textured buffer using the uploaded sprite.
    fn draw_textured(&mut self, geometry: &TexturedGeometry);

    /// Decodes PNG bytes and makes them the active sprite texture.
    fn upload_sprite(&mut self, png: &[u8]) -> Result<(), RenderingError>;
}

/// Input snapshot gathered by adapters before updating the frame.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Time elapsed since the previous frame.
    pub dt: Duration,
    /// Current size of the drawable surface.
    pub viewport: Viewport,
    /// Touch events observed since the previous frame, in arrival order.
    pub touches: Vec<TouchEvent>,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
        }
    }
}

/// Rendering backend capable of presenting Scroller frames.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_frame` closure is invoked once per frame after the
    /// surface was cleared. It receives the input captured by the adapter and
    /// the surface to draw on.
    fn run<F>(self, presentation: Presentation, update_frame: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut dyn DrawBackend) + 'static;
}

/// Errors that can occur while preparing rendering resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderingError {
    /// Sprite bytes could not be decoded as a PNG image.
    InvalidSprite {
        /// Human readable description of the decoding failure.
        reason: String,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSprite { reason } => {
                write!(f, "sprite could not be decoded: {reason}")
            }
        }
    }
}

impl Error for RenderingError {}
