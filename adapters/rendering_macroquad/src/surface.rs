use glam::Mat4;
use macroquad::{
    camera::{set_camera, Camera},
    color::{Color as MacroquadColor, WHITE},
    math::{Mat4 as MacroquadMat4, Vec2 as MacroquadVec2, Vec3 as MacroquadVec3},
    models::{draw_mesh, Mesh, Vertex},
    shapes::draw_line,
    texture::Texture2D,
};
use scroller_rendering::{
    ColoredGeometry, DrawBackend, Primitive, RenderingError, ShaderKind, TexturedGeometry,
};

use crate::texture::load_sprite;

/// Line width used for outlines, in world units.
const OUTLINE_THICKNESS: f32 = 0.01;

/// Camera applying a precomputed projection-times-model matrix.
struct MatrixCamera {
    matrix: MacroquadMat4,
}

impl Camera for MatrixCamera {
    fn matrix(&self) -> MacroquadMat4 {
        self.matrix
    }

    fn depth_enabled(&self) -> bool {
        false
    }

    fn render_pass(&self) -> Option<macroquad::miniquad::RenderPass> {
        None
    }

    fn viewport(&self) -> Option<(i32, i32, i32, i32)> {
        None
    }
}

#[derive(Clone, Copy, Debug)]
struct ShaderMatrices {
    projection: Mat4,
    model: Mat4,
}

impl Default for ShaderMatrices {
    fn default() -> Self {
        Self {
            projection: Mat4::IDENTITY,
            model: Mat4::IDENTITY,
        }
    }
}

impl ShaderMatrices {
    fn activate(&self) {
        let combined = self.projection * self.model;
        set_camera(&MatrixCamera {
            matrix: MacroquadMat4::from_cols_array(&combined.to_cols_array()),
        });
    }
}

/// Draw surface backed by macroquad's immediate-mode renderer.
///
/// Each shader kind keeps its own matrices, mirroring separate GPU programs.
#[derive(Debug, Default)]
pub(crate) struct MacroquadSurface {
    colored: ShaderMatrices,
    textured: ShaderMatrices,
    sprite: Option<Texture2D>,
}

impl MacroquadSurface {
    fn matrices_mut(&mut self, shader: ShaderKind) -> &mut ShaderMatrices {
        match shader {
            ShaderKind::Colored => &mut self.colored,
            ShaderKind::Textured => &mut self.textured,
        }
    }
}

impl DrawBackend for MacroquadSurface {
    fn set_projection(&mut self, shader: ShaderKind, matrix: &[f32; 16]) {
        self.matrices_mut(shader).projection = Mat4::from_cols_array(matrix);
    }

    fn set_model(&mut self, shader: ShaderKind, matrix: &[f32; 16]) {
        self.matrices_mut(shader).model = Mat4::from_cols_array(matrix);
    }

    fn draw_colored(&mut self, geometry: &ColoredGeometry) {
        self.colored.activate();
        match geometry.primitive {
            Primitive::Triangles => {
                let vertices = geometry
                    .vertices
                    .iter()
                    .map(|vertex| Vertex {
                        position: MacroquadVec3::from(vertex.position),
                        uv: MacroquadVec2::ZERO,
                        color: to_macroquad_color(vertex.color),
                    })
                    .collect();
                draw_mesh(&Mesh {
                    vertices,
                    indices: geometry.indices.clone(),
                    texture: None,
                });
            }
            Primitive::Lines => {
                for segment in geometry.indices.chunks_exact(2) {
                    let (Some(start), Some(end)) = (
                        geometry.vertices.get(usize::from(segment[0])),
                        geometry.vertices.get(usize::from(segment[1])),
                    ) else {
                        continue;
                    };
                    draw_line(
                        start.position[0],
                        start.position[1],
                        end.position[0],
                        end.position[1],
                        OUTLINE_THICKNESS,
                        to_macroquad_color(start.color),
                    );
                }
            }
        }
    }

    fn draw_textured(&mut self, geometry: &TexturedGeometry) {
        let Some(sprite) = &self.sprite else {
            return;
        };
        self.textured.activate();
        let vertices = geometry
            .vertices
            .iter()
            .map(|vertex| Vertex {
                position: MacroquadVec3::from(vertex.position),
                uv: MacroquadVec2::from(vertex.uv),
                color: WHITE,
            })
            .collect();
        draw_mesh(&Mesh {
            vertices,
            indices: geometry.indices.clone(),
            texture: Some(sprite.clone()),
        });
    }

    fn upload_sprite(&mut self, png: &[u8]) -> Result<(), RenderingError> {
        self.sprite = Some(load_sprite(png)?);
        Ok(())
    }
}

fn to_macroquad_color(rgb: [f32; 3]) -> MacroquadColor {
    MacroquadColor::new(rgb[0], rgb[1], rgb[2], 1.0)
}
