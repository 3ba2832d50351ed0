//! Quad geometry.

use tessera_core::math::{CameraBasis, Mat4, Vec2, Vec3, Vec4};

use crate::color::Color;
use crate::texture::TextureHandle;
use crate::vertex::QuadVertex;

/// Local-space corners of a unit quad centred on the origin, counter-clockwise
/// from bottom-left.
pub const QUAD_CORNERS: [Vec4; 4] = [
    Vec4::new(-0.5, -0.5, 0.0, 1.0),
    Vec4::new(0.5, -0.5, 0.0, 1.0),
    Vec4::new(0.5, 0.5, 0.0, 1.0),
    Vec4::new(-0.5, 0.5, 0.0, 1.0),
];

/// Texture coordinates matching [`QUAD_CORNERS`].
pub const QUAD_TEX_COORDS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Appearance of a submitted quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadParams {
    /// `None` draws the tint alone.
    pub texture: Option<TextureHandle>,
    pub tint: Color,
    /// Texture coordinate multiplier.
    pub tiling: f32,
    pub pick_id: u32,
}

impl Default for QuadParams {
    fn default() -> Self {
        Self {
            texture: None,
            tint: Color::WHITE,
            tiling: 1.0,
            pick_id: 0,
        }
    }
}

impl QuadParams {
    pub fn tinted(tint: Color) -> Self {
        Self {
            tint,
            ..Default::default()
        }
    }

    pub fn textured(texture: TextureHandle) -> Self {
        Self {
            texture: Some(texture),
            ..Default::default()
        }
    }

    pub fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }

    pub fn with_tiling(mut self, tiling: f32) -> Self {
        self.tiling = tiling;
        self
    }

    pub fn with_pick_id(mut self, pick_id: u32) -> Self {
        self.pick_id = pick_id;
        self
    }
}

/// World transform of a quad: translate, then rotate about Z, then scale.
pub fn quad_transform(position: Vec3, size: Vec2, rotation: f32) -> Mat4 {
    Mat4::from_translation(position)
        * Mat4::from_rotation_z(rotation)
        * Mat4::from_scale(size.extend(1.0))
}

pub(crate) fn transformed_vertices(
    transform: &Mat4,
    params: &QuadParams,
    slot: f32,
) -> [QuadVertex; 4] {
    std::array::from_fn(|i| {
        let world = (*transform * QUAD_CORNERS[i]).truncate();
        vertex(world, params, slot, i)
    })
}

/// Corners spanned by the camera's right and up vectors, so the quad always
/// faces the viewer.
pub(crate) fn facing_vertices(
    position: Vec3,
    size: Vec2,
    basis: &CameraBasis,
    params: &QuadParams,
    slot: f32,
) -> [QuadVertex; 4] {
    std::array::from_fn(|i| {
        let corner = QUAD_CORNERS[i];
        let world = position + basis.right * corner.x * size.x + basis.up * corner.y * size.y;
        vertex(world, params, slot, i)
    })
}

fn vertex(position: Vec3, params: &QuadParams, slot: f32, corner: usize) -> QuadVertex {
    QuadVertex {
        position: position.to_array(),
        color: params.tint.to_array(),
        tex_coord: QUAD_TEX_COORDS[corner],
        tex_index: slot,
        tiling: params.tiling,
        pick_id: params.pick_id,
    }
}
