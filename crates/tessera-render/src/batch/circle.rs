//! Circle geometry. Circles are quads whose fragment shader discards outside
//! the unit disc.

use tessera_core::math::{CameraBasis, Mat4, Vec2, Vec3};

use super::quad::{QUAD_CORNERS, QUAD_TEX_COORDS};
use crate::color::Color;
use crate::texture::TextureHandle;
use crate::vertex::CircleVertex;

/// Appearance of a submitted circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleParams {
    pub texture: Option<TextureHandle>,
    pub tint: Color,
    /// Ring thickness as a fraction of the radius. `1.0` is a filled disc.
    pub thickness: f32,
    /// Width of the anti-aliased edge, in local units.
    pub fade: f32,
    pub pick_id: u32,
}

impl Default for CircleParams {
    fn default() -> Self {
        Self {
            texture: None,
            tint: Color::WHITE,
            thickness: 1.0,
            fade: 0.005,
            pick_id: 0,
        }
    }
}

impl CircleParams {
    pub fn tinted(tint: Color) -> Self {
        Self {
            tint,
            ..Default::default()
        }
    }

    pub fn with_texture(mut self, texture: TextureHandle) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_thickness(mut self, thickness: f32) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn with_fade(mut self, fade: f32) -> Self {
        self.fade = fade;
        self
    }

    pub fn with_pick_id(mut self, pick_id: u32) -> Self {
        self.pick_id = pick_id;
        self
    }
}

pub(crate) fn transformed_vertices(
    transform: &Mat4,
    params: &CircleParams,
    slot: f32,
) -> [CircleVertex; 4] {
    std::array::from_fn(|i| {
        let world = (*transform * QUAD_CORNERS[i]).truncate();
        vertex(world, params, slot, i)
    })
}

pub(crate) fn facing_vertices(
    position: Vec3,
    size: Vec2,
    basis: &CameraBasis,
    params: &CircleParams,
    slot: f32,
) -> [CircleVertex; 4] {
    std::array::from_fn(|i| {
        let corner = QUAD_CORNERS[i];
        let world = position + basis.right * corner.x * size.x + basis.up * corner.y * size.y;
        vertex(world, params, slot, i)
    })
}

fn vertex(world: Vec3, params: &CircleParams, slot: f32, corner: usize) -> CircleVertex {
    CircleVertex {
        world_position: world.to_array(),
        local_position: (QUAD_CORNERS[corner].truncate() * 2.0).to_array(),
        color: params.tint.to_array(),
        thickness: params.thickness,
        fade: params.fade,
        tex_coord: QUAD_TEX_COORDS[corner],
        tex_index: slot,
        pick_id: params.pick_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_positions_span_unit_square() {
        let vertices = transformed_vertices(&Mat4::IDENTITY, &CircleParams::default(), 0.0);
        assert_eq!(vertices[0].local_position, [-1.0, -1.0, 0.0]);
        assert_eq!(vertices[2].local_position, [1.0, 1.0, 0.0]);
        assert_eq!(vertices[0].world_position, [-0.5, -0.5, 0.0]);
    }

    #[test]
    fn test_local_positions_ignore_transform() {
        let transform = Mat4::from_scale(Vec3::splat(5.0));
        let params = CircleParams::tinted(Color::BLUE).with_thickness(0.1);
        let vertices = transformed_vertices(&transform, &params, 2.0);

        assert_eq!(vertices[2].world_position, [2.5, 2.5, 0.0]);
        assert_eq!(vertices[2].local_position, [1.0, 1.0, 0.0]);
        assert_eq!(vertices[2].thickness, 0.1);
        assert_eq!(vertices[2].tex_index, 2.0);
    }

    #[test]
    fn test_facing_circle() {
        let vertices = facing_vertices(
            Vec3::new(0.0, 0.0, -1.0),
            Vec2::splat(2.0),
            &CameraBasis::IDENTITY,
            &CircleParams::default(),
            0.0,
        );
        assert_eq!(vertices[3].world_position, [-1.0, 1.0, -1.0]);
    }
}
