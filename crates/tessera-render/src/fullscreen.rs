//! Permanently resident single-quad pass for blits and post-processing.

use tessera_test_utils::{DrawCall, GpuBuffer, RenderContext, ShaderProgram, Topology};

use crate::batch::FlushContext;
use crate::command::DrawCommand;
use crate::texture::TextureHandle;
use crate::vertex::FullscreenVertex;

/// Clip-space strip covering the viewport. `v` grows downwards.
const FULLSCREEN_STRIP: [FullscreenVertex; 4] = [
    FullscreenVertex {
        position: [-1.0, -1.0],
        tex_coord: [0.0, 1.0],
    },
    FullscreenVertex {
        position: [1.0, -1.0],
        tex_coord: [1.0, 1.0],
    },
    FullscreenVertex {
        position: [-1.0, 1.0],
        tex_coord: [0.0, 0.0],
    },
    FullscreenVertex {
        position: [1.0, 1.0],
        tex_coord: [1.0, 0.0],
    },
];

pub(crate) struct FullscreenPass {
    vertex_buffer: GpuBuffer,
}

impl FullscreenPass {
    /// Upload the strip once. It never changes.
    pub fn new(context: &dyn RenderContext) -> Self {
        let vertex_buffer = context.create_buffer_init(
            Some("Fullscreen Vertices"),
            bytemuck::cast_slice(&FULLSCREEN_STRIP),
            wgpu::BufferUsages::VERTEX,
        );
        Self { vertex_buffer }
    }

    /// Draw `texture`, or the fallback texture, over the whole target.
    pub fn draw(&self, ctx: &mut FlushContext<'_>, texture: Option<TextureHandle>) {
        let texture = match texture {
            Some(handle) => ctx.textures.resolve(handle),
            None => ctx.textures.white_texture().clone(),
        };
        ctx.dispatch(DrawCommand {
            kind: None,
            call: DrawCall {
                program: ShaderProgram::Fullscreen,
                topology: Topology::TriangleStrip,
                vertex_buffer: self.vertex_buffer.clone(),
                index_buffer: None,
                textures: vec![texture],
                count: FULLSCREEN_STRIP.len() as u32,
            },
            vertices: Vec::new(),
            elements: 1,
        });
    }
}
