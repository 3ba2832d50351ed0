//! Line segments: two vertices each, no textures, no index buffer.

use tessera_core::math::Vec3;
use tessera_core::profiling::profile_function;
use tessera_test_utils::{DrawCall, GpuBuffer, RenderContext, ShaderProgram, Topology};

use super::FlushContext;
use crate::capacity::{KindCapacity, PrimitiveKind};
use crate::color::Color;
use crate::command::DrawCommand;
use crate::staging::StagingBuffer;
use crate::vertex::LineVertex;

pub(crate) struct LineBatch {
    capacity: KindCapacity,
    staging: StagingBuffer<LineVertex>,
    vertex_buffer: GpuBuffer,
}

impl LineBatch {
    pub fn new(context: &dyn RenderContext, capacity: KindCapacity) -> Self {
        debug_assert!(capacity.is_enabled());
        let vertex_buffer = context.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Line Batch Vertices"),
            size: (capacity.max_vertices as usize * std::mem::size_of::<LineVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            capacity,
            staging: StagingBuffer::new(capacity.max_vertices as usize),
            vertex_buffer,
        }
    }

    pub fn submit(
        &mut self,
        ctx: &mut FlushContext<'_>,
        p0: Vec3,
        p1: Vec3,
        color: Color,
        pick_id: u32,
    ) {
        profile_function!();
        if self.staging.len() as u32 >= self.capacity.max_vertices {
            tracing::debug!(
                "line batch full ({} vertices), flushing",
                self.staging.len()
            );
            self.flush(ctx);
        }

        let color = color.to_array();
        self.staging.extend_from_slice(&[
            LineVertex {
                position: p0.to_array(),
                color,
                pick_id,
            },
            LineVertex {
                position: p1.to_array(),
                color,
                pick_id,
            },
        ]);
        ctx.stats.record_submit(PrimitiveKind::Line);
    }

    pub fn flush(&mut self, ctx: &mut FlushContext<'_>) {
        if self.staging.is_empty() {
            return;
        }
        let vertex_count = self.staging.len() as u32;
        ctx.dispatch(DrawCommand {
            kind: Some(PrimitiveKind::Line),
            call: DrawCall {
                program: ShaderProgram::Line,
                topology: Topology::LineList,
                vertex_buffer: self.vertex_buffer.clone(),
                index_buffer: None,
                textures: Vec::new(),
                count: vertex_count,
            },
            vertices: self.staging.as_bytes().to_vec(),
            elements: vertex_count / PrimitiveKind::Line.vertices_per_element(),
        });
        self.reset();
    }

    pub fn reset(&mut self) {
        self.staging.clear();
    }

    /// Segments staged since the last flush.
    pub fn pending(&self) -> u32 {
        self.staging.len() as u32 / PrimitiveKind::Line.vertices_per_element()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{RenderCommand, command_queue};
    use crate::stats::BatchStats;
    use crate::texture::TextureRegistry;
    use tessera_test_utils::MockRenderContext;

    #[test]
    fn test_line_overflow_by_vertex_count() {
        let ctx = MockRenderContext::new();
        let registry = TextureRegistry::new(TextureRegistry::create_white(&ctx));
        let mut stats = BatchStats::default();
        let (queue, receiver) = command_queue();
        let mut batch = LineBatch::new(&ctx, KindCapacity::new(PrimitiveKind::Line, 2).unwrap());
        let mut flush = FlushContext {
            queue: &queue,
            textures: &registry,
            stats: &mut stats,
        };

        for i in 0..5 {
            let x = i as f32;
            batch.submit(
                &mut flush,
                Vec3::new(x, 0.0, 0.0),
                Vec3::new(x, 1.0, 0.0),
                Color::GREEN,
                i,
            );
        }
        assert_eq!(batch.pending(), 1);
        batch.flush(&mut flush);

        let counts: Vec<u32> = receiver
            .drain()
            .into_iter()
            .filter_map(|command| match command {
                RenderCommand::Draw(draw) => {
                    assert_eq!(draw.call.topology, Topology::LineList);
                    assert!(draw.call.textures.is_empty());
                    assert!(!draw.call.is_indexed());
                    Some(draw.call.count)
                }
                _ => None,
            })
            .collect();
        assert_eq!(counts, vec![4, 4, 2]);
        assert_eq!(stats.frame.lines, 5);
        assert_eq!(stats.frame.indices, 0);
    }
}
