//! Text: six unindexed vertices per character and one texture slot per
//! rendered character.
//!
//! Slots are not deduplicated. The staging buffer holds exactly one glyph per
//! slot, so slot pressure is the only overflow condition.

use tessera_core::math::Vec2;
use tessera_core::profiling::profile_function;
use tessera_test_utils::{DrawCall, GpuBuffer, RenderContext, ShaderProgram, Topology};

use super::FlushContext;
use crate::capacity::{KindCapacity, PrimitiveKind};
use crate::command::DrawCommand;
use crate::slots::TextureSlotTable;
use crate::staging::StagingBuffer;
use crate::text::{Font, Glyph, TextParams};
use crate::vertex::GlyphVertex;

pub(crate) struct GlyphBatch {
    staging: StagingBuffer<GlyphVertex>,
    slots: TextureSlotTable,
    vertex_buffer: GpuBuffer,
}

impl GlyphBatch {
    /// `capacity.max_elements` is the texture slot limit: one glyph per slot.
    pub fn new(context: &dyn RenderContext, capacity: KindCapacity) -> Self {
        let vertex_buffer = context.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Text Batch Vertices"),
            size: (capacity.max_vertices as usize * std::mem::size_of::<GlyphVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            staging: StagingBuffer::new(capacity.max_vertices as usize),
            slots: TextureSlotTable::without_fallback(capacity.max_elements),
            vertex_buffer,
        }
    }

    pub fn submit_text(
        &mut self,
        ctx: &mut FlushContext<'_>,
        text: &str,
        font: &Font,
        params: &TextParams,
    ) {
        profile_function!();
        let scale = params.scale;
        let mut pen = params.position.truncate();

        for ch in text.chars() {
            if self.slots.is_full() {
                tracing::debug!(
                    "glyph batch out of texture slots ({}), flushing",
                    self.slots.limit()
                );
                self.flush(ctx);
            }

            if ch == '\n' {
                pen.x = params.position.x;
                pen.y -= font.line_height() * scale;
                continue;
            }
            if ch.is_control() {
                continue;
            }

            let Some(glyph) = font.glyph(ch) else {
                tracing::warn!("Font '{}' has no glyph for {:?}", font.name(), ch);
                continue;
            };

            if let Some(texture) = glyph.texture {
                let slot = self.slots.push(texture) as f32;
                self.staging
                    .extend_from_slice(&glyph_vertices(glyph, pen, scale, params, slot));
                ctx.stats.record_submit(PrimitiveKind::Glyph);
            }
            pen.x += glyph.advance * scale;
        }
    }

    pub fn flush(&mut self, ctx: &mut FlushContext<'_>) {
        if self.staging.is_empty() {
            return;
        }
        let textures = self
            .slots
            .textures()
            .iter()
            .map(|handle| ctx.textures.resolve(*handle))
            .collect();

        ctx.dispatch(DrawCommand {
            kind: Some(PrimitiveKind::Glyph),
            call: DrawCall {
                program: ShaderProgram::Text,
                topology: Topology::TriangleList,
                vertex_buffer: self.vertex_buffer.clone(),
                index_buffer: None,
                textures,
                count: self.staging.len() as u32,
            },
            vertices: self.staging.as_bytes().to_vec(),
            elements: self.slots.occupied(),
        });
        self.reset();
    }

    pub fn reset(&mut self) {
        self.staging.clear();
        self.slots.reset();
    }

    /// Glyphs staged since the last flush.
    pub fn pending(&self) -> u32 {
        self.slots.occupied()
    }
}

/// Two triangles covering the glyph, top-left first.
fn glyph_vertices(
    glyph: &Glyph,
    pen: Vec2,
    scale: f32,
    params: &TextParams,
    slot: f32,
) -> [GlyphVertex; 6] {
    let x = pen.x + glyph.bearing.x * scale;
    let y = pen.y - (glyph.size.y - glyph.bearing.y) * scale;
    let w = glyph.size.x * scale;
    let h = glyph.size.y * scale;
    let z = params.position.z;

    let corner = |px: f32, py: f32, u: f32, v: f32| GlyphVertex {
        position: [px, py, z],
        color: params.color.to_array(),
        tex_coord: [u, v],
        tex_index: slot,
        pick_id: params.pick_id,
    };
    [
        corner(x, y + h, 0.0, 0.0),
        corner(x, y, 0.0, 1.0),
        corner(x + w, y, 1.0, 1.0),
        corner(x, y + h, 0.0, 0.0),
        corner(x + w, y, 1.0, 1.0),
        corner(x + w, y + h, 1.0, 0.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::command::{RenderCommand, command_queue};
    use crate::stats::BatchStats;
    use crate::texture::{TextureHandle, TextureRegistry};
    use tessera_core::math::Vec3;
    use tessera_test_utils::MockRenderContext;

    fn font(registry: &mut TextureRegistry, ctx: &MockRenderContext, chars: &str) -> Font {
        let mut font = Font::new("test", 20.0);
        for ch in chars.chars() {
            let texture: Option<TextureHandle> = if ch == ' ' {
                None
            } else {
                Some(registry.register(TextureRegistry::create_white(ctx)))
            };
            font.insert(
                ch,
                Glyph {
                    texture,
                    size: Vec2::new(8.0, 10.0),
                    bearing: Vec2::new(1.0, 8.0),
                    advance: 10.0,
                },
            );
        }
        font
    }

    #[test]
    fn test_vertex_placement() {
        let glyph = Glyph {
            texture: None,
            size: Vec2::new(8.0, 10.0),
            bearing: Vec2::new(1.0, 8.0),
            advance: 10.0,
        };
        let params = TextParams::at(Vec3::new(100.0, 50.0, 0.5)).with_color(Color::RED);
        let vertices = glyph_vertices(&glyph, Vec2::new(100.0, 50.0), 2.0, &params, 4.0);

        // Descends 2 units below the baseline at scale 2.
        assert_eq!(vertices[1].position, [102.0, 46.0, 0.5]);
        assert_eq!(vertices[5].position, [118.0, 66.0, 0.5]);
        assert!(vertices.iter().all(|v| v.tex_index == 4.0));
    }

    #[test]
    fn test_repeated_glyphs_take_fresh_slots() {
        let ctx = MockRenderContext::new();
        let mut registry = TextureRegistry::new(TextureRegistry::create_white(&ctx));
        let font = font(&mut registry, &ctx, "a ");
        let mut stats = BatchStats::default();
        let (queue, receiver) = command_queue();
        let mut batch = GlyphBatch::new(&ctx, KindCapacity::new(PrimitiveKind::Glyph, 4).unwrap());
        let mut flush = FlushContext {
            queue: &queue,
            textures: &registry,
            stats: &mut stats,
        };

        batch.submit_text(&mut flush, "a a\na", &font, &TextParams::default());
        assert_eq!(batch.pending(), 3);
        batch.flush(&mut flush);

        let draws: Vec<_> = receiver
            .drain()
            .into_iter()
            .filter_map(|command| match command {
                RenderCommand::Draw(draw) => Some(draw),
                _ => None,
            })
            .collect();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].call.count, 18);
        assert_eq!(draws[0].call.textures.len(), 3);
        assert_eq!(stats.frame.glyphs, 3);
    }

    #[test]
    fn test_newline_moves_pen_down() {
        let ctx = MockRenderContext::new();
        let mut registry = TextureRegistry::new(TextureRegistry::create_white(&ctx));
        let font = font(&mut registry, &ctx, "a");
        let mut stats = BatchStats::default();
        let (queue, _receiver) = command_queue();
        let mut batch = GlyphBatch::new(&ctx, KindCapacity::new(PrimitiveKind::Glyph, 4).unwrap());
        let mut flush = FlushContext {
            queue: &queue,
            textures: &registry,
            stats: &mut stats,
        };

        batch.submit_text(&mut flush, "a\na", &font, &TextParams::default());
        let staged = batch.staging.vertices();
        assert_eq!(staged.len(), 12);
        // Second line starts back at x = bearing, one line height lower.
        assert_eq!(staged[6].position[0], staged[0].position[0]);
        assert_eq!(staged[6].position[1], staged[0].position[1] - 20.0);
    }

    #[test]
    fn test_unknown_glyph_is_skipped() {
        let ctx = MockRenderContext::new();
        let registry = TextureRegistry::new(TextureRegistry::create_white(&ctx));
        let font = Font::new("empty", 10.0);
        let mut stats = BatchStats::default();
        let (queue, receiver) = command_queue();
        let mut batch = GlyphBatch::new(&ctx, KindCapacity::new(PrimitiveKind::Glyph, 4).unwrap());
        let mut flush = FlushContext {
            queue: &queue,
            textures: &registry,
            stats: &mut stats,
        };

        batch.submit_text(&mut flush, "xyz", &font, &TextParams::default());
        batch.flush(&mut flush);
        assert!(receiver.drain().is_empty());
        assert_eq!(stats.frame.glyphs, 0);
    }
}
