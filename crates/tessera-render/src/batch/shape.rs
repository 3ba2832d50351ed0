//! Shared submit and flush algorithm of the quad and circle batches.

use bytemuck::Pod;
use tessera_core::profiling::profile_function;
use tessera_test_utils::{DrawCall, GpuBuffer, RenderContext, Topology};

use super::FlushContext;
use crate::capacity::{KindCapacity, PrimitiveKind};
use crate::command::DrawCommand;
use crate::slots::TextureSlotTable;
use crate::staging::StagingBuffer;
use crate::texture::TextureHandle;

/// Index pattern of one element, offset by 4 per element.
const QUAD_INDEX_PATTERN: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// Generate the immutable index list for `max_elements` quads.
///
/// `max_elements` is bounded by [`MAX_ELEMENTS`](crate::capacity::MAX_ELEMENTS),
/// so every index fits in `u32`.
pub(crate) fn quad_indices(max_elements: u32) -> Vec<u32> {
    (0..max_elements)
        .flat_map(|element| QUAD_INDEX_PATTERN.map(|index| element * 4 + index))
        .collect()
}

/// A batch of four-vertex, six-index elements with deduplicated textures.
pub(crate) struct ShapeBatch<V: Pod> {
    kind: PrimitiveKind,
    capacity: KindCapacity,
    staging: StagingBuffer<V>,
    slots: TextureSlotTable,
    index_count: u32,
    vertex_buffer: GpuBuffer,
    index_buffer: GpuBuffer,
}

impl<V: Pod> ShapeBatch<V> {
    /// Allocate the staging buffer and GPU buffers. The index buffer is
    /// generated and uploaded here, once.
    pub fn new(
        context: &dyn RenderContext,
        kind: PrimitiveKind,
        capacity: KindCapacity,
        slot_limit: u32,
    ) -> Self {
        debug_assert!(capacity.is_enabled());
        let label = format!("{} Batch", kind.program().label());
        let vertex_buffer = context.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} Vertices", label)),
            size: (capacity.max_vertices as usize * std::mem::size_of::<V>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let indices = quad_indices(capacity.max_elements);
        let index_buffer = context.create_buffer_init(
            Some(&format!("{} Indices", label)),
            bytemuck::cast_slice(&indices),
            wgpu::BufferUsages::INDEX,
        );

        Self {
            kind,
            capacity,
            staging: StagingBuffer::new(capacity.max_vertices as usize),
            slots: TextureSlotTable::with_fallback(slot_limit),
            index_count: 0,
            vertex_buffer,
            index_buffer,
        }
    }

    /// Stage one element.
    ///
    /// `build` receives the resolved texture slot and returns the element's
    /// four vertices. Flushes first if the batch is out of indices, or if the
    /// texture needs a slot and none is free.
    pub fn submit(
        &mut self,
        ctx: &mut FlushContext<'_>,
        texture: Option<TextureHandle>,
        build: impl FnOnce(f32) -> [V; 4],
    ) {
        profile_function!();
        if self.index_count >= self.capacity.max_indices {
            tracing::debug!(
                "{} batch full ({} indices), flushing",
                self.kind,
                self.index_count
            );
            self.flush(ctx);
        }

        let slot = match texture {
            None => 0,
            Some(handle) => match self.slots.find(handle) {
                Some(slot) => slot,
                None => {
                    if self.slots.is_full() {
                        tracing::debug!(
                            "{} batch out of texture slots ({}), flushing",
                            self.kind,
                            self.slots.limit()
                        );
                        self.flush(ctx);
                    }
                    self.slots.push(handle)
                }
            },
        };

        self.staging.extend_from_slice(&build(slot as f32));
        self.index_count += self.kind.indices_per_element();
        ctx.stats.record_submit(self.kind);
    }

    /// Turn the staged elements into one indexed draw and reset.
    pub fn flush(&mut self, ctx: &mut FlushContext<'_>) {
        if self.staging.is_empty() {
            return;
        }
        profile_function!();

        let mut textures = Vec::with_capacity(self.slots.occupied() as usize);
        textures.push(ctx.textures.white_texture().clone());
        textures.extend(
            self.slots
                .textures()
                .iter()
                .map(|handle| ctx.textures.resolve(*handle)),
        );

        ctx.dispatch(DrawCommand {
            kind: Some(self.kind),
            call: DrawCall {
                program: self.kind.program(),
                topology: Topology::TriangleList,
                vertex_buffer: self.vertex_buffer.clone(),
                index_buffer: Some(self.index_buffer.clone()),
                textures,
                count: self.index_count,
            },
            vertices: self.staging.as_bytes().to_vec(),
            elements: self.index_count / self.kind.indices_per_element(),
        });
        self.reset();
    }

    /// Rewind the cursor and slot table without drawing.
    pub fn reset(&mut self) {
        self.staging.clear();
        self.slots.reset();
        self.index_count = 0;
    }

    /// Elements staged since the last flush.
    pub fn pending(&self) -> u32 {
        self.index_count / self.kind.indices_per_element()
    }

    pub fn slots(&self) -> &TextureSlotTable {
        &self.slots
    }

    #[cfg(test)]
    pub fn staged(&self) -> &[V] {
        self.staging.vertices()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{RenderCommand, command_queue};
    use crate::stats::BatchStats;
    use crate::texture::TextureRegistry;
    use tessera_test_utils::MockRenderContext;

    type TestBatch = ShapeBatch<[f32; 2]>;

    fn corners(slot: f32) -> [[f32; 2]; 4] {
        [[slot, 0.0]; 4]
    }

    struct Harness {
        ctx: MockRenderContext,
        registry: TextureRegistry,
        stats: BatchStats,
    }

    impl Harness {
        fn new() -> Self {
            let ctx = MockRenderContext::new();
            let registry = TextureRegistry::new(TextureRegistry::create_white(&ctx));
            Self {
                ctx,
                registry,
                stats: BatchStats::default(),
            }
        }

        fn batch(&self, max_elements: u32, slot_limit: u32) -> TestBatch {
            ShapeBatch::new(
                &self.ctx,
                PrimitiveKind::Quad,
                KindCapacity::new(PrimitiveKind::Quad, max_elements).unwrap(),
                slot_limit,
            )
        }

        fn texture(&mut self) -> TextureHandle {
            let texture = TextureRegistry::create_white(&self.ctx);
            self.registry.register(texture)
        }
    }

    fn draws(receiver: &crate::command::CommandReceiver) -> Vec<DrawCommand> {
        receiver
            .drain()
            .into_iter()
            .filter_map(|command| match command {
                RenderCommand::Draw(draw) => Some(draw),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_quad_indices_pattern() {
        assert_eq!(quad_indices(2), vec![0, 1, 2, 2, 3, 0, 4, 5, 6, 6, 7, 4]);
        assert!(quad_indices(0).is_empty());
    }

    #[test]
    fn test_capacity_overflow_flushes() {
        let mut h = Harness::new();
        let mut batch = h.batch(2, 4);
        let (queue, receiver) = command_queue();
        let mut flush = FlushContext {
            queue: &queue,
            textures: &h.registry,
            stats: &mut h.stats,
        };

        for _ in 0..3 {
            batch.submit(&mut flush, None, corners);
        }
        batch.flush(&mut flush);

        let draws = draws(&receiver);
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].call.count, 12);
        assert_eq!(draws[1].call.count, 6);
        assert_eq!(draws[0].vertices.len(), 4 * 8 * 2);
        assert_eq!(h.stats.frame.draw_calls, 2);
    }

    #[test]
    fn test_dedup_reuses_slot() {
        let mut h = Harness::new();
        let texture = h.texture();
        let mut batch = h.batch(10, 4);
        let (queue, _receiver) = command_queue();
        let mut flush = FlushContext {
            queue: &queue,
            textures: &h.registry,
            stats: &mut h.stats,
        };

        for _ in 0..3 {
            batch.submit(&mut flush, Some(texture), corners);
        }

        assert_eq!(batch.slots().occupied(), 2);
        assert!(batch.staged().iter().all(|v| v[0] == 1.0));
    }

    #[test]
    fn test_slot_exhaustion_flushes_before_assigning() {
        let mut h = Harness::new();
        let textures: Vec<_> = (0..4).map(|_| h.texture()).collect();
        let mut batch = h.batch(100, 4);
        let (queue, receiver) = command_queue();
        let mut flush = FlushContext {
            queue: &queue,
            textures: &h.registry,
            stats: &mut h.stats,
        };

        for texture in &textures {
            batch.submit(&mut flush, Some(*texture), corners);
        }

        let first = draws(&receiver);
        assert_eq!(first.len(), 1);
        // White plus three caller textures.
        assert_eq!(first[0].call.textures.len(), 4);
        assert_eq!(first[0].elements, 3);
        assert_eq!(batch.slots().textures(), &textures[3..]);
        assert!(batch.staged().iter().all(|v| v[0] == 1.0));
    }

    #[test]
    fn test_empty_flush_is_noop() {
        let mut h = Harness::new();
        let mut batch = h.batch(4, 4);
        let (queue, receiver) = command_queue();
        let mut flush = FlushContext {
            queue: &queue,
            textures: &h.registry,
            stats: &mut h.stats,
        };

        batch.flush(&mut flush);
        assert!(receiver.drain().is_empty());
        assert_eq!(h.stats.frame.draw_calls, 0);
    }
}
