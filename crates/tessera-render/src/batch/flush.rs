use crate::command::{CommandQueue, DrawCommand, RenderCommand};
use crate::stats::BatchStats;
use crate::texture::TextureRegistry;

/// What a batch needs from its renderer to flush.
///
/// Borrowed field by field from the renderer so a batch can be mutated while
/// the queue, registry and stats are in use.
pub(crate) struct FlushContext<'a> {
    pub queue: &'a CommandQueue,
    pub textures: &'a TextureRegistry,
    pub stats: &'a mut BatchStats,
}

impl FlushContext<'_> {
    /// Hand a finished draw to the render thread and count it.
    pub fn dispatch(&mut self, command: DrawCommand) {
        tracing::trace!(
            "Flushing {} batch: {} elements, {} bytes, {} textures",
            command.call.program.label(),
            command.elements,
            command.vertices.len(),
            command.call.textures.len()
        );
        self.stats.record_draw_call();
        self.queue.enqueue(RenderCommand::Draw(command));
    }
}
