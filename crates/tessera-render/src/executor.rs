//! Render-thread side of the command queue.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tessera_core::profiling::profile_function;
use tessera_test_utils::RenderContext;

use crate::command::{CommandReceiver, RenderCommand};
use crate::context_impl::VIEW_PROJECTION_UNIFORM;

/// Counts of work an executor has performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutorStats {
    pub draws: u64,
    pub uploads: u64,
    pub uniforms: u64,
    pub frames: u64,
}

/// Replays [`RenderCommand`]s against a [`RenderContext`] in enqueue order.
pub struct CommandExecutor {
    context: Arc<dyn RenderContext>,
    stats: ExecutorStats,
}

impl CommandExecutor {
    pub fn new(context: Arc<dyn RenderContext>) -> Self {
        Self {
            context,
            stats: ExecutorStats::default(),
        }
    }

    pub fn execute(&mut self, command: RenderCommand) {
        profile_function!();
        match command {
            RenderCommand::SetViewProjection { program, matrix } => {
                self.context
                    .set_uniform_mat4(program, VIEW_PROJECTION_UNIFORM, matrix);
                self.stats.uniforms += 1;
            }
            RenderCommand::Draw(draw) => {
                if !draw.vertices.is_empty() {
                    self.context
                        .write_buffer(&draw.call.vertex_buffer, 0, &draw.vertices);
                    self.stats.uploads += 1;
                }
                tracing::trace!(
                    "Executing {} draw: {} elements, count {}",
                    draw.call.program.label(),
                    draw.elements,
                    draw.call.count
                );
                self.context.draw(&draw.call);
                self.stats.draws += 1;
            }
            RenderCommand::EndFrame => {
                self.stats.frames += 1;
            }
        }
    }

    pub fn stats(&self) -> ExecutorStats {
        self.stats
    }
}

/// A dedicated thread draining a [`CommandReceiver`].
///
/// The thread exits once every [`CommandQueue`](crate::CommandQueue) is
/// dropped and the remaining commands have run.
pub struct RenderThread {
    handle: JoinHandle<ExecutorStats>,
}

impl RenderThread {
    pub fn spawn(
        context: Arc<dyn RenderContext>,
        receiver: CommandReceiver,
    ) -> std::io::Result<Self> {
        let handle = thread::Builder::new()
            .name("tessera-render".to_string())
            .spawn(move || {
                let mut executor = CommandExecutor::new(context);
                while let Some(command) = receiver.recv() {
                    executor.execute(command);
                }
                tracing::debug!("Render thread exiting: {:?}", executor.stats());
                executor.stats()
            })?;
        Ok(Self { handle })
    }

    /// Wait for the thread to finish and return what it executed.
    pub fn join(self) -> thread::Result<ExecutorStats> {
        self.handle.join()
    }
}
