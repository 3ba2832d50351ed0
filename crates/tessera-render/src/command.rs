//! Commands handed from the logic thread to the render thread.
//!
//! A flush never touches the GPU directly. It captures everything the draw
//! needs, including a copy of the staged vertex bytes, into a [`DrawCommand`]
//! and sends it down a FIFO channel. The batch is free to reset or reallocate
//! as soon as the command is enqueued.

use std::sync::mpsc::{self, Receiver, Sender, TryIter};

use tessera_test_utils::{DrawCall, ShaderProgram};

use crate::capacity::PrimitiveKind;
use crate::executor::CommandExecutor;

/// A self-contained draw: upload `vertices` to the call's vertex buffer, then
/// issue the call.
#[derive(Debug, Clone)]
pub struct DrawCommand {
    pub kind: Option<PrimitiveKind>,
    pub call: DrawCall,
    /// Staged vertex bytes, written at offset 0 of `call.vertex_buffer`.
    pub vertices: Vec<u8>,
    /// Logical elements in this draw.
    pub elements: u32,
}

#[derive(Debug, Clone)]
pub enum RenderCommand {
    /// Upload a session's camera matrix to one program.
    SetViewProjection {
        program: ShaderProgram,
        matrix: [[f32; 4]; 4],
    },
    Draw(DrawCommand),
    /// Marks the end of a session's commands.
    EndFrame,
}

/// Producer side of the command queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CommandQueue {
    sender: Sender<RenderCommand>,
}

impl CommandQueue {
    /// Enqueue a command. Returns `false` if the render side has hung up, in
    /// which case the command is dropped.
    pub fn enqueue(&self, command: RenderCommand) -> bool {
        match self.sender.send(command) {
            Ok(()) => true,
            Err(_) => {
                tracing::warn!("Render command queue disconnected; dropping command");
                false
            }
        }
    }
}

/// Consumer side of the command queue.
#[derive(Debug)]
pub struct CommandReceiver {
    receiver: Receiver<RenderCommand>,
}

impl CommandReceiver {
    /// Pending commands, without blocking.
    pub fn try_iter(&self) -> TryIter<'_, RenderCommand> {
        self.receiver.try_iter()
    }

    /// Collect every pending command.
    pub fn drain(&self) -> Vec<RenderCommand> {
        self.receiver.try_iter().collect()
    }

    /// Block for the next command. `None` once every producer is dropped.
    pub fn recv(&self) -> Option<RenderCommand> {
        self.receiver.recv().ok()
    }

    /// Execute every pending command on the calling thread.
    pub fn drain_into(&self, executor: &mut CommandExecutor) -> usize {
        let mut executed = 0;
        for command in self.receiver.try_iter() {
            executor.execute(command);
            executed += 1;
        }
        executed
    }
}

/// Create a connected queue pair.
pub fn command_queue() -> (CommandQueue, CommandReceiver) {
    let (sender, receiver) = mpsc::channel();
    (CommandQueue { sender }, CommandReceiver { receiver })
}
