//! Mock implementation of RenderContext for testing.
//!
//! Records every operation without touching a GPU, so tests can assert on
//! the exact sequence of uploads and draws a renderer produced.

use crate::{gpu_types::*, render_context::RenderContext};
use parking_lot::Mutex;
use wgpu::*;

/// A recorded draw, with GPU objects reduced to their mock ids.
#[derive(Debug, Clone, PartialEq)]
pub struct MockDraw {
    pub program: ShaderProgram,
    pub topology: Topology,
    pub vertex_buffer: usize,
    pub index_buffer: Option<usize>,
    /// Mock texture ids in texture-unit order.
    pub textures: Vec<u64>,
    pub count: u32,
}

/// Records a GPU operation call for verification in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    CreateBuffer {
        buffer_id: usize,
        size: u64,
        usage: BufferUsages,
    },
    CreateBufferInit {
        buffer_id: usize,
        size: u64,
        usage: BufferUsages,
    },
    WriteBuffer {
        buffer_id: usize,
        offset: u64,
        data: Vec<u8>,
    },
    CreateTexture {
        texture_id: u64,
        width: u32,
        height: u32,
        format: TextureFormat,
    },
    WriteTexture {
        texture_id: u64,
        size: usize,
    },
    SetUniform {
        program: ShaderProgram,
        name: String,
        value: [[f32; 4]; 4],
    },
    Draw(MockDraw),
}

#[derive(Default)]
struct MockState {
    calls: Vec<RenderCall>,
    next_buffer_id: usize,
    next_texture_id: u64,
}

/// Mock implementation of RenderContext for testing.
///
/// Methods take `&self` but need to record calls, so all state lives behind a
/// `parking_lot::Mutex` (the trait requires `Send + Sync`).
///
/// # Example
///
/// ```rust
/// use tessera_test_utils::{MockRenderContext, RenderContext};
/// use wgpu::*;
///
/// let mock = MockRenderContext::new();
/// let buffer = mock.create_buffer(&BufferDescriptor {
///     label: None,
///     size: 1024,
///     usage: BufferUsages::VERTEX,
///     mapped_at_creation: false,
/// });
///
/// assert!(buffer.is_mock());
/// assert_eq!(mock.count_buffer_creates(), 1);
/// ```
pub struct MockRenderContext {
    state: Mutex<MockState>,
}

impl MockRenderContext {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
        }
    }

    /// Get a copy of all recorded calls.
    pub fn calls(&self) -> Vec<RenderCall> {
        self.state.lock().calls.clone()
    }

    /// All recorded draws, in submission order.
    pub fn draws(&self) -> Vec<MockDraw> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                RenderCall::Draw(draw) => Some(draw.clone()),
                _ => None,
            })
            .collect()
    }

    /// Recorded draws issued with `program`.
    pub fn draws_for(&self, program: ShaderProgram) -> Vec<MockDraw> {
        self.draws()
            .into_iter()
            .filter(|draw| draw.program == program)
            .collect()
    }

    pub fn count_draws(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::Draw(_)))
    }

    pub fn count_buffer_creates(&self) -> usize {
        self.count(|call| {
            matches!(
                call,
                RenderCall::CreateBuffer { .. } | RenderCall::CreateBufferInit { .. }
            )
        })
    }

    pub fn count_buffer_writes(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::WriteBuffer { .. }))
    }

    pub fn count_texture_creates(&self) -> usize {
        self.count(|call| matches!(call, RenderCall::CreateTexture { .. }))
    }

    /// Data of every write to `buffer_id`, in order.
    pub fn buffer_writes(&self, buffer_id: usize) -> Vec<Vec<u8>> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                RenderCall::WriteBuffer {
                    buffer_id: id,
                    data,
                    ..
                } if *id == buffer_id => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    /// Uniform uploads as `(program, name, value)`, in order.
    pub fn uniforms(&self) -> Vec<(ShaderProgram, String, [[f32; 4]; 4])> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                RenderCall::SetUniform {
                    program,
                    name,
                    value,
                } => Some((*program, name.clone(), *value)),
                _ => None,
            })
            .collect()
    }

    /// Clear recorded calls (useful between test steps). Ids keep counting.
    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    fn count(&self, predicate: impl Fn(&RenderCall) -> bool) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| predicate(call))
            .count()
    }

    fn next_buffer(state: &mut MockState) -> usize {
        let id = state.next_buffer_id;
        state.next_buffer_id += 1;
        id
    }
}

impl Default for MockRenderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderContext for MockRenderContext {
    fn create_buffer(&self, desc: &BufferDescriptor) -> GpuBuffer {
        let mut state = self.state.lock();
        let buffer_id = Self::next_buffer(&mut state);
        state.calls.push(RenderCall::CreateBuffer {
            buffer_id,
            size: desc.size,
            usage: desc.usage,
        });
        GpuBuffer::mock(buffer_id, desc.size)
    }

    fn create_buffer_init(
        &self,
        _label: Option<&str>,
        contents: &[u8],
        usage: BufferUsages,
    ) -> GpuBuffer {
        let mut state = self.state.lock();
        let buffer_id = Self::next_buffer(&mut state);
        let size = contents.len() as u64;
        state.calls.push(RenderCall::CreateBufferInit {
            buffer_id,
            size,
            usage,
        });
        GpuBuffer::mock(buffer_id, size)
    }

    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]) {
        if let Some(buffer_id) = buffer.mock_id() {
            debug_assert!(
                offset + data.len() as u64 <= buffer.size(),
                "write of {} bytes at {} overflows buffer {} of {} bytes",
                data.len(),
                offset,
                buffer_id,
                buffer.size()
            );
            self.state.lock().calls.push(RenderCall::WriteBuffer {
                buffer_id,
                offset,
                data: data.to_vec(),
            });
        }
    }

    fn create_texture(&self, desc: &TextureDescriptor) -> GpuTexture {
        let mut state = self.state.lock();
        let texture_id = state.next_texture_id;
        state.next_texture_id += 1;
        state.calls.push(RenderCall::CreateTexture {
            texture_id,
            width: desc.size.width,
            height: desc.size.height,
            format: desc.format,
        });
        GpuTexture::mock(texture_id, desc.size.width, desc.size.height, desc.format)
    }

    fn write_texture(&self, texture: &GpuTexture, data: &[u8]) {
        if let Some(texture_id) = texture.mock_id() {
            self.state.lock().calls.push(RenderCall::WriteTexture {
                texture_id,
                size: data.len(),
            });
        }
    }

    fn set_uniform_mat4(&self, program: ShaderProgram, name: &str, value: [[f32; 4]; 4]) {
        self.state.lock().calls.push(RenderCall::SetUniform {
            program,
            name: name.to_string(),
            value,
        });
    }

    fn draw(&self, call: &DrawCall) {
        let draw = MockDraw {
            program: call.program,
            topology: call.topology,
            vertex_buffer: call.vertex_buffer.mock_id().unwrap_or(usize::MAX),
            index_buffer: call.index_buffer.as_ref().and_then(GpuBuffer::mock_id),
            textures: call
                .textures
                .iter()
                .map(|texture| texture.mock_id().unwrap_or(u64::MAX))
                .collect(),
            count: call.count,
        };
        self.state.lock().calls.push(RenderCall::Draw(draw));
    }
}
