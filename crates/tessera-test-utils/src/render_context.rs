//! Trait abstracting GPU operations.
//!
//! The [`RenderContext`] trait is the whole surface the batch renderer needs
//! from a GPU: buffers, textures, one uniform per program and indexed or
//! non-indexed draws. Implementations exist for `wgpu` and for testing.

use crate::gpu_types::*;
use wgpu::{BufferDescriptor, BufferUsages, TextureDescriptor};

/// Trait abstracting GPU resource creation and draw submission.
///
/// # Lifetime Considerations
///
/// All returned types are owned and reference counted internally, so the
/// trait carries no lifetimes and is object-safe (`Arc<dyn RenderContext>`).
///
/// # Threading
///
/// Methods take `&self`. Resource creation may happen on any thread; uploads
/// and draws are issued by the render thread in the order their commands
/// were enqueued.
///
/// # Example
///
/// ```rust,no_run
/// use tessera_test_utils::RenderContext;
/// use wgpu::{BufferDescriptor, BufferUsages};
///
/// fn upload(ctx: &dyn RenderContext, bytes: &[u8]) {
///     let buffer = ctx.create_buffer(&BufferDescriptor {
///         label: Some("staging"),
///         size: bytes.len() as u64,
///         usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
///         mapped_at_creation: false,
///     });
///     ctx.write_buffer(&buffer, 0, bytes);
/// }
/// ```
pub trait RenderContext: Send + Sync {
    // Buffer operations

    /// Create an uninitialized GPU buffer.
    fn create_buffer(&self, desc: &BufferDescriptor) -> GpuBuffer;

    /// Create a GPU buffer initialized with `contents`.
    fn create_buffer_init(
        &self,
        label: Option<&str>,
        contents: &[u8],
        usage: BufferUsages,
    ) -> GpuBuffer;

    /// Write data to a buffer at `offset`.
    fn write_buffer(&self, buffer: &GpuBuffer, offset: u64, data: &[u8]);

    // Texture operations

    /// Create a sampled GPU texture.
    fn create_texture(&self, desc: &TextureDescriptor) -> GpuTexture;

    /// Replace the full contents of mip level 0 with tightly packed texel rows.
    fn write_texture(&self, texture: &GpuTexture, data: &[u8]);

    // Program operations

    /// Set a 4x4 matrix uniform (column-major) on a program.
    fn set_uniform_mat4(&self, program: ShaderProgram, name: &str, value: [[f32; 4]; 4]);

    /// Bind the call's program and textures and issue one draw.
    fn draw(&self, call: &DrawCall);
}
