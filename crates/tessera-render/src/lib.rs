//! Tessera Render
//!
//! An immediate-mode 2D batch renderer for use inside a larger 3D engine.
//! Client code submits quads, circles, lines and text each frame; the
//! [`BatchRenderer`] packs them into per-kind staging buffers, shares a bounded
//! table of texture slots between heterogeneous draws, and emits the fewest
//! draw calls its configured limits allow.
//!
//! Draw calls are not issued inline. Every flush produces a self-contained
//! [`DrawCommand`] that is sent over a [`CommandQueue`] to a render thread,
//! where a [`CommandExecutor`] replays it against a [`RenderContext`].
//!
//! ```rust,ignore
//! let (queue, receiver) = command_queue();
//! let mut renderer = BatchRenderer::new(context.clone(), BatchRendererConfig::default(), queue)?;
//! let render_thread = RenderThread::spawn(context, receiver)?;
//!
//! renderer.begin_session(camera.view_projection(), camera.view())?;
//! renderer.submit_quad_at(Vec3::ZERO, Vec2::ONE, 0.0, &QuadParams::default())?;
//! renderer.end_session()?;
//! ```

mod batch;
mod capacity;
mod color;
mod command;
mod config;
mod context;
mod context_impl;
mod error;
mod executor;
mod fullscreen;
mod renderer;
mod session;
mod shaders;
mod slots;
mod staging;
mod stats;
mod text;
mod texture;
mod vertex;

pub use batch::circle::CircleParams;
pub use batch::quad::{QUAD_CORNERS, QUAD_TEX_COORDS, QuadParams, quad_transform};
pub use capacity::{CapacityTable, KindCapacity, MAX_ELEMENTS, PrimitiveKind};
pub use color::Color;
pub use command::{CommandQueue, CommandReceiver, DrawCommand, RenderCommand, command_queue};
pub use config::{BatchRendererConfig, DEFAULT_TEXTURE_SLOTS, MAX_TEXTURE_SLOTS};
pub use context::{GraphicsContext, GraphicsContextDescriptor};
pub use context_impl::{VIEW_PROJECTION_UNIFORM, WgpuRenderContext};
pub use error::{BatchError, GraphicsError};
pub use executor::{CommandExecutor, ExecutorStats, RenderThread};
pub use renderer::BatchRenderer;
pub use session::{FrameBatch, SessionState};
pub use slots::TextureSlotTable;
pub use staging::StagingBuffer;
pub use stats::{BatchStats, RenderStats};
pub use text::{Font, Glyph, TextParams};
pub use texture::{TextureHandle, TextureRegistry};
pub use vertex::{CircleVertex, FullscreenVertex, GlyphVertex, LineVertex, QuadVertex};

pub use tessera_core::math::{CameraBasis, Mat4, Vec2, Vec3, Vec4};
pub use tessera_test_utils::{
    DrawCall, GpuBuffer, GpuTexture, RenderContext, ShaderProgram, Topology,
};
