//! GPU boundary for the Tessera batch renderer.
//!
//! The batching core never talks to `wgpu` directly. Everything it needs from
//! the GPU goes through the [`RenderContext`] trait, which has a real
//! implementation in `tessera-render` and a recording mock here.
//!
//! - [`RenderContext`] - object-safe trait for buffer, texture, uniform and draw operations
//! - [`GpuBuffer`], [`GpuTexture`] - owned handles that are either real or mock
//! - [`DrawCall`] - a fully resolved draw, the only unit the context ever draws
//! - `MockRenderContext` - records every call (requires the `mock` feature)
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "mock")]
//! # {
//! use tessera_test_utils::{MockRenderContext, RenderContext};
//! use wgpu::*;
//!
//! let mock = MockRenderContext::new();
//! let buffer = mock.create_buffer(&BufferDescriptor {
//!     label: Some("vertices"),
//!     size: 1024,
//!     usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
//!     mapped_at_creation: false,
//! });
//! mock.write_buffer(&buffer, 0, &[0u8; 64]);
//!
//! assert!(buffer.is_mock());
//! assert_eq!(mock.count_buffer_writes(), 1);
//! # }
//! ```

pub mod gpu_types;
#[cfg(feature = "mock")]
pub mod mock_render;
pub mod render_context;

pub use gpu_types::*;
#[cfg(feature = "mock")]
pub use mock_render::*;
pub use render_context::*;
