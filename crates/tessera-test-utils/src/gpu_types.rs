//! GPU resource wrappers that can be real or mock.
//!
//! The batch renderer holds these as owned values and clones them into draw
//! commands, so they must be cheap to clone (wgpu resources are reference
//! counted internally) and carry no lifetimes.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

/// Wrapper around a GPU buffer that can be real or mock.
#[derive(Clone, Debug)]
pub struct GpuBuffer {
    inner: GpuBufferInner,
}

#[derive(Clone, Debug)]
enum GpuBufferInner {
    Real(wgpu::Buffer),
    #[cfg(feature = "mock")]
    Mock { id: usize, size: u64 },
}

impl GpuBuffer {
    /// Create from a real wgpu buffer.
    pub fn from_wgpu(buffer: wgpu::Buffer) -> Self {
        Self {
            inner: GpuBufferInner::Real(buffer),
        }
    }

    /// Create a mock buffer (for testing).
    #[cfg(feature = "mock")]
    pub fn mock(id: usize, size: u64) -> Self {
        Self {
            inner: GpuBufferInner::Mock { id, size },
        }
    }

    /// Size of the buffer in bytes.
    pub fn size(&self) -> u64 {
        match &self.inner {
            GpuBufferInner::Real(buffer) => buffer.size(),
            #[cfg(feature = "mock")]
            GpuBufferInner::Mock { size, .. } => *size,
        }
    }

    /// Get the underlying wgpu buffer, or `None` for a mock buffer.
    pub fn try_wgpu(&self) -> Option<&wgpu::Buffer> {
        match &self.inner {
            GpuBufferInner::Real(buffer) => Some(buffer),
            #[cfg(feature = "mock")]
            GpuBufferInner::Mock { .. } => None,
        }
    }

    /// Get the underlying wgpu buffer.
    ///
    /// # Panics
    /// Panics if this is a mock buffer (test code should never call this).
    pub fn as_wgpu(&self) -> &wgpu::Buffer {
        self.try_wgpu()
            .expect("Attempted to get wgpu::Buffer from mock buffer - this is a test-only buffer")
    }

    /// Check if this is a mock.
    #[cfg(feature = "mock")]
    pub fn is_mock(&self) -> bool {
        matches!(self.inner, GpuBufferInner::Mock { .. })
    }

    /// Get the mock ID (for test assertions).
    #[cfg(feature = "mock")]
    pub fn mock_id(&self) -> Option<usize> {
        match &self.inner {
            GpuBufferInner::Mock { id, .. } => Some(*id),
            _ => None,
        }
    }
}

/// Wrapper around a sampled GPU texture that can be real or mock.
///
/// Two `GpuTexture`s are equal when they refer to the same GPU object; clones
/// compare equal, separately created textures never do.
#[derive(Clone, Debug)]
pub struct GpuTexture {
    id: u64,
    width: u32,
    height: u32,
    inner: GpuTextureInner,
}

#[derive(Clone, Debug)]
enum GpuTextureInner {
    Real {
        texture: wgpu::Texture,
        view: wgpu::TextureView,
    },
    #[cfg(feature = "mock")]
    Mock { format: wgpu::TextureFormat },
}

impl GpuTexture {
    /// Create from a real wgpu texture, with a default full view.
    pub fn from_wgpu(texture: wgpu::Texture) -> Self {
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let size = texture.size();
        Self {
            id: NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed),
            width: size.width,
            height: size.height,
            inner: GpuTextureInner::Real { texture, view },
        }
    }

    /// Create a mock texture (for testing).
    #[cfg(feature = "mock")]
    pub fn mock(id: u64, width: u32, height: u32, format: wgpu::TextureFormat) -> Self {
        Self {
            // Keep mock ids out of the range handed to real textures.
            id: id | (1 << 63),
            width,
            height,
            inner: GpuTextureInner::Mock { format },
        }
    }

    /// Process-unique identity of the underlying GPU object.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the underlying texture and view, or `None` for a mock texture.
    pub fn try_wgpu(&self) -> Option<(&wgpu::Texture, &wgpu::TextureView)> {
        match &self.inner {
            GpuTextureInner::Real { texture, view } => Some((texture, view)),
            #[cfg(feature = "mock")]
            GpuTextureInner::Mock { .. } => None,
        }
    }

    /// Get the underlying wgpu texture.
    ///
    /// # Panics
    /// Panics if this is a mock texture.
    pub fn as_wgpu(&self) -> &wgpu::Texture {
        self.try_wgpu()
            .map(|(texture, _)| texture)
            .expect("Attempted to get wgpu::Texture from mock texture")
    }

    /// Get the default view of the underlying wgpu texture.
    ///
    /// # Panics
    /// Panics if this is a mock texture.
    pub fn view(&self) -> &wgpu::TextureView {
        self.try_wgpu()
            .map(|(_, view)| view)
            .expect("Attempted to get wgpu::TextureView from mock texture")
    }

    #[cfg(feature = "mock")]
    pub fn is_mock(&self) -> bool {
        matches!(self.inner, GpuTextureInner::Mock { .. })
    }

    /// Get the mock ID (for test assertions).
    #[cfg(feature = "mock")]
    pub fn mock_id(&self) -> Option<u64> {
        match &self.inner {
            GpuTextureInner::Mock { .. } => Some(self.id & !(1 << 63)),
            _ => None,
        }
    }

    /// Texture format of a mock texture.
    #[cfg(feature = "mock")]
    pub fn mock_format(&self) -> Option<wgpu::TextureFormat> {
        match &self.inner {
            GpuTextureInner::Mock { format } => Some(*format),
            _ => None,
        }
    }
}

impl PartialEq for GpuTexture {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for GpuTexture {}

/// The shader programs the batch renderer draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderProgram {
    Quad,
    Circle,
    Line,
    Text,
    Fullscreen,
}

impl ShaderProgram {
    pub const ALL: [ShaderProgram; 5] = [
        ShaderProgram::Quad,
        ShaderProgram::Circle,
        ShaderProgram::Line,
        ShaderProgram::Text,
        ShaderProgram::Fullscreen,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ShaderProgram::Quad => "Quad",
            ShaderProgram::Circle => "Circle",
            ShaderProgram::Line => "Line",
            ShaderProgram::Text => "Text",
            ShaderProgram::Fullscreen => "Fullscreen",
        }
    }
}

/// Primitive topology of a draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    TriangleList,
    TriangleStrip,
    LineList,
}

impl Topology {
    pub fn to_wgpu(self) -> wgpu::PrimitiveTopology {
        match self {
            Topology::TriangleList => wgpu::PrimitiveTopology::TriangleList,
            Topology::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
            Topology::LineList => wgpu::PrimitiveTopology::LineList,
        }
    }
}

/// One fully resolved draw.
///
/// `textures[i]` is bound to texture unit `i`. With an index buffer, `count`
/// is the number of indices to draw; without one, the number of vertices.
#[derive(Debug, Clone)]
pub struct DrawCall {
    pub program: ShaderProgram,
    pub topology: Topology,
    pub vertex_buffer: GpuBuffer,
    pub index_buffer: Option<GpuBuffer>,
    pub textures: Vec<GpuTexture>,
    pub count: u32,
}

impl DrawCall {
    pub fn is_indexed(&self) -> bool {
        self.index_buffer.is_some()
    }
}
