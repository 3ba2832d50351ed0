use crate::capacity::PrimitiveKind;
use crate::texture::TextureHandle;

/// Programmer errors reported by the batch renderer.
///
/// Running out of batch capacity or texture slots is not an error; those are
/// handled by flushing and never surface to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchError {
    /// `begin_session` was called while a session was already open.
    SessionAlreadyActive,
    /// A submission or `end_session` happened outside a session.
    SessionNotActive,
    /// The kind was configured with zero capacity.
    KindDisabled(PrimitiveKind),
    /// A capacity change was requested while a session was open.
    CapacityChangeDuringSession(PrimitiveKind),
    /// The requested capacity overflows the kind's vertex or index count.
    CapacityTooLarge {
        kind: PrimitiveKind,
        requested: u32,
        max: u32,
    },
    /// The configured texture slot limit is outside the supported range.
    TextureSlotLimit { requested: u32, max: u32 },
    /// The texture handle does not refer to a registered texture.
    StaleTexture(TextureHandle),
}

impl std::fmt::Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchError::SessionAlreadyActive => {
                write!(f, "A batch session is already active; sessions cannot be nested")
            }
            BatchError::SessionNotActive => write!(f, "No batch session is active"),
            BatchError::KindDisabled(kind) => {
                write!(f, "The {} batch is disabled (capacity 0)", kind)
            }
            BatchError::CapacityChangeDuringSession(kind) => write!(
                f,
                "Cannot change the {} batch capacity while a session is active",
                kind
            ),
            BatchError::CapacityTooLarge {
                kind,
                requested,
                max,
            } => write!(
                f,
                "Capacity {} for the {} batch is too large (at most {})",
                requested, kind, max
            ),
            BatchError::TextureSlotLimit { requested, max } => write!(
                f,
                "Texture slot limit {} is out of range (expected 2..={})",
                requested, max
            ),
            BatchError::StaleTexture(handle) => write!(
                f,
                "Texture handle {}v{} is not registered",
                handle.index(),
                handle.generation()
            ),
        }
    }
}

impl std::error::Error for BatchError {}

/// Errors creating a [`GraphicsContext`](crate::GraphicsContext).
#[derive(Debug, Clone)]
pub enum GraphicsError {
    /// No adapter matched the requested options.
    NoAdapter,
    /// The adapter refused to create a device.
    DeviceCreation(String),
}

impl std::fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphicsError::NoAdapter => write!(f, "No suitable GPU adapter found"),
            GraphicsError::DeviceCreation(msg) => write!(f, "Failed to create device: {}", msg),
        }
    }
}

impl std::error::Error for GraphicsError {}
