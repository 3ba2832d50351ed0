//! Renderer configuration.

use crate::capacity::{KindCapacity, PrimitiveKind};
use crate::error::BatchError;

/// Upper bound on texture slots per draw call, whatever the hardware reports.
pub const MAX_TEXTURE_SLOTS: u32 = 32;

/// Default texture slots per draw call.
///
/// Matches the default `max_sampled_textures_per_shader_stage` in `wgpu::Limits`.
pub const DEFAULT_TEXTURE_SLOTS: u32 = 16;

/// Capacities and limits the batch renderer is built with.
///
/// The renderer never queries the GPU for limits; these constants are the
/// whole truth for its overflow decisions. A capacity of zero disables that
/// primitive kind.
///
/// ```
/// use tessera_render::BatchRendererConfig;
///
/// let config = BatchRendererConfig::default()
///     .with_max_quads(2_000)
///     .with_max_circles(0)
///     .with_max_texture_slots(8);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRendererConfig {
    /// Quads per draw call.
    pub max_quads: u32,
    /// Circles per draw call.
    pub max_circles: u32,
    /// Line segments per draw call.
    pub max_lines: u32,
    /// Bindable textures per draw call, including the reserved fallback slot
    /// of the shape kinds. Also the number of glyphs per text draw call.
    pub max_texture_slots: u32,
}

impl Default for BatchRendererConfig {
    fn default() -> Self {
        Self {
            max_quads: 10_000,
            max_circles: 10_000,
            max_lines: 10_000,
            max_texture_slots: DEFAULT_TEXTURE_SLOTS,
        }
    }
}

impl BatchRendererConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_quads(mut self, max_quads: u32) -> Self {
        self.max_quads = max_quads;
        self
    }

    pub fn with_max_circles(mut self, max_circles: u32) -> Self {
        self.max_circles = max_circles;
        self
    }

    pub fn with_max_lines(mut self, max_lines: u32) -> Self {
        self.max_lines = max_lines;
        self
    }

    pub fn with_max_texture_slots(mut self, max_texture_slots: u32) -> Self {
        self.max_texture_slots = max_texture_slots;
        self
    }

    /// Check the slot limit and element capacities. Slot 0 is reserved, so at
    /// least two slots are needed for a shape batch to bind any texture of its
    /// own; capacities must keep their vertex and index counts within `u32`.
    pub fn validate(&self) -> Result<(), BatchError> {
        if !(2..=MAX_TEXTURE_SLOTS).contains(&self.max_texture_slots) {
            return Err(BatchError::TextureSlotLimit {
                requested: self.max_texture_slots,
                max: MAX_TEXTURE_SLOTS,
            });
        }
        KindCapacity::new(PrimitiveKind::Quad, self.max_quads)?;
        KindCapacity::new(PrimitiveKind::Circle, self.max_circles)?;
        KindCapacity::new(PrimitiveKind::Line, self.max_lines)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(BatchRendererConfig::default().validate().is_ok());
    }

    #[test]
    fn test_slot_limit_bounds() {
        let too_few = BatchRendererConfig::default().with_max_texture_slots(1);
        assert_eq!(
            too_few.validate(),
            Err(BatchError::TextureSlotLimit {
                requested: 1,
                max: MAX_TEXTURE_SLOTS
            })
        );

        let too_many = BatchRendererConfig::default().with_max_texture_slots(MAX_TEXTURE_SLOTS + 1);
        assert!(too_many.validate().is_err());

        let edge = BatchRendererConfig::default().with_max_texture_slots(MAX_TEXTURE_SLOTS);
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_is_valid() {
        let config = BatchRendererConfig::default()
            .with_max_quads(0)
            .with_max_circles(0)
            .with_max_lines(0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_capacity_bounds() {
        use crate::capacity::MAX_ELEMENTS;

        let edge = BatchRendererConfig::default().with_max_circles(MAX_ELEMENTS);
        assert!(edge.validate().is_ok());

        let too_many = BatchRendererConfig::default().with_max_quads(MAX_ELEMENTS + 1);
        assert_eq!(
            too_many.validate(),
            Err(BatchError::CapacityTooLarge {
                kind: PrimitiveKind::Quad,
                requested: MAX_ELEMENTS + 1,
                max: MAX_ELEMENTS,
            })
        );
    }
}
