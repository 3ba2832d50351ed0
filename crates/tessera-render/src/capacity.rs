//! Per-kind capacity table.

use tessera_test_utils::ShaderProgram;

use crate::config::BatchRendererConfig;
use crate::error::BatchError;

/// Largest element count of any kind. Six indices or vertices per element is
/// the widest layout, so every derived count fits in `u32`.
pub const MAX_ELEMENTS: u32 = u32::MAX / 6;

/// The primitive kinds the renderer batches independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Quad,
    Circle,
    Line,
    Glyph,
}

impl PrimitiveKind {
    /// All kinds, in the order a session flushes them.
    pub const ALL: [PrimitiveKind; 4] = [
        PrimitiveKind::Quad,
        PrimitiveKind::Circle,
        PrimitiveKind::Line,
        PrimitiveKind::Glyph,
    ];

    /// Vertices written per logical element.
    pub const fn vertices_per_element(self) -> u32 {
        match self {
            PrimitiveKind::Quad | PrimitiveKind::Circle => 4,
            PrimitiveKind::Line => 2,
            PrimitiveKind::Glyph => 6,
        }
    }

    /// Indices consumed per logical element. Zero for non-indexed kinds.
    pub const fn indices_per_element(self) -> u32 {
        match self {
            PrimitiveKind::Quad | PrimitiveKind::Circle => 6,
            PrimitiveKind::Line | PrimitiveKind::Glyph => 0,
        }
    }

    pub const fn program(self) -> ShaderProgram {
        match self {
            PrimitiveKind::Quad => ShaderProgram::Quad,
            PrimitiveKind::Circle => ShaderProgram::Circle,
            PrimitiveKind::Line => ShaderProgram::Line,
            PrimitiveKind::Glyph => ShaderProgram::Text,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Quad => "quad",
            PrimitiveKind::Circle => "circle",
            PrimitiveKind::Line => "line",
            PrimitiveKind::Glyph => "glyph",
        }
    }
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Capacity of one primitive kind for a single draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindCapacity {
    pub max_elements: u32,
    pub max_vertices: u32,
    pub max_indices: u32,
}

impl KindCapacity {
    pub fn new(kind: PrimitiveKind, max_elements: u32) -> Result<Self, BatchError> {
        let too_large = || BatchError::CapacityTooLarge {
            kind,
            requested: max_elements,
            max: MAX_ELEMENTS,
        };
        if max_elements > MAX_ELEMENTS {
            return Err(too_large());
        }
        Ok(Self {
            max_elements,
            max_vertices: max_elements
                .checked_mul(kind.vertices_per_element())
                .ok_or_else(too_large)?,
            max_indices: max_elements
                .checked_mul(kind.indices_per_element())
                .ok_or_else(too_large)?,
        })
    }

    /// A kind with zero capacity is disabled: nothing is allocated for it and
    /// submissions to it are rejected.
    pub const fn is_enabled(&self) -> bool {
        self.max_elements > 0
    }
}

/// Capacities of every primitive kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityTable {
    pub quad: KindCapacity,
    pub circle: KindCapacity,
    pub line: KindCapacity,
    pub glyph: KindCapacity,
}

impl CapacityTable {
    /// Derive the table from a config. Glyph capacity follows the texture slot
    /// limit, since every glyph in a text draw call owns one slot.
    pub fn from_config(config: &BatchRendererConfig) -> Result<Self, BatchError> {
        Ok(Self {
            quad: KindCapacity::new(PrimitiveKind::Quad, config.max_quads)?,
            circle: KindCapacity::new(PrimitiveKind::Circle, config.max_circles)?,
            line: KindCapacity::new(PrimitiveKind::Line, config.max_lines)?,
            glyph: KindCapacity::new(PrimitiveKind::Glyph, config.max_texture_slots)?,
        })
    }

    pub fn get(&self, kind: PrimitiveKind) -> KindCapacity {
        match kind {
            PrimitiveKind::Quad => self.quad,
            PrimitiveKind::Circle => self.circle,
            PrimitiveKind::Line => self.line,
            PrimitiveKind::Glyph => self.glyph,
        }
    }

    pub(crate) fn set(&mut self, kind: PrimitiveKind, capacity: KindCapacity) {
        match kind {
            PrimitiveKind::Quad => self.quad = capacity,
            PrimitiveKind::Circle => self.circle = capacity,
            PrimitiveKind::Line => self.line = capacity,
            PrimitiveKind::Glyph => self.glyph = capacity,
        }
    }
}
