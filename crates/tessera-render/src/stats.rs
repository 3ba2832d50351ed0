//! Batch statistics sink.

use crate::capacity::PrimitiveKind;

/// Counters for one accumulation window.
///
/// Cumulative totals are only cleared on request, so the counters are 64-bit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub draw_calls: u64,
    pub quads: u64,
    pub circles: u64,
    pub lines: u64,
    pub glyphs: u64,
    pub vertices: u64,
    pub indices: u64,
}

impl RenderStats {
    /// Elements submitted for one kind.
    pub fn elements(&self, kind: PrimitiveKind) -> u64 {
        match kind {
            PrimitiveKind::Quad => self.quads,
            PrimitiveKind::Circle => self.circles,
            PrimitiveKind::Line => self.lines,
            PrimitiveKind::Glyph => self.glyphs,
        }
    }

    fn record_submit(&mut self, kind: PrimitiveKind) {
        match kind {
            PrimitiveKind::Quad => self.quads += 1,
            PrimitiveKind::Circle => self.circles += 1,
            PrimitiveKind::Line => self.lines += 1,
            PrimitiveKind::Glyph => self.glyphs += 1,
        }
        self.vertices += u64::from(kind.vertices_per_element());
        self.indices += u64::from(kind.indices_per_element());
    }
}

/// Transient (per frame) and cumulative counters.
///
/// Element, vertex and index counts are recorded when a primitive is
/// submitted; draw calls are recorded when a batch is flushed, so an overflow
/// flush in the middle of a session is attributed to the frame it happened in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub frame: RenderStats,
    pub total: RenderStats,
}

impl BatchStats {
    pub(crate) fn record_submit(&mut self, kind: PrimitiveKind) {
        self.frame.record_submit(kind);
        self.total.record_submit(kind);
    }

    pub(crate) fn record_draw_call(&mut self) {
        self.frame.draw_calls += 1;
        self.total.draw_calls += 1;
    }

    pub fn reset_frame(&mut self) {
        self.frame = RenderStats::default();
    }

    pub fn reset_total(&mut self) {
        self.total = RenderStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_counts_vertices_and_indices() {
        let mut stats = BatchStats::default();
        stats.record_submit(PrimitiveKind::Quad);
        stats.record_submit(PrimitiveKind::Line);

        assert_eq!(stats.frame.quads, 1);
        assert_eq!(stats.frame.lines, 1);
        assert_eq!(stats.frame.vertices, 6);
        assert_eq!(stats.frame.indices, 6);
        assert_eq!(stats.frame.draw_calls, 0);
    }

    #[test]
    fn test_frame_reset_keeps_totals() {
        let mut stats = BatchStats::default();
        stats.record_submit(PrimitiveKind::Glyph);
        stats.record_draw_call();
        stats.reset_frame();

        assert_eq!(stats.frame, RenderStats::default());
        assert_eq!(stats.total.glyphs, 1);
        assert_eq!(stats.total.draw_calls, 1);

        stats.reset_total();
        assert_eq!(stats.total, RenderStats::default());
    }

    #[test]
    fn test_totals_count_past_u32_range() {
        let mut stats = BatchStats::default();
        stats.total.vertices = u64::from(u32::MAX) - 2;
        stats.total.draw_calls = u64::from(u32::MAX);

        stats.record_submit(PrimitiveKind::Quad);
        stats.record_draw_call();

        assert_eq!(stats.total.vertices, u64::from(u32::MAX) + 2);
        assert_eq!(stats.total.draw_calls, u64::from(u32::MAX) + 1);
        assert_eq!(stats.frame.vertices, 4);
    }
}
