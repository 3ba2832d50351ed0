//! Per-kind batches.
//!
//! Quads and circles share [`ShapeBatch`](shape::ShapeBatch): indexed draws
//! with a deduplicated texture slot table whose slot 0 is the fallback
//! texture. Lines and glyphs have their own, simpler policies.

pub mod circle;
pub(crate) mod flush;
pub(crate) mod glyph;
pub(crate) mod line;
pub mod quad;
pub(crate) mod shape;

pub(crate) use flush::FlushContext;
pub(crate) use glyph::GlyphBatch;
pub(crate) use line::LineBatch;
pub(crate) use shape::ShapeBatch;
