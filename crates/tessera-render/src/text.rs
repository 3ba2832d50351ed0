//! Font metrics consumed by the glyph batch.
//!
//! Rasterising glyphs into textures is the asset pipeline's job; a [`Font`]
//! here is only the lookup table it produces.

use tessera_core::alloc::HashMap;
use tessera_core::math::{Vec2, Vec3};

use crate::color::Color;
use crate::texture::TextureHandle;

/// Metrics and texture of one character, in unscaled pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    /// `None` for characters with no visible pixels, such as a space.
    pub texture: Option<TextureHandle>,
    pub size: Vec2,
    /// Offset from the pen position on the baseline to the glyph's top-left.
    pub bearing: Vec2,
    /// Horizontal pen advance after this glyph.
    pub advance: f32,
}

#[derive(Debug, Clone)]
pub struct Font {
    name: String,
    glyphs: HashMap<char, Glyph>,
    line_height: f32,
}

impl Font {
    pub fn new(name: impl Into<String>, line_height: f32) -> Self {
        Self {
            name: name.into(),
            glyphs: HashMap::default(),
            line_height,
        }
    }

    pub fn insert(&mut self, ch: char, glyph: Glyph) {
        self.glyphs.insert(ch, glyph);
    }

    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Distance between baselines, in unscaled pixels.
    pub fn line_height(&self) -> f32 {
        self.line_height
    }
}

/// Placement and appearance of a rendered string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextParams {
    /// Pen position of the first character on the first baseline.
    pub position: Vec3,
    pub scale: f32,
    pub color: Color,
    pub pick_id: u32,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: 1.0,
            color: Color::WHITE,
            pick_id: 0,
        }
    }
}

impl TextParams {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_pick_id(mut self, pick_id: u32) -> Self {
        self.pick_id = pick_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_lookup() {
        let glyph = Glyph {
            texture: None,
            size: Vec2::ZERO,
            bearing: Vec2::ZERO,
            advance: 8.0,
        };
        let mut font = Font::new("mono", 16.0);
        font.insert(' ', glyph);

        assert_eq!(font.name(), "mono");
        assert_eq!(font.glyph(' '), Some(&glyph));
        assert!(font.glyph('a').is_none());
    }
}
