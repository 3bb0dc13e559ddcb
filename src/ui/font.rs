//! Bitmap font atlas built from a game's font strip.
//!
//! The sheet is a single row of glyph cells, `glyph_height` pixels tall;
//! each character is addressed by its left edge and width from the layout.
//! Cells are cropped once up front so a bad table fails before anything is
//! drawn.

use std::collections::HashMap;

use image::RgbaImage;
use image::imageops::crop_imm;
use log::debug;

use crate::error::ConfigError;
use crate::game::layout::LayoutSpec;

pub struct GlyphAtlas {
    glyphs: HashMap<char, RgbaImage>,
}

impl GlyphAtlas {
    pub fn new(sheet: &RgbaImage, layout: &LayoutSpec) -> Result<Self, ConfigError> {
        let (sheet_w, sheet_h) = sheet.dimensions();
        let height = layout.glyph_height;
        let mut glyphs = HashMap::with_capacity(layout.glyph_metrics.len());

        for (&ch, m) in &layout.glyph_metrics {
            let right = m.sheet_x.checked_add(m.width);
            if height > sheet_h || right.is_none_or(|r| r > sheet_w) {
                return Err(ConfigError::GlyphOutOfBounds {
                    ch,
                    x: m.sheet_x,
                    width: m.width,
                    height,
                    sheet_width: sheet_w,
                    sheet_height: sheet_h,
                });
            }
            let cell = crop_imm(sheet, m.sheet_x, 0, m.width, height).to_image();
            glyphs.insert(ch, cell);
        }

        debug!(
            "Glyph atlas: {} glyph(s) from {sheet_w}x{sheet_h} sheet, cell height {height}.",
            glyphs.len()
        );
        Ok(Self { glyphs })
    }

    #[inline(always)]
    pub fn glyph(&self, ch: char) -> Result<&RgbaImage, ConfigError> {
        self.glyphs
            .get(&ch)
            .ok_or(ConfigError::MissingGlyph { ch, code: ch as u32 })
    }

    /// Pen advance of a whole line; unknown characters count as zero.
    pub fn measure(&self, text: &str) -> u32 {
        text.chars()
            .filter_map(|c| self.glyphs.get(&c))
            .map(RgbaImage::width)
            .sum()
    }
}
