use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use log::{debug, trace};

use crate::error::ConfigError;
use crate::game::layout::LayoutSpec;
use crate::ui::font::GlyphAtlas;

/// Final output is blown up by this much so the pixel art survives
/// thumbnailing.
pub const DEFAULT_SCALE: u32 = 4;

/// Draw `menu` onto `background` with the game font, then upscale by
/// [`DEFAULT_SCALE`].
pub fn render(
    menu: &[String],
    layout: &LayoutSpec,
    background: &RgbaImage,
    font_sheet: &RgbaImage,
) -> Result<RgbaImage, ConfigError> {
    render_scaled(menu, layout, background, font_sheet, DEFAULT_SCALE)
}

pub fn render_scaled(
    menu: &[String],
    layout: &LayoutSpec,
    background: &RgbaImage,
    font_sheet: &RgbaImage,
    scale: u32,
) -> Result<RgbaImage, ConfigError> {
    let atlas = GlyphAtlas::new(font_sheet, layout)?;
    let composed = compose(menu, layout, background, &atlas)?;
    Ok(upscale(&composed, scale))
}

/// Paste every command's glyphs at their cursor positions on a copy of the
/// background. Commands fill each column top to bottom; a new column starts
/// every `layout.rows` entries at the next origin.
pub fn compose(
    menu: &[String],
    layout: &LayoutSpec,
    background: &RgbaImage,
    atlas: &GlyphAtlas,
) -> Result<RgbaImage, ConfigError> {
    let mut canvas = background.clone();
    let mut column: Option<usize> = None;
    let (mut origin_x, mut x, mut y) = (0i64, 0i64, 0i64);

    for (i, cmd) in menu.iter().enumerate() {
        if i % layout.rows == 0 {
            let next = column.map_or(0, |c| c + 1);
            let origin = layout
                .origins
                .get(next)
                .ok_or(ConfigError::MissingOrigin {
                    column: next,
                    available: layout.origins.len(),
                })?;
            column = Some(next);
            origin_x = origin.x;
            x = origin.x;
            y = origin.y;
            debug!("Column {next} starts at ({x}, {y}).");
        }

        for ch in cmd.chars() {
            let glyph = atlas.glyph(ch)?;
            paste_masked(&mut canvas, glyph, x, y);
            x += i64::from(glyph.width());
        }
        trace!("Drew {cmd:?} at y={y}, {} px wide.", atlas.measure(cmd));

        x = origin_x;
        y += layout.line_advance();
    }

    Ok(canvas)
}

/// Stencil-paste `src` at (`x`, `y`): each channel moves toward the source
/// by the source alpha, so fully transparent ink leaves the background
/// untouched. Anything outside `dst` is clipped.
pub fn paste_masked(dst: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64) {
    let (dst_w, dst_h) = (i64::from(dst.width()), i64::from(dst.height()));
    for (sx, sy, px) in src.enumerate_pixels() {
        let dx = x + i64::from(sx);
        let dy = y + i64::from(sy);
        if dx < 0 || dy < 0 || dx >= dst_w || dy >= dst_h {
            continue;
        }
        let a = u16::from(px[3]);
        if a == 0 {
            continue;
        }
        let under = dst.get_pixel_mut(dx as u32, dy as u32);
        *under = blend_masked(*under, *px, a);
    }
}

#[inline(always)]
fn blend_masked(under: Rgba<u8>, over: Rgba<u8>, a: u16) -> Rgba<u8> {
    let inv = 255 - a;
    let mix = |d: u8, s: u8| ((u16::from(s) * a + u16::from(d) * inv + 127) / 255) as u8;
    Rgba([
        mix(under[0], over[0]),
        mix(under[1], over[1]),
        mix(under[2], over[2]),
        mix(under[3], over[3]),
    ])
}

/// Nearest-neighbour integer upscale; hard pixel edges are kept.
pub fn upscale(image: &RgbaImage, factor: u32) -> RgbaImage {
    let factor = factor.max(1);
    if factor == 1 {
        return image.clone();
    }
    let (w, h) = image.dimensions();
    imageops::resize(image, w * factor, h * factor, FilterType::Nearest)
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_SCALE, compose, paste_masked, render, upscale};
    use crate::error::ConfigError;
    use crate::game::layout::tests::test_layout;
    use crate::game::layout::{GlyphMetrics, LayoutSpec, Origin};
    use crate::ui::font::GlyphAtlas;
    use image::{Rgba, RgbaImage};

    const BG: Rgba<u8> = Rgba([10, 20, 30, 255]);

    /// Sheet with three glyphs: 'A' (3 px, red), 'B' (2 px, green),
    /// 'C' (4 px, blue). Every cell's bottom row is transparent.
    fn sheet_and_layout() -> (RgbaImage, LayoutSpec) {
        let sheet = RgbaImage::from_fn(9, 8, |x, y| {
            if y == 7 {
                return Rgba([255, 255, 255, 0]);
            }
            match x {
                0..=2 => Rgba([255, 0, 0, 255]),
                3..=4 => Rgba([0, 255, 0, 255]),
                _ => Rgba([0, 0, 255, 255]),
            }
        });
        let mut layout = test_layout(2, 1);
        layout.glyph_height = 8;
        layout.line_spacing = 2;
        layout.origins = vec![Origin { x: 10, y: 20 }];
        layout.glyph_metrics.clear();
        layout.glyph_metrics.insert('A', GlyphMetrics { sheet_x: 0, width: 3 });
        layout.glyph_metrics.insert('B', GlyphMetrics { sheet_x: 3, width: 2 });
        layout.glyph_metrics.insert('C', GlyphMetrics { sheet_x: 5, width: 4 });
        (sheet, layout)
    }

    fn menu(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn glyphs_land_at_cursor_positions() {
        let (sheet, layout) = sheet_and_layout();
        let atlas = GlyphAtlas::new(&sheet, &layout).unwrap();
        let bg = RgbaImage::from_pixel(40, 50, BG);
        let out = compose(&menu(&["AB", "C"]), &layout, &bg, &atlas).unwrap();

        // "A" at (10,20), "B" right after it, "C" back at x=10 one line down.
        assert_eq!(*out.get_pixel(10, 20), Rgba([255, 0, 0, 255]));
        assert_eq!(*out.get_pixel(12, 26), Rgba([255, 0, 0, 255]));
        assert_eq!(*out.get_pixel(13, 20), Rgba([0, 255, 0, 255]));
        assert_eq!(*out.get_pixel(14, 20), Rgba([0, 255, 0, 255]));
        assert_eq!(*out.get_pixel(15, 20), BG);
        assert_eq!(*out.get_pixel(10, 30), Rgba([0, 0, 255, 255]));
        assert_eq!(*out.get_pixel(13, 36), Rgba([0, 0, 255, 255]));
        assert_eq!(*out.get_pixel(9, 30), BG);
        assert_eq!(*out.get_pixel(14, 30), BG);
    }

    #[test]
    fn transparent_ink_keeps_the_background() {
        let (sheet, layout) = sheet_and_layout();
        let atlas = GlyphAtlas::new(&sheet, &layout).unwrap();
        let bg = RgbaImage::from_pixel(40, 50, BG);
        let out = compose(&menu(&["A"]), &layout, &bg, &atlas).unwrap();
        assert_eq!(*out.get_pixel(10, 27), BG);
        assert_eq!(*out.get_pixel(11, 27), BG);
    }

    #[test]
    fn new_column_every_rows_entries() {
        let (sheet, mut layout) = sheet_and_layout();
        layout.columns = 2;
        layout.origins = vec![Origin { x: 2, y: 2 }, Origin { x: 20, y: 4 }];
        let atlas = GlyphAtlas::new(&sheet, &layout).unwrap();
        let bg = RgbaImage::from_pixel(40, 40, BG);
        let out = compose(&menu(&["A", "", "B", "C"]), &layout, &bg, &atlas).unwrap();

        assert_eq!(*out.get_pixel(2, 2), Rgba([255, 0, 0, 255]));
        // The blank second row draws nothing.
        assert_eq!(*out.get_pixel(2, 12), BG);
        assert_eq!(*out.get_pixel(20, 4), Rgba([0, 255, 0, 255]));
        assert_eq!(*out.get_pixel(20, 14), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn too_many_commands_for_the_origins() {
        let (sheet, layout) = sheet_and_layout();
        let atlas = GlyphAtlas::new(&sheet, &layout).unwrap();
        let bg = RgbaImage::from_pixel(40, 50, BG);
        let err = compose(&menu(&["A", "B", "C"]), &layout, &bg, &atlas).err();
        assert!(matches!(
            err,
            Some(ConfigError::MissingOrigin {
                column: 1,
                available: 1
            })
        ));
    }

    #[test]
    fn undrawable_character_aborts() {
        let (sheet, layout) = sheet_and_layout();
        let bg = RgbaImage::from_pixel(40, 50, BG);
        let err = render(&menu(&["AZ"]), &layout, &bg, &sheet).err();
        assert!(matches!(err, Some(ConfigError::MissingGlyph { ch: 'Z', .. })));
    }

    #[test]
    fn partial_alpha_blends_every_channel() {
        let mut dst = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 0]));
        let src = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 255 / 5 * 2]));
        paste_masked(&mut dst, &src, 1, 0);
        assert_eq!(*dst.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
        assert_eq!(*dst.get_pixel(1, 0), Rgba([102, 102, 102, 41]));
    }

    #[test]
    fn pasting_off_canvas_is_clipped() {
        let mut dst = RgbaImage::from_pixel(4, 4, BG);
        let src = RgbaImage::from_pixel(3, 3, Rgba([1, 2, 3, 255]));
        paste_masked(&mut dst, &src, -2, 3);
        assert_eq!(*dst.get_pixel(0, 3), Rgba([1, 2, 3, 255]));
        assert_eq!(*dst.get_pixel(1, 3), BG);
        assert_eq!(*dst.get_pixel(0, 2), BG);
    }

    #[test]
    fn render_upscales_by_four() {
        let (sheet, layout) = sheet_and_layout();
        let bg = RgbaImage::from_pixel(40, 50, BG);
        let out = render(&menu(&["AB", "C"]), &layout, &bg, &sheet).unwrap();
        assert_eq!(out.dimensions(), (40 * DEFAULT_SCALE, 50 * DEFAULT_SCALE));
        assert_eq!(*out.get_pixel(10 * 4 + 1, 20 * 4 + 2), Rgba([255, 0, 0, 255]));
        assert_eq!(*out.get_pixel(15 * 4 + 2, 20 * 4 + 1), BG);
    }

    #[test]
    fn upscale_replicates_pixels() {
        let img = RgbaImage::from_fn(2, 2, |x, y| Rgba([x as u8 * 100, y as u8 * 100, 0, 255]));
        let big = upscale(&img, 4);
        assert_eq!(big.dimensions(), (8, 8));
        for (x, y, px) in big.enumerate_pixels() {
            assert_eq!(px, img.get_pixel(x / 4, y / 4), "at ({x},{y})");
        }
        assert_eq!(upscale(&img, 1), img);
    }

    #[test]
    fn rendering_is_deterministic() {
        let (sheet, layout) = sheet_and_layout();
        let bg = RgbaImage::from_fn(40, 50, |x, y| Rgba([x as u8, y as u8, 7, 255]));
        let m = menu(&["CAB", "BA"]);
        let a = render(&m, &layout, &bg, &sheet).unwrap();
        let b = render(&m, &layout, &bg, &sheet).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }
}
