//! Text painting.
//!
//! Layout (wrapping, anchoring) lives in `mkit_core::layout`; this module
//! measures and fills glyphs through a [`TextRasterizer`]. Two rasterizers
//! ship: [`MonoRasterizer`] needs no font files and scales an embedded
//! 9×18 bitmap face; [`crate::outline::OutlineRasterizer`] draws TrueType or
//! OpenType outlines once the host supplies font bytes.

use crate::background::skia_color;
use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{OriginDimensions, Point as EgPoint, Size as EgSize};
use embedded_graphics::mono_font::ascii::{FONT_9X18, FONT_9X18_BOLD};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::text::{Baseline, Text};
use embedded_graphics::{Drawable, Pixel};
use mkit_core::layout::font_size;
use mkit_core::{Color, FontSpec, Point, RenderParams, Size, layout_text};
use std::convert::Infallible;
use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};

/// Measures and fills single lines of text.
///
/// `origin` passed to `fill_text` is the top-left of the line's em box
/// (top baseline).
pub trait TextRasterizer {
    /// Advance width of `text` in pixels.
    fn measure(&self, text: &str, font: &FontSpec) -> f64;

    fn fill_text(&self, canvas: &mut Pixmap, text: &str, origin: Point, font: &FontSpec, color: Color);
}

/// Wrap, place and fill `params.text`. Empty text draws nothing.
pub fn paint_text(canvas: &mut Pixmap, params: &RenderParams, rasterizer: &dyn TextRasterizer) {
    let size = Size::new(canvas.width() as f64, canvas.height() as f64);
    let px = font_size(size.height, params.text_size);
    let font = params.font(px as f32);

    let Some(block) = layout_text(&params.text, params.text_position, size, px, |line| {
        rasterizer.measure(line, &font)
    }) else {
        return;
    };

    log::trace!(
        "text: {} line(s) at {}px, block {:.0}×{:.0}",
        block.lines.len(),
        block.font_size,
        block.size.width,
        block.size.height
    );
    for line in &block.lines {
        rasterizer.fill_text(canvas, &line.text, line.origin, &font, params.text_color);
    }
}

// ─── Bitmap face ─────────────────────────────────────────────────────────

/// Fixed-pitch rasterizer built on the `embedded-graphics` 9×18 fonts.
///
/// Glyphs are rendered once at native size into a mask and scaled to the
/// requested pixel size. Bold maps to the bold face; italic is a shear.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonoRasterizer;

/// Horizontal shear applied for italic, as a fraction of glyph height.
const ITALIC_SHEAR: f32 = 0.2;

impl MonoRasterizer {
    fn face(font: &FontSpec) -> &'static MonoFont<'static> {
        if font.is_bold() {
            &FONT_9X18_BOLD
        } else {
            &FONT_9X18
        }
    }

    fn scale(face: &MonoFont<'_>, font: &FontSpec) -> f32 {
        font.size / face.character_size.height as f32
    }
}

impl TextRasterizer for MonoRasterizer {
    fn measure(&self, text: &str, font: &FontSpec) -> f64 {
        let face = Self::face(font);
        let advance = face.character_size.width + face.character_spacing;
        let chars = text.chars().count() as f64;
        chars * f64::from(advance) * f64::from(Self::scale(face, font))
    }

    fn fill_text(&self, canvas: &mut Pixmap, text: &str, origin: Point, font: &FontSpec, color: Color) {
        let face = Self::face(font);
        let text = sanitize(text);
        let chars = text.chars().count() as u32;
        if chars == 0 || font.size <= 0.0 {
            return;
        }

        let advance = face.character_size.width + face.character_spacing;
        let mut mask = GlyphMask::new(chars * advance, face.character_size.height);
        let style = MonoTextStyle::new(face, BinaryColor::On);
        Text::with_baseline(&text, EgPoint::zero(), style, Baseline::Top)
            .draw(&mut mask)
            .unwrap_or_else(|never| match never {});

        let Some(glyphs) = mask.to_pixmap(color) else {
            return;
        };

        let scale = Self::scale(face, font);
        let (kx, shift) = if font.italic {
            // Lean right around the baseline: shift the top by +shear.
            (-ITALIC_SHEAR * scale, ITALIC_SHEAR * font.size)
        } else {
            (0.0, 0.0)
        };
        let transform = Transform::from_row(
            scale,
            0.0,
            kx,
            scale,
            origin.x as f32 + shift,
            origin.y as f32,
        );
        let paint = PixmapPaint {
            quality: FilterQuality::Nearest,
            ..PixmapPaint::default()
        };
        canvas.draw_pixmap(0, 0, glyphs.as_ref(), &paint, transform, None);
    }
}

/// Control characters would break the fixed advance; render them as spaces.
fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// One-bit draw target the bitmap fonts render into.
struct GlyphMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl GlyphMask {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; (width * height) as usize],
        }
    }

    #[cfg(test)]
    fn is_set(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.bits[(y * self.width + x) as usize]
    }

    /// Opaque `color` where set, transparent elsewhere.
    fn to_pixmap(&self, color: Color) -> Option<Pixmap> {
        let mut pixmap = Pixmap::new(self.width, self.height)?;
        let ink = skia_color(color).premultiply().to_color_u8();
        for (px, set) in pixmap.pixels_mut().iter_mut().zip(&self.bits) {
            if *set {
                *px = ink;
            }
        }
        Some(pixmap)
    }
}

impl OriginDimensions for GlyphMask {
    fn size(&self) -> EgSize {
        EgSize::new(self.width, self.height)
    }
}

impl DrawTarget for GlyphMask {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) else {
                continue;
            };
            if x < self.width && y < self.height {
                self.bits[(y * self.width + x) as usize] = color.is_on();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mkit_core::FontStyle;
    use pretty_assertions::assert_eq;

    fn alpha_in(canvas: &Pixmap, x0: u32, y0: u32, x1: u32, y1: u32) -> usize {
        let mut n = 0;
        for y in y0..y1 {
            for x in x0..x1 {
                if canvas.pixel(x, y).is_some_and(|p| p.alpha() > 0) {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn mono_measure_scales_with_size() {
        let mono = MonoRasterizer;
        let at18 = FontSpec::new(FontStyle::Regular, 18.0);
        let at36 = FontSpec::new(FontStyle::Bold, 36.0);
        assert_eq!(mono.measure("abcd", &at18), 36.0);
        assert_eq!(mono.measure("abcd", &at36), 72.0);
        assert_eq!(mono.measure("", &at36), 0.0);
    }

    #[test]
    fn glyph_mask_records_ink() {
        let mut mask = GlyphMask::new(9, 18);
        let style = MonoTextStyle::new(&FONT_9X18, BinaryColor::On);
        Text::with_baseline("H", EgPoint::zero(), style, Baseline::Top)
            .draw(&mut mask)
            .unwrap();
        let ink = (0..18)
            .flat_map(|y| (0..9).map(move |x| (x, y)))
            .filter(|&(x, y)| mask.is_set(x, y))
            .count();
        assert!(ink > 10, "only {ink} pixels set");
    }

    #[test]
    fn fill_stays_inside_measured_box() {
        let mono = MonoRasterizer;
        let font = FontSpec::new(FontStyle::Bold, 36.0);
        let mut canvas = Pixmap::new(300, 100).unwrap();
        let width = mono.measure("Hi", &font);
        mono.fill_text(&mut canvas, "Hi", Point::new(20.0, 10.0), &font, Color::WHITE);

        let inside = alpha_in(&canvas, 20, 10, 20 + width as u32, 46);
        assert!(inside > 0);
        assert_eq!(alpha_in(&canvas, 0, 0, 300, 10), 0);
        assert_eq!(alpha_in(&canvas, 21 + width as u32, 0, 300, 100), 0);
    }

    #[test]
    fn paint_text_skips_empty() {
        let mut canvas = Pixmap::new(120, 60).unwrap();
        let params = RenderParams {
            text: String::new(),
            ..RenderParams::default()
        };
        paint_text(&mut canvas, &params, &MonoRasterizer);
        assert_eq!(alpha_in(&canvas, 0, 0, 120, 60), 0);
    }

    #[test]
    fn control_characters_become_spaces() {
        assert_eq!(sanitize("a\tb\nc"), "a b c");
    }
}
