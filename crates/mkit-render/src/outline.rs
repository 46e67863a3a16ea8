//! Outline font rasterizer backed by `ab_glyph`.
//!
//! The host loads font files (TTF/OTF) and hands over the bytes. Glyph
//! outlines become tiny-skia paths. Missing faces are synthesized: bold by
//! double-striking the regular face, italic by a skew transform.

use crate::background::skia_color;
use crate::text::TextRasterizer;
use ab_glyph::{Font, FontVec, GlyphId, OutlineCurve, PxScale, ScaleFont};
use mkit_core::{Color, FontSpec, Point};
use thiserror::Error;
use tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Transform};

#[derive(Debug, Error)]
pub enum FontError {
    #[error("font data is not a valid TrueType/OpenType face")]
    Invalid,
}

/// Which loaded face a line is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceSlot {
    Regular,
    Bold,
    BoldItalic,
}

impl FaceSlot {
    pub fn for_font(font: &FontSpec) -> Self {
        match (font.is_bold(), font.italic) {
            (true, true) => FaceSlot::BoldItalic,
            (true, false) => FaceSlot::Bold,
            // Regular italic is never selected by the UI; shear the regular face.
            (false, _) => FaceSlot::Regular,
        }
    }
}

const SYNTHETIC_SHEAR: f32 = 0.2;

pub struct OutlineRasterizer {
    regular: FontVec,
    bold: Option<FontVec>,
    bold_italic: Option<FontVec>,
}

impl std::fmt::Debug for OutlineRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutlineRasterizer")
            .field("bold", &self.bold.is_some())
            .field("bold_italic", &self.bold_italic.is_some())
            .finish_non_exhaustive()
    }
}

fn parse(data: Vec<u8>) -> Result<FontVec, FontError> {
    FontVec::try_from_vec(data).map_err(|_| FontError::Invalid)
}

impl OutlineRasterizer {
    pub fn new(regular: Vec<u8>) -> Result<Self, FontError> {
        Ok(Self {
            regular: parse(regular)?,
            bold: None,
            bold_italic: None,
        })
    }

    /// Install a face for `slot`, replacing any previous one.
    pub fn set_face(&mut self, slot: FaceSlot, data: Vec<u8>) -> Result<(), FontError> {
        let face = parse(data)?;
        match slot {
            FaceSlot::Regular => self.regular = face,
            FaceSlot::Bold => self.bold = Some(face),
            FaceSlot::BoldItalic => self.bold_italic = Some(face),
        }
        Ok(())
    }

    /// Face to draw with, plus the (embolden, shear) synthesis still needed.
    fn resolve(&self, font: &FontSpec) -> (&FontVec, bool, bool) {
        match FaceSlot::for_font(font) {
            FaceSlot::Regular => (&self.regular, false, font.italic),
            FaceSlot::Bold => match &self.bold {
                Some(face) => (face, false, false),
                None => (&self.regular, true, false),
            },
            FaceSlot::BoldItalic => match (&self.bold_italic, &self.bold) {
                (Some(face), _) => (face, false, false),
                (None, Some(face)) => (face, false, true),
                (None, None) => (&self.regular, true, true),
            },
        }
    }

    /// Glyph ids with their pen x for one line, plus the advance width.
    fn layout(face: &FontVec, scale: PxScale, text: &str) -> (Vec<(GlyphId, f32)>, f32) {
        let scaled = face.as_scaled(scale);
        let mut glyphs = Vec::with_capacity(text.len());
        let mut pen = 0.0f32;
        let mut previous: Option<GlyphId> = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                pen += scaled.kern(prev, id);
            }
            glyphs.push((id, pen));
            pen += scaled.h_advance(id);
            previous = Some(id);
        }
        (glyphs, pen)
    }

    /// One path for the whole line in pixels, baseline at y = 0, y down.
    fn line_path(face: &FontVec, scale: PxScale, text: &str) -> Option<Path> {
        let scaled = face.as_scaled(scale);
        let (sx, sy) = (scaled.h_scale_factor(), scaled.v_scale_factor());
        let (glyphs, _) = Self::layout(face, scale, text);

        let mut builder = PathBuilder::new();
        for (id, pen) in glyphs {
            let Some(outline) = face.outline(id) else {
                continue; // whitespace
            };
            let at = |p: ab_glyph::Point| (pen + p.x * sx, -p.y * sy);
            let mut last: Option<ab_glyph::Point> = None;
            for curve in &outline.curves {
                let (start, end) = match *curve {
                    OutlineCurve::Line(p0, p1) => (p0, p1),
                    OutlineCurve::Quad(p0, _, p2) => (p0, p2),
                    OutlineCurve::Cubic(p0, _, _, p3) => (p0, p3),
                };
                if last != Some(start) {
                    if last.is_some() {
                        builder.close();
                    }
                    let (x, y) = at(start);
                    builder.move_to(x, y);
                }
                match *curve {
                    OutlineCurve::Line(_, p1) => {
                        let (x, y) = at(p1);
                        builder.line_to(x, y);
                    }
                    OutlineCurve::Quad(_, c, p2) => {
                        let ((cx, cy), (x, y)) = (at(c), at(p2));
                        builder.quad_to(cx, cy, x, y);
                    }
                    OutlineCurve::Cubic(_, c1, c2, p3) => {
                        let ((c1x, c1y), (c2x, c2y), (x, y)) = (at(c1), at(c2), at(p3));
                        builder.cubic_to(c1x, c1y, c2x, c2y, x, y);
                    }
                }
                last = Some(end);
            }
            if last.is_some() {
                builder.close();
            }
        }
        builder.finish()
    }
}

impl TextRasterizer for OutlineRasterizer {
    fn measure(&self, text: &str, font: &FontSpec) -> f64 {
        let (face, embolden, _) = self.resolve(font);
        let (_, width) = Self::layout(face, PxScale::from(font.size), text);
        let extra = if embolden { embolden_offset(font.size) } else { 0.0 };
        f64::from(width + extra)
    }

    fn fill_text(&self, canvas: &mut Pixmap, text: &str, origin: Point, font: &FontSpec, color: Color) {
        let (face, embolden, shear) = self.resolve(font);
        let scale = PxScale::from(font.size);
        let Some(path) = Self::line_path(face, scale, text) else {
            return;
        };
        let baseline = origin.y as f32 + face.as_scaled(scale).ascent();
        let skew = if shear { SYNTHETIC_SHEAR } else { 0.0 };

        let mut paint = Paint::default();
        paint.set_color(skia_color(color));
        paint.anti_alias = true;

        let offsets = [0.0, embolden_offset(font.size)];
        let strikes = if embolden { &offsets[..] } else { &offsets[..1] };
        for &dx in strikes {
            // Lean right above the baseline, where path y is negative.
            let transform = Transform::from_row(1.0, 0.0, -skew, 1.0, origin.x as f32 + dx, baseline);
            canvas.fill_path(&path, &paint, FillRule::Winding, transform, None);
        }
    }
}

fn embolden_offset(size: f32) -> f32 {
    (size / 36.0).max(1.0)
}
