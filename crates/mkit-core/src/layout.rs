//! Placement math for the compositor.
//!
//! Converts anchors, percentages and measured text into absolute canvas
//! coordinates. Everything here is pure; text measurement is supplied by the
//! caller so the same layout drives any rasterizer.

use crate::model::{Anchor, HAlign, LINE_HEIGHT_RATIO, MAX_LOGO_HEIGHT_RATIO, VAlign};
use kurbo::{Point, Rect, Size};
use smallvec::SmallVec;

/// Edge margin: `floor(canvas_width / 20)`.
pub fn padding(canvas_width: f64) -> f64 {
    (canvas_width / 20.0).floor()
}

/// Top-left corner of an element of `element` size placed at `anchor`.
pub fn resolve_anchor(anchor: Anchor, canvas: Size, element: Size, padding: f64) -> Point {
    let x = match anchor.horizontal {
        HAlign::Left => padding,
        HAlign::Center => (canvas.width - element.width) / 2.0,
        HAlign::Right => canvas.width - element.width - padding,
    };
    let y = match anchor.vertical {
        VAlign::Top => padding,
        VAlign::Middle => (canvas.height - element.height) / 2.0,
        VAlign::Bottom => canvas.height - element.height - padding,
    };
    Point::new(x, y)
}

/// Logo draw size: `size_pct` of canvas height capped at 40%, width from the
/// native aspect ratio.
pub fn logo_size(canvas: Size, size_pct: u32, native: Size) -> Size {
    let requested = canvas.height * f64::from(size_pct) / 100.0;
    let height = requested.min(canvas.height * MAX_LOGO_HEIGHT_RATIO);
    let width = if native.height > 0.0 {
        height / native.height * native.width
    } else {
        0.0
    };
    Size::new(width, height)
}

/// Destination rect for the logo.
pub fn logo_rect(anchor: Anchor, canvas: Size, size_pct: u32, native: Size) -> Rect {
    let size = logo_size(canvas, size_pct, native);
    let origin = resolve_anchor(anchor, canvas, size, padding(canvas.width));
    Rect::from_origin_size(origin, size)
}

/// Uniform scale + offset that makes an image cover the canvas, centered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverFit {
    pub scale: f64,
    pub offset: Point,
}

impl CoverFit {
    pub fn new(canvas: Size, image: Size) -> Self {
        let scale = (canvas.width / image.width).max(canvas.height / image.height);
        let drawn = Size::new(image.width * scale, image.height * scale);
        Self {
            scale,
            offset: Point::new(
                (canvas.width - drawn.width) / 2.0,
                (canvas.height - drawn.height) / 2.0,
            ),
        }
    }

    pub fn dest_rect(&self, image: Size) -> Rect {
        Rect::from_origin_size(
            self.offset,
            Size::new(image.width * self.scale, image.height * self.scale),
        )
    }
}

/// Font pixel size: `floor(canvas_height × size_pct / 100)`.
pub fn font_size(canvas_height: f64, size_pct: u32) -> f64 {
    (canvas_height * f64::from(size_pct) / 100.0).floor()
}

// ─── Text ────────────────────────────────────────────────────────────────

/// Greedy word wrap on single spaces.
///
/// Words are never split: a word wider than `max_width` on its own still
/// gets its own line. Consecutive spaces produce empty words, which are kept.
pub fn wrap_text<F>(text: &str, max_width: f64, mut measure: F) -> SmallVec<[String; 4]>
where
    F: FnMut(&str) -> f64,
{
    let mut lines = SmallVec::new();
    let mut words = text.split(' ');
    let mut current = words.next().unwrap_or_default().to_string();

    for word in words {
        let candidate = format!("{current} {word}");
        if measure(&candidate) > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// One positioned line of text. `origin` is the glyph-top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub origin: Point,
    pub width: f64,
}

/// A laid-out text block.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub font_size: f64,
    pub line_height: f64,
    /// Widest line × total block height.
    pub size: Size,
    pub lines: SmallVec<[TextLine; 4]>,
}

/// Wrap and place `text` on the canvas. Returns `None` for empty text.
///
/// The block's vertical position comes from its total height; each line is
/// then aligned horizontally on its own width, matching left/center/right
/// text alignment.
pub fn layout_text<F>(
    text: &str,
    anchor: Anchor,
    canvas: Size,
    font_size: f64,
    mut measure: F,
) -> Option<TextBlock>
where
    F: FnMut(&str) -> f64,
{
    if text.is_empty() {
        return None;
    }

    let pad = padding(canvas.width);
    let max_width = canvas.width - pad * 2.0;
    let wrapped = wrap_text(text, max_width, &mut measure);
    if wrapped.is_empty() {
        return None;
    }

    let line_height = font_size * LINE_HEIGHT_RATIO;
    let block_height = wrapped.len() as f64 * line_height;

    let mut widest = 0.0f64;
    let mut lines = SmallVec::new();
    for (i, line) in wrapped.into_iter().enumerate() {
        let width = measure(&line);
        widest = widest.max(width);
        let top = resolve_anchor(anchor, canvas, Size::new(width, block_height), pad);
        lines.push(TextLine {
            origin: Point::new(top.x, top.y + i as f64 * line_height),
            text: line,
            width,
        });
    }

    Some(TextBlock {
        font_size,
        line_height,
        size: Size::new(widest, block_height),
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const OG: Size = Size::new(1200.0, 630.0);

    /// 10px per character, like a fixed-pitch face.
    fn mono(s: &str) -> f64 {
        s.chars().count() as f64 * 10.0
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn padding_floors() {
        assert_eq!(padding(1200.0), 60.0);
        assert_eq!(padding(2048.0), 102.0);
        assert_eq!(padding(1290.0), 64.0);
    }

    #[test]
    fn anchors_on_og() {
        let el = Size::new(100.0, 50.0);
        let pad = padding(OG.width);
        let at = |s: &str| resolve_anchor(s.parse().unwrap(), OG, el, pad);
        assert_eq!(at("top-left"), Point::new(60.0, 60.0));
        assert_eq!(at("middle-center"), Point::new(550.0, 290.0));
        assert_eq!(at("bottom-right"), Point::new(1040.0, 520.0));
        assert_eq!(at("top-right"), Point::new(1040.0, 60.0));
        assert_eq!(at("bottom-left"), Point::new(60.0, 520.0));
    }

    #[test]
    fn logo_height_is_capped() {
        let native = Size::new(512.0, 256.0);
        let s = logo_size(OG, 50, native);
        assert_eq!(s.height, 630.0 * 0.4);
        assert_eq!(s.width, s.height * 2.0);

        let small = logo_size(OG, 20, native);
        assert_eq!(small.height, 126.0);
    }

    #[test]
    fn cover_fit_crops_wide_image() {
        let fit = CoverFit::new(OG, Size::new(400.0, 100.0));
        assert_eq!(fit.scale, 6.3);
        let dest = fit.dest_rect(Size::new(400.0, 100.0));
        assert!((dest.height() - 630.0).abs() < 1e-9);
        assert!((dest.center().x - 600.0).abs() < 1e-9);
        assert!(dest.x0 < 0.0 && dest.x1 > 1200.0);
    }

    #[test]
    fn cover_fit_crops_tall_image() {
        let fit = CoverFit::new(OG, Size::new(100.0, 400.0));
        assert_eq!(fit.scale, 12.0);
        assert_eq!(fit.offset.x, 0.0);
        assert!(fit.offset.y < 0.0);
    }

    #[test]
    fn font_size_floors() {
        assert_eq!(font_size(630.0, 12), 75.0);
        assert_eq!(font_size(400.0, 5), 20.0);
    }

    #[test]
    fn wrap_greedy() {
        let lines = wrap_text("aaa bbb ccc ddd", 70.0, mono);
        assert_eq!(lines.as_slice(), ["aaa bbb", "ccc ddd"]);
    }

    #[test]
    fn wrap_keeps_long_word_whole() {
        let lines = wrap_text("hi supercalifragilistic yo", 50.0, mono);
        assert_eq!(lines.as_slice(), ["hi", "supercalifragilistic", "yo"]);
    }

    #[test]
    fn wrap_empty_and_single() {
        assert!(wrap_text("", 100.0, mono).is_empty());
        assert_eq!(wrap_text("solo", 1.0, mono).as_slice(), ["solo"]);
    }

    #[test]
    fn layout_empty_text_is_none() {
        assert!(layout_text("", Anchor::MIDDLE_CENTER, OG, 75.0, mono).is_none());
    }

    #[test]
    fn layout_middle_center_block() {
        let block = layout_text("Hello World", Anchor::MIDDLE_CENTER, OG, 75.0, mono).unwrap();
        assert_eq!(block.lines.len(), 1);
        assert!(close(block.line_height, 97.5));
        let line = &block.lines[0];
        assert_eq!(line.width, 110.0);
        assert_eq!(line.origin.x, 545.0);
        assert!(close(line.origin.y, (630.0 - 97.5) / 2.0));
    }

    #[test]
    fn layout_lines_step_by_line_height() {
        let text = "word ".repeat(60);
        let block = layout_text(text.trim_end(), "top-left".parse().unwrap(), OG, 20.0, mono)
            .unwrap();
        assert!(block.lines.len() > 1);
        for (i, line) in block.lines.iter().enumerate() {
            assert_eq!(line.origin.x, 60.0);
            assert!(close(line.origin.y, 60.0 + i as f64 * 26.0), "line {i} at {}", line.origin.y);
        }
    }

    #[test]
    fn layout_right_aligns_each_line() {
        let canvas = Size::new(200.0, 200.0);
        let block = layout_text("aaaa bb", "bottom-right".parse().unwrap(), canvas, 10.0, mono)
            .unwrap();
        // max width = 200 - 2*10 = 180, so both words fit on one line
        assert_eq!(block.lines.len(), 1);
        assert_eq!(block.lines[0].origin.x, 200.0 - 70.0 - 10.0);
        assert!(close(block.lines[0].origin.y, 200.0 - 13.0 - 10.0));
    }
}
