//! Integration tests: params → catalog → layout → verify placements.
//!
//! Exercises the `mkit-core` pipeline the compositor relies on: format
//! sizes, anchor resolution, text wrapping and logo sizing.

use mkit_core::layout::{font_size, logo_rect, logo_size};
use mkit_core::{Anchor, ImageFormat, Size, layout_text, padding, resolve_anchor, wrap_text};

/// Fixed-pitch measurement: 0.6em per character.
fn measure_at(font_size: f64) -> impl Fn(&str) -> f64 {
    move |s: &str| s.chars().count() as f64 * font_size * 0.6
}

// ─── Anchor resolver ─────────────────────────────────────────────────────

#[test]
fn every_anchor_keeps_fitting_elements_on_canvas() {
    for format in ImageFormat::ALL {
        let canvas = format.size();
        let pad = padding(canvas.width);
        let elements = [
            Size::new(0.0, 0.0),
            Size::new(1.0, 1.0),
            Size::new(canvas.width / 3.0, canvas.height / 5.0),
            Size::new(canvas.width - 2.0 * pad, canvas.height - 2.0 * pad),
        ];
        for anchor in Anchor::ALL {
            for element in elements {
                let p = resolve_anchor(anchor, canvas, element, pad);
                assert!(
                    p.x >= 0.0 && p.y >= 0.0,
                    "{anchor} on {} put {element:?} at {p:?}",
                    format.key()
                );
                assert!(
                    p.x + element.width <= canvas.width && p.y + element.height <= canvas.height,
                    "{anchor} on {} put {element:?} at {p:?}",
                    format.key()
                );
            }
        }
    }
}

#[test]
fn edge_anchors_respect_padding() {
    let canvas = ImageFormat::Banner.size();
    let pad = padding(canvas.width);
    let el = Size::new(300.0, 100.0);

    let tl = resolve_anchor("top-left".parse().unwrap(), canvas, el, pad);
    assert_eq!((tl.x, tl.y), (pad, pad));

    let br = resolve_anchor("bottom-right".parse().unwrap(), canvas, el, pad);
    assert_eq!(canvas.width - (br.x + el.width), pad);
    assert_eq!(canvas.height - (br.y + el.height), pad);
}

// ─── Text wrapping ───────────────────────────────────────────────────────

#[test]
fn wrapped_lines_fit_within_padded_width() {
    let text = "Grow your audience with branded social images that look great in \
                every feed and inbox without opening a design tool ever again";
    for format in ImageFormat::ALL {
        let canvas = format.size();
        let max_width = canvas.width - 2.0 * padding(canvas.width);
        for pct in [5, 12, 25] {
            let measure = measure_at(font_size(canvas.height, pct));
            for line in wrap_text(text, max_width, &measure) {
                assert!(
                    measure(&line) <= max_width,
                    "{:?} overflows {max_width} on {}",
                    line,
                    format.key()
                );
            }
        }
    }
}

#[test]
fn oversized_word_sits_alone() {
    let canvas = ImageFormat::EmailSmall.size();
    let max_width = canvas.width - 2.0 * padding(canvas.width);
    let measure = measure_at(100.0);
    let lines = wrap_text("a pneumonoultramicroscopic b", max_width, &measure);
    assert_eq!(lines.as_slice(), ["a", "pneumonoultramicroscopic", "b"]);
    assert!(measure(&lines[1]) > max_width);
}

#[test]
fn text_block_centers_on_canvas() {
    let canvas = ImageFormat::Og.size();
    let size = font_size(canvas.height, 12);
    let block = layout_text("Hello World", Anchor::MIDDLE_CENTER, canvas, size, measure_at(size))
        .expect("non-empty text lays out");

    let line = &block.lines[0];
    let center_x = line.origin.x + line.width / 2.0;
    assert!((center_x - 600.0).abs() < 1e-9, "center x {center_x}");
    let center_y = line.origin.y + block.size.height / 2.0;
    assert!((center_y - 315.0).abs() < 1e-9, "center y {center_y}");
}

// ─── Logo sizing ─────────────────────────────────────────────────────────

#[test]
fn logo_never_exceeds_forty_percent() {
    let native = Size::new(512.0, 512.0);
    for format in ImageFormat::ALL {
        let canvas = format.size();
        for pct in [5, 20, 40, 41, 50, 100] {
            let s = logo_size(canvas, pct, native);
            assert!(s.height <= canvas.height * 0.4 + 1e-9);
            assert!((s.width - s.height).abs() < 1e-9, "aspect ratio preserved");
        }
    }
}

#[test]
fn logo_rect_bottom_right_on_og() {
    let rect = logo_rect(
        Anchor::BOTTOM_RIGHT,
        ImageFormat::Og.size(),
        20,
        Size::new(256.0, 128.0),
    );
    assert_eq!(rect.height(), 126.0);
    assert_eq!(rect.width(), 252.0);
    assert_eq!(rect.x1, 1200.0 - 60.0);
    assert_eq!(rect.y1, 630.0 - 60.0);
}
