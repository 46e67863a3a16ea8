//! Logo overlay.

use crate::bitmap::Bitmap;
use mkit_core::layout::logo_rect;
use mkit_core::{Anchor, Rect, Size};
use tiny_skia::Pixmap;

/// Draw `logo` at `anchor`, `size_pct` percent of canvas height tall (capped
/// at 40%), keeping its aspect ratio. Returns the rect it was drawn into.
pub fn paint_logo(canvas: &mut Pixmap, logo: &Bitmap, anchor: Anchor, size_pct: u32) -> Rect {
    let size = Size::new(canvas.width() as f64, canvas.height() as f64);
    let rect = logo_rect(anchor, size, size_pct, logo.size());
    log::trace!("logo: {anchor} {size_pct}% -> {rect:?}");
    logo.draw(canvas, rect);
    rect
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn square_logo() -> Bitmap {
        let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
            <rect width="100" height="100" fill="#ff0000"/></svg>"##;
        Bitmap::decode(svg).unwrap()
    }

    #[test]
    fn logo_lands_bottom_right_within_padding() {
        let mut canvas = Pixmap::new(1200, 630).unwrap();
        let rect = paint_logo(&mut canvas, &square_logo(), Anchor::BOTTOM_RIGHT, 20);
        assert_eq!(rect, Rect::new(1014.0, 444.0, 1140.0, 570.0));

        let inside = canvas.pixel(1100, 500).unwrap();
        assert_eq!((inside.red(), inside.alpha()), (255, 255));
        assert_eq!(canvas.pixel(1150, 500).unwrap().alpha(), 0);
        assert_eq!(canvas.pixel(1100, 580).unwrap().alpha(), 0);
    }

    #[test]
    fn oversized_request_is_capped() {
        let mut canvas = Pixmap::new(1200, 400).unwrap();
        let rect = paint_logo(&mut canvas, &square_logo(), Anchor::MIDDLE_CENTER, 50);
        assert_eq!(rect.height(), 160.0);
        assert_eq!(rect.width(), 160.0);
    }
}
