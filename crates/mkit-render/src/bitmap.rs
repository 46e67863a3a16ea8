//! Decoded images: uploaded backgrounds and logo artwork.
//!
//! Raster files (PNG, JPEG, WebP) are decoded through `image` into a
//! premultiplied `tiny_skia::Pixmap`. SVG artwork stays a `usvg::Tree` and is
//! rendered as vectors straight into the destination rect.

use mkit_core::{Rect, Size};
use resvg::usvg;
use std::fmt;
use thiserror::Error;
use tiny_skia::{FilterQuality, IntSize, Pixmap, PixmapPaint, Transform};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unsupported or corrupt image: {0}")]
    Raster(#[from] image::ImageError),
    #[error("invalid SVG: {0}")]
    Svg(#[from] usvg::Error),
    #[error("image has no pixels")]
    Empty,
}

pub enum Bitmap {
    Raster(Pixmap),
    Vector(Box<usvg::Tree>),
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Bitmap::Raster(_) => "Raster",
            Bitmap::Vector(_) => "Vector",
        };
        let size = self.size();
        write!(f, "Bitmap::{kind}({}×{})", size.width, size.height)
    }
}

impl Bitmap {
    /// Decode file bytes, sniffing SVG by its leading markup.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        if looks_like_svg(bytes) {
            let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())?;
            let size = tree.size();
            if size.width() <= 0.0 || size.height() <= 0.0 {
                return Err(DecodeError::Empty);
            }
            return Ok(Bitmap::Vector(Box::new(tree)));
        }

        let rgba = image::load_from_memory(bytes)?.into_rgba8();
        let (width, height) = rgba.dimensions();
        let size = IntSize::from_wh(width, height).ok_or(DecodeError::Empty)?;
        let mut data = rgba.into_raw();
        premultiply_rgba8_in_place(&mut data);
        Pixmap::from_vec(data, size)
            .map(Bitmap::Raster)
            .ok_or(DecodeError::Empty)
    }

    /// Native size in pixels (SVG: user units).
    pub fn size(&self) -> Size {
        match self {
            Bitmap::Raster(pixmap) => Size::new(pixmap.width() as f64, pixmap.height() as f64),
            Bitmap::Vector(tree) => {
                let s = tree.size();
                Size::new(f64::from(s.width()), f64::from(s.height()))
            }
        }
    }

    /// Draw the whole image stretched onto `dest`.
    pub fn draw(&self, canvas: &mut Pixmap, dest: Rect) {
        let native = self.size();
        if native.is_zero_area() || dest.is_zero_area() {
            return;
        }
        let transform = Transform::from_row(
            (dest.width() / native.width) as f32,
            0.0,
            0.0,
            (dest.height() / native.height) as f32,
            dest.x0 as f32,
            dest.y0 as f32,
        );

        match self {
            Bitmap::Raster(pixmap) => {
                let paint = PixmapPaint {
                    quality: FilterQuality::Bicubic,
                    ..PixmapPaint::default()
                };
                canvas.draw_pixmap(0, 0, pixmap.as_ref(), &paint, transform, None);
            }
            Bitmap::Vector(tree) => resvg::render(tree, transform, &mut canvas.as_mut()),
        }
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let start = head
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(head.len());
    let head = &head[start..];
    // Skip a UTF-8 BOM.
    let head = head.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(head);
    head.starts_with(b"<svg") || head.starts_with(b"<?xml") || head.starts_with(b"<!--")
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}
