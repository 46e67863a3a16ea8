//! PNG export.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use mkit_core::ImageFormat;
use thiserror::Error;
use tiny_skia::Pixmap;

/// Tool segment of exported file names.
pub const TOOL_NAME: &str = "marketing-image";

/// Message shown to the user for any export failure.
pub const EXPORT_FAILED: &str = "Failed to export image. Please try again.";

#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing has been rendered yet.
    #[error("{}", EXPORT_FAILED)]
    NotRendered,
    #[error("{}", EXPORT_FAILED)]
    Encode(#[source] image::ImageError),
}

/// A finished download: suggested file name plus PNG bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// `<tool>-<format>-<timestamp_ms>.png`
pub fn file_name(format: ImageFormat, timestamp_ms: u64) -> String {
    format!("{TOOL_NAME}-{}-{timestamp_ms}.png", format.key())
}

/// Straight (non-premultiplied) RGBA bytes, row-major.
pub fn demultiplied_rgba(canvas: &Pixmap) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(canvas.data().len());
    for px in canvas.pixels() {
        let c = px.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    rgba
}

/// Encode the canvas as an 8-bit RGBA PNG at its exact pixel size.
pub fn encode_png(canvas: &Pixmap) -> Result<Vec<u8>, ExportError> {
    let rgba = demultiplied_rgba(canvas);
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(&rgba, canvas.width(), canvas.height(), ExtendedColorType::Rgba8)
        .map_err(ExportError::Encode)?;
    log::debug!(
        "encoded {}×{} PNG, {} bytes",
        canvas.width(),
        canvas.height(),
        out.len()
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn file_name_pattern() {
        assert_eq!(
            file_name(ImageFormat::EmailSmall, 1_717_171_717_000),
            "marketing-image-email-small-1717171717000.png"
        );
        assert_eq!(file_name(ImageFormat::Og, 0), "marketing-image-og-0.png");
    }

    #[test]
    fn png_keeps_dimensions_and_color() {
        let mut canvas = Pixmap::new(12, 7).unwrap();
        canvas.fill(tiny_skia::Color::from_rgba8(10, 20, 30, 255));
        let png = encode_png(&canvas).unwrap();
        assert_eq!(&png[1..4], b"PNG");

        let decoded = image::load_from_memory(&png).unwrap().into_rgba8();
        assert_eq!(decoded.dimensions(), (12, 7));
        assert_eq!(decoded.get_pixel(6, 3).0, [10, 20, 30, 255]);
    }

    #[test]
    fn errors_show_user_message() {
        assert_eq!(ExportError::NotRendered.to_string(), EXPORT_FAILED);
    }
}
