//! Render parameters → pixels.
//!
//! Paints one complete image in fixed layer order: background, logo, text.
//! Every call starts from a cleared canvas, so the output depends only on the
//! parameters and the currently loaded assets.

use crate::assets::Assets;
use crate::background::paint_background;
use crate::logo::paint_logo;
use crate::text::{TextRasterizer, paint_text};
use mkit_core::{BrandConfig, RenderParams};
use thiserror::Error;
use tiny_skia::Pixmap;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot allocate a {width}×{height} canvas")]
    Canvas { width: u32, height: u32 },
}

/// Allocate a canvas of the params' format and paint into it.
pub fn render_image(
    params: &RenderParams,
    brand: &BrandConfig,
    assets: &Assets,
    text: &dyn TextRasterizer,
) -> Result<Pixmap, RenderError> {
    let (width, height) = params.format.dimensions();
    let mut canvas = Pixmap::new(width, height).ok_or(RenderError::Canvas { width, height })?;
    render_into(&mut canvas, params, brand, assets, text);
    Ok(canvas)
}

/// Paint into an existing canvas, which must already have the format's size.
pub fn render_into(
    canvas: &mut Pixmap,
    params: &RenderParams,
    brand: &BrandConfig,
    assets: &Assets,
    text: &dyn TextRasterizer,
) {
    let params = params.clone().clamped();
    log::trace!(
        "render {} {}×{} bg={:?}",
        params.format.key(),
        canvas.width(),
        canvas.height(),
        params.background
    );

    canvas.fill(tiny_skia::Color::TRANSPARENT);

    // ─── Background ──────────────────────────────────────────────────────
    let background = brand.resolve_background(&params.background_spec());
    paint_background(canvas, &background, assets.background.bitmap());

    // ─── Logo ────────────────────────────────────────────────────────────
    if params.show_logo {
        match assets.logo.bitmap() {
            Some(logo) => {
                paint_logo(canvas, logo, params.logo_position, params.logo_size);
            }
            None => log::trace!("logo enabled but not loaded, skipped"),
        }
    }

    // ─── Text ────────────────────────────────────────────────────────────
    paint_text(canvas, &params, text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::MonoRasterizer;
    use mkit_core::ImageFormat;
    use pretty_assertions::assert_eq;

    #[test]
    fn canvas_matches_every_format() {
        let brand = BrandConfig::default();
        let assets = Assets::default();
        for format in ImageFormat::ALL {
            let params = RenderParams {
                format,
                ..RenderParams::default()
            };
            let canvas = render_image(&params, &brand, &assets, &MonoRasterizer).unwrap();
            assert_eq!((canvas.width(), canvas.height()), format.dimensions());
        }
    }

    #[test]
    fn rerender_is_independent_of_previous_contents() {
        let brand = BrandConfig::default();
        let assets = Assets::default();
        let params = RenderParams {
            background: "solid-navy".into(),
            ..RenderParams::default()
        };
        let fresh = render_image(&params, &brand, &assets, &MonoRasterizer).unwrap();

        let mut reused = Pixmap::new(1200, 630).unwrap();
        reused.fill(tiny_skia::Color::from_rgba8(255, 0, 0, 255));
        render_into(&mut reused, &params, &brand, &assets, &MonoRasterizer);
        assert!(fresh.data() == reused.data());
    }
}
