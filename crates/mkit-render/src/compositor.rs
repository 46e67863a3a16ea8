//! Stateful front end used by the UI shell.
//!
//! Owns the brand catalog, loaded assets, text rasterizer and the last
//! rendered canvas. The shell calls [`Compositor::render`] after every input
//! change and [`Compositor::export_png`] on download.

use crate::assets::{Assets, LoadToken};
use crate::bitmap::DecodeError;
use crate::export::{ExportError, ExportedImage, encode_png, file_name};
use crate::paint::{RenderError, render_into};
use crate::text::{MonoRasterizer, TextRasterizer};
use mkit_core::{BrandConfig, CUSTOM_BACKGROUND_ID, ImageFormat, RenderParams};
use tiny_skia::Pixmap;

pub struct Compositor {
    brand: BrandConfig,
    text: Box<dyn TextRasterizer>,
    assets: Assets,
    canvas: Option<Pixmap>,
    format: ImageFormat,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("assets", &self.assets)
            .field("format", &self.format)
            .field("rendered", &self.canvas.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(BrandConfig::default())
    }
}

impl Compositor {
    pub fn new(brand: BrandConfig) -> Self {
        Self {
            brand,
            text: Box::new(MonoRasterizer),
            assets: Assets::default(),
            canvas: None,
            format: ImageFormat::default(),
        }
    }

    pub fn set_text_rasterizer(&mut self, text: impl TextRasterizer + 'static) {
        self.text = Box::new(text);
    }

    pub fn brand(&self) -> &BrandConfig {
        &self.brand
    }

    /// Swap the brand catalog. Loaded images are dropped and loads still in
    /// flight become stale; token numbering carries on from before.
    pub fn set_brand(&mut self, brand: BrandConfig) {
        self.brand = brand;
        self.assets.logo.clear();
        self.assets.background.clear();
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    // ─── Logo loading ────────────────────────────────────────────────────

    /// Logo file for the current kind and background tone.
    pub fn logo_asset_path(&self, params: &RenderParams) -> &str {
        let light = self.brand.is_light_background(&params.background);
        self.brand.logo_asset(params.logo_kind, light)
    }

    /// Whether `params` asks for a different logo file than the one loaded
    /// or loading.
    pub fn logo_needs_reload(&self, params: &RenderParams) -> bool {
        params.show_logo && self.assets.logo.source() != Some(self.logo_asset_path(params))
    }

    /// Start fetching the logo for `params`. Any earlier fetch becomes stale.
    pub fn begin_logo_load(&mut self, params: &RenderParams) -> LoadToken {
        let path = self.logo_asset_path(params).to_string();
        self.assets.logo.begin(path)
    }

    /// Deliver fetched logo bytes. `Ok(false)` means the load was stale.
    pub fn finish_logo_load(&mut self, token: LoadToken, bytes: &[u8]) -> Result<bool, DecodeError> {
        self.assets.logo.complete_bytes(token, bytes)
    }

    /// The logo fetch failed; the logo is omitted.
    pub fn fail_logo_load(&mut self, token: LoadToken) -> bool {
        self.assets.logo.fail(token)
    }

    // ─── Background upload ───────────────────────────────────────────────

    pub fn begin_background_upload(&mut self, name: &str) -> LoadToken {
        self.assets.background.begin(name)
    }

    /// Deliver uploaded bytes. On success the selection switches to the
    /// custom background.
    pub fn finish_background_upload(
        &mut self,
        token: LoadToken,
        bytes: &[u8],
        params: &mut RenderParams,
    ) -> Result<bool, DecodeError> {
        let stored = self.assets.background.complete_bytes(token, bytes)?;
        if stored {
            params.background = CUSTOM_BACKGROUND_ID.to_string();
        }
        Ok(stored)
    }

    pub fn fail_background_upload(&mut self, token: LoadToken) -> bool {
        self.assets.background.fail(token)
    }

    // ─── Render / export ─────────────────────────────────────────────────

    /// Re-render from scratch. The canvas buffer is reused while the format
    /// stays the same.
    pub fn render(&mut self, params: &RenderParams) -> Result<&Pixmap, RenderError> {
        let (width, height) = params.format.dimensions();
        let mut canvas = self.canvas_for(width, height)?;
        render_into(&mut canvas, params, &self.brand, &self.assets, self.text.as_ref());
        self.format = params.format;
        Ok(self.canvas.insert(canvas))
    }

    /// Buffer for the next render. The last render is only given up once a
    /// replacement has been allocated.
    fn canvas_for(&mut self, width: u32, height: u32) -> Result<Pixmap, RenderError> {
        if let Some(canvas) = self
            .canvas
            .take_if(|c| c.width() == width && c.height() == height)
        {
            return Ok(canvas);
        }
        Pixmap::new(width, height).ok_or(RenderError::Canvas { width, height })
    }

    /// Encode the most recent render as a named PNG download.
    pub fn export_png(&self, timestamp_ms: u64) -> Result<ExportedImage, ExportError> {
        let canvas = self.canvas.as_ref().ok_or(ExportError::NotRendered)?;
        let bytes = encode_png(canvas).inspect_err(|err| log::error!("PNG export failed: {err:?}"))?;
        Ok(ExportedImage {
            file_name: file_name(self.format, timestamp_ms),
            bytes,
        })
    }
}
