//! WASM bridge for the image generator page.
//!
//! Compiled via `wasm-pack build --target web`. The page keeps the form
//! state in an [`ImageGenerator`], fetches logo files and reads uploads
//! itself, and hands the bytes back here for decoding and compositing.

use mkit_core::{Anchor, BrandConfig, Color, FontStyle, ImageFormat, LogoKind, RenderParams};
use mkit_render::{
    Compositor, DecodeError, FaceSlot, LoadToken, OutlineRasterizer, demultiplied_rgba,
};
use serde::de::DeserializeOwned;
use wasm_bindgen::Clamped;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, ImageData};

/// Form state plus compositor, driven by the page.
#[wasm_bindgen]
pub struct ImageGenerator {
    compositor: Compositor,
    params: RenderParams,
    fonts: FontFiles,
    /// File name of the last successful export.
    export_name: String,
}

/// Raw font files; the outline rasterizer is rebuilt when one changes.
#[derive(Default)]
struct FontFiles {
    regular: Option<Vec<u8>>,
    bold: Option<Vec<u8>>,
    bold_italic: Option<Vec<u8>>,
}

impl FontFiles {
    fn build(&self) -> Option<OutlineRasterizer> {
        let mut rasterizer = OutlineRasterizer::new(self.regular.clone()?).ok()?;
        for (slot, data) in [
            (FaceSlot::Bold, &self.bold),
            (FaceSlot::BoldItalic, &self.bold_italic),
        ] {
            if let Some(data) = data
                && let Err(e) = rasterizer.set_face(slot, data.clone())
            {
                log::warn!("{slot:?} face rejected: {e}");
            }
        }
        Some(rasterizer)
    }
}

impl Default for ImageGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl ImageGenerator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook_setup();
        console_logger_setup();

        Self {
            compositor: Compositor::default(),
            params: RenderParams::default(),
            fonts: FontFiles::default(),
            export_name: String::new(),
        }
    }

    /// Replace the brand catalog from JSON. Loaded images are dropped.
    /// Returns `false` if the JSON does not parse.
    pub fn set_brand_json(&mut self, json: &str) -> bool {
        match BrandConfig::from_json(json) {
            Ok(brand) => {
                self.compositor.set_brand(brand);
                true
            }
            Err(e) => {
                log::warn!("brand config rejected: {e}");
                false
            }
        }
    }

    // ─── Form setters ────────────────────────────────────────────────────

    pub fn set_text(&mut self, text: &str) {
        self.params.text = text.to_string();
    }

    /// `og`, `youtube`, `twitter`, `email-small`, `email-large` or `banner`.
    pub fn set_format(&mut self, key: &str) -> bool {
        set_parsed(&mut self.params.format, key.parse::<ImageFormat>().ok())
    }

    /// e.g. `middle-center`.
    pub fn set_text_position(&mut self, value: &str) -> bool {
        set_parsed(&mut self.params.text_position, value.parse::<Anchor>().ok())
    }

    /// `regular`, `bold` or `bold italic`.
    pub fn set_font_style(&mut self, value: &str) -> bool {
        set_parsed(&mut self.params.font_style, from_wire::<FontStyle>(value))
    }

    pub fn set_text_size(&mut self, percent: u32) {
        self.params.text_size = percent;
        self.params = std::mem::take(&mut self.params).clamped();
    }

    pub fn set_text_color(&mut self, hex: &str) -> bool {
        set_parsed(&mut self.params.text_color, Color::from_hex(hex))
    }

    /// Catalog id, `#hex` color, or `custom`.
    pub fn set_background(&mut self, id: &str) {
        self.params.background = id.to_string();
    }

    pub fn set_blur_background(&mut self, blur: bool) {
        self.params.blur_background = blur;
    }

    pub fn set_show_logo(&mut self, show: bool) {
        self.params.show_logo = show;
    }

    /// `icon` or `logotype`.
    pub fn set_logo_kind(&mut self, value: &str) -> bool {
        set_parsed(&mut self.params.logo_kind, from_wire::<LogoKind>(value))
    }

    pub fn set_logo_position(&mut self, value: &str) -> bool {
        set_parsed(&mut self.params.logo_position, value.parse::<Anchor>().ok())
    }

    pub fn set_logo_size(&mut self, percent: u32) {
        self.params.logo_size = percent;
        self.params = std::mem::take(&mut self.params).clamped();
    }

    /// Current form state as JSON (camelCase keys).
    pub fn get_params_json(&self) -> String {
        serde_json::to_string(&self.params).unwrap_or_else(|_| "{}".to_string())
    }

    /// Replace the form state from JSON. Missing keys take their defaults.
    pub fn set_params_json(&mut self, json: &str) -> bool {
        match serde_json::from_str::<RenderParams>(json) {
            Ok(params) => {
                self.params = params.clamped();
                true
            }
            Err(e) => {
                log::warn!("params rejected: {e}");
                false
            }
        }
    }

    // ─── Assets ──────────────────────────────────────────────────────────

    /// Logo file the page should fetch for the current settings.
    pub fn logo_asset_path(&self) -> String {
        self.compositor.logo_asset_path(&self.params).to_string()
    }

    pub fn logo_needs_reload(&self) -> bool {
        self.compositor.logo_needs_reload(&self.params)
    }

    /// Returns a token to pass back with the fetched bytes.
    pub fn begin_logo_load(&mut self) -> f64 {
        self.compositor.begin_logo_load(&self.params).0 as f64
    }

    /// Returns `true` if the logo was decoded and is now current.
    pub fn finish_logo_load(&mut self, token: f64, bytes: &[u8]) -> bool {
        let result = self.compositor.finish_logo_load(token_from(token), bytes);
        stored(result, "logo")
    }

    pub fn fail_logo_load(&mut self, token: f64) -> bool {
        self.compositor.fail_logo_load(token_from(token))
    }

    pub fn begin_background_upload(&mut self, file_name: &str) -> f64 {
        self.compositor.begin_background_upload(file_name).0 as f64
    }

    /// Returns `true` if the upload decoded; the background switches to
    /// `custom`.
    pub fn finish_background_upload(&mut self, token: f64, bytes: &[u8]) -> bool {
        let result = self.compositor.finish_background_upload(
            token_from(token),
            bytes,
            &mut self.params,
        );
        stored(result, "background")
    }

    pub fn fail_background_upload(&mut self, token: f64) -> bool {
        self.compositor.fail_background_upload(token_from(token))
    }

    /// Install a font face: `regular`, `bold` or `bold italic`. Text switches
    /// to outline rendering once a regular face is present.
    pub fn load_font(&mut self, style: &str, bytes: Vec<u8>) -> bool {
        let slot = match style {
            "regular" => &mut self.fonts.regular,
            "bold" => &mut self.fonts.bold,
            "bold italic" => &mut self.fonts.bold_italic,
            _ => return false,
        };
        if let Err(e) = OutlineRasterizer::new(bytes.clone()) {
            log::warn!("font {style:?} rejected: {e}");
            return false;
        }
        *slot = Some(bytes);
        if let Some(rasterizer) = self.fonts.build() {
            self.compositor.set_text_rasterizer(rasterizer);
        }
        true
    }

    // ─── Render / export ─────────────────────────────────────────────────

    /// Pixel width of the current format; size the `<canvas>` to this.
    pub fn width(&self) -> u32 {
        self.params.format.dimensions().0
    }

    pub fn height(&self) -> u32 {
        self.params.format.dimensions().1
    }

    /// Composite the image and blit it into `ctx` at (0, 0).
    pub fn render(&mut self, ctx: &CanvasRenderingContext2d) -> bool {
        let canvas = match self.compositor.render(&self.params) {
            Ok(c) => c,
            Err(e) => {
                log::error!("render failed: {e}");
                return false;
            }
        };
        let rgba = demultiplied_rgba(canvas);
        let image = match ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(&rgba[..]),
            canvas.width(),
            canvas.height(),
        ) {
            Ok(image) => image,
            Err(e) => {
                log::error!("ImageData allocation failed: {e:?}");
                return false;
            }
        };
        ctx.put_image_data(&image, 0.0, 0.0).is_ok()
    }

    /// PNG bytes of the last render. Errors carry the message to show.
    pub fn export_png(&mut self) -> Result<Vec<u8>, JsValue> {
        let timestamp = js_sys::Date::now() as u64;
        match self.compositor.export_png(timestamp) {
            Ok(out) => {
                self.export_name = out.file_name;
                Ok(out.bytes)
            }
            Err(e) => Err(JsValue::from_str(&e.to_string())),
        }
    }

    /// Download name for the bytes returned by the last `export_png`.
    pub fn export_file_name(&self) -> String {
        self.export_name.clone()
    }

    /// Background catalog as JSON: `[{"id","name","gradient","light"}]`.
    pub fn backgrounds_json(&self) -> String {
        serde_json::to_string(&self.compositor.brand().image_backgrounds)
            .unwrap_or_else(|_| "[]".to_string())
    }
}

fn set_parsed<T>(field: &mut T, parsed: Option<T>) -> bool {
    match parsed {
        Some(value) => {
            *field = value;
            true
        }
        None => false,
    }
}

/// Parse a bare wire string (e.g. `bold italic`) as a serde enum.
fn from_wire<T: DeserializeOwned>(value: &str) -> Option<T> {
    serde_json::from_value(serde_json::Value::String(value.to_string())).ok()
}

fn token_from(token: f64) -> LoadToken {
    LoadToken(token as u64)
}

fn stored(result: Result<bool, DecodeError>, what: &str) -> bool {
    match result {
        Ok(stored) => stored,
        Err(e) => {
            log::warn!("{what} image rejected: {e}");
            false
        }
    }
}

// ─── Catalogs (no generator needed) ──────────────────────────────────────

/// Format catalog as JSON: `[{"key","label","width","height"}]`.
#[wasm_bindgen]
pub fn formats_json() -> String {
    let formats: Vec<serde_json::Value> = ImageFormat::ALL
        .iter()
        .map(|f| {
            let (width, height) = f.dimensions();
            serde_json::json!({
                "key": f.key(),
                "label": f.label(),
                "width": width,
                "height": height,
            })
        })
        .collect();
    serde_json::Value::Array(formats).to_string()
}

/// The nine anchors in form order: `[{"value","label"}]`.
#[wasm_bindgen]
pub fn anchors_json() -> String {
    let anchors: Vec<serde_json::Value> = Anchor::ALL
        .iter()
        .map(|a| serde_json::json!({ "value": a.to_string(), "label": a.label() }))
        .collect();
    serde_json::Value::Array(anchors).to_string()
}

// ─── Console plumbing ────────────────────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("image generator panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

fn console_logger_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        // Already set on a second generator; keep the first.
        let _ = console_log::init_with_level(log::Level::Info);
    }
}
