//! Data model for the image generator.
//!
//! Everything the compositor needs to produce one image is captured in a
//! single `RenderParams` value. The UI shell re-resolves it on every input
//! change; nothing here carries identity across renders.

use kurbo::Size;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();
        let short = |i: usize| hex_val(bytes[i]).map(|v| v * 17);
        let long = |i: usize| Some(hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?);

        match bytes.len() {
            3 => Some(Self::from_rgba8(short(0)?, short(1)?, short(2)?, 255)),
            4 => Some(Self::from_rgba8(short(0)?, short(1)?, short(2)?, short(3)?)),
            6 => Some(Self::from_rgba8(long(0)?, long(2)?, long(4)?, 255)),
            8 => Some(Self::from_rgba8(long(0)?, long(2)?, long(4)?, long(6)?)),
            _ => None,
        }
    }

    /// Quantize to 8-bit channels.
    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Emit as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color `{s}`")))
    }
}

/// Fill used whenever a background cannot be resolved.
pub const DEFAULT_FILL: Color = Color::rgba(102.0 / 255.0, 126.0 / 255.0, 234.0 / 255.0, 1.0);

// ─── Anchors ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

/// One of the nine placements on the 3×3 grid. Wire form: `"top-left"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Anchor {
    pub vertical: VAlign,
    pub horizontal: HAlign,
}

impl Anchor {
    pub const fn new(vertical: VAlign, horizontal: HAlign) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }

    /// All nine anchors in form order (row-major, top-left first).
    pub const ALL: [Anchor; 9] = [
        Anchor::new(VAlign::Top, HAlign::Left),
        Anchor::new(VAlign::Top, HAlign::Center),
        Anchor::new(VAlign::Top, HAlign::Right),
        Anchor::new(VAlign::Middle, HAlign::Left),
        Anchor::new(VAlign::Middle, HAlign::Center),
        Anchor::new(VAlign::Middle, HAlign::Right),
        Anchor::new(VAlign::Bottom, HAlign::Left),
        Anchor::new(VAlign::Bottom, HAlign::Center),
        Anchor::new(VAlign::Bottom, HAlign::Right),
    ];

    pub const MIDDLE_CENTER: Anchor = Anchor::new(VAlign::Middle, HAlign::Center);
    pub const BOTTOM_RIGHT: Anchor = Anchor::new(VAlign::Bottom, HAlign::Right);

    fn parts(&self) -> (&'static str, &'static str) {
        let v = match self.vertical {
            VAlign::Top => "top",
            VAlign::Middle => "middle",
            VAlign::Bottom => "bottom",
        };
        let h = match self.horizontal {
            HAlign::Left => "left",
            HAlign::Center => "center",
            HAlign::Right => "right",
        };
        (v, h)
    }

    /// Human-readable label, e.g. `Middle Center`.
    pub fn label(&self) -> String {
        let (v, h) = self.parts();
        [v, h]
            .iter()
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (v, h) = self.parts();
        write!(f, "{v}-{h}")
    }
}

impl FromStr for Anchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (v, h) = s
            .split_once('-')
            .ok_or_else(|| format!("invalid position `{s}`"))?;
        let vertical = match v {
            "top" => VAlign::Top,
            "middle" => VAlign::Middle,
            "bottom" => VAlign::Bottom,
            _ => return Err(format!("invalid vertical position `{v}`")),
        };
        let horizontal = match h {
            "left" => HAlign::Left,
            "center" => HAlign::Center,
            "right" => HAlign::Right,
            _ => return Err(format!("invalid horizontal position `{h}`")),
        };
        Ok(Anchor::new(vertical, horizontal))
    }
}

impl Serialize for Anchor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Anchor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ─── Font / Text ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontStyle {
    #[serde(rename = "regular")]
    Regular,
    #[default]
    #[serde(rename = "bold")]
    Bold,
    #[serde(rename = "bold italic")]
    BoldItalic,
}

impl FontStyle {
    /// CSS-style weight: 400 or 700.
    pub fn weight(self) -> u16 {
        match self {
            FontStyle::Regular => 400,
            FontStyle::Bold | FontStyle::BoldItalic => 700,
        }
    }

    pub fn is_italic(self) -> bool {
        matches!(self, FontStyle::BoldItalic)
    }
}

/// Resolved font for a render: pixel size plus weight/slant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub size: f32,
    pub weight: u16, // 400 | 700
    pub italic: bool,
}

impl FontSpec {
    pub fn new(style: FontStyle, size: f32) -> Self {
        Self {
            size,
            weight: style.weight(),
            italic: style.is_italic(),
        }
    }

    pub fn is_bold(&self) -> bool {
        self.weight >= 600
    }
}

// ─── Logo ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoKind {
    /// Symbol/mark only.
    #[default]
    Icon,
    /// Full wordmark.
    Logotype,
}

// ─── Formats ─────────────────────────────────────────────────────────────

/// The fixed catalog of output sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageFormat {
    #[default]
    Og,
    Youtube,
    Twitter,
    EmailSmall,
    EmailLarge,
    Banner,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 6] = [
        ImageFormat::Og,
        ImageFormat::Youtube,
        ImageFormat::Twitter,
        ImageFormat::EmailSmall,
        ImageFormat::EmailLarge,
        ImageFormat::Banner,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ImageFormat::Og => "og",
            ImageFormat::Youtube => "youtube",
            ImageFormat::Twitter => "twitter",
            ImageFormat::EmailSmall => "email-small",
            ImageFormat::EmailLarge => "email-large",
            ImageFormat::Banner => "banner",
        }
    }

    /// Pixel dimensions `(width, height)`.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            ImageFormat::Og => (1200, 630),
            ImageFormat::Youtube => (1280, 720),
            ImageFormat::Twitter => (1200, 675),
            ImageFormat::EmailSmall => (1200, 400),
            ImageFormat::EmailLarge => (1200, 800),
            ImageFormat::Banner => (2048, 400),
        }
    }

    pub fn size(self) -> Size {
        let (w, h) = self.dimensions();
        Size::new(w as f64, h as f64)
    }

    pub fn label(self) -> &'static str {
        match self {
            ImageFormat::Og => "Open Graph (1200×630)",
            ImageFormat::Youtube => "YouTube Thumbnail (1280×720)",
            ImageFormat::Twitter => "Twitter Card (1200×675)",
            ImageFormat::EmailSmall => "Email Banner Small (1200×400 @2x)",
            ImageFormat::EmailLarge => "Email Banner Large (1200×800 @2x)",
            ImageFormat::Banner => "Wide Banner (2048×400)",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImageFormat::ALL
            .into_iter()
            .find(|f| f.key() == s)
            .ok_or_else(|| format!("unknown image format `{s}`"))
    }
}

// ─── Background ──────────────────────────────────────────────────────────

/// Background id that selects the uploaded bitmap.
pub const CUSTOM_BACKGROUND_ID: &str = "custom";

/// What the user picked as background, before catalog resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundSpec {
    /// A catalog entry (gradient or solid) by id.
    Preset(String),
    /// A literal color.
    Solid(Color),
    /// The uploaded bitmap, cover-scaled.
    Custom { blur: bool },
}

impl BackgroundSpec {
    /// Interpret a form selection: `"custom"`, a `#hex` literal, or a catalog id.
    pub fn from_selection(id: &str, blur: bool) -> Self {
        if id == CUSTOM_BACKGROUND_ID {
            return BackgroundSpec::Custom { blur };
        }
        if id.starts_with('#')
            && let Some(color) = Color::from_hex(id)
        {
            return BackgroundSpec::Solid(color);
        }
        BackgroundSpec::Preset(id.to_string())
    }
}

// ─── Render parameters ───────────────────────────────────────────────────

pub const TEXT_SIZE_RANGE: RangeInclusive<u32> = 5..=25;
pub const LOGO_SIZE_RANGE: RangeInclusive<u32> = 5..=50;

/// Upper bound on logo height as a fraction of canvas height.
pub const MAX_LOGO_HEIGHT_RATIO: f64 = 0.4;

/// Line advance as a multiple of font size.
pub const LINE_HEIGHT_RATIO: f64 = 1.3;

/// The full, resolved input of one render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderParams {
    pub text: String,
    pub format: ImageFormat,
    pub text_position: Anchor,
    pub font_style: FontStyle,
    /// Percent of canvas height, 5..=25.
    pub text_size: u32,
    pub text_color: Color,
    /// Catalog id, `#hex`, or `"custom"`.
    pub background: String,
    pub blur_background: bool,
    pub show_logo: bool,
    pub logo_kind: LogoKind,
    pub logo_position: Anchor,
    /// Percent of canvas height, 5..=50.
    pub logo_size: u32,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            text: "Welcome to Marketing Toolkit".to_string(),
            format: ImageFormat::Og,
            text_position: Anchor::MIDDLE_CENTER,
            font_style: FontStyle::Bold,
            text_size: 12,
            text_color: Color::WHITE,
            background: "gradient-purple".to_string(),
            blur_background: false,
            show_logo: true,
            logo_kind: LogoKind::Icon,
            logo_position: Anchor::BOTTOM_RIGHT,
            logo_size: 20,
        }
    }
}

impl RenderParams {
    /// Pull slider values back into their input ranges.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.text_size = self
            .text_size
            .clamp(*TEXT_SIZE_RANGE.start(), *TEXT_SIZE_RANGE.end());
        self.logo_size = self
            .logo_size
            .clamp(*LOGO_SIZE_RANGE.start(), *LOGO_SIZE_RANGE.end());
        self
    }

    pub fn background_spec(&self) -> BackgroundSpec {
        BackgroundSpec::from_selection(&self.background, self.blur_background)
    }

    pub fn font(&self, size: f32) -> FontSpec {
        FontSpec::new(self.font_style, size)
    }
}
