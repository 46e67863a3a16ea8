//! Brand configuration: company name, logo assets and background presets.
//!
//! Loaded from JSON so a deployment can swap in its own identity; the
//! `Default` impl carries the stock Marketing Toolkit brand.

use crate::gradient::Fill;
use crate::model::{BackgroundSpec, LogoKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrandConfig {
    pub company: Company,
    pub logo: LogoAssets,
    pub image_backgrounds: Vec<BackgroundPreset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub name: String,
    pub short_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoAssets {
    pub icon: ToneAssets,
    pub logotype: ToneAssets,
    /// Shown by the UI when no logo file is configured.
    #[serde(default)]
    pub fallback: String,
}

/// Asset paths for one logo variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneAssets {
    /// Light artwork, for dark backgrounds.
    pub light: String,
    /// Dark artwork, for light backgrounds.
    pub dark: String,
}

/// A selectable background. `gradient` holds a CSS value (gradient or color).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundPreset {
    pub id: String,
    pub name: String,
    pub gradient: String,
    /// Light backgrounds get the dark logo artwork.
    #[serde(default)]
    pub light: bool,
}

/// A background after catalog lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    Fill(Fill),
    /// The uploaded bitmap; the caller falls back to the default fill when
    /// none is loaded.
    Image { blur: bool },
}

impl Default for BrandConfig {
    fn default() -> Self {
        let preset = |id: &str, name: &str, gradient: &str| BackgroundPreset {
            id: id.to_string(),
            name: name.to_string(),
            gradient: gradient.to_string(),
            light: false,
        };
        let linear = |from: &str, to: &str| format!("linear-gradient(135deg, {from} 0%, {to} 100%)");

        Self {
            company: Company {
                name: "Marketing Toolkit".to_string(),
                short_name: "MTK".to_string(),
            },
            logo: LogoAssets {
                icon: ToneAssets {
                    light: "/images/icon-light.svg".to_string(),
                    dark: "/images/icon-dark.svg".to_string(),
                },
                logotype: ToneAssets {
                    light: "/images/logotype-light.svg".to_string(),
                    dark: "/images/logotype-dark.svg".to_string(),
                },
                fallback: "🚀".to_string(),
            },
            image_backgrounds: vec![
                preset("gradient-purple", "Purple Gradient", &linear("#667eea", "#764ba2")),
                preset("gradient-blue", "Blue Gradient", &linear("#0093E9", "#80D0C7")),
                preset("gradient-sunset", "Sunset Gradient", &linear("#fa709a", "#fee140")),
                preset("gradient-ocean", "Ocean Gradient", &linear("#2E3192", "#1BFFFF")),
                preset("gradient-forest", "Forest Gradient", &linear("#134E5E", "#71B280")),
                preset("gradient-fire", "Fire Gradient", &linear("#f12711", "#f5af19")),
                preset("solid-black", "Solid Black", "#000000"),
                BackgroundPreset {
                    light: true,
                    ..preset("solid-white", "Solid White", "#ffffff")
                },
                preset("solid-navy", "Navy Blue", "#0f172a"),
                preset("solid-charcoal", "Charcoal", "#1e293b"),
            ],
        }
    }
}

impl BrandConfig {
    /// Parse a brand file. Missing sections keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn background(&self, id: &str) -> Option<&BackgroundPreset> {
        self.image_backgrounds.iter().find(|bg| bg.id == id)
    }

    /// Whether `id` names a light background (and so wants dark artwork).
    pub fn is_light_background(&self, id: &str) -> bool {
        self.background(id).is_some_and(|bg| bg.light)
    }

    /// Path of the logo file to fetch for `kind` on a light or dark background.
    pub fn logo_asset(&self, kind: LogoKind, on_light_background: bool) -> &str {
        let tones = match kind {
            LogoKind::Icon => &self.logo.icon,
            LogoKind::Logotype => &self.logo.logotype,
        };
        if on_light_background {
            &tones.dark
        } else {
            &tones.light
        }
    }

    /// Resolve a background selection against the catalog.
    pub fn resolve_background(&self, spec: &BackgroundSpec) -> Background {
        match spec {
            BackgroundSpec::Preset(id) => match self.background(id) {
                Some(preset) => Background::Fill(Fill::from_css(&preset.gradient)),
                None => {
                    log::debug!("unknown background {id:?}, using default fill");
                    Background::Fill(Fill::default())
                }
            },
            BackgroundSpec::Solid(color) => Background::Fill(Fill::Solid(*color)),
            BackgroundSpec::Custom { blur } => Background::Image { blur: *blur },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Color, DEFAULT_FILL};
    use pretty_assertions::assert_eq;

    #[test]
    fn default_catalog_resolves() {
        let brand = BrandConfig::default();
        assert_eq!(brand.image_backgrounds.len(), 10);
        for preset in &brand.image_backgrounds {
            let bg = brand.resolve_background(&BackgroundSpec::Preset(preset.id.clone()));
            match (preset.id.starts_with("gradient-"), bg) {
                (true, Background::Fill(Fill::Linear(g))) => assert_eq!(g.angle, 135.0),
                (false, Background::Fill(Fill::Solid(_))) => {}
                other => panic!("unexpected resolution for {}: {other:?}", preset.id),
            }
        }
    }

    #[test]
    fn unknown_preset_uses_default_fill() {
        let brand = BrandConfig::default();
        assert_eq!(
            brand.resolve_background(&BackgroundSpec::Preset("nope".into())),
            Background::Fill(Fill::Solid(DEFAULT_FILL))
        );
    }

    #[test]
    fn logo_tone_follows_background_lightness() {
        let brand = BrandConfig::default();
        assert!(brand.is_light_background("solid-white"));
        assert!(!brand.is_light_background("solid-black"));
        assert!(!brand.is_light_background("custom"));
        assert_eq!(brand.logo_asset(LogoKind::Icon, true), "/images/icon-dark.svg");
        assert_eq!(brand.logo_asset(LogoKind::Icon, false), "/images/icon-light.svg");
        assert_eq!(
            brand.logo_asset(LogoKind::Logotype, false),
            "/images/logotype-light.svg"
        );
    }

    #[test]
    fn json_overrides_backgrounds() {
        let json = r##"{
            "imageBackgrounds": [
                { "id": "paper", "name": "Paper", "gradient": "#fafafa", "light": true }
            ]
        }"##;
        let brand = BrandConfig::from_json(json).unwrap();
        assert_eq!(brand.company.name, "Marketing Toolkit");
        assert_eq!(brand.image_backgrounds.len(), 1);
        assert!(brand.is_light_background("paper"));
        assert_eq!(
            brand.resolve_background(&BackgroundSpec::Preset("paper".into())),
            Background::Fill(Fill::Solid(Color::from_hex("#fafafa").unwrap()))
        );
    }
}
