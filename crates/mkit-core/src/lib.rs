pub mod brand;
pub mod gradient;
pub mod layout;
pub mod model;

pub use brand::{Background, BackgroundPreset, BrandConfig};
pub use gradient::{Fill, LinearGradient, parse_linear_gradient};
pub use layout::{CoverFit, TextBlock, TextLine, layout_text, padding, resolve_anchor, wrap_text};
pub use model::*;

// Re-export kurbo geometry so downstream crates share one version
pub use kurbo::{Point, Rect, Size};
