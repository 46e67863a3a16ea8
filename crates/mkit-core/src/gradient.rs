//! CSS background values → fills.
//!
//! The brand catalog stores backgrounds as CSS strings, either a hex color or
//! `linear-gradient(<deg>deg, <color> <pct>%, <color> <pct>%)`. Built on
//! `winnow` 0.7. Anything that does not parse falls back to `DEFAULT_FILL`
//! rather than failing the render.

use crate::model::{Color, DEFAULT_FILL};
use kurbo::{Point, Size};
use winnow::ascii::{digit1, multispace0, multispace1};
use winnow::combinator::{preceded, terminated};
use winnow::prelude::*;
use winnow::token::take_while;

/// Two-stop linear gradient. Stop offsets are always 0 and 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearGradient {
    pub angle: f32, // degrees
    pub start: Color,
    pub end: Color,
}

impl LinearGradient {
    /// Gradient line endpoints on a canvas of `size`.
    ///
    /// The direction `(angle − 90)°` is scaled by half-width and half-height
    /// independently (not by the half-diagonal), so for non-square canvases
    /// the line does not always reach the corners.
    pub fn endpoints(&self, size: Size) -> (Point, Point) {
        let theta = (f64::from(self.angle) - 90.0).to_radians();
        let (hw, hh) = (size.width / 2.0, size.height / 2.0);
        let (dx, dy) = (theta.cos() * hw, theta.sin() * hh);
        (Point::new(hw + dx, hh + dy), Point::new(hw - dx, hh - dy))
    }
}

/// A resolved solid or gradient fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Solid(Color),
    Linear(LinearGradient),
}

impl Default for Fill {
    fn default() -> Self {
        Fill::Solid(DEFAULT_FILL)
    }
}

impl Fill {
    /// Resolve a CSS background value, never failing.
    pub fn from_css(css: &str) -> Self {
        let css = css.trim();
        if css.starts_with("linear-gradient") {
            match parse_linear_gradient(css) {
                Some(gradient) => Fill::Linear(gradient),
                None => {
                    log::debug!("unparseable gradient {css:?}, using default fill");
                    Fill::default()
                }
            }
        } else {
            match Color::from_hex(css) {
                Some(color) if css.starts_with('#') => Fill::Solid(color),
                _ => {
                    log::debug!("unresolved background color {css:?}, using default fill");
                    Fill::default()
                }
            }
        }
    }
}

/// Parse a two-stop `linear-gradient(...)` value.
pub fn parse_linear_gradient(css: &str) -> Option<LinearGradient> {
    linear_gradient.parse(css.trim()).ok()
}

// ─── Low-level parsers ──────────────────────────────────────────────────

fn linear_gradient(input: &mut &str) -> ModalResult<LinearGradient> {
    (
        "linear-gradient(",
        multispace0,
        angle,
        list_separator,
        color_stop,
        list_separator,
        color_stop,
        multispace0,
        ')',
    )
        .map(|(_, _, angle, _, start, _, end, _, _)| LinearGradient { angle, start, end })
        .parse_next(input)
}

fn angle(input: &mut &str) -> ModalResult<f32> {
    terminated(digit1, "deg")
        .try_map(str::parse::<f32>)
        .parse_next(input)
}

fn list_separator(input: &mut &str) -> ModalResult<()> {
    (multispace0, ',', multispace0).void().parse_next(input)
}

/// `<color> <pct>%`. The percentage is required but not used.
fn color_stop(input: &mut &str) -> ModalResult<Color> {
    terminated(hex_color, (multispace1, digit1, '%')).parse_next(input)
}

fn hex_color(input: &mut &str) -> ModalResult<Color> {
    preceded('#', take_while(1..=8, |c: char| c.is_ascii_hexdigit()))
        .verify_map(Color::from_hex)
        .parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn approx(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6
    }

    #[test]
    fn parses_brand_gradient() {
        let g = parse_linear_gradient("linear-gradient(135deg, #667eea 0%, #764ba2 100%)").unwrap();
        assert_eq!(g.angle, 135.0);
        assert_eq!(g.start.to_hex(), "#667eea");
        assert_eq!(g.end.to_hex(), "#764ba2");
    }

    #[test]
    fn tolerates_whitespace() {
        let g = parse_linear_gradient("linear-gradient( 90deg ,#000   0% ,  #FFF 100% )").unwrap();
        assert_eq!(g.angle, 90.0);
        assert_eq!(g.start, Color::BLACK);
        assert_eq!(g.end, Color::WHITE);
    }

    #[test]
    fn rejects_unsupported_forms() {
        assert!(parse_linear_gradient("linear-gradient(to right, #000 0%, #fff 100%)").is_none());
        assert!(parse_linear_gradient("linear-gradient(45deg, red 0%, blue 100%)").is_none());
        assert!(parse_linear_gradient("linear-gradient(45deg, #000, #fff)").is_none());
        assert!(parse_linear_gradient("linear-gradient(45deg, #000 0%, #fff 100%) extra").is_none());
    }

    #[test]
    fn css_fallbacks() {
        assert_eq!(Fill::from_css("#0f172a"), Fill::Solid(Color::from_hex("#0f172a").unwrap()));
        assert_eq!(Fill::from_css("linear-gradient(oops)"), Fill::Solid(DEFAULT_FILL));
        assert_eq!(Fill::from_css("rebeccapurple"), Fill::Solid(DEFAULT_FILL));
        assert_eq!(Fill::from_css(""), Fill::Solid(DEFAULT_FILL));
    }

    #[test]
    fn endpoints_use_half_extents() {
        let size = Size::new(1200.0, 630.0);
        let horizontal = LinearGradient {
            angle: 90.0,
            start: Color::BLACK,
            end: Color::WHITE,
        };
        let (s, e) = horizontal.endpoints(size);
        assert!(approx(s, Point::new(1200.0, 315.0)), "{s:?}");
        assert!(approx(e, Point::new(0.0, 315.0)), "{e:?}");

        let diagonal = LinearGradient {
            angle: 135.0,
            ..horizontal
        };
        let (s, e) = diagonal.endpoints(size);
        let k = std::f64::consts::FRAC_1_SQRT_2;
        assert!(approx(s, Point::new(600.0 + 600.0 * k, 315.0 + 315.0 * k)), "{s:?}");
        assert!(approx(e, Point::new(600.0 - 600.0 * k, 315.0 - 315.0 * k)), "{e:?}");
    }
}
