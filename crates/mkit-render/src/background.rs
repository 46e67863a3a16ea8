//! Background layer: solid fills, linear gradients and the uploaded cover
//! image with an optional Gaussian blur.

use crate::bitmap::Bitmap;
use mkit_core::{Background, Color, CoverFit, DEFAULT_FILL, Fill, LinearGradient, Size};
use smallvec::SmallVec;
use tiny_skia::{GradientStop, Paint, Pixmap, PixmapPaint, SpreadMode, Transform};

/// Gaussian standard deviation of the background blur, in pixels.
pub const BLUR_SIGMA: f64 = 20.0;

/// Paint `background` over the whole canvas.
///
/// `image` is the uploaded bitmap, if any. An image background with nothing
/// loaded paints `DEFAULT_FILL` instead.
pub fn paint_background(canvas: &mut Pixmap, background: &Background, image: Option<&Bitmap>) {
    match (background, image) {
        (Background::Fill(Fill::Solid(color)), _) => canvas.fill(skia_color(*color)),
        (Background::Fill(Fill::Linear(gradient)), _) => paint_gradient(canvas, gradient),
        (Background::Image { blur }, Some(bitmap)) => paint_cover(canvas, bitmap, *blur),
        (Background::Image { .. }, None) => {
            log::debug!("custom background selected but no image loaded");
            canvas.fill(skia_color(DEFAULT_FILL));
        }
    }
}

pub(crate) fn skia_color(color: Color) -> tiny_skia::Color {
    let [r, g, b, a] = color.to_rgba8();
    tiny_skia::Color::from_rgba8(r, g, b, a)
}

fn canvas_size(canvas: &Pixmap) -> Size {
    Size::new(canvas.width() as f64, canvas.height() as f64)
}

fn paint_gradient(canvas: &mut Pixmap, gradient: &LinearGradient) {
    let (start, end) = gradient.endpoints(canvas_size(canvas));
    let shader = tiny_skia::LinearGradient::new(
        tiny_skia::Point::from_xy(start.x as f32, start.y as f32),
        tiny_skia::Point::from_xy(end.x as f32, end.y as f32),
        vec![
            GradientStop::new(0.0, skia_color(gradient.start)),
            GradientStop::new(1.0, skia_color(gradient.end)),
        ],
        SpreadMode::Pad,
        Transform::identity(),
    );
    let rect = tiny_skia::Rect::from_xywh(0.0, 0.0, canvas.width() as f32, canvas.height() as f32);

    match (shader, rect) {
        (Some(shader), Some(rect)) => {
            let paint = Paint {
                shader,
                anti_alias: false,
                ..Paint::default()
            };
            canvas.fill_rect(rect, &paint, Transform::identity(), None);
        }
        // Degenerate gradient line (zero-sized canvas or coincident points).
        _ => canvas.fill(skia_color(gradient.start)),
    }
}

fn paint_cover(canvas: &mut Pixmap, bitmap: &Bitmap, blur: bool) {
    let size = canvas_size(canvas);
    let native = bitmap.size();
    if native.is_zero_area() {
        canvas.fill(skia_color(DEFAULT_FILL));
        return;
    }
    let dest = CoverFit::new(size, native).dest_rect(native);

    if !blur {
        bitmap.draw(canvas, dest);
        return;
    }

    // Blur applies to the image layer only; logo and text go on afterwards.
    let Some(mut layer) = Pixmap::new(canvas.width(), canvas.height()) else {
        return;
    };
    bitmap.draw(&mut layer, dest);
    gaussian_blur(&mut layer, BLUR_SIGMA);
    canvas.draw_pixmap(
        0,
        0,
        layer.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
}

// ─── Blur ────────────────────────────────────────────────────────────────

/// Approximate a Gaussian blur with three box blurs per axis.
///
/// Operates on premultiplied pixels. Samples past the edge clamp to the
/// nearest edge pixel.
pub fn gaussian_blur(pixmap: &mut Pixmap, sigma: f64) {
    if sigma <= 0.0 {
        return;
    }
    let (width, height) = (pixmap.width() as usize, pixmap.height() as usize);
    let data = pixmap.data_mut();
    let mut scratch = vec![0u8; data.len()];

    for size in box_sizes(sigma, 3) {
        let radius = (size - 1) / 2;
        box_blur_pass(data, &mut scratch, width, height, radius, true);
        box_blur_pass(&scratch, data, width, height, radius, false);
    }
}

/// Box widths whose successive application approximates a Gaussian of
/// `sigma`. Widths are odd.
pub(crate) fn box_sizes(sigma: f64, passes: usize) -> SmallVec<[usize; 3]> {
    let n = passes as f64;
    let ideal = (12.0 * sigma * sigma / n + 1.0).sqrt();
    let mut lower = ideal.floor() as usize;
    if lower % 2 == 0 {
        lower = lower.saturating_sub(1);
    }
    let lower = lower.max(1);
    let upper = lower + 2;

    let wl = lower as f64;
    let m = ((12.0 * sigma * sigma - n * wl * wl - 4.0 * n * wl - 3.0 * n) / (-4.0 * wl - 4.0))
        .round()
        .max(0.0) as usize;

    (0..passes)
        .map(|i| if i < m { lower } else { upper })
        .collect()
}

fn box_blur_pass(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    radius: usize,
    horizontal: bool,
) {
    if width == 0 || height == 0 {
        return;
    }
    let (lines, len) = if horizontal {
        (height, width)
    } else {
        (width, height)
    };
    let index = |line: usize, i: usize| {
        if horizontal {
            (line * width + i) * 4
        } else {
            (i * width + line) * 4
        }
    };
    let window = (2 * radius + 1) as u32;

    for line in 0..lines {
        let at = |i: usize| index(line, i.min(len - 1));

        let mut sum = [0u32; 4];
        let first = at(0);
        for (k, s) in sum.iter_mut().enumerate() {
            *s = src[first + k] as u32 * (radius as u32 + 1);
        }
        for i in 1..=radius {
            let p = at(i);
            for (k, s) in sum.iter_mut().enumerate() {
                *s += src[p + k] as u32;
            }
        }

        for i in 0..len {
            let out = index(line, i);
            for (k, s) in sum.iter().enumerate() {
                dst[out + k] = ((s + window / 2) / window) as u8;
            }
            let add = at(i + radius + 1);
            let sub = at(i.saturating_sub(radius));
            for (k, s) in sum.iter_mut().enumerate() {
                *s = *s + src[add + k] as u32 - src[sub + k] as u32;
            }
        }
    }
}
