//! Rasterization: draws the shape lists into an RGBA buffer and encodes it
//! as a PNG data URL for download.
//!
//! Draw order matches [`ShapeLists::iter`]: rectangles, circles, arrows,
//! scribbles. Shapes are filled (rectangles, circles) or stroked (arrows,
//! scribbles) in their fill color on a white background. Pixels outside the
//! canvas are clipped.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, Rgba, RgbaImage};

use crate::Point;
use crate::consts::{ARROW_HEAD_LEN, SHAPE_LINE_WIDTH};
use crate::doc::{Geometry, ShapeLists, points_of};
use crate::hit::distance_to_segment;

/// File name offered for the downloaded snapshot.
pub const EXPORT_FILE_NAME: &str = "image.png";

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Arrowhead half-angle in radians (~30°).
const ARROW_ANGLE: f64 = std::f64::consts::PI / 6.0;

/// Error returned by [`export_png`].
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("png encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// A rendered snapshot ready for a client-side download.
#[derive(Debug, Clone)]
pub struct ExportedImage {
    /// Suggested download file name.
    pub file_name: String,
    /// `data:image/png;base64,...` URL.
    pub data_url: String,
    /// Raw PNG bytes.
    pub png: Vec<u8>,
}

/// Render `shapes` into a `width` × `height` PNG and wrap it as a data URL.
///
/// # Errors
///
/// Returns [`ExportError::Encode`] if the PNG encoder fails.
pub fn export_png(shapes: &ShapeLists, width: u32, height: u32) -> Result<ExportedImage, ExportError> {
    let img = rasterize(shapes, width, height);
    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    let data_url = format!("data:image/png;base64,{}", STANDARD.encode(&png));
    Ok(ExportedImage { file_name: EXPORT_FILE_NAME.to_owned(), data_url, png })
}

/// Draw every shape onto a fresh white canvas.
#[must_use]
pub fn rasterize(shapes: &ShapeLists, width: u32, height: u32) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(width, height, BACKGROUND);
    for shape in shapes.iter() {
        let color = parse_color(&shape.fill);
        match &shape.geometry {
            Geometry::Rectangle { x, y, width, height } => {
                fill_rect(&mut img, Point::new(*x, *y), Point::new(x + width, y + height), color);
            }
            Geometry::Circle { x, y, radius } => fill_circle(&mut img, Point::new(*x, *y), radius.abs(), color),
            Geometry::Arrow { points } => {
                let pts: Vec<Point> = points_of(points).collect();
                stroke_polyline(&mut img, &pts, SHAPE_LINE_WIDTH, color);
                if let [.., tail, tip] = pts.as_slice() {
                    draw_arrow_head(&mut img, *tail, *tip, color);
                }
            }
            Geometry::Scribble { points } => {
                let pts: Vec<Point> = points_of(points).collect();
                stroke_polyline(&mut img, &pts, SHAPE_LINE_WIDTH, color);
            }
        }
    }
    img
}

/// Parse `#rgb` / `#rrggbb` CSS colors. Anything else renders black.
#[must_use]
pub fn parse_color(css: &str) -> Rgba<u8> {
    let black = Rgba([0, 0, 0, 255]);
    let Some(hex) = css.trim().strip_prefix('#').filter(|h| h.is_ascii()) else {
        return black;
    };
    let channel = |s: &str| u8::from_str_radix(s, 16);
    let parsed = match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, c) in hex.char_indices() {
                match channel(&c.to_string()) {
                    Ok(v) => rgb[i] = v * 17,
                    Err(_) => return black,
                }
            }
            Some(rgb)
        }
        6 => match (channel(&hex[0..2]), channel(&hex[2..4]), channel(&hex[4..6])) {
            (Ok(r), Ok(g), Ok(b)) => Some([r, g, b]),
            _ => None,
        },
        _ => None,
    };
    parsed.map_or(black, |[r, g, b]| Rgba([r, g, b, 255]))
}

/// Clamp a float range to pixel indices `[lo, hi)` within `0..limit`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pixel_span(from: f64, to: f64, limit: u32) -> std::ops::Range<u32> {
    if !from.is_finite() || !to.is_finite() {
        return 0..0;
    }
    let lo = from.min(to).floor().max(0.0);
    let hi = from.max(to).ceil().min(f64::from(limit));
    if hi <= lo {
        return 0..0;
    }
    (lo as u32)..(hi as u32)
}

fn fill_rect(img: &mut RgbaImage, a: Point, b: Point, color: Rgba<u8>) {
    let (w, h) = img.dimensions();
    for py in pixel_span(a.y, b.y, h) {
        for px in pixel_span(a.x, b.x, w) {
            img.put_pixel(px, py, color);
        }
    }
}

fn fill_circle(img: &mut RgbaImage, center: Point, radius: f64, color: Rgba<u8>) {
    let (w, h) = img.dimensions();
    for py in pixel_span(center.y - radius, center.y + radius, h) {
        for px in pixel_span(center.x - radius, center.x + radius, w) {
            let sample = Point::new(f64::from(px) + 0.5, f64::from(py) + 0.5);
            if sample.distance(center) <= radius {
                img.put_pixel(px, py, color);
            }
        }
    }
}

fn stroke_segment(img: &mut RgbaImage, a: Point, b: Point, line_width: f64, color: Rgba<u8>) {
    let (w, h) = img.dimensions();
    let half = line_width / 2.0;
    for py in pixel_span(a.y.min(b.y) - half, a.y.max(b.y) + half, h) {
        for px in pixel_span(a.x.min(b.x) - half, a.x.max(b.x) + half, w) {
            let sample = Point::new(f64::from(px) + 0.5, f64::from(py) + 0.5);
            if distance_to_segment(sample, a, b) <= half {
                img.put_pixel(px, py, color);
            }
        }
    }
}

fn stroke_polyline(img: &mut RgbaImage, pts: &[Point], line_width: f64, color: Rgba<u8>) {
    match pts {
        [] => {}
        [only] => stroke_segment(img, *only, *only, line_width, color),
        _ => {
            for pair in pts.windows(2) {
                stroke_segment(img, pair[0], pair[1], line_width, color);
            }
        }
    }
}

fn draw_arrow_head(img: &mut RgbaImage, tail: Point, tip: Point, color: Rgba<u8>) {
    if tail.distance(tip) <= f64::EPSILON {
        return;
    }
    let angle = (tip.y - tail.y).atan2(tip.x - tail.x);
    for side in [angle + ARROW_ANGLE, angle - ARROW_ANGLE] {
        let end = Point::new(tip.x - ARROW_HEAD_LEN * side.cos(), tip.y - ARROW_HEAD_LEN * side.sin());
        stroke_segment(img, tip, end, SHAPE_LINE_WIDTH, color);
    }
}
