//! Flat text codec for the drawing endpoint.
//!
//! One shape per line: comma-joined numeric fields followed by a type tag.
//!
//! ```text
//! 10,20,RECTANGLE
//! 50,50,CIRCLE
//! 0,0,40,30,ARROW
//! 1,1,2,2,3,5,SCRIBBLE
//! ```
//!
//! Rectangles and circles carry only their position; size does not survive
//! the format, so decoding assigns the default size. Arrows and scribbles
//! carry their full point list.

#[cfg(test)]
#[path = "flat_test.rs"]
mod flat_test;

use crate::consts::{DEFAULT_CIRCLE_RADIUS, DEFAULT_RECT_SIZE};
use crate::doc::{Geometry, Shape, ShapeKind, ShapeLists};

/// Error returned by [`decode`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FlatError {
    /// The trailing field of a line is not a known type tag.
    #[error("line {line}: unknown type tag `{tag}`")]
    UnknownTag { line: usize, tag: String },
    /// A numeric field failed to parse.
    #[error("line {line}: invalid number `{value}`")]
    BadNumber { line: usize, value: String },
    /// Too few numeric fields for the tagged kind.
    #[error("line {line}: {tag} needs at least {min} numeric fields, got {got}")]
    MissingFields { line: usize, tag: &'static str, min: usize, got: usize },
    /// A point list has an odd number of coordinates.
    #[error("line {line}: {tag} has an odd coordinate count ({got})")]
    OddPointCount { line: usize, tag: &'static str, got: usize },
}

/// Serialize every shape list, one line per shape, in draw order.
#[must_use]
pub fn encode(shapes: &ShapeLists) -> String {
    shapes.iter().map(encode_shape).collect::<Vec<_>>().join("\n")
}

/// Serialize a single shape as one flat text line.
#[must_use]
pub fn encode_shape(shape: &Shape) -> String {
    let mut fields: Vec<String> = match &shape.geometry {
        Geometry::Rectangle { x, y, .. } | Geometry::Circle { x, y, .. } => vec![x.to_string(), y.to_string()],
        Geometry::Arrow { points } | Geometry::Scribble { points } => points.iter().map(f64::to_string).collect(),
    };
    fields.push(shape.kind().tag().to_owned());
    fields.join(",")
}

/// Parse flat text into shapes with fresh ids and the given fill.
///
/// Blank lines are skipped. Any malformed line rejects the whole input.
///
/// # Errors
///
/// Returns a [`FlatError`] naming the first offending line (1-based).
pub fn decode(text: &str, fill: &str) -> Result<Vec<Shape>, FlatError> {
    let mut shapes = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        shapes.push(decode_line(idx + 1, line, fill)?);
    }
    Ok(shapes)
}

fn decode_line(line_no: usize, line: &str, fill: &str) -> Result<Shape, FlatError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let (tag, numeric) = match fields.split_last() {
        Some((tag, numeric)) => (*tag, numeric),
        None => (line, &[][..]),
    };
    let kind = ShapeKind::from_tag(tag).ok_or_else(|| FlatError::UnknownTag { line: line_no, tag: tag.to_owned() })?;

    let values = numeric
        .iter()
        .map(|f| match f.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(FlatError::BadNumber { line: line_no, value: (*f).to_owned() }),
        })
        .collect::<Result<Vec<f64>, _>>()?;

    let min = match kind {
        ShapeKind::Arrow => 4,
        ShapeKind::Rectangle | ShapeKind::Circle | ShapeKind::Scribble => 2,
    };
    if values.len() < min {
        return Err(FlatError::MissingFields { line: line_no, tag: kind.tag(), min, got: values.len() });
    }

    let geometry = match kind {
        ShapeKind::Rectangle => {
            Geometry::Rectangle { x: values[0], y: values[1], width: DEFAULT_RECT_SIZE, height: DEFAULT_RECT_SIZE }
        }
        ShapeKind::Circle => Geometry::Circle { x: values[0], y: values[1], radius: DEFAULT_CIRCLE_RADIUS },
        ShapeKind::Arrow | ShapeKind::Scribble => {
            if values.len() % 2 != 0 {
                return Err(FlatError::OddPointCount { line: line_no, tag: kind.tag(), got: values.len() });
            }
            if kind == ShapeKind::Arrow {
                Geometry::Arrow { points: values }
            } else {
                Geometry::Scribble { points: values }
            }
        }
    };
    Ok(Shape::new(geometry, fill))
}
