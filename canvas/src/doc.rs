//! Document model: shapes, their geometry, and the per-kind shape lists.
//!
//! A [`Shape`] is a tagged union over four geometries that share an id and a
//! fill color. [`ShapeLists`] keeps one ordered list per kind; a list only
//! ever holds shapes of its own kind, and the lists never reference each
//! other. Creation order within a list is insertion order, which is what
//! undo and draw order rely on.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Point;

/// Unique identifier for a shape.
pub type ShapeId = Uuid;

/// The kind of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Arrow,
    Scribble,
}

impl ShapeKind {
    /// All kinds in draw order (bottom first).
    pub const ALL: [ShapeKind; 4] = [Self::Rectangle, Self::Circle, Self::Arrow, Self::Scribble];

    /// Type tag used by the flat text format.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Rectangle => "RECTANGLE",
            Self::Circle => "CIRCLE",
            Self::Arrow => "ARROW",
            Self::Scribble => "SCRIBBLE",
        }
    }

    /// Parse a flat text type tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "RECTANGLE" => Some(Self::Rectangle),
            "CIRCLE" => Some(Self::Circle),
            "ARROW" => Some(Self::Arrow),
            "SCRIBBLE" => Some(Self::Scribble),
            _ => None,
        }
    }
}

/// Per-kind geometry of a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Geometry {
    /// Axis-aligned rectangle anchored at its top-left corner. Width and
    /// height may be negative when drawn up or left of the anchor.
    Rectangle { x: f64, y: f64, width: f64, height: f64 },
    /// Circle centered at `(x, y)`.
    Circle { x: f64, y: f64, radius: f64 },
    /// Arrow from the first point pair to the last, as flat `[x0, y0, x1, y1]`.
    Arrow { points: Vec<f64> },
    /// Freehand polyline as flat `[x0, y0, x1, y1, ...]`.
    Scribble { points: Vec<f64> },
}

impl Geometry {
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Rectangle { .. } => ShapeKind::Rectangle,
            Self::Circle { .. } => ShapeKind::Circle,
            Self::Arrow { .. } => ShapeKind::Arrow,
            Self::Scribble { .. } => ShapeKind::Scribble,
        }
    }

    /// Shift the geometry by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Self::Rectangle { x, y, .. } | Self::Circle { x, y, .. } => {
                *x += dx;
                *y += dy;
            }
            Self::Arrow { points } | Self::Scribble { points } => {
                for pair in points.chunks_exact_mut(2) {
                    pair[0] += dx;
                    pair[1] += dy;
                }
            }
        }
    }
}

/// A shape on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    /// Fill color as a CSS color string.
    pub fill: String,
    #[serde(flatten)]
    pub geometry: Geometry,
}

impl Shape {
    /// Create a shape with a freshly generated id.
    #[must_use]
    pub fn new(geometry: Geometry, fill: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(), fill: fill.into(), geometry }
    }

    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }
}

/// Iterate a flat `[x0, y0, x1, y1, ...]` list as points. A trailing odd
/// coordinate is ignored.
pub fn points_of(flat: &[f64]) -> impl Iterator<Item = Point> + '_ {
    flat.chunks_exact(2).map(|p| Point::new(p[0], p[1]))
}

/// The four shape lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeLists {
    rectangles: Vec<Shape>,
    circles: Vec<Shape>,
    arrows: Vec<Shape>,
    scribbles: Vec<Shape>,
}

impl ShapeLists {
    /// Create empty lists.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The list holding shapes of `kind`, in creation order.
    #[must_use]
    pub fn list(&self, kind: ShapeKind) -> &[Shape] {
        match kind {
            ShapeKind::Rectangle => &self.rectangles,
            ShapeKind::Circle => &self.circles,
            ShapeKind::Arrow => &self.arrows,
            ShapeKind::Scribble => &self.scribbles,
        }
    }

    fn list_mut(&mut self, kind: ShapeKind) -> &mut Vec<Shape> {
        match kind {
            ShapeKind::Rectangle => &mut self.rectangles,
            ShapeKind::Circle => &mut self.circles,
            ShapeKind::Arrow => &mut self.arrows,
            ShapeKind::Scribble => &mut self.scribbles,
        }
    }

    /// Append a shape to the list matching its kind.
    pub fn push(&mut self, shape: Shape) {
        self.list_mut(shape.kind()).push(shape);
    }

    /// Remove and return the most recently added shape of `kind`.
    pub fn pop(&mut self, kind: ShapeKind) -> Option<Shape> {
        self.list_mut(kind).pop()
    }

    /// Return a reference to a shape by id.
    #[must_use]
    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.iter().find(|s| &s.id == id)
    }

    /// Return a mutable reference to a shape by id.
    pub fn get_mut(&mut self, id: &ShapeId) -> Option<&mut Shape> {
        self.rectangles
            .iter_mut()
            .chain(self.circles.iter_mut())
            .chain(self.arrows.iter_mut())
            .chain(self.scribbles.iter_mut())
            .find(|s| &s.id == id)
    }

    /// Iterate all shapes in draw order: rectangles, circles, arrows, scribbles.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Shape> {
        self.rectangles
            .iter()
            .chain(self.circles.iter())
            .chain(self.arrows.iter())
            .chain(self.scribbles.iter())
    }

    /// Replace every list with the given shapes, routing each by kind.
    pub fn replace_all(&mut self, shapes: Vec<Shape>) {
        self.clear();
        for shape in shapes {
            self.push(shape);
        }
    }

    pub fn clear(&mut self) {
        self.rectangles.clear();
        self.circles.clear();
        self.arrows.clear();
        self.scribbles.clear();
    }

    /// Number of shapes of `kind`.
    #[must_use]
    pub fn count(&self, kind: ShapeKind) -> usize {
        self.list(kind).len()
    }

    /// Total number of shapes across all lists.
    #[must_use]
    pub fn len(&self) -> usize {
        ShapeKind::ALL.iter().map(|k| self.count(*k)).sum()
    }

    /// Returns `true` if every list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
