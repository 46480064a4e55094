//! Headless whiteboard engine for the Curvetopia doodle canvas.
//!
//! This crate owns everything that happens on the canvas itself: translating
//! pointer events into shape mutations, hit-testing for selection, capturing
//! freehand strokes, and rasterizing the scene for export. It performs no I/O.
//! The host (the `curvetopia` binary) is responsible for shipping the
//! serialized geometry to the beautification backend and feeding the
//! responses back in.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Shape-tool editor ([`engine::EngineCore`]) and its [`engine::Action`]s |
//! | [`doc`] | Shape types and the four per-kind shape lists |
//! | [`input`] | Tools, pointer buttons, and the gesture state machine |
//! | [`hit`] | Hit-testing against shapes |
//! | [`flat`] | Flat text codec exchanged with the drawing endpoint |
//! | [`stroke`] | Freehand stroke surface, path commands, and polyline wire types |
//! | [`render`] | Rasterization and PNG data-URL export |
//! | [`consts`] | Shared numeric constants (default sizes, canvas size, hit slop) |

pub mod consts;
pub mod doc;
pub mod engine;
pub mod flat;
pub mod hit;
pub mod input;
pub mod render;
pub mod stroke;

/// A point in canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Midpoint between `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}
