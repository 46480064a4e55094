//! Shared numeric constants for the canvas crate.

// ── Canvas ──────────────────────────────────────────────────────

/// Default canvas width in pixels.
pub const CANVAS_WIDTH: u32 = 800;

/// Default canvas height in pixels.
pub const CANVAS_HEIGHT: u32 = 600;

/// Fill color used until the host picks another one.
pub const DEFAULT_FILL: &str = "#000000";

// ── Shape defaults ──────────────────────────────────────────────

/// Width and height of a freshly placed or freshly parsed rectangle.
pub const DEFAULT_RECT_SIZE: f64 = 20.0;

/// Radius of a freshly placed or freshly parsed circle.
pub const DEFAULT_CIRCLE_RADIUS: f64 = 20.0;

// ── Strokes ─────────────────────────────────────────────────────

/// Stroke color for captured and beautified freehand paths.
pub const STROKE_COLOR: &str = "#000000";

/// Stroke width for captured and beautified freehand paths.
pub const STROKE_WIDTH: f64 = 5.0;

/// Line width used when rasterizing arrows and scribbles.
pub const SHAPE_LINE_WIDTH: f64 = 4.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Distance slop for hitting thin shapes (arrows, scribbles).
pub const HIT_SLOP: f64 = 6.0;

/// Arrowhead length in canvas units.
pub const ARROW_HEAD_LEN: f64 = 10.0;
