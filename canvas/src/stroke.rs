//! Freehand stroke surface: capture a pen gesture, hand it off for
//! beautification, and swap in whatever paths come back.
//!
//! DESIGN
//! ======
//! A gesture moves through [`StrokePhase`]: `Idle` → `Drawing` on
//! pointer-down, `Drawing` → `Submitted` on pointer-up (the host fires the
//! request), and back to `Idle` once the host reports the outcome. Submitted
//! strokes are also tracked in a pending list keyed by path id, so the user
//! can start a new gesture before an earlier reply lands and late replies
//! still find their stroke.
//!
//! Path commands travel in the canvas-library array form (`["M", x, y]`,
//! `["Q", cx, cy, x, y]`, ...), which is what the polyline endpoint speaks.

#[cfg(test)]
#[path = "stroke_test.rs"]
mod stroke_test;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::Point;
use crate::consts::{STROKE_COLOR, STROKE_WIDTH};

/// Unique identifier for a path on the stroke surface.
pub type PathId = Uuid;

/// Error converting a wire array into a [`PathCommand`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathError {
    #[error("unknown path command `{0}`")]
    UnknownCommand(String),
    #[error("path command `{command}` takes {expected} operands, got {got}")]
    Arity { command: String, expected: usize, got: usize },
    #[error("path command operand {index} is not a number")]
    BadOperand { index: usize },
}

// =============================================================================
// PATH COMMANDS
// =============================================================================

/// One path-drawing command.
///
/// The absolute commands the brush emits are typed. Every other SVG command
/// the backend may answer with (`H`, `V`, `S`, `T`, `A` and the lowercase
/// relative forms) is carried through unchanged as [`PathCommand::Other`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Value>", into = "Vec<Value>")]
pub enum PathCommand {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    QuadTo { cx: f64, cy: f64, x: f64, y: f64 },
    CubicTo { c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64 },
    Close,
    Other { letter: char, operands: Vec<f64> },
}

/// Operand count for an SVG path command letter.
fn arity(letter: char) -> Option<usize> {
    match letter.to_ascii_uppercase() {
        'Z' => Some(0),
        'H' | 'V' => Some(1),
        'M' | 'L' | 'T' => Some(2),
        'Q' | 'S' => Some(4),
        'C' => Some(6),
        'A' => Some(7),
        _ => None,
    }
}

impl PathCommand {
    /// Single-letter command name used on the wire.
    #[must_use]
    pub fn letter(&self) -> char {
        match self {
            Self::MoveTo { .. } => 'M',
            Self::LineTo { .. } => 'L',
            Self::QuadTo { .. } => 'Q',
            Self::CubicTo { .. } => 'C',
            Self::Close => 'Z',
            Self::Other { letter, .. } => *letter,
        }
    }

    /// Numeric operands in wire order.
    #[must_use]
    pub fn operands(&self) -> Vec<f64> {
        match self {
            Self::MoveTo { x, y } | Self::LineTo { x, y } => vec![*x, *y],
            Self::QuadTo { cx, cy, x, y } => vec![*cx, *cy, *x, *y],
            Self::CubicTo { c1x, c1y, c2x, c2y, x, y } => vec![*c1x, *c1y, *c2x, *c2y, *x, *y],
            Self::Close => Vec::new(),
            Self::Other { operands, .. } => operands.clone(),
        }
    }
}

impl From<PathCommand> for Vec<Value> {
    fn from(cmd: PathCommand) -> Self {
        let mut out = Vec::with_capacity(8);
        out.push(Value::from(cmd.letter().to_string()));
        out.extend(cmd.operands().into_iter().map(Value::from));
        out
    }
}

impl TryFrom<Vec<Value>> for PathCommand {
    type Error = PathError;

    fn try_from(raw: Vec<Value>) -> Result<Self, Self::Error> {
        let Some((head, rest)) = raw.split_first() else {
            return Err(PathError::UnknownCommand(String::new()));
        };
        let name = head.as_str().ok_or_else(|| PathError::UnknownCommand(head.to_string()))?;
        let mut chars = name.chars();
        let (Some(letter), None) = (chars.next(), chars.next()) else {
            return Err(PathError::UnknownCommand(name.to_owned()));
        };
        let expected = arity(letter).ok_or_else(|| PathError::UnknownCommand(name.to_owned()))?;
        if rest.len() != expected {
            return Err(PathError::Arity { command: name.to_owned(), expected, got: rest.len() });
        }
        let n = rest
            .iter()
            .enumerate()
            .map(|(index, v)| v.as_f64().ok_or(PathError::BadOperand { index }))
            .collect::<Result<Vec<f64>, _>>()?;
        Ok(match letter {
            'M' => Self::MoveTo { x: n[0], y: n[1] },
            'L' => Self::LineTo { x: n[0], y: n[1] },
            'Q' => Self::QuadTo { cx: n[0], cy: n[1], x: n[2], y: n[3] },
            'C' => Self::CubicTo { c1x: n[0], c1y: n[1], c2x: n[2], c2y: n[3], x: n[4], y: n[5] },
            'Z' => Self::Close,
            _ => Self::Other { letter, operands: n },
        })
    }
}

/// Turn captured pointer samples into a smoothed path: a move to the first
/// sample, quadratic segments through successive midpoints, and a line to the
/// last sample.
#[must_use]
pub fn brush_path(points: &[Point]) -> Vec<PathCommand> {
    let Some((first, rest)) = points.split_first() else {
        return Vec::new();
    };
    let mut path = vec![PathCommand::MoveTo { x: first.x, y: first.y }];
    let mut prev = *first;
    for p in rest {
        let mid = prev.midpoint(*p);
        path.push(PathCommand::QuadTo { cx: prev.x, cy: prev.y, x: mid.x, y: mid.y });
        prev = *p;
    }
    path.push(PathCommand::LineTo { x: prev.x, y: prev.y });
    path
}

// =============================================================================
// WIRE TYPES
// =============================================================================

/// Request body for the polyline endpoint.
///
/// `data` is a JSON *string* holding a one-element array whose element is the
/// stroke's command array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolylineRequest {
    pub data: String,
}

impl PolylineRequest {
    /// Build the request for a single stroke.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if the commands cannot be serialized.
    pub fn for_stroke(commands: &[PathCommand]) -> Result<Self, serde_json::Error> {
        Ok(Self { data: serde_json::to_string(&[commands])? })
    }

    /// Decode the embedded stroke list.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if `data` is not a valid stroke list.
    pub fn strokes(&self) -> Result<Vec<Vec<PathCommand>>, serde_json::Error> {
        serde_json::from_str(&self.data)
    }
}

/// Response body from the polyline endpoint: one command array per curve.
pub type PolylineResponse = Vec<Vec<PathCommand>>;

// =============================================================================
// SURFACE
// =============================================================================

/// How a path on the surface is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStyle {
    pub stroke: String,
    pub stroke_width: f64,
    pub fill: Option<String>,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self { stroke: STROKE_COLOR.to_owned(), stroke_width: STROKE_WIDTH, fill: None }
    }
}

/// Where a path on the surface came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOrigin {
    /// Captured directly from the pen.
    Raw,
    /// Returned by the beautification backend.
    Beautified,
}

/// A path drawn on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasPath {
    pub id: PathId,
    pub commands: Vec<PathCommand>,
    pub style: PathStyle,
    pub origin: PathOrigin,
}

impl CanvasPath {
    fn new(commands: Vec<PathCommand>, origin: PathOrigin) -> Self {
        Self { id: Uuid::new_v4(), commands, style: PathStyle::default(), origin }
    }
}

/// Gesture phase of the stroke surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum StrokePhase {
    #[default]
    Idle,
    /// Pen is down; samples collected so far.
    Drawing { points: Vec<Point> },
    /// The last completed stroke is waiting on the backend.
    Submitted { stroke_id: PathId },
}

/// A completed stroke the host should send to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeSubmission {
    pub stroke_id: PathId,
    pub commands: Vec<PathCommand>,
}

impl StrokeSubmission {
    /// Wire body for this stroke.
    ///
    /// # Errors
    ///
    /// See [`PolylineRequest::for_stroke`].
    pub fn request(&self) -> Result<PolylineRequest, serde_json::Error> {
        PolylineRequest::for_stroke(&self.commands)
    }
}

/// Free-drawing surface holding raw and beautified paths.
#[derive(Debug, Clone, Default)]
pub struct StrokeSurface {
    paths: Vec<CanvasPath>,
    phase: StrokePhase,
    pending: Vec<PathId>,
}

impl StrokeSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new gesture at `pt`.
    pub fn on_pointer_down(&mut self, pt: Point) {
        self.phase = StrokePhase::Drawing { points: vec![pt] };
    }

    /// Record a sample while drawing.
    pub fn on_pointer_move(&mut self, pt: Point) {
        if let StrokePhase::Drawing { points } = &mut self.phase {
            points.push(pt);
        }
    }

    /// Finish the gesture. The raw stroke is placed on the surface and
    /// returned for submission. Returns `None` when no gesture was active.
    pub fn on_pointer_up(&mut self) -> Option<StrokeSubmission> {
        let StrokePhase::Drawing { points } = std::mem::take(&mut self.phase) else {
            return None;
        };
        let raw = CanvasPath::new(brush_path(&points), PathOrigin::Raw);
        let submission = StrokeSubmission { stroke_id: raw.id, commands: raw.commands.clone() };
        self.phase = StrokePhase::Submitted { stroke_id: raw.id };
        self.pending.push(raw.id);
        self.paths.push(raw);
        Some(submission)
    }

    /// Replace a submitted stroke with the backend's curves.
    ///
    /// Returns `false` if the stroke is no longer pending.
    pub fn apply_beautified(&mut self, stroke_id: PathId, curves: PolylineResponse) -> bool {
        if !self.settle(stroke_id) {
            return false;
        }
        self.paths.retain(|p| p.id != stroke_id);
        self.paths
            .extend(curves.into_iter().map(|c| CanvasPath::new(c, PathOrigin::Beautified)));
        true
    }

    /// Mark a submission as failed. The raw stroke stays where it is.
    ///
    /// Returns `false` if the stroke is no longer pending.
    pub fn submission_failed(&mut self, stroke_id: PathId) -> bool {
        self.settle(stroke_id)
    }

    fn settle(&mut self, stroke_id: PathId) -> bool {
        let Some(pos) = self.pending.iter().position(|id| *id == stroke_id) else {
            return false;
        };
        self.pending.remove(pos);
        if self.phase == (StrokePhase::Submitted { stroke_id }) {
            self.phase = StrokePhase::Idle;
        }
        true
    }

    /// All paths in draw order.
    #[must_use]
    pub fn paths(&self) -> &[CanvasPath] {
        &self.paths
    }

    #[must_use]
    pub fn phase(&self) -> &StrokePhase {
        &self.phase
    }

    /// Strokes still waiting on the backend.
    #[must_use]
    pub fn pending(&self) -> &[PathId] {
        &self.pending
    }

    /// Drop every path. Used when the surface is torn down.
    pub fn dispose(&mut self) {
        self.paths.clear();
        self.pending.clear();
        self.phase = StrokePhase::Idle;
    }
}
