//! Input model: tools, pointer buttons, and the gesture state machine.
//!
//! `Tool` captures the user's intent at the time of a pointer event.
//! `InputState` is the active gesture tracked between pointer-down and
//! pointer-up, carrying the context needed to apply incremental updates.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::Point;
use crate::consts::DEFAULT_FILL;
use crate::doc::{ShapeId, ShapeKind};

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Draw a rectangle.
    Rectangle,
    /// Draw a circle.
    Circle,
    /// Draw an arrow.
    Arrow,
    /// Draw a freehand scribble.
    Scribble,
}

impl Tool {
    /// The shape kind this tool creates, or `None` for [`Tool::Select`].
    #[must_use]
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            Self::Select => None,
            Self::Rectangle => Some(ShapeKind::Rectangle),
            Self::Circle => Some(ShapeKind::Circle),
            Self::Arrow => Some(ShapeKind::Arrow),
            Self::Scribble => Some(ShapeKind::Scribble),
        }
    }

    /// Whether this tool creates shapes.
    #[must_use]
    pub fn is_creation(self) -> bool {
        self.shape_kind().is_some()
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
    /// Fill color applied to new shapes and to parsed backend shapes.
    pub fill: String,
    /// The id of the shape carrying the transform handles, if any.
    pub selected_id: Option<ShapeId>,
}

impl Default for UiState {
    fn default() -> Self {
        Self { tool: Tool::default(), fill: DEFAULT_FILL.to_owned(), selected_id: None }
    }
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is painting a new shape.
    Painting {
        /// Id of the shape receiving updates.
        id: ShapeId,
        /// Where the gesture started.
        anchor: Point,
    },
    /// The user is dragging the selected shape.
    DraggingShape {
        /// Id of the shape being dragged.
        id: ShapeId,
        /// Pointer position at the previous event, used to compute the delta.
        last: Point,
    },
}

impl InputState {
    /// Whether a shape is currently being painted.
    #[must_use]
    pub fn is_painting(&self) -> bool {
        matches!(self, Self::Painting { .. })
    }
}
