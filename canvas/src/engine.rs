//! Shape-tool editor.
//!
//! [`EngineCore`] owns the four shape lists, the UI state, and the active
//! gesture. Every input handler mutates the core in place and returns the
//! [`Action`]s the host should react to. Nothing here talks to the network:
//! the host serializes with [`EngineCore::doodle_text`], ships the text, and
//! hands the reply to [`EngineCore::apply_doodle_response`].

use crate::Point;
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, DEFAULT_CIRCLE_RADIUS, DEFAULT_RECT_SIZE};
use crate::doc::{Geometry, Shape, ShapeId, ShapeKind, ShapeLists};
use crate::flat::{self, FlatError};
use crate::hit;
use crate::input::{Button, InputState, Tool, UiState};
use crate::render::{self, ExportError, ExportedImage};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ShapeCreated(Shape),
    ShapeUpdated(Shape),
    ShapeRemoved { id: ShapeId },
    SelectionChanged(Option<ShapeId>),
    RenderNeeded,
}

/// Core editor state.
#[derive(Debug, Clone)]
pub struct EngineCore {
    pub shapes: ShapeLists,
    pub ui: UiState,
    pub input: InputState,
    pub width: u32,
    pub height: u32,
    /// Bumped on every local shape mutation. Lets the host detect edits made
    /// while a submit was in flight.
    revision: u64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            shapes: ShapeLists::new(),
            ui: UiState::default(),
            input: InputState::default(),
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            revision: 0,
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Tool / fill ---

    /// Set the active tool. Ends any gesture in progress.
    pub fn set_tool(&mut self, tool: Tool) {
        self.ui.tool = tool;
        self.input = InputState::Idle;
    }

    /// Set the fill color used for new and parsed shapes.
    pub fn set_fill(&mut self, fill: impl Into<String>) {
        self.ui.fill = fill.into();
    }

    // --- Pointer input ---

    /// Pointer-down: begin a shape with a creation tool, or select (and start
    /// dragging) with the select tool.
    pub fn on_pointer_down(&mut self, pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        match self.ui.tool.shape_kind() {
            Some(kind) => self.begin_shape(kind, pt),
            None => self.select_at(pt),
        }
    }

    /// Pointer-move: update the current shape or drag the selected one.
    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        match self.input.clone() {
            InputState::Idle => Vec::new(),
            InputState::Painting { id, anchor } => self.update_shape(id, anchor, pt),
            InputState::DraggingShape { id, last } => {
                let Some(shape) = self.shapes.get_mut(&id) else {
                    self.input = InputState::Idle;
                    return Vec::new();
                };
                shape.geometry.translate(pt.x - last.x, pt.y - last.y);
                let updated = shape.clone();
                self.input = InputState::DraggingShape { id, last: pt };
                self.touch();
                vec![Action::ShapeUpdated(updated), Action::RenderNeeded]
            }
        }
    }

    /// Pointer-up: stop painting or dragging. No commit step.
    pub fn on_pointer_up(&mut self, _pt: Point, _button: Button) -> Vec<Action> {
        self.input = InputState::Idle;
        Vec::new()
    }

    fn begin_shape(&mut self, kind: ShapeKind, pt: Point) -> Vec<Action> {
        let geometry = match kind {
            ShapeKind::Rectangle => {
                Geometry::Rectangle { x: pt.x, y: pt.y, width: DEFAULT_RECT_SIZE, height: DEFAULT_RECT_SIZE }
            }
            ShapeKind::Circle => Geometry::Circle { x: pt.x, y: pt.y, radius: DEFAULT_CIRCLE_RADIUS },
            ShapeKind::Arrow => Geometry::Arrow { points: vec![pt.x, pt.y, pt.x, pt.y] },
            ShapeKind::Scribble => Geometry::Scribble { points: vec![pt.x, pt.y] },
        };
        let shape = Shape::new(geometry, self.ui.fill.clone());
        self.input = InputState::Painting { id: shape.id, anchor: pt };
        self.shapes.push(shape.clone());
        self.touch();
        vec![Action::ShapeCreated(shape), Action::RenderNeeded]
    }

    fn update_shape(&mut self, id: ShapeId, anchor: Point, pt: Point) -> Vec<Action> {
        let Some(shape) = self.shapes.get_mut(&id) else {
            self.input = InputState::Idle;
            return Vec::new();
        };
        match &mut shape.geometry {
            Geometry::Rectangle { x, y, width, height } => {
                *width = pt.x - *x;
                *height = pt.y - *y;
            }
            Geometry::Circle { radius, .. } => {
                *radius = anchor.distance(pt);
            }
            Geometry::Arrow { points } => {
                points.truncate(2);
                points.extend([pt.x, pt.y]);
            }
            Geometry::Scribble { points } => {
                points.extend([pt.x, pt.y]);
            }
        }
        let updated = shape.clone();
        self.touch();
        vec![Action::ShapeUpdated(updated), Action::RenderNeeded]
    }

    fn select_at(&mut self, pt: Point) -> Vec<Action> {
        let hit = hit::hit_test(pt, &self.shapes);
        if let Some(id) = hit {
            self.input = InputState::DraggingShape { id, last: pt };
        }
        if hit == self.ui.selected_id {
            return Vec::new();
        }
        self.ui.selected_id = hit;
        vec![Action::SelectionChanged(hit), Action::RenderNeeded]
    }

    // --- Commands ---

    /// Remove the most recent shape from the list of the active tool.
    ///
    /// A no-op with the select tool or when that list is empty.
    pub fn undo(&mut self) -> Vec<Action> {
        let Some(kind) = self.ui.tool.shape_kind() else {
            return Vec::new();
        };
        let Some(removed) = self.shapes.pop(kind) else {
            return Vec::new();
        };
        self.touch();
        let mut actions = vec![Action::ShapeRemoved { id: removed.id }];
        if self.ui.selected_id == Some(removed.id) {
            self.ui.selected_id = None;
            actions.push(Action::SelectionChanged(None));
        }
        if matches!(self.input, InputState::Painting { id, .. } | InputState::DraggingShape { id, .. } if id == removed.id)
        {
            self.input = InputState::Idle;
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Rasterize the canvas into a PNG data URL named `image.png`.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Encode`] if PNG encoding fails.
    pub fn export(&self) -> Result<ExportedImage, ExportError> {
        render::export_png(&self.shapes, self.width, self.height)
    }

    /// Serialize every shape to the flat text format.
    #[must_use]
    pub fn doodle_text(&self) -> String {
        flat::encode(&self.shapes)
    }

    /// Replace all shape lists with the parsed backend reply.
    ///
    /// On a parse error nothing changes.
    ///
    /// # Errors
    ///
    /// Returns the [`FlatError`] for the first malformed line.
    pub fn apply_doodle_response(&mut self, text: &str) -> Result<Vec<Action>, FlatError> {
        let parsed = flat::decode(text, &self.ui.fill)?;
        self.shapes.replace_all(parsed);
        self.input = InputState::Idle;
        self.touch();
        let mut actions = Vec::new();
        if self.ui.selected_id.take().is_some() {
            actions.push(Action::SelectionChanged(None));
        }
        actions.push(Action::RenderNeeded);
        Ok(actions)
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    // --- Queries ---

    /// The currently selected shape, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ShapeId> {
        self.ui.selected_id
    }

    /// Look up a shape by id.
    #[must_use]
    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    /// Edit counter; changes whenever a shape is created, updated, or removed.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
