//! Doodle session: drives the shape-tool editor and its submit round trip.
//!
//! SUBMIT SEQUENCING
//! =================
//! At most one drawing request is in flight. A submit issued while one is
//! pending is coalesced into a single queued submit, which serializes the
//! shapes at the moment it is dispatched. When a reply lands, it is applied
//! only if the engine revision still matches the revision that was sent;
//! otherwise the user edited in the meantime and the reply is dropped as
//! stale. Failures and malformed replies are logged and leave the shapes as
//! they were.

use std::sync::Arc;

use canvas::Point;
use canvas::doc::{ShapeId, ShapeLists};
use canvas::engine::{Action, EngineCore};
use canvas::input::{Button, Tool};
use canvas::render::ExportedImage;
use tokio::sync::{mpsc, oneshot};

use super::SessionError;
use crate::backend::{BackendError, Beautifier};

/// Read-only view of the session state.
#[derive(Debug, Clone)]
pub struct DoodleSnapshot {
    pub shapes: ShapeLists,
    pub tool: Tool,
    pub fill: String,
    pub selection: Option<ShapeId>,
    pub revision: u64,
    /// A drawing request is in flight.
    pub submitting: bool,
}

enum DoodleEvent {
    PointerDown(Point, Button),
    PointerMove(Point),
    PointerUp(Point, Button),
    SetTool(Tool),
    SetFill(String),
    Undo,
    Submit,
    Export(oneshot::Sender<Result<ExportedImage, SessionError>>),
    Snapshot(oneshot::Sender<DoodleSnapshot>),
    /// Reply once no submit is in flight or queued.
    Settled(oneshot::Sender<()>),
    SubmitCompleted { revision: u64, result: Result<String, BackendError> },
}

// =============================================================================
// HANDLE
// =============================================================================

/// Cloneable handle for feeding events into a [`DoodleSession`].
#[derive(Clone)]
pub struct DoodleHandle {
    tx: mpsc::UnboundedSender<DoodleEvent>,
}

impl DoodleHandle {
    fn send(&self, event: DoodleEvent) -> Result<(), SessionError> {
        self.tx.send(event).map_err(|_| SessionError::Closed)
    }

    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has exited.
    pub fn pointer_down(&self, pt: Point, button: Button) -> Result<(), SessionError> {
        self.send(DoodleEvent::PointerDown(pt, button))
    }

    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has exited.
    pub fn pointer_move(&self, pt: Point) -> Result<(), SessionError> {
        self.send(DoodleEvent::PointerMove(pt))
    }

    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has exited.
    pub fn pointer_up(&self, pt: Point, button: Button) -> Result<(), SessionError> {
        self.send(DoodleEvent::PointerUp(pt, button))
    }

    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has exited.
    pub fn set_tool(&self, tool: Tool) -> Result<(), SessionError> {
        self.send(DoodleEvent::SetTool(tool))
    }

    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has exited.
    pub fn set_fill(&self, fill: impl Into<String>) -> Result<(), SessionError> {
        self.send(DoodleEvent::SetFill(fill.into()))
    }

    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has exited.
    pub fn undo(&self) -> Result<(), SessionError> {
        self.send(DoodleEvent::Undo)
    }

    /// Send every shape to the backend. Returns once the submit is queued,
    /// not when the reply arrives; see [`DoodleHandle::settled`].
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has exited.
    pub fn submit(&self) -> Result<(), SessionError> {
        self.send(DoodleEvent::Submit)
    }

    /// Render the canvas to a PNG data URL.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has exited, or
    /// [`SessionError::Export`] if encoding fails.
    pub async fn export(&self) -> Result<ExportedImage, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(DoodleEvent::Export(reply))?;
        rx.await.map_err(|_| SessionError::Closed)?
    }

    /// Current state of the session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has exited.
    pub async fn snapshot(&self) -> Result<DoodleSnapshot, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(DoodleEvent::Snapshot(reply))?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Wait until no submit is in flight or queued.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has exited.
    pub async fn settled(&self) -> Result<(), SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(DoodleEvent::Settled(reply))?;
        rx.await.map_err(|_| SessionError::Closed)
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Event loop owning an [`EngineCore`].
pub struct DoodleSession {
    engine: EngineCore,
    backend: Arc<dyn Beautifier>,
    rx: mpsc::UnboundedReceiver<DoodleEvent>,
    weak_tx: mpsc::WeakUnboundedSender<DoodleEvent>,
    actions: Option<mpsc::UnboundedSender<Action>>,
    /// Revision sent with the request currently in flight.
    in_flight: Option<u64>,
    submit_queued: bool,
    settled_waiters: Vec<oneshot::Sender<()>>,
}

impl DoodleSession {
    /// Create a session over an empty canvas.
    #[must_use]
    pub fn new(backend: Arc<dyn Beautifier>) -> (Self, DoodleHandle) {
        Self::with_engine(EngineCore::new(), backend)
    }

    /// Create a session over an existing engine state.
    #[must_use]
    pub fn with_engine(engine: EngineCore, backend: Arc<dyn Beautifier>) -> (Self, DoodleHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = Self {
            engine,
            backend,
            rx,
            weak_tx: tx.downgrade(),
            actions: None,
            in_flight: None,
            submit_queued: false,
            settled_waiters: Vec::new(),
        };
        (session, DoodleHandle { tx })
    }

    /// Receive every engine [`Action`] the session produces.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<Action> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.actions = Some(tx);
        rx
    }

    /// Run until every handle is dropped, then return the final engine state.
    pub async fn run(mut self) -> EngineCore {
        while let Some(event) = self.rx.recv().await {
            self.handle(event);
        }
        tracing::debug!(shapes = self.engine.shapes.len(), "doodle session closed");
        self.engine
    }

    fn handle(&mut self, event: DoodleEvent) {
        match event {
            DoodleEvent::PointerDown(pt, button) => {
                let actions = self.engine.on_pointer_down(pt, button);
                self.emit(actions);
            }
            DoodleEvent::PointerMove(pt) => {
                let actions = self.engine.on_pointer_move(pt);
                self.emit(actions);
            }
            DoodleEvent::PointerUp(pt, button) => {
                let actions = self.engine.on_pointer_up(pt, button);
                self.emit(actions);
            }
            DoodleEvent::SetTool(tool) => self.engine.set_tool(tool),
            DoodleEvent::SetFill(fill) => self.engine.set_fill(fill),
            DoodleEvent::Undo => {
                let actions = self.engine.undo();
                self.emit(actions);
            }
            DoodleEvent::Submit => self.submit(),
            DoodleEvent::Export(reply) => {
                let result = self.engine.export().map_err(SessionError::from);
                if let Err(e) = &result {
                    tracing::error!(error = %e, "export failed");
                }
                if reply.send(result).is_err() {
                    tracing::debug!("export requester went away");
                }
            }
            DoodleEvent::Snapshot(reply) => {
                if reply.send(self.snapshot()).is_err() {
                    tracing::debug!("snapshot requester went away");
                }
            }
            DoodleEvent::Settled(reply) => {
                self.settled_waiters.push(reply);
                self.release_waiters_if_idle();
            }
            DoodleEvent::SubmitCompleted { revision, result } => self.on_submit_completed(revision, result),
        }
    }

    fn submit(&mut self) {
        if self.in_flight.is_some() {
            self.submit_queued = true;
            tracing::debug!("submit queued behind in-flight request");
            return;
        }
        self.dispatch();
    }

    fn dispatch(&mut self) {
        let Some(tx) = self.weak_tx.upgrade() else {
            return;
        };
        let csv = self.engine.doodle_text();
        let revision = self.engine.revision();
        let backend = Arc::clone(&self.backend);
        self.in_flight = Some(revision);
        tracing::info!(shapes = self.engine.shapes.len(), revision, "submitting doodle");

        tokio::spawn(async move {
            let result = backend.process_drawing(&csv).await;
            if tx.send(DoodleEvent::SubmitCompleted { revision, result }).is_err() {
                tracing::debug!("doodle session gone before reply");
            }
        });
    }

    fn on_submit_completed(&mut self, revision: u64, result: Result<String, BackendError>) {
        self.in_flight = None;
        match result {
            Err(e) => {
                tracing::warn!(error = %e, retryable = e.retryable(), "doodle submit failed; shapes unchanged");
            }
            Ok(_) if self.engine.revision() != revision => {
                tracing::warn!(sent = revision, current = self.engine.revision(), "dropping stale doodle reply");
            }
            Ok(csv) => match self.engine.apply_doodle_response(&csv) {
                Ok(actions) => {
                    tracing::info!(shapes = self.engine.shapes.len(), "doodle replaced from backend");
                    self.emit(actions);
                }
                Err(e) => tracing::warn!(error = %e, "malformed doodle reply; shapes unchanged"),
            },
        }

        if std::mem::take(&mut self.submit_queued) {
            self.dispatch();
        }
        self.release_waiters_if_idle();
    }

    fn release_waiters_if_idle(&mut self) {
        if self.in_flight.is_some() || self.submit_queued {
            return;
        }
        for waiter in self.settled_waiters.drain(..) {
            if waiter.send(()).is_err() {
                tracing::debug!("settled waiter went away");
            }
        }
    }

    fn emit(&mut self, actions: Vec<Action>) {
        let Some(tx) = &self.actions else {
            return;
        };
        for action in actions {
            if tx.send(action).is_err() {
                self.actions = None;
                return;
            }
        }
    }

    fn snapshot(&self) -> DoodleSnapshot {
        DoodleSnapshot {
            shapes: self.engine.shapes.clone(),
            tool: self.engine.ui.tool,
            fill: self.engine.ui.fill.clone(),
            selection: self.engine.selection(),
            revision: self.engine.revision(),
            submitting: self.in_flight.is_some(),
        }
    }
}

#[cfg(test)]
#[path = "doodle_test.rs"]
mod tests;
