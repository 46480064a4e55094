//! Stroke session: free drawing with per-stroke beautification.
//!
//! Every finished stroke is posted to the polyline endpoint on its own task.
//! Replies may arrive in any order; each one only touches the stroke it was
//! sent for. A failed stroke keeps its raw path.

use std::sync::Arc;

use canvas::Point;
use canvas::stroke::{CanvasPath, PathId, PolylineResponse, StrokePhase, StrokeSurface};
use tokio::sync::{mpsc, oneshot};

use super::SessionError;
use crate::backend::{BackendError, Beautifier};

#[derive(Debug, Clone)]
pub struct StrokeSnapshot {
    pub paths: Vec<CanvasPath>,
    pub phase: StrokePhase,
    pub pending: Vec<PathId>,
}

enum StrokeEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    Snapshot(oneshot::Sender<StrokeSnapshot>),
    Settled(oneshot::Sender<()>),
    Completed { stroke_id: PathId, result: Result<PolylineResponse, BackendError> },
}

/// Cloneable handle for feeding events into a [`StrokeSession`].
#[derive(Clone)]
pub struct StrokeHandle {
    tx: mpsc::UnboundedSender<StrokeEvent>,
}

impl StrokeHandle {
    fn send(&self, event: StrokeEvent) -> Result<(), SessionError> {
        self.tx.send(event).map_err(|_| SessionError::Closed)
    }

    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has exited.
    pub fn pointer_down(&self, pt: Point) -> Result<(), SessionError> {
        self.send(StrokeEvent::PointerDown(pt))
    }

    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has exited.
    pub fn pointer_move(&self, pt: Point) -> Result<(), SessionError> {
        self.send(StrokeEvent::PointerMove(pt))
    }

    /// Finish the stroke and submit it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has exited.
    pub fn pointer_up(&self) -> Result<(), SessionError> {
        self.send(StrokeEvent::PointerUp)
    }

    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has exited.
    pub async fn snapshot(&self) -> Result<StrokeSnapshot, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(StrokeEvent::Snapshot(reply))?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Wait until no stroke is pending.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] if the session has exited.
    pub async fn settled(&self) -> Result<(), SessionError> {
        let (reply, rx) = oneshot::channel();
        self.send(StrokeEvent::Settled(reply))?;
        rx.await.map_err(|_| SessionError::Closed)
    }
}

/// Event loop owning a [`StrokeSurface`].
pub struct StrokeSession {
    surface: StrokeSurface,
    backend: Arc<dyn Beautifier>,
    rx: mpsc::UnboundedReceiver<StrokeEvent>,
    weak_tx: mpsc::WeakUnboundedSender<StrokeEvent>,
    settled_waiters: Vec<oneshot::Sender<()>>,
}

impl StrokeSession {
    #[must_use]
    pub fn new(backend: Arc<dyn Beautifier>) -> (Self, StrokeHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = Self {
            surface: StrokeSurface::new(),
            backend,
            rx,
            weak_tx: tx.downgrade(),
            settled_waiters: Vec::new(),
        };
        (session, StrokeHandle { tx })
    }

    /// Run until every handle is dropped. Returns the paths on the surface at
    /// that point; the surface itself is disposed.
    pub async fn run(mut self) -> Vec<CanvasPath> {
        while let Some(event) = self.rx.recv().await {
            self.handle(event);
        }
        let paths = self.surface.paths().to_vec();
        self.surface.dispose();
        tracing::debug!(paths = paths.len(), "stroke session closed");
        paths
    }

    fn handle(&mut self, event: StrokeEvent) {
        match event {
            StrokeEvent::PointerDown(pt) => self.surface.on_pointer_down(pt),
            StrokeEvent::PointerMove(pt) => self.surface.on_pointer_move(pt),
            StrokeEvent::PointerUp => self.finish_stroke(),
            StrokeEvent::Snapshot(reply) => {
                let snapshot = StrokeSnapshot {
                    paths: self.surface.paths().to_vec(),
                    phase: self.surface.phase().clone(),
                    pending: self.surface.pending().to_vec(),
                };
                if reply.send(snapshot).is_err() {
                    tracing::debug!("snapshot requester went away");
                }
            }
            StrokeEvent::Settled(reply) => {
                self.settled_waiters.push(reply);
                self.release_waiters_if_idle();
            }
            StrokeEvent::Completed { stroke_id, result } => self.on_completed(stroke_id, result),
        }
    }

    fn finish_stroke(&mut self) {
        let Some(submission) = self.surface.on_pointer_up() else {
            return;
        };
        let stroke_id = submission.stroke_id;
        let request = match submission.request() {
            Ok(request) => request,
            Err(e) => {
                tracing::error!(%stroke_id, error = %e, "error processing polyline");
                self.surface.submission_failed(stroke_id);
                self.release_waiters_if_idle();
                return;
            }
        };
        let Some(tx) = self.weak_tx.upgrade() else {
            return;
        };
        let backend = Arc::clone(&self.backend);
        tracing::debug!(%stroke_id, commands = submission.commands.len(), "submitting stroke");

        tokio::spawn(async move {
            let result = backend.process_polylines(&request).await;
            if tx.send(StrokeEvent::Completed { stroke_id, result }).is_err() {
                tracing::debug!(%stroke_id, "stroke session gone before reply");
            }
        });
    }

    fn on_completed(&mut self, stroke_id: PathId, result: Result<PolylineResponse, BackendError>) {
        match result {
            Ok(curves) => {
                let count = curves.len();
                if self.surface.apply_beautified(stroke_id, curves) {
                    tracing::debug!(%stroke_id, curves = count, "stroke beautified");
                }
            }
            Err(e) => {
                tracing::error!(%stroke_id, error = %e, "error processing polyline");
                self.surface.submission_failed(stroke_id);
            }
        }
        self.release_waiters_if_idle();
    }

    fn release_waiters_if_idle(&mut self) {
        if !self.surface.pending().is_empty() {
            return;
        }
        for waiter in self.settled_waiters.drain(..) {
            if waiter.send(()).is_err() {
                tracing::debug!("settled waiter went away");
            }
        }
    }
}

#[cfg(test)]
#[path = "stroke_test.rs"]
mod tests;
