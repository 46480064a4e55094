//! Sessions: single-threaded event loops around the canvas engines.
//!
//! DESIGN
//! ======
//! Each session owns its engine state outright and consumes events from an
//! unbounded `mpsc` channel. Hosts talk to it through a cloneable handle.
//! Backend calls run on spawned tasks that post their result back into the
//! same channel, so every state change happens on the loop and in order.
//!
//! The session keeps only a weak sender for itself; the loop ends once every
//! handle is dropped and no request is still in flight.

pub mod doodle;
pub mod stroke;

pub use doodle::{DoodleHandle, DoodleSession, DoodleSnapshot};
pub use stroke::{StrokeHandle, StrokeSession, StrokeSnapshot};

use canvas::render::ExportError;

/// Errors returned by session handles.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The session loop has exited.
    #[error("session closed")]
    Closed,

    /// Rendering the export snapshot failed.
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}
