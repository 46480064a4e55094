//! Backend: client side of the beautification service.
//!
//! DESIGN
//! ======
//! The sessions only see the [`Beautifier`] trait, so tests can swap in
//! scripted backends. [`HttpBeautifier`] is the real implementation and is
//! configured from [`crate::config::BackendConfig`].

pub mod http;
pub mod types;

pub use http::HttpBeautifier;
pub use types::{BackendError, Beautifier, DrawingBody};
