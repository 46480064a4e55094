//! Curvetopia host: backend client, configuration, and the async sessions
//! that drive the `canvas` engines.
//!
//! | Module    | Contents                                                   |
//! |-----------|------------------------------------------------------------|
//! | `backend` | `Beautifier` trait, `reqwest` client, wire error type       |
//! | `config`  | `CURVETOPIA_*` environment configuration                   |
//! | `session` | Doodle and stroke event loops                              |

pub mod backend;
pub mod config;
pub mod session;
