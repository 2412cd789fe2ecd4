//! HTTP API for Buildwise.
//!
//! Handlers are plain async functions over [`AppState`]; [`router`] wires
//! them to their paths.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod routes;
pub mod seed;
pub mod state;
pub mod views;

pub use config::{Backend, ServerConfig};
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
