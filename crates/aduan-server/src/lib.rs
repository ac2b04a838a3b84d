//! Aduan Server: configuration, application state and the REST surface.
//!
//! The binary in `main.rs` wires these together; integration tests drive
//! [`routes::router`] directly.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use config::{Args, ServerConfig};
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
