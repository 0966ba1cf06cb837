//! Roster Server Library
//!
//! REST front end for the user service: routing, handlers, error mapping and
//! configuration.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod router;
pub mod state;

// Re-export commonly used types for convenience
pub use config::{ConfigOverrides, ServerConfig};
pub use error::{Result, ServerError};
pub use router::create_router;
pub use state::AppState;
