//! Bhavna Server
//!
//! HTTP transport for the sentiment engine: chat, per-session analysis and
//! reset endpoints with cookie-based sessions.

pub mod config;
pub mod routes;
pub mod state;

pub use config::{Cli, ServerConfig, SessionConfig};
pub use routes::create_router;
pub use state::{AppState, SessionStore};
