//! Infrastructure layer - Framework implementations
//!
//! This layer contains:
//! - Database connection and migrations (db)
//! - HTTP server setup (server)
//! - Configuration loading (config)
//! - Repository implementations (repositories)
//! - Entity registry (registry)
//! - Application state (state)

pub mod config;
pub mod db;
pub mod registry;
pub mod repositories;
pub mod server;
pub mod state;

pub use registry::Registry;
pub use repositories::*;
pub use state::AppState;
