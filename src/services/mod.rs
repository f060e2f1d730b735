//! Services Layer
//!
//! This module contains business logic extracted from HTTP handlers.

pub mod commerce_service;

// Re-export for convenience
pub use commerce_service::*;
