//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no Axum).
//! Trait definitions, the association graph and domain error types.

pub mod associations;
pub mod errors;
pub mod repositories;

pub use associations::{Association, AssociationGraph, Cardinality};
pub use errors::DomainError;
pub use repositories::*;
