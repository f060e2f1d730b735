//! Repository implementations using SeaORM

pub mod soft_delete_repository;

pub use soft_delete_repository::{CascadeTarget, SeaOrmSoftDeleteRepository};
