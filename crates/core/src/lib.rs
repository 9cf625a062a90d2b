//! Domain layer for the tile dashboard.
//!
//! Everything here is free of HTTP and SQL concerns: entity types, error
//! taxonomy, the tile composition workflow and the traits it is generic
//! over. The `db`, `cloud` and `api` crates plug concrete collaborators in.

pub mod assets;
pub mod color;
pub mod draft;
pub mod error;
pub mod roles;
pub mod submission;
pub mod tile;
pub mod types;
pub mod users;
