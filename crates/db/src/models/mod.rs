//! Row types and DTOs, one module per table.

pub mod category;
pub mod color;
pub mod draft;
pub mod password_reset;
pub mod submission;
pub mod tile;
pub mod user;
