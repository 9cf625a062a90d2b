//! HTTP surface of the tile admin dashboard.
//!
//! The binary in `main.rs` wires configuration, the database pool, the
//! object store and the mailer into an [`state::AppState`] and serves the
//! router built by [`app::build_router`].

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod multipart;
pub mod query;
pub mod response;
pub mod routes;
pub mod state;
