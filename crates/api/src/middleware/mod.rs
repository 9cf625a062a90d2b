//! Request extractors for identity and role checks.
//!
//! [`auth::AuthUser`] decodes the Bearer token; [`rbac::RequireAdmin`]
//! additionally insists on the `admin` role.

pub mod auth;
pub mod rbac;
