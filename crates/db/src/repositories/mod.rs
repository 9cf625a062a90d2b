//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod category_repo;
pub mod color_repo;
pub mod draft_repo;
pub mod password_reset_repo;
pub mod submission_repo;
pub mod tile_repo;
pub mod user_repo;

pub use category_repo::CategoryRepo;
pub use color_repo::ColorRepo;
pub use draft_repo::DraftRepo;
pub use password_reset_repo::PasswordResetRepo;
pub use submission_repo::SubmissionRepo;
pub use tile_repo::TileRepo;
pub use user_repo::UserRepo;
