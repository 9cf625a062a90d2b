pub mod auth;
pub mod categories;
pub mod colors;
pub mod drafts;
pub mod submissions;
pub mod tiles;
