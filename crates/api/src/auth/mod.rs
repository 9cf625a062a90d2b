//! Credentials: Argon2id hashes in [`password`], signed access tokens and
//! hashed reset tokens in [`jwt`].

pub mod jwt;
pub mod password;
