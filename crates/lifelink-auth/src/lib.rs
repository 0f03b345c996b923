//! # lifelink-auth
//!
//! The identity gate: JWT creation and validation plus Argon2id password
//! hashing.

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::PasswordHasher;
