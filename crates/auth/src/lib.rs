//! Authentication primitives for Chartdeck.
//!
//! Two concerns live here, both consumed by the server crate:
//! - Signed bearer tokens (HS256 JWTs carrying the user id and expiry)
//! - Password hashing and verification (Argon2id, PHC strings)

pub mod error;
pub mod password;
pub mod token;

pub use error::AuthError;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenKeys};
