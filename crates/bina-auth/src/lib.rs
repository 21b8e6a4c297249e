//! # bina-auth
//!
//! Stateless authentication for the BinaKata API.
//!
//! Passwords are hashed with Argon2 (salted, PHC string format). Access tokens
//! are HS256 JWTs carrying the user's email as `sub` and an `exp` claim.
//! Token decoding fails closed: any signature, expiry or format problem yields
//! no subject.

pub mod claims;
pub mod error;
pub mod password;

pub use claims::{Claims, TokenSigner};
pub use error::AuthError;
pub use password::{hash_password, verify_password};
