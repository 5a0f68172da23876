//! Authentication building blocks shared by services.
//!
//! Provides the two credential primitives the user service composes:
//! - Password hashing (Argon2id, PHC string format)
//! - Signed, expiring identity tokens (HS256 JWT)
//!
//! The token codec is deliberately small: it issues tokens for a subject
//! (optionally with an embedded authorities list for trusted service
//! identities) and validates them with a strict expiry check. Callers decide
//! what a validation failure means; the codec only reports which kind of
//! failure occurred.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Tokens
//! ```
//! use auth::TokenCodec;
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!", 24);
//! let token = codec.issue("alice").unwrap();
//! let claims = codec.validate(&token).unwrap();
//! assert_eq!(claims.sub, "alice");
//! ```

pub mod password;
pub mod token;

pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::TokenCodec;
pub use token::TokenError;
