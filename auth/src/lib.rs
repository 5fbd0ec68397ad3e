//! Credential primitives for the authentication service.
//!
//! Provides the two building blocks of the credential lifecycle:
//! - Password hashing (Argon2id, PHC string digests)
//! - Signed, expiring bearer tokens (HS256 JWT)
//!
//! Neither component performs I/O. Orchestration (user lookup, uniqueness,
//! response shaping) belongs to the service that consumes this crate.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let digest = hasher.hash("P@ssw0rd").unwrap();
//! assert!(hasher.verify("P@ssw0rd", &digest));
//! assert!(!hasher.verify("wrong", &digest));
//! ```
//!
//! ## Bearer Tokens
//! ```
//! use auth::TokenIssuer;
//! use chrono::Duration;
//!
//! let issuer = TokenIssuer::new(b"secret_key_at_least_32_bytes_long!");
//! let token = issuer.issue("alice@example.com", Duration::hours(24)).unwrap();
//! let subject = issuer.validate(&token).unwrap();
//! assert_eq!(subject, "alice@example.com");
//! ```

pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use jwt::Claims;
pub use jwt::TokenError;
pub use jwt::TokenIssuer;
pub use password::PasswordError;
pub use password::PasswordHasher;
