//! Bearer-token verification.
//!
//! Slate does not issue credentials; tokens come from the external identity
//! provider and are checked against a shared HS256 secret.

pub mod jwt;
