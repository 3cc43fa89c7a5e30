//! Bcrypt password hashing and verification.

use anyhow::{Context, Result};

/// Hash a plaintext password with bcrypt at the default cost.
pub fn hash(plain: &str) -> Result<String> {
    bcrypt::hash(plain, bcrypt::DEFAULT_COST).context("Failed to hash password")
}

/// Verify a plaintext password against a stored bcrypt digest.
///
/// A malformed digest counts as a mismatch rather than an error, so login
/// failures stay indistinguishable from unknown accounts.
pub fn verify(plain: &str, digest: &str) -> bool {
    bcrypt::verify(plain, digest).unwrap_or(false)
}
