//! Password Hasher
//! Mission: One-way adaptive password hashing, no decode path

use anyhow::{Context, Result};
use bcrypt::{hash, verify};

pub use bcrypt::DEFAULT_COST;

/// Hash a plaintext password into a salted bcrypt digest.
///
/// The salt is randomized per call, so hashing the same password twice
/// yields different digests that both verify.
pub fn hash_password(plaintext: &str, cost: u32) -> Result<String> {
    hash(plaintext, cost).context("Failed to hash password")
}

/// Verify a plaintext password against a stored digest.
///
/// This is the only check path. A malformed digest yields `false`, never
/// an error.
pub fn verify_password(plaintext: &str, digest: &str) -> bool {
    verify(plaintext, digest).unwrap_or(false)
}
