//! Session Token Codec
//! Mission: Issue and verify signed, time-bound session tokens

use crate::auth::models::Claims;
use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Codec for compact HS256 session tokens.
///
/// Tokens are stateless: validity is signature plus expiry, nothing is
/// persisted server-side and nothing can be revoked before expiry.
pub struct JwtHandler {
    secret: String,
    ttl_secs: i64,
}

impl JwtHandler {
    pub fn new(secret: String, ttl_secs: i64) -> Self {
        Self { secret, ttl_secs }
    }

    /// Issue a token asserting {sub = subject, iat = now, exp = now + ttl}.
    pub fn issue(&self, subject: &str) -> Result<String> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(chrono::Duration::seconds(self.ttl_secs))
            .context("Token expiry out of range")?;

        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to sign session token")
    }

    /// Verify structure, signature, and expiry.
    ///
    /// Every failure collapses to `None`; callers cannot tell a malformed
    /// token from a bad signature from an expired one. The expiry check is
    /// strict (`now >= exp` is invalid), with jsonwebtoken's default leeway
    /// disabled, so a zero-ttl token is already dead when issued.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false; // expiry compared explicitly below
        validation.leeway = 0;

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .ok()?;

        if Utc::now().timestamp() >= decoded.claims.exp {
            return None;
        }

        Some(decoded.claims)
    }

    /// Extract the subject claim without proving validity.
    ///
    /// Skips signature and expiry checks; for diagnostics only, never an
    /// authentication decision.
    pub fn subject_of(&self, token: &str) -> Option<String> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;

        decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .ok()
            .map(|decoded| decoded.claims.sub)
    }
}
