use std::collections::HashSet;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::auth::role::Role;

/// Verification failure. `reason` is the client-facing text; the underlying
/// jsonwebtoken error stays available through `source()` for logs.
#[derive(Debug, Error)]
#[error("{reason}")]
pub struct VerifyError {
    reason: &'static str,
    #[source]
    source: jsonwebtoken::errors::Error,
}

impl VerifyError {
    // The JOSE header failed to decode (unsupported `alg` such as `none`
    // included). The claims were never looked at.
    fn malformed_header(source: jsonwebtoken::errors::Error) -> Self {
        Self {
            reason: "jwt malformed",
            source,
        }
    }

    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

impl From<jsonwebtoken::errors::Error> for VerifyError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        let reason = match e.kind() {
            ErrorKind::ExpiredSignature => "jwt expired",
            ErrorKind::ImmatureSignature => "jwt not active",
            ErrorKind::InvalidSignature => "invalid signature",
            ErrorKind::InvalidAlgorithm | ErrorKind::MissingAlgorithm => "invalid algorithm",
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => "jwt malformed",
            ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => "invalid token payload",
            _ => "invalid token",
        };
        Self { reason, source: e }
    }
}

/// Upper bound for clock skew tolerance. `exp` validation subtracts the
/// leeway from the current unix time, so it must stay far below it.
pub const MAX_LEEWAY_SECONDS: u64 = 86_400;

/// Access token claims.
///
/// Only `email` and `role` are required. `iat`/`exp` are kept when present;
/// `exp` is enforced by `Validation` whenever the token carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub email: String,
    pub role: Role,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

/// HMAC access-token verifier bound to the process signing secret.
///
/// - Key material is intentionally not printable via Debug.
/// - Issuer and audience are not checked.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(secret: &str, leeway_seconds: u64) -> Self {
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        // exp/nbf are checked when present but never demanded
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.leeway = leeway_seconds.min(MAX_LEEWAY_SECONDS);

        Self {
            decoding_key,
            validation,
        }
    }

    /// Verify signature and time claims, then decode the payload.
    ///
    /// Pure computation; never suspends.
    pub fn verify(&self, token: &str) -> Result<AccessTokenClaims, VerifyError> {
        // header first, so a Json error from `decode` below is always the payload
        jsonwebtoken::decode_header(token).map_err(VerifyError::malformed_header)?;

        let data =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)?;

        Ok(data.claims)
    }
}
