//! Bearer token claim decoding.
//!
//! TRUST BOUNDARY
//! ==============
//! The signature segment is never verified. Decoded claims personalize the
//! UI and gate which views are offered; the server re-validates every
//! request, so nothing here may be treated as an authorization decision.

#[cfg(test)]
#[path = "token_test.rs"]
mod token_test;

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde_json::Value;
use time::OffsetDateTime;

use super::types::{Identity, Role};

/// URL-safe alphabet that accepts payloads with or without `=` padding.
const CLAIMS_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Why a token could not be turned into an [`Identity`].
///
/// Callers treat every variant the same way: as "no session".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The token does not have exactly three `.`-separated segments, or one
    /// of them is empty.
    #[error("token must have header, payload and signature segments")]
    MalformedStructure,
    /// The payload segment is not valid base64url.
    #[error("token payload is not valid base64url: {0}")]
    InvalidBase64(String),
    /// The payload decoded but is not a JSON object.
    #[error("token payload is not a JSON claims object: {0}")]
    InvalidClaims(String),
    /// A claim the client relies on is absent or has the wrong type.
    #[error("token is missing the `{0}` claim")]
    MissingClaim(&'static str),
}

/// Decode identity claims from a bearer token.
///
/// `sub` is required and may be a JSON string or number. `role` defaults to
/// passenger, `iat` to the decode time, and `name`/`email` to empty strings.
///
/// # Errors
///
/// Returns [`DecodeError`] for any structural or encoding problem.
pub fn decode(token: &str) -> Result<Identity, DecodeError> {
    decode_at(token, OffsetDateTime::now_utc())
}

/// [`decode`] with an explicit clock, used for missing `iat`.
///
/// # Errors
///
/// Returns [`DecodeError`] for any structural or encoding problem.
pub fn decode_at(token: &str, now: OffsetDateTime) -> Result<Identity, DecodeError> {
    let payload = payload_segment(token)?;
    let bytes = CLAIMS_ENGINE
        .decode(payload)
        .map_err(|e| DecodeError::InvalidBase64(e.to_string()))?;
    let claims: Value =
        serde_json::from_slice(&bytes).map_err(|e| DecodeError::InvalidClaims(e.to_string()))?;
    let Value::Object(claims) = claims else {
        return Err(DecodeError::InvalidClaims("expected an object".into()));
    };

    let subject_id = match claims.get("sub") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(DecodeError::MissingClaim("sub")),
    };

    let text = |key: &str| {
        claims
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned()
    };
    let timestamp = |key: &str| {
        claims
            .get(key)
            .and_then(Value::as_i64)
            .and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
    };

    Ok(Identity {
        subject_id,
        display_name: text("name"),
        email: text("email"),
        role: claims
            .get("role")
            .and_then(Value::as_str)
            .map_or(Role::Passenger, Role::from_claim),
        issued_at: timestamp("iat").unwrap_or(now),
        expires_at: timestamp("exp"),
    })
}

fn payload_segment(token: &str) -> Result<&str, DecodeError> {
    let mut parts = token.trim().split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(payload), Some(signature), None)
            if !header.is_empty() && !payload.is_empty() && !signature.is_empty() =>
        {
            Ok(payload)
        }
        _ => Err(DecodeError::MalformedStructure),
    }
}
