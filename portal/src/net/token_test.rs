use super::*;
use crate::test_support::make_token;
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use serde_json::json;
use time::macros::datetime;

const NOW: OffsetDateTime = datetime!(2026-03-01 12:00 UTC);

// =============================================================================
// well-formed tokens
// =============================================================================

#[test]
fn decode_maps_all_known_claims() {
    let token = make_token(&json!({
        "sub": "17",
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "role": "STAFF",
        "iat": 1_700_000_000,
        "exp": 1_700_086_400,
    }));
    let identity = decode_at(&token, NOW).unwrap();
    assert_eq!(identity.subject_id, "17");
    assert_eq!(identity.display_name, "Ada Lovelace");
    assert_eq!(identity.email, "ada@example.com");
    assert_eq!(identity.role, Role::Staff);
    assert_eq!(identity.issued_at.unix_timestamp(), 1_700_000_000);
    assert_eq!(identity.expires_at.map(OffsetDateTime::unix_timestamp), Some(1_700_086_400));
}

#[test]
fn decode_accepts_numeric_subject() {
    let token = make_token(&json!({ "sub": 42, "role": "ADMIN" }));
    let identity = decode_at(&token, NOW).unwrap();
    assert_eq!(identity.subject_id, "42");
    assert_eq!(identity.role, Role::Admin);
}

#[test]
fn decode_defaults_missing_optional_claims() {
    let token = make_token(&json!({ "sub": "7" }));
    let identity = decode_at(&token, NOW).unwrap();
    assert_eq!(identity.display_name, "");
    assert_eq!(identity.email, "");
    assert_eq!(identity.role, Role::Passenger);
    assert_eq!(identity.issued_at, NOW);
    assert!(identity.expires_at.is_none());
}

#[test]
fn decode_unknown_role_is_passenger() {
    let token = make_token(&json!({ "sub": "7", "role": "PILOT" }));
    assert_eq!(decode_at(&token, NOW).unwrap().role, Role::Passenger);
}

#[test]
fn decode_accepts_padded_payload() {
    let payload = URL_SAFE.encode(br#"{"sub":"pad"}"#);
    assert!(payload.ends_with('='), "fixture should carry padding");
    let token = format!("h.{payload}.s");
    assert_eq!(decode_at(&token, NOW).unwrap().subject_id, "pad");
}

#[test]
fn decode_ignores_surrounding_whitespace() {
    let token = format!("  {}\n", make_token(&json!({ "sub": "1" })));
    assert!(decode(&token).is_ok());
}

// =============================================================================
// malformed tokens
// =============================================================================

#[test]
fn decode_rejects_wrong_segment_counts() {
    for token in ["", "abc", "a.b", "a.b.c.d", "a..c"] {
        assert_eq!(decode(token), Err(DecodeError::MalformedStructure), "token {token:?}");
    }
}

#[test]
fn decode_rejects_empty_header_or_signature() {
    let payload = make_token(&json!({ "sub": 1 }));
    let payload = payload.split('.').nth(1).unwrap();
    for token in [format!(".{payload}.sig"), format!("hdr.{payload}."), format!(".{payload}.")] {
        assert_eq!(decode(&token), Err(DecodeError::MalformedStructure), "token {token:?}");
    }
}

#[test]
fn decode_rejects_invalid_base64() {
    let err = decode("h.!!not-base64!!.s").unwrap_err();
    assert!(matches!(err, DecodeError::InvalidBase64(_)));
}

#[test]
fn decode_rejects_non_json_payload() {
    let payload = URL_SAFE_NO_PAD.encode(b"plain text");
    let err = decode(&format!("h.{payload}.s")).unwrap_err();
    assert!(matches!(err, DecodeError::InvalidClaims(_)));
}

#[test]
fn decode_rejects_non_object_payload() {
    let payload = URL_SAFE_NO_PAD.encode(b"[1,2,3]");
    let err = decode(&format!("h.{payload}.s")).unwrap_err();
    assert!(matches!(err, DecodeError::InvalidClaims(_)));
}

#[test]
fn decode_requires_subject() {
    let token = make_token(&json!({ "name": "nobody" }));
    assert_eq!(decode(&token), Err(DecodeError::MissingClaim("sub")));
}

#[test]
fn decode_rejects_empty_subject() {
    let token = make_token(&json!({ "sub": "" }));
    assert_eq!(decode(&token), Err(DecodeError::MissingClaim("sub")));
}

// =============================================================================
// Identity::is_expired
// =============================================================================

#[test]
fn identity_without_exp_never_expires() {
    let identity = decode_at(&make_token(&json!({ "sub": "1" })), NOW).unwrap();
    assert!(!identity.is_expired(datetime!(2100-01-01 0:00 UTC)));
}

#[test]
fn identity_expires_at_exp() {
    let token = make_token(&json!({ "sub": "1", "exp": NOW.unix_timestamp() }));
    let identity = decode_at(&token, NOW).unwrap();
    assert!(identity.is_expired(NOW));
    assert!(!identity.is_expired(datetime!(2026-03-01 11:59 UTC)));
}
