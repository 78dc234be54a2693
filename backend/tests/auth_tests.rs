//! Authentication tests
//!
//! Token pair semantics and credential validation:
//! - access/refresh claims carry the user identity and a token_type marker
//! - password hashes verify against the original password only
//! - signup input validation for email and password

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use proptest::prelude::*;
use serde::{Deserialize, Serialize};

use shared::validation::{validate_email, validate_password, MIN_PASSWORD_LENGTH};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    username: String,
    email: String,
    token_type: String,
    exp: i64,
    iat: i64,
}

fn make_claims(token_type: &str, expiry_seconds: i64) -> Claims {
    let now = Utc::now().timestamp();
    Claims {
        sub: "42".to_string(),
        username: "owner@shop.example".to_string(),
        email: "owner@shop.example".to_string(),
        token_type: token_type.to_string(),
        exp: now + expiry_seconds,
        iat: now,
    }
}

// ============================================================================
// Token Tests
// ============================================================================

#[test]
fn test_access_token_round_trip() {
    let secret = b"test-secret";
    let claims = make_claims("access", 3600);

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .unwrap();

    let decoded = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    )
    .unwrap()
    .claims;

    assert_eq!(decoded.sub, "42");
    assert_eq!(decoded.username, "owner@shop.example");
    assert_eq!(decoded.token_type, "access");
    assert!(decoded.exp > decoded.iat);
}

#[test]
fn test_token_rejected_with_wrong_secret() {
    let claims = make_claims("access", 3600);
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"secret-a"),
    )
    .unwrap();

    let result = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(b"secret-b"),
        &Validation::default(),
    );

    assert!(result.is_err());
}

#[test]
fn test_expired_token_rejected() {
    // Issued two hours ago with a one-hour lifetime
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: "42".to_string(),
        username: "owner@shop.example".to_string(),
        email: "owner@shop.example".to_string(),
        token_type: "access".to_string(),
        exp: now - 3600,
        iat: now - 7200,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"secret"),
    )
    .unwrap();

    let result = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(b"secret"),
        &Validation::default(),
    );

    assert!(result.is_err());
}

#[test]
fn test_refresh_token_is_distinguishable_from_access() {
    let access = make_claims("access", 3600);
    let refresh = make_claims("refresh", 604800);

    assert_ne!(access.token_type, refresh.token_type);
    assert!(refresh.exp > access.exp);
}

// ============================================================================
// Password Tests
// ============================================================================

#[test]
fn test_password_hash_verifies_original_only() {
    let hash = bcrypt::hash("correct horse", bcrypt::DEFAULT_COST).unwrap();

    assert!(bcrypt::verify("correct horse", &hash).unwrap());
    assert!(!bcrypt::verify("battery staple", &hash).unwrap());
}

#[test]
fn test_password_hash_is_salted() {
    let a = bcrypt::hash("correct horse", bcrypt::DEFAULT_COST).unwrap();
    let b = bcrypt::hash("correct horse", bcrypt::DEFAULT_COST).unwrap();

    assert_ne!(a, b);
}

// ============================================================================
// Signup Validation Tests
// ============================================================================

#[test]
fn test_email_validation() {
    assert!(validate_email("user@example.com").is_ok());
    assert!(validate_email("a.b+c@sub.example.co.th").is_ok());

    assert!(validate_email("").is_err());
    assert!(validate_email("no-at-sign").is_err());
    assert!(validate_email("user@nodot").is_err());
    assert!(validate_email("spaced user@example.com").is_err());
}

#[test]
fn test_password_minimum_length() {
    assert!(validate_password("abcdef").is_ok());
    assert!(validate_password("abcde").is_err());
    assert!(validate_password("").is_err());
    assert_eq!(MIN_PASSWORD_LENGTH, 6);
}

// ============================================================================
// Property-Based Tests
// ============================================================================

fn email_strategy() -> impl Strategy<Value = String> {
    "[a-z]{3,10}@[a-z]{3,8}\\.(com|org|net|co\\.th)"
}

proptest! {
    /// Well-formed addresses always pass validation
    #[test]
    fn prop_generated_emails_validate(email in email_strategy()) {
        prop_assert!(validate_email(&email).is_ok());
    }

    /// Length alone decides password validity
    #[test]
    fn prop_password_validity_matches_length(password in "[a-zA-Z0-9!@#$%]{0,20}") {
        let valid = validate_password(&password).is_ok();
        prop_assert_eq!(valid, password.len() >= MIN_PASSWORD_LENGTH);
    }

    /// Claims survive an encode/decode cycle under the signing secret
    #[test]
    fn prop_claims_round_trip(user_id in 1i64..1_000_000, expiry in 60i64..604800) {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            username: format!("user{}@example.com", user_id),
            email: format!("user{}@example.com", user_id),
            token_type: "access".to_string(),
            exp: now + expiry,
            iat: now,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"prop-secret"),
        )
        .unwrap();

        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"prop-secret"),
            &Validation::default(),
        )
        .unwrap()
        .claims;

        prop_assert_eq!(decoded.sub.parse::<i64>().unwrap(), user_id);
        prop_assert_eq!(decoded.exp, claims.exp);
    }
}
