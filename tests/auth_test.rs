use std::time::Duration;

use rapier_auth::auth::password::{hash_password, verify_password};
use rapier_auth::auth::token::{Claims, TokenManager};
use serde_json::{json, Map};

const SECRET: &str = "integration-test-signing-key-000000000";

#[test]
fn test_token_creation_and_validation() {
    let token_manager = TokenManager::new(SECRET, Duration::from_secs(1800));

    let mut extra = Map::new();
    extra.insert("username".to_string(), json!("testuser"));
    let token = token_manager
        .issue_token("user123", Some(extra), None)
        .unwrap();
    assert!(!token.is_empty());

    let claims = token_manager.decode_token(&token).unwrap();
    assert_eq!(claims.sub, "user123");
    assert_eq!(claims.extra["username"], json!("testuser"));
}

#[test]
fn test_custom_ttl() {
    let token_manager = TokenManager::new(SECRET, Duration::from_secs(1800));
    let token = token_manager
        .issue_token("user123", None, Some(Duration::from_secs(3600)))
        .unwrap();
    let claims = token_manager.decode_token(&token).unwrap();
    assert_eq!(claims.exp - claims.iat, 3600);
}

#[test]
fn test_invalid_token_validation() {
    let token_manager = TokenManager::new(SECRET, Duration::from_secs(1800));
    assert!(token_manager.decode_token("invalid.token.here").is_none());
}

#[test]
fn test_expired_token() {
    let token_manager = TokenManager::new(SECRET, Duration::from_secs(1800));

    let mut claims = Claims::new("user123".to_string(), chrono::Duration::hours(1));
    // Manually set expiration to past
    claims.exp = claims.iat - 3600;
    assert!(claims.is_expired());

    let token = token_manager.generate_token(&claims).unwrap();
    assert!(token_manager.decode_token(&token).is_none());
}

#[test]
fn test_token_from_other_key_rejected() {
    let ours = TokenManager::new(SECRET, Duration::from_secs(1800));
    let theirs = TokenManager::new("a-completely-different-signing-key-111", Duration::from_secs(1800));

    let token = theirs.issue_token("user123", None, None).unwrap();
    assert!(ours.decode_token(&token).is_none());
    assert!(theirs.decode_token(&token).is_some());
}

#[test]
fn test_tampered_payload_rejected() {
    let token_manager = TokenManager::new(SECRET, Duration::from_secs(1800));
    let token = token_manager.issue_token("user123", None, None).unwrap();

    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    let other = token_manager.issue_token("admin", None, None).unwrap();
    parts[1] = other.split('.').nth(1).unwrap().to_string();
    let forged = parts.join(".");

    assert!(token_manager.decode_token(&forged).is_none());
}

#[test]
fn test_password_round_trip() {
    let hashed = hash_password("testpassword123").unwrap();
    assert_ne!(hashed, "testpassword123");
    assert!(verify_password("testpassword123", &hashed));
    assert!(!verify_password("wrongpassword", &hashed));
}
