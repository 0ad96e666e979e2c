mod common;

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::json;
use uuid::Uuid;

use common::test_jwt_config;
use flagstone::modules::auth::model::Claims;
use flagstone::utils::jwt::{TokenError, TokenService};

fn token_service() -> TokenService {
    TokenService::from_config(&test_jwt_config()).unwrap()
}

fn test_claims(ttl: i64) -> Claims {
    let now = Utc::now().timestamp();
    Claims {
        sub: Uuid::new_v4().to_string(),
        exp: now + ttl,
        iat: now,
        scopes: Some(json!(["read:flags", "write:flags"])),
    }
}

#[test]
fn test_generate_and_validate_roundtrip() {
    let service = token_service();
    let claims = test_claims(3600);

    let token = service.generate_token(&claims).unwrap();
    let decoded = service.validate_token(&token).unwrap();

    assert_eq!(decoded.sub, claims.sub);
    assert_eq!(decoded.exp, claims.exp);
    assert_eq!(decoded.scopes, claims.scopes);
}

#[test]
fn test_generated_token_uses_rs256() {
    let service = token_service();
    let token = service.generate_token(&test_claims(3600)).unwrap();

    let header = jsonwebtoken::decode_header(&token).unwrap();
    assert_eq!(header.alg, Algorithm::RS256);
}

#[test]
fn test_validate_rejects_expired_token() {
    let service = token_service();
    let token = service.generate_token(&test_claims(-3600)).unwrap();

    let err = service.validate_token(&token).unwrap_err();
    assert!(matches!(err, TokenError::Expired), "got {err:?}");
}

#[test]
fn test_validate_rejects_token_without_exp() {
    let private_pem = std::fs::read(test_jwt_config().private_key_path).unwrap();
    let key = EncodingKey::from_rsa_pem(&private_pem).unwrap();
    let token = encode(
        &Header::new(Algorithm::RS256),
        &json!({"sub": Uuid::new_v4().to_string(), "scopes": ["read:flags"]}),
        &key,
    )
    .unwrap();

    // well-signed but missing `exp` must never validate
    assert!(token_service().validate_token(&token).is_err());
}

#[test]
fn test_validate_rejects_hmac_signed_token() {
    // algorithm substitution: a well-formed token signed with HS256 must be
    // rejected before any signature check
    let token = encode(
        &Header::new(Algorithm::HS256),
        &test_claims(3600),
        &EncodingKey::from_secret(b"not-the-rsa-key"),
    )
    .unwrap();

    let err = token_service().validate_token(&token).unwrap_err();
    assert!(matches!(err, TokenError::UnexpectedSigningMethod), "got {err:?}");
}

#[test]
fn test_validate_rejects_tampered_payload() {
    let service = token_service();
    let token = service.generate_token(&test_claims(3600)).unwrap();
    let other = service.generate_token(&test_claims(7200)).unwrap();

    // graft the other token's claims segment onto the first signature
    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    parts[1] = other.split('.').nth(1).unwrap().to_string();
    let tampered = parts.join(".");

    let err = service.validate_token(&tampered).unwrap_err();
    assert!(matches!(err, TokenError::Invalid), "got {err:?}");
}

#[test]
fn test_validate_rejects_garbage() {
    let service = token_service();

    for token in ["", "garbage", "a.b.c", "invalid.token.here"] {
        let err = service.validate_token(token).unwrap_err();
        assert!(matches!(err, TokenError::Invalid), "token {token:?} gave {err:?}");
    }
}

#[test]
fn test_from_config_fails_on_missing_key_file() {
    let mut config = test_jwt_config();
    config.private_key_path = "tests/fixtures/jwt/nonexistent.pem".to_string();

    assert!(TokenService::from_config(&config).is_err());
}

#[test]
fn test_from_config_fails_on_invalid_pem() {
    let mut config = test_jwt_config();
    // a valid file that is not an RSA key
    config.private_key_path = "Cargo.toml".to_string();

    assert!(TokenService::from_config(&config).is_err());
}
