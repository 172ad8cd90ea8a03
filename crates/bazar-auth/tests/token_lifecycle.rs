//! Token lifecycle tests: mint → verify → revoke, key rotation, and the
//! JWKS round-trip between authority and validators.

use std::sync::{Arc, OnceLock};
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use uuid::Uuid;

use bazar_auth::jwt::{TokenError, TokenMinter, TokenVerifier, VerificationKeySet};
use bazar_auth::jwks::JwksDocument;
use bazar_auth::keys::generate_signing_key;
use bazar_auth::revocation::RevocationIndex;
use bazar_cache::memory::MemoryCacheProvider;
use bazar_core::config::{AuthConfig, FailMode, MemoryCacheConfig};
use bazar_entity::role::Role;
use bazar_entity::signing_key::SigningKey;
use bazar_entity::user::UserAccount;

// RSA generation is expensive; share one pair across the whole file.
fn test_key() -> &'static SigningKey {
    static KEY: OnceLock<SigningKey> = OnceLock::new();
    KEY.get_or_init(|| generate_signing_key(2048, 90, Utc::now()).unwrap())
}

fn second_key() -> &'static SigningKey {
    static KEY: OnceLock<SigningKey> = OnceLock::new();
    KEY.get_or_init(|| {
        let mut key = generate_signing_key(2048, 90, Utc::now()).unwrap();
        key.kid = format!("{}-rotated", key.kid);
        key
    })
}

fn test_user() -> UserAccount {
    let now = Utc::now();
    UserAccount {
        id: Uuid::new_v4(),
        email: Some("a@b.com".to_string()),
        phone: None,
        password_hash: String::new(),
        salt: String::new(),
        tenant_id: Uuid::nil(),
        enabled: true,
        email_verified: false,
        phone_verified: false,
        created_at: now,
        updated_at: now,
    }
}

fn minter() -> TokenMinter {
    TokenMinter::new(&AuthConfig {
        access_ttl_seconds: 7200,
        refresh_ttl_days: 30,
        issuer: "bazar-identity".to_string(),
    })
}

fn revocation_index() -> RevocationIndex {
    let cache = Arc::new(MemoryCacheProvider::new(&MemoryCacheConfig {
        max_capacity: 1000,
    }));
    RevocationIndex::new(cache, FailMode::Closed, StdDuration::from_secs(30 * 86400))
}

#[test]
fn minted_token_verifies_within_its_lifetime() {
    let key = test_key();
    let user = test_user();
    let now = Utc::now();

    let minted = minter()
        .mint_access(key, &user, &[Role::Customer], now)
        .unwrap();
    let key_set = VerificationKeySet::from_signing_keys(std::slice::from_ref(key)).unwrap();
    let verifier = TokenVerifier::new();

    let claims = verifier.verify(&minted.token, &key_set, now).unwrap();
    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.tenant_id, user.tenant_id);
    assert_eq!(claims.roles, vec![Role::Customer]);
    assert_eq!(claims.iss, "bazar-identity");
    assert_eq!(claims.exp - claims.iat, 7200);

    // Still valid one second before expiry, rejected after.
    assert!(
        verifier
            .verify(&minted.token, &key_set, now + Duration::seconds(7199))
            .is_ok()
    );
    assert_eq!(
        verifier
            .verify(&minted.token, &key_set, now + Duration::seconds(7210))
            .unwrap_err(),
        TokenError::Expired
    );
}

#[test]
fn each_issuance_gets_a_fresh_jti() {
    let key = test_key();
    let user = test_user();
    let now = Utc::now();
    let minter = minter();

    let a = minter.mint_access(key, &user, &[Role::Customer], now).unwrap();
    let b = minter.mint_access(key, &user, &[Role::Customer], now).unwrap();
    assert_ne!(a.claims.jti, b.claims.jti);
}

#[test]
fn tampered_token_fails_signature() {
    let key = test_key();
    let user = test_user();
    let now = Utc::now();

    let minted = minter()
        .mint_access(key, &user, &[Role::Customer], now)
        .unwrap();
    let key_set = VerificationKeySet::from_signing_keys(std::slice::from_ref(key)).unwrap();

    // Corrupt the signature segment.
    let mut parts: Vec<&str> = minted.token.split('.').collect();
    let tampered_sig = "A".repeat(parts[2].len());
    parts[2] = &tampered_sig;
    let tampered = parts.join(".");

    assert_eq!(
        TokenVerifier::new()
            .verify(&tampered, &key_set, now)
            .unwrap_err(),
        TokenError::BadSignature
    );
}

#[test]
fn unknown_kid_is_reported() {
    let user = test_user();
    let now = Utc::now();

    let minted = minter()
        .mint_access(second_key(), &user, &[Role::Customer], now)
        .unwrap();
    // Key set only holds the first key.
    let key_set = VerificationKeySet::from_signing_keys(std::slice::from_ref(test_key())).unwrap();

    match TokenVerifier::new().verify(&minted.token, &key_set, now) {
        Err(TokenError::UnknownKid(kid)) => assert_eq!(kid, second_key().kid),
        other => panic!("expected UnknownKid, got {other:?}"),
    }
}

#[test]
fn garbage_input_is_malformed() {
    let key_set = VerificationKeySet::from_signing_keys(std::slice::from_ref(test_key())).unwrap();
    let verifier = TokenVerifier::new();

    assert_eq!(
        verifier.verify("not-a-jwt", &key_set, Utc::now()).unwrap_err(),
        TokenError::Malformed
    );
    assert_eq!(
        verifier.parse_unverified("a.b").unwrap_err(),
        TokenError::Malformed
    );
}

#[test]
fn rotation_keeps_old_tokens_verifiable() {
    let user = test_user();
    let now = Utc::now();
    let minter = minter();

    // Token minted under the old key.
    let old_token = minter
        .mint_access(test_key(), &user, &[Role::Seller], now)
        .unwrap();
    // After rotation both keys are active; new tokens carry the new kid.
    let new_token = minter
        .mint_access(second_key(), &user, &[Role::Seller], now)
        .unwrap();

    let both = vec![test_key().clone(), second_key().clone()];
    let key_set = VerificationKeySet::from_signing_keys(&both).unwrap();
    let verifier = TokenVerifier::new();

    assert!(verifier.verify(&old_token.token, &key_set, now).is_ok());
    assert!(verifier.verify(&new_token.token, &key_set, now).is_ok());

    let header = jsonwebtoken::decode_header(&new_token.token).unwrap();
    assert_eq!(header.kid.as_deref(), Some(second_key().kid.as_str()));
}

#[test]
fn jwks_round_trip_verifies_tokens() {
    let key = test_key();
    let user = test_user();
    let now = Utc::now();

    let minted = minter()
        .mint_access(key, &user, &[Role::Customer], now)
        .unwrap();

    // Authority publishes the document; a validator rebuilds its key set
    // from the JSON it fetched.
    let document = JwksDocument::from_signing_keys(std::slice::from_ref(key));
    let json = serde_json::to_string(&document).unwrap();
    let fetched: JwksDocument = serde_json::from_str(&json).unwrap();
    let key_set = VerificationKeySet::from_jwks(&fetched).unwrap();

    let claims = TokenVerifier::new().verify(&minted.token, &key_set, now).unwrap();
    assert_eq!(claims.sub, user.id);

    let jwk = document.find_by_kid(&key.kid).unwrap();
    assert_eq!(jwk.kty, "RSA");
    assert_eq!(jwk.key_use, "sig");
    assert_eq!(jwk.alg, "RS256");
    // base64url without padding.
    assert!(!jwk.n.contains('='));
    assert!(!jwk.e.contains('='));
}

#[tokio::test]
async fn revoked_jti_is_rejected_for_remaining_ttl() {
    let key = test_key();
    let user = test_user();
    let now = Utc::now();
    let index = revocation_index();

    let minted = minter()
        .mint_access(key, &user, &[Role::Customer], now)
        .unwrap();

    assert!(!index.is_revoked_for(&minted.claims).await.unwrap());

    index
        .revoke_token(&minted.claims.jti, minted.claims.remaining_ttl_seconds(now))
        .await
        .unwrap();

    assert!(index.is_revoked(&minted.claims.jti).await.unwrap());
    assert!(index.is_revoked_for(&minted.claims).await.unwrap());
}

#[tokio::test]
async fn epoch_rejects_tokens_issued_before_logout_all() {
    let key = test_key();
    let user = test_user();
    let now = Utc::now();
    let index = revocation_index();
    let minter = minter();

    // Three parallel sessions.
    let before_a = minter.mint_access(key, &user, &[Role::Customer], now - Duration::seconds(30)).unwrap();
    let before_b = minter.mint_access(key, &user, &[Role::Customer], now - Duration::seconds(10)).unwrap();

    index.revoke_all_for_user(&user.id, now).await.unwrap();

    assert!(index.is_revoked_for(&before_a.claims).await.unwrap());
    assert!(index.is_revoked_for(&before_b.claims).await.unwrap());

    // A token issued after the epoch (fresh login) is fine.
    let after = minter
        .mint_access(key, &user, &[Role::Customer], now + Duration::seconds(5))
        .unwrap();
    assert!(!index.is_revoked_for(&after.claims).await.unwrap());

    // Another user is unaffected.
    let other = test_user();
    let other_token = minter
        .mint_access(key, &other, &[Role::Customer], now - Duration::seconds(30))
        .unwrap();
    assert!(!index.is_revoked_for(&other_token.claims).await.unwrap());
}

#[test]
fn unverified_helpers_extract_claims() {
    let key = test_key();
    let user = test_user();
    let now = Utc::now();

    let minted = minter()
        .mint_access(key, &user, &[Role::Driver], now)
        .unwrap();
    let verifier = TokenVerifier::new();

    assert_eq!(verifier.extract_sub(&minted.token).unwrap(), user.id);
    assert_eq!(verifier.extract_jti(&minted.token).unwrap(), minted.claims.jti);
    assert_eq!(verifier.remaining_ttl(&minted.token, now).unwrap(), 7200);
    assert_eq!(
        verifier
            .remaining_ttl(&minted.token, now + Duration::seconds(8000))
            .unwrap(),
        0
    );
}
