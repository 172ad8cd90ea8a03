//! Gateway filter integration tests: the full pipeline against a live
//! local upstream, with a seeded key set and an in-memory revocation
//! store.

use std::sync::{Arc, OnceLock};
use std::time::Duration as StdDuration;

use axum::body::Body;
use axum::extract::Request;
use axum::http::{HeaderMap, StatusCode, header};
use axum::{Json, Router};
use chrono::Utc;
use tower::ServiceExt;
use uuid::Uuid;

use bazar_auth::jwt::{MintedToken, TokenMinter, VerificationKeySet};
use bazar_auth::keys::generate_signing_key;
use bazar_auth::keyset::RemoteKeySetCache;
use bazar_auth::revocation::RevocationIndex;
use bazar_cache::memory::MemoryCacheProvider;
use bazar_core::config::{AuthConfig, FailMode, MemoryCacheConfig, RouteConfig};
use bazar_entity::role::Role;
use bazar_entity::signing_key::SigningKey;
use bazar_entity::user::UserAccount;
use bazar_gateway::filter;
use bazar_gateway::paths::PublicPathMatcher;
use bazar_gateway::proxy::{Forwarder, RouteTable};
use bazar_gateway::state::GatewayState;

fn signing_key() -> &'static SigningKey {
    static KEY: OnceLock<SigningKey> = OnceLock::new();
    KEY.get_or_init(|| generate_signing_key(2048, 90, Utc::now()).unwrap())
}

fn user() -> UserAccount {
    let now = Utc::now();
    UserAccount {
        id: Uuid::new_v4(),
        email: Some("a@b.com".to_string()),
        phone: None,
        password_hash: String::new(),
        salt: String::new(),
        tenant_id: Uuid::new_v4(),
        enabled: true,
        email_verified: false,
        phone_verified: false,
        created_at: now,
        updated_at: now,
    }
}

fn mint(user: &UserAccount) -> MintedToken {
    TokenMinter::new(&AuthConfig {
        access_ttl_seconds: 7200,
        refresh_ttl_days: 30,
        issuer: "bazar-identity".to_string(),
    })
    .mint_access(signing_key(), user, &[Role::Customer], Utc::now())
    .unwrap()
}

/// An upstream that echoes back what the gateway forwarded to it.
async fn spawn_upstream() -> String {
    async fn echo(headers: HeaderMap, request: Request<Body>) -> Json<serde_json::Value> {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Json(serde_json::json!({
            "path": request.uri().path(),
            "authorization": header("authorization"),
            "x_user_id": header("x-user-id"),
            "x_tenant_id": header("x-tenant-id"),
            "x_roles": header("x-roles"),
        }))
    }

    let app = Router::new().fallback(echo);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn build_gateway(upstream: String) -> (Router, RevocationIndex) {
    let key_set = Arc::new(
        RemoteKeySetCache::new(
            "http://localhost:0/.well-known/jwks.json".to_string(),
            StdDuration::from_secs(1),
            StdDuration::from_secs(3600),
        )
        .unwrap(),
    );
    key_set
        .seed(VerificationKeySet::from_signing_keys(std::slice::from_ref(signing_key())).unwrap())
        .await;

    let cache = Arc::new(MemoryCacheProvider::new(&MemoryCacheConfig {
        max_capacity: 1000,
    }));
    let revocation = RevocationIndex::new(
        cache,
        FailMode::Closed,
        StdDuration::from_secs(30 * 86400),
    );

    let state = GatewayState {
        public_paths: Arc::new(PublicPathMatcher::new(vec![
            "/api/v1/auth/login".to_string(),
            "/.well-known/**".to_string(),
        ])),
        key_set,
        revocation: revocation.clone(),
        revocation_timeout: StdDuration::from_millis(500),
        fail_open: false,
        routes: RouteTable::new(vec![RouteConfig {
            prefix: "/api/v1".to_string(),
            upstream,
        }]),
        forwarder: Forwarder::new(StdDuration::from_secs(5)).unwrap(),
    };

    let app = Router::new().fallback(filter::handle).with_state(state);
    (app, revocation)
}

fn request(path: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn missing_credential_is_rejected_at_the_edge() {
    let upstream = spawn_upstream().await;
    let (app, _) = build_gateway(upstream).await;

    let response = app
        .oneshot(request("/api/v1/profile/me", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn public_path_skips_validation_and_forwards() {
    let upstream = spawn_upstream().await;
    let (app, _) = build_gateway(upstream).await;

    let response = app
        .oneshot(request("/api/v1/auth/login", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["path"], "/api/v1/auth/login");
    assert_eq!(body["x_user_id"], serde_json::Value::Null);
}

#[tokio::test]
async fn valid_token_is_decorated_and_forwarded() {
    let upstream = spawn_upstream().await;
    let (app, _) = build_gateway(upstream).await;
    let user = user();
    let minted = mint(&user);

    let response = app
        .oneshot(request("/api/v1/profile/me", Some(&minted.token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    // The original token travels on verbatim for the kernel to revalidate.
    assert_eq!(body["authorization"], format!("Bearer {}", minted.token));
    // Advisory context headers for logging.
    assert_eq!(body["x_user_id"], user.id.to_string());
    assert_eq!(body["x_tenant_id"], user.tenant_id.to_string());
    assert_eq!(body["x_roles"], "CUSTOMER");
}

#[tokio::test]
async fn cookie_credential_is_validated() {
    let upstream = spawn_upstream().await;
    let (app, _) = build_gateway(upstream).await;
    let minted = mint(&user());

    let req = Request::builder()
        .uri("/api/v1/profile/me")
        .header(header::COOKIE, format!("accessToken={}", minted.token))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn tampered_token_is_rejected() {
    let upstream = spawn_upstream().await;
    let (app, _) = build_gateway(upstream).await;
    let minted = mint(&user());

    let response = app
        .oneshot(request(
            "/api/v1/profile/me",
            Some(&format!("{}x", minted.token)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn revoked_token_is_rejected_immediately() {
    let upstream = spawn_upstream().await;
    let (app, revocation) = build_gateway(upstream).await;
    let user = user();
    let now = Utc::now();
    let minted = mint(&user);

    let response = app
        .clone()
        .oneshot(request("/api/v1/profile/me", Some(&minted.token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Logout writes the blacklist entry; the very next read must see it.
    revocation
        .revoke_token(&minted.claims.jti, minted.claims.remaining_ttl_seconds(now))
        .await
        .unwrap();

    let response = app
        .oneshot(request("/api/v1/profile/me", Some(&minted.token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_all_epoch_rejects_prior_sessions_at_the_edge() {
    let upstream = spawn_upstream().await;
    let (app, revocation) = build_gateway(upstream).await;
    let user = user();
    let minted = mint(&user);

    revocation
        .revoke_all_for_user(&user.id, Utc::now() + chrono::Duration::seconds(1))
        .await
        .unwrap();

    let response = app
        .oneshot(request("/api/v1/profile/me", Some(&minted.token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unrouted_path_is_not_found() {
    let upstream = spawn_upstream().await;
    let (app, _) = build_gateway(upstream).await;
    let minted = mint(&user());

    let response = app
        .oneshot(request("/internal/metrics", Some(&minted.token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
