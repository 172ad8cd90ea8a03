//! Auth handlers — register, login, refresh, logout, logout-all.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use validator::Validate;

use bazar_auth::credentials;
use bazar_auth::orchestrator::{LoginInput, RegisterInput};
use bazar_core::error::AppError;

use crate::dto::request::{LoginRequest, LogoutRequest, RefreshRequest, RegisterRequest};
use crate::dto::response::{LoginResponse, MessageResponse, RefreshResponse, RegisterResponse};
use crate::state::AppState;

/// POST /api/v1/auth/register
///
/// Creates the account, auto-logs in, and sets the auth cookies. Mobile
/// clients take the tokens from the body; browsers rely on the cookies.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    validate(&req)?;

    let session = state
        .auth_service
        .register(RegisterInput {
            email: normalize(req.email),
            phone: normalize(req.phone),
            password: req.password,
            tenant_id: req.tenant_id,
            role: req.role,
        })
        .await?;

    let body = RegisterResponse {
        token: session.access_token.clone(),
        refresh_token: session.refresh_token.clone(),
        id: session.user_id,
        role: session.roles.clone(),
        tenant_id: session.tenant_id,
    };

    let mut response = Json(body).into_response();
    state.cookies.set_auth_cookies(
        response.headers_mut(),
        &session.access_token,
        &session.refresh_token,
        state.auth_service.access_ttl_seconds(),
        state.auth_service.refresh_ttl_seconds(),
    );
    Ok(response)
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, AppError> {
    validate(&req)?;

    let session = state
        .auth_service
        .login(LoginInput {
            email: normalize(req.email),
            phone: normalize(req.phone),
            password: req.password,
        })
        .await?;

    let body = LoginResponse {
        access_token: session.access_token.clone(),
        refresh_token: session.refresh_token.clone(),
        expires_in: session.expires_in,
        id: session.user_id,
        role: session.roles.clone(),
        tenant_id: session.tenant_id,
    };

    let mut response = Json(body).into_response();
    state.cookies.set_auth_cookies(
        response.headers_mut(),
        &session.access_token,
        &session.refresh_token,
        state.auth_service.access_ttl_seconds(),
        state.auth_service.refresh_ttl_seconds(),
    );
    Ok(response)
}

/// POST /api/v1/auth/refresh
///
/// Public: the access token is usually expired by the time a client
/// refreshes. When an Authorization header is present anyway, the
/// orchestrator cross-checks it against the refresh token's user.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RefreshRequest>,
) -> Result<Response, AppError> {
    let access_token = credentials::bearer_token(&headers).map(str::to_string);

    let refreshed = state
        .auth_service
        .refresh(&req.refresh_token, access_token.as_deref())
        .await?;

    let body = RefreshResponse {
        access_token: refreshed.access_token.clone(),
        expires_in: refreshed.expires_in,
    };

    let mut response = Json(body).into_response();
    state.cookies.set_access_cookie(
        response.headers_mut(),
        &refreshed.access_token,
        refreshed.expires_in,
    );
    Ok(response)
}

/// POST /api/v1/auth/logout
///
/// Authenticated: requires the access token in the Authorization header.
/// The refresh token comes from the body (mobile) or the cookie (web);
/// the body wins.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let access_token = credentials::bearer_token(&headers)
        .ok_or_else(|| AppError::bad_credentials("Access token is required for logout"))?
        .to_string();

    // Web clients send no body at all; mobile clients send JSON. Either
    // way the cookie is the fallback.
    let parsed_body: Option<LogoutRequest> = if body.is_empty() {
        None
    } else {
        serde_json::from_slice(&body).ok()
    };
    let body_token = parsed_body.as_ref().and_then(|b| b.refresh_token.as_deref());
    let refresh_token = credentials::resolve_refresh_token(body_token, &headers)
        .ok_or_else(|| {
            AppError::bad_credentials("Refresh token is required (body or cookie)")
        })?;

    state.auth_service.logout(&refresh_token, &access_token).await?;

    let mut response = Json(MessageResponse {
        message: "Logged out successfully".to_string(),
    })
    .into_response();
    state.cookies.clear_auth_cookies(response.headers_mut());
    Ok(response)
}

/// POST /api/v1/auth/logout-all
///
/// Revokes every session of the calling user and clears the cookies on
/// this device; other devices fail on their next request.
pub async fn logout_all(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let access_token = credentials::bearer_token(&headers)
        .ok_or_else(|| AppError::bad_credentials("Access token is required"))?
        .to_string();

    state.auth_service.logout_all(&access_token).await?;

    let mut response = Json(MessageResponse {
        message: "Logged out from all devices".to_string(),
    })
    .into_response();
    state.cookies.clear_auth_cookies(response.headers_mut());
    Ok(response)
}

/// Run DTO validation, mapping failures to a field-listing error.
fn validate<T: Validate>(req: &T) -> Result<(), AppError> {
    req.validate().map_err(|e| {
        let fields: Vec<String> = e.field_errors().keys().map(|k| k.to_string()).collect();
        AppError::validation_fields("Invalid request fields", fields)
    })
}

/// Treat blank identifiers as absent.
fn normalize(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim().to_string();
        if trimmed.is_empty() { None } else { Some(trimmed) }
    })
}
