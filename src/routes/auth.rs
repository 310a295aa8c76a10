// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential authentication routes.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::{extract_token, SESSION_TTL_SECS};
use crate::models::{ProfileView, PublicUser};
use crate::services::auth::SignUpRequest;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/signup", post(sign_up))
        .route("/api/auth/signin", post(sign_in))
        .route("/api/auth/signout", post(sign_out))
        .route("/api/auth/session", get(session))
}

/// Map a body rejection to a validation error.
pub(crate) fn json_body<T>(body: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

#[derive(Serialize)]
pub struct SignUpResponse {
    pub message: String,
    pub user: PublicUser,
}

async fn sign_up(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SignUpResponse>)> {
    let request = json_body(body)?;
    let user = state.auth.sign_up(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            message: "User created successfully".to_string(),
            user,
        }),
    ))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    callback_url: Option<String>,
}

#[derive(Serialize)]
pub struct SignInResponse {
    pub url: String,
}

/// Check credentials and set the session cookie.
async fn sign_in(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    body: std::result::Result<Json<SignInRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<SignInResponse>)> {
    let request = json_body(body)?;
    let user = state.auth.authorize(&request.email, &request.password).await?;
    let issued = state.auth.issue_session(&user)?;

    let url = sanitize_callback(&state.config.public_url, request.callback_url.as_deref());
    let cookie = session_cookie(&state, issued.token, SESSION_TTL_SECS as i64);

    Ok((jar.add(cookie), Json(SignInResponse { url })))
}

/// Expire the session cookie.
async fn sign_out(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, StatusCode) {
    let cookie = session_cookie(&state, String::new(), 0);
    (jar.add(cookie), StatusCode::NO_CONTENT)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Enrichment {
    Complete,
    Degraded,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub user: ProfileView,
    pub expires: String,
    pub enrichment: Enrichment,
}

/// Current session, joined with the stored profile when available.
async fn session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<Json<SessionResponse>> {
    let token = extract_token(&jar, &headers).ok_or(AppError::Unauthorized)?;
    let session = state.auth.read_session(&token).await?;

    let expires = i64::try_from(session.claims.exp)
        .ok()
        .and_then(|exp| chrono::DateTime::from_timestamp(exp, 0))
        .map(format_utc_rfc3339)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Token expiry out of range")))?;
    let enrichment = if session.is_degraded() {
        Enrichment::Degraded
    } else {
        Enrichment::Complete
    };

    Ok(Json(SessionResponse {
        user: session.user(),
        expires,
        enrichment,
    }))
}

fn session_cookie(state: &AppState, value: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((state.config.session_cookie_name(), value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.secure_cookies())
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

/// Accept a post-sign-in redirect only if it stays on this site.
///
/// Root-relative paths and absolute URLs on `public_url` pass through;
/// anything else becomes `/`.
pub fn sanitize_callback(public_url: &str, callback: Option<&str>) -> String {
    let Some(callback) = callback.map(str::trim).filter(|c| !c.is_empty()) else {
        return "/".to_string();
    };

    if callback.starts_with('/') && !callback.starts_with("//") && !callback.starts_with("/\\") {
        return callback.to_string();
    }

    let origin = public_url.trim_end_matches('/');
    let same_origin = callback
        .strip_prefix(origin)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(['/', '?', '#']));
    if same_origin {
        return callback.to_string();
    }

    tracing::warn!(callback_url = %callback, "Rejected off-site callback URL");
    "/".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://nutrition.example.com";

    #[test]
    fn test_relative_callback_kept() {
        assert_eq!(
            sanitize_callback(ORIGIN, Some("/food-tracker?day=1")),
            "/food-tracker?day=1"
        );
    }

    #[test]
    fn test_same_origin_callback_kept() {
        assert_eq!(
            sanitize_callback(ORIGIN, Some("https://nutrition.example.com/profile")),
            "https://nutrition.example.com/profile"
        );
        assert_eq!(sanitize_callback(ORIGIN, Some(ORIGIN)), ORIGIN);
    }

    #[test]
    fn test_foreign_callbacks_rejected() {
        for callback in [
            "https://evil.example.com/profile",
            "https://nutrition.example.com.evil.com/",
            "//evil.example.com",
            "/\\evil.example.com",
            "javascript:alert(1)",
            "profile",
        ] {
            assert_eq!(sanitize_callback(ORIGIN, Some(callback)), "/", "{callback}");
        }
    }

    #[test]
    fn test_missing_callback_defaults_to_root() {
        assert_eq!(sanitize_callback(ORIGIN, None), "/");
        assert_eq!(sanitize_callback(ORIGIN, Some("  ")), "/");
    }
}
