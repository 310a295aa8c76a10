// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route guard for the UI pages.
//!
//! Requests to a guarded page either carry a valid, unexpired session token
//! or are redirected to sign-in with a `callbackUrl` pointing back at the
//! page. Only the token signature and expiry are checked; the user store is
//! not consulted.

use crate::config::Config;
use crate::middleware::auth::{extract_token, unix_now, verify_jwt_at, AuthUser, Claims};
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

pub const SIGN_IN_PATH: &str = "/auth/signin";

/// Page prefixes that require a session (sub-paths included).
pub const GUARDED_PREFIXES: [&str; 5] = [
    "/profile",
    "/food-tracker",
    "/recipe-finder",
    "/macro-tracker",
    "/bmi-calculator",
];

/// Outcome for a request to a guarded page.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardDecision {
    Authorized(Claims),
    /// Sign-in URL to send the browser to.
    Redirected(String),
}

/// Whether `path` is a guarded page or below one.
pub fn is_guarded(path: &str) -> bool {
    GUARDED_PREFIXES.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

/// Sign-in URL that returns the user to `path_and_query` afterwards.
pub fn sign_in_redirect(public_url: &str, path_and_query: &str) -> String {
    let callback = format!("{}{}", public_url.trim_end_matches('/'), path_and_query);
    format!(
        "{}?callbackUrl={}",
        SIGN_IN_PATH,
        urlencoding::encode(&callback)
    )
}

/// Decide a guarded request at time `now`.
pub fn check(
    config: &Config,
    path_and_query: &str,
    token: Option<&str>,
    now: u64,
) -> GuardDecision {
    match token.map(|t| verify_jwt_at(t, &config.session_secret, now)) {
        Some(Ok(claims)) => GuardDecision::Authorized(claims),
        _ => GuardDecision::Redirected(sign_in_redirect(&config.public_url, path_and_query)),
    }
}

/// Middleware applied in front of the UI assets.
pub async fn guard_pages(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    if !is_guarded(request.uri().path()) {
        return next.run(request).await;
    }

    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let token = extract_token(&jar, request.headers());

    match check(&state.config, &path_and_query, token.as_deref(), unix_now()) {
        GuardDecision::Authorized(claims) => {
            request.extensions_mut().insert(AuthUser::from(claims));
            next.run(request).await
        }
        GuardDecision::Redirected(location) => {
            tracing::debug!(path = %path_and_query, "Redirecting unauthenticated page request");
            Redirect::temporary(&location).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::create_jwt;

    #[test]
    fn test_guarded_paths() {
        for path in [
            "/profile",
            "/profile/edit",
            "/food-tracker",
            "/recipe-finder/123",
            "/macro-tracker",
            "/bmi-calculator/",
        ] {
            assert!(is_guarded(path), "{path} should be guarded");
        }
        for path in [
            "/",
            "/auth/signin",
            "/auth/signup",
            "/profiles",
            "/assets/app.js",
            "/favicon.ico",
        ] {
            assert!(!is_guarded(path), "{path} should not be guarded");
        }
    }

    #[test]
    fn test_redirect_carries_callback() {
        let config = Config::test_default();
        let decision = check(&config, "/food-tracker?meal=lunch", None, unix_now());

        assert_eq!(
            decision,
            GuardDecision::Redirected(
                "/auth/signin?callbackUrl=http%3A%2F%2Flocalhost%3A3000%2Ffood-tracker%3Fmeal%3Dlunch"
                    .to_string()
            )
        );
    }

    #[test]
    fn test_valid_token_authorized() {
        let config = Config::test_default();
        let token = create_jwt("u1", "a@example.com", &config.session_secret).unwrap();

        match check(&config, "/profile", Some(&token), unix_now()) {
            GuardDecision::Authorized(claims) => assert_eq!(claims.sub, "u1"),
            other => panic!("expected authorized, got {other:?}"),
        }
    }

    #[test]
    fn test_expired_token_redirected() {
        let config = Config::test_default();
        let token = create_jwt("u1", "a@example.com", &config.session_secret).unwrap();
        let after_expiry = unix_now() + crate::middleware::auth::SESSION_TTL_SECS + 1;

        assert!(matches!(
            check(&config, "/profile", Some(&token), after_expiry),
            GuardDecision::Redirected(_)
        ));
    }

    #[test]
    fn test_garbage_token_redirected() {
        let config = Config::test_default();
        assert!(matches!(
            check(&config, "/macro-tracker", Some("not.a.jwt"), unix_now()),
            GuardDecision::Redirected(_)
        ));
    }
}
