// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared request policy for third-party APIs.
//!
//! Every attempt is bounded by the client timeout. A transport failure or a
//! 5xx response is retried exactly once; any 4xx is final.

use crate::error::AppError;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// First attempt plus one retry.
pub const MAX_ATTEMPTS: u32 = 2;

/// Build an HTTP client with a per-request timeout.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {e}")))
}

/// Send a request built by `make`, retrying once on transient failure.
pub async fn send<F>(service: &'static str, make: F) -> Result<reqwest::Response, AppError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let response = send_unchecked(service, make).await?;
    check_status(service, response).await
}

/// Like [`send`], but hands back any final response without checking its
/// status. Transport failures are still errors.
pub async fn send_unchecked<F>(
    service: &'static str,
    make: F,
) -> Result<reqwest::Response, AppError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut attempt = 1;
    loop {
        let outcome = make().send().await;
        let retryable = match &outcome {
            Ok(response) => response.status().is_server_error(),
            Err(_) => true,
        };

        if !retryable || attempt >= MAX_ATTEMPTS {
            return outcome
                .map_err(|e| AppError::Upstream(format!("{service} request failed: {e}")));
        }

        match &outcome {
            Ok(response) => {
                tracing::warn!(service, status = %response.status(), attempt, "Retrying upstream request")
            }
            Err(e) => tracing::warn!(service, error = %e, attempt, "Retrying upstream request"),
        }
        attempt += 1;
    }
}

/// Like [`send`], decoding a JSON body.
pub async fn send_json<T, F>(service: &'static str, make: F) -> Result<T, AppError>
where
    T: DeserializeOwned,
    F: Fn() -> reqwest::RequestBuilder,
{
    decode_json(service, send(service, make).await?).await
}

/// Decode a response body as JSON.
pub async fn decode_json<T: DeserializeOwned>(
    service: &'static str,
    response: reqwest::Response,
) -> Result<T, AppError> {
    response
        .json::<T>()
        .await
        .map_err(|e| AppError::Upstream(format!("{service} returned malformed JSON: {e}")))
}

/// Turn any non-2xx response into `AppError::Upstream`.
pub async fn check_status(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    if status.as_u16() == 429 {
        tracing::warn!(service, "Upstream rate limit hit (429)");
    }
    Err(AppError::Upstream(format!(
        "{service} returned {status}: {}",
        body.chars().take(200).collect::<String>()
    )))
}
