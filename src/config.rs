// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use crate::services::password::MIN_PRODUCTION_COST;
use std::env;
use std::time::Duration;

/// Minimum length of the session signing secret.
pub const MIN_SESSION_SECRET_LEN: usize = 32;

/// Where user records live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Cloud Firestore in the given GCP project.
    Firestore { project_id: String },
    /// Process-local store, lost on restart. Development and tests only.
    Memory,
}

impl StoreBackend {
    /// Parse a `DATABASE_URL` value (`firestore://<project>` or `memory://`).
    pub fn parse(url: &str) -> Result<Self, ConfigError> {
        let url = url.trim();
        if let Some(project_id) = url.strip_prefix("firestore://") {
            let project_id = project_id.trim_end_matches('/');
            if project_id.is_empty() {
                return Err(ConfigError::Invalid(
                    "DATABASE_URL",
                    "firestore:// URL needs a project id".to_string(),
                ));
            }
            return Ok(Self::Firestore {
                project_id: project_id.to_string(),
            });
        }
        if url == "memory://" || url == "memory" {
            return Ok(Self::Memory);
        }
        Err(ConfigError::Invalid(
            "DATABASE_URL",
            format!("unsupported scheme in {url:?}"),
        ))
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Externally visible origin, e.g. `https://nutrition.example.com`
    pub public_url: String,
    /// Directory holding the built UI
    pub static_dir: String,
    /// Server port
    pub port: u16,
    /// User store backend
    pub store: StoreBackend,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    /// Per-attempt timeout for third-party API calls
    pub upstream_timeout: Duration,
    /// Nutritionix application ID
    pub nutritionix_app_id: String,

    // --- Secrets ---
    /// HS256 signing key for session tokens (raw bytes)
    pub session_secret: Vec<u8>,
    /// Nutritionix application key
    pub nutritionix_api_key: String,
    /// Spoonacular API key
    pub spoonacular_api_key: String,
}

impl Config {
    /// Deterministic configuration for tests.
    pub fn test_default() -> Self {
        Self {
            public_url: "http://localhost:3000".to_string(),
            static_dir: "web/dist".to_string(),
            port: 3000,
            store: StoreBackend::Memory,
            bcrypt_cost: 4,
            upstream_timeout: Duration::from_secs(2),
            nutritionix_app_id: "test_app_id".to_string(),
            session_secret: b"test_session_secret_32_bytes_min!".to_vec(),
            nutritionix_api_key: "test_app_key".to_string(),
            spoonacular_api_key: "test_recipe_key".to_string(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let session_secret = required("SESSION_SECRET")?.into_bytes();
        if session_secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(ConfigError::Invalid(
                "SESSION_SECRET",
                format!("must be at least {MIN_SESSION_SECRET_LEN} bytes"),
            ));
        }

        let bcrypt_cost = match env::var("BCRYPT_COST") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|cost| (MIN_PRODUCTION_COST..=31).contains(cost))
                .ok_or_else(|| {
                    ConfigError::Invalid(
                        "BCRYPT_COST",
                        format!("must be an integer in {MIN_PRODUCTION_COST}..=31"),
                    )
                })?,
            Err(_) => MIN_PRODUCTION_COST,
        };

        Ok(Self {
            public_url: env::var("PUBLIC_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "web/dist".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            store: StoreBackend::parse(
                &env::var("DATABASE_URL").unwrap_or_else(|_| "memory://".to_string()),
            )?,
            bcrypt_cost,
            upstream_timeout: Duration::from_secs(
                env::var("UPSTREAM_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            ),
            nutritionix_app_id: required("NUTRITIONIX_APP_ID")?,
            session_secret,
            nutritionix_api_key: required("NUTRITIONIX_API_KEY")?,
            spoonacular_api_key: required("SPOONACULAR_API_KEY")?,
        })
    }

    /// Cookies are marked `Secure` only when served over TLS.
    pub fn secure_cookies(&self) -> bool {
        self.public_url.starts_with("https://")
    }

    /// Session cookie name; browsers only accept the `__Secure-` prefix over TLS.
    pub fn session_cookie_name(&self) -> &'static str {
        if self.secure_cookies() {
            crate::middleware::auth::SECURE_SESSION_COOKIE
        } else {
            crate::middleware::auth::SESSION_COOKIE
        }
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .map(|v| v.trim().to_string())
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
