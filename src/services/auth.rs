// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential sign-up, sign-in and session reads.
//!
//! A session read is two steps: verify the token (failure means the caller
//! is unauthenticated), then try to join the stored profile. A store failure
//! in the second step degrades the session instead of invalidating it.

use crate::db::UserStore;
use crate::error::AppError;
use crate::middleware::auth::{create_jwt, verify_jwt, Claims};
use crate::models::user::normalize_email;
use crate::models::{ProfileView, PublicUser, User};
use crate::services::password::PasswordHasher;
use crate::time_utils::now_rfc3339;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::OnceCell;
use validator::Validate;

/// Sign-up request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignUpRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl SignUpRequest {
    fn has_blank_field(&self) -> bool {
        [&self.name, &self.email, &self.password]
            .iter()
            .any(|field| field.trim().is_empty())
    }
}

/// A freshly signed session token.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub claims: Claims,
}

/// What a session read could attach to the verified claims.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionView {
    /// Token claims joined with the stored profile.
    Enriched(ProfileView),
    /// Profile lookup failed; only the token claims are available.
    Degraded { id: String, email: String },
}

/// A verified session.
#[derive(Debug, Clone)]
pub struct Session {
    pub claims: Claims,
    pub view: SessionView,
}

impl Session {
    pub fn is_degraded(&self) -> bool {
        matches!(self.view, SessionView::Degraded { .. })
    }

    /// Outward-facing user, with profile fields empty when degraded.
    pub fn user(&self) -> ProfileView {
        match &self.view {
            SessionView::Enriched(profile) => profile.clone(),
            SessionView::Degraded { id, email } => ProfileView {
                id: id.clone(),
                name: None,
                email: email.clone(),
                weight: None,
                height: None,
                age: None,
                gender: None,
                activity_level: None,
            },
        }
    }
}

/// Authentication engine.
#[derive(Clone)]
pub struct AuthService {
    store: UserStore,
    hasher: PasswordHasher,
    signing_key: Vec<u8>,
    /// Hash verified against when there is no real one, at the same cost.
    dummy_hash: Arc<OnceCell<String>>,
}

impl AuthService {
    pub fn new(store: UserStore, hasher: PasswordHasher, signing_key: Vec<u8>) -> Self {
        Self {
            store,
            hasher,
            signing_key,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Register a new user.
    ///
    /// Blank fields are rejected before the store is touched. The store's
    /// email claim is the authoritative duplicate check.
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<PublicUser, AppError> {
        if request.has_blank_field() {
            return Err(AppError::Validation(
                "Name, email, and password are required".to_string(),
            ));
        }

        let email = normalize_email(&request.email);
        let request = SignUpRequest {
            email: email.clone(),
            ..request
        };
        request.validate().map_err(|e| {
            AppError::Validation(
                e.field_errors()
                    .values()
                    .flat_map(|errs| errs.iter())
                    .filter_map(|err| err.message.as_ref().map(|m| m.to_string()))
                    .next()
                    .unwrap_or_else(|| "Invalid sign-up request".to_string()),
            )
        })?;

        if self.store.get_user_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let password_hash = self.hasher.hash(&request.password).await?;
        let now = now_rfc3339();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email,
            name: request.name.trim().to_string(),
            password_hash: Some(password_hash),
            weight: None,
            height: None,
            age: None,
            gender: None,
            activity_level: None,
            created_at: now.clone(),
            updated_at: now,
        };

        self.store.create_user(&user).await?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(PublicUser::from(&user))
    }

    /// Check an email/password pair.
    ///
    /// Unknown email, missing stored password, and wrong password all return
    /// `AppError::InvalidCredentials`.
    pub async fn authorize(&self, email: &str, password: &str) -> Result<PublicUser, AppError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::MissingCredentials);
        }

        let Some(user) = self.store.get_user_by_email(&normalize_email(email)).await? else {
            self.burn_verify(password).await?;
            tracing::info!("Sign-in rejected");
            return Err(AppError::InvalidCredentials);
        };

        let Some(hash) = user.password_hash.as_deref() else {
            self.burn_verify(password).await?;
            tracing::info!(user_id = %user.id, "Sign-in rejected");
            return Err(AppError::InvalidCredentials);
        };

        if !self.hasher.verify(password, hash).await? {
            tracing::info!(user_id = %user.id, "Sign-in rejected");
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "User signed in");
        Ok(PublicUser::from(&user))
    }

    /// Spend the same bcrypt work as a real check, so rejections without a
    /// stored hash take as long as a wrong password.
    async fn burn_verify(&self, password: &str) -> Result<(), AppError> {
        let hash = self
            .dummy_hash
            .get_or_try_init(|| self.hasher.hash("nutrition-tracker-dummy-password"))
            .await?;
        self.hasher.verify(password, hash).await?;
        Ok(())
    }

    /// Sign a 30-day session token for an authorized user.
    pub fn issue_session(&self, user: &PublicUser) -> Result<IssuedSession, AppError> {
        let token = create_jwt(&user.id, &user.email, &self.signing_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;
        let claims = verify_jwt(&token, &self.signing_key)?;
        Ok(IssuedSession { token, claims })
    }

    /// Verify a token and join the stored profile.
    pub async fn read_session(&self, token: &str) -> Result<Session, AppError> {
        let claims = verify_jwt(token, &self.signing_key)?;
        let view = self.enrich(&claims).await;
        Ok(Session { claims, view })
    }

    async fn enrich(&self, claims: &Claims) -> SessionView {
        let degraded = || SessionView::Degraded {
            id: claims.sub.clone(),
            email: claims.email.clone(),
        };

        match self.store.get_user(&claims.sub).await {
            Ok(Some(user)) => SessionView::Enriched(ProfileView::from(&user)),
            Ok(None) => {
                tracing::warn!(user_id = %claims.sub, "Session user not found in store");
                degraded()
            }
            Err(e) => {
                tracing::warn!(user_id = %claims.sub, error = %e, "Session enrichment failed");
                degraded()
            }
        }
    }
}
