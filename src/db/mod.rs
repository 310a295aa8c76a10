// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User store (Firestore or in-process).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::config::StoreBackend;
use crate::error::AppError;
use crate::models::User;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Email reservations (keyed by normalized email)
    pub const USER_EMAILS: &str = "user_emails";
}

/// Persistent user records, keyed by ID with a unique email index.
#[derive(Clone)]
pub enum UserStore {
    Firestore(FirestoreDb),
    Memory(MemoryDb),
}

impl UserStore {
    /// Connect to the configured backend.
    pub async fn connect(backend: &StoreBackend) -> Result<Self, AppError> {
        match backend {
            StoreBackend::Firestore { project_id } => {
                Ok(Self::Firestore(FirestoreDb::new(project_id).await?))
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory user store; accounts are lost on restart");
                Ok(Self::Memory(MemoryDb::new()))
            }
        }
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        match self {
            Self::Firestore(db) => db.get_user(user_id).await,
            Self::Memory(db) => Ok(db.get_user(user_id)),
        }
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        match self {
            Self::Firestore(db) => db.get_user_by_email(email).await,
            Self::Memory(db) => Ok(db.get_user_by_email(email)),
        }
    }

    /// Insert a new user. A taken email yields `AppError::Conflict`.
    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        match self {
            Self::Firestore(db) => db.create_user(user).await,
            Self::Memory(db) => db.create_user(user),
        }
    }

    pub async fn update_user(&self, user: &User) -> Result<(), AppError> {
        match self {
            Self::Firestore(db) => db.update_user(user).await,
            Self::Memory(db) => db.update_user(user),
        }
    }
}
