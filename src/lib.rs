// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Nutrition Tracker: calorie, macro and BMI tracking
//!
//! This crate provides the backend for credential sign-in, profile-derived
//! nutrition targets, and food and recipe search backed by third-party APIs.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod stores;
pub mod time_utils;

use config::Config;
use db::UserStore;
use services::{AuthService, NutritionixClient, PasswordHasher, SpoonacularClient};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: UserStore,
    pub auth: AuthService,
    pub nutritionix: NutritionixClient,
    pub spoonacular: SpoonacularClient,
}

impl AppState {
    /// Wire services from configuration over an already connected store.
    pub fn new(config: Config, store: UserStore) -> error::Result<Self> {
        let auth = AuthService::new(
            store.clone(),
            PasswordHasher::new(config.bcrypt_cost),
            config.session_secret.clone(),
        );
        let nutritionix = NutritionixClient::new(
            config.nutritionix_app_id.clone(),
            config.nutritionix_api_key.clone(),
            config.upstream_timeout,
        )?;
        let spoonacular =
            SpoonacularClient::new(config.spoonacular_api_key.clone(), config.upstream_timeout)?;

        Ok(Self {
            config,
            store,
            auth,
            nutritionix,
            spoonacular,
        })
    }
}
