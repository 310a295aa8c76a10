// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{FoodItem, ProfileView, RecipePage};
use crate::routes::auth::json_body;
use crate::services::nutrition::{Bmi, DailyTargets, MacroSplit};
use crate::services::profile::{self, ProfileUpdate};
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::{get, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Highest page accepted by recipe search.
const MAX_RECIPE_PAGE: u32 = 100;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/user/update", put(update_user))
        .route("/api/user/targets", get(get_targets))
        .route("/api/foods/search", get(search_foods))
        .route("/api/recipes/search", get(search_recipes))
}

// ─── User Profile ────────────────────────────────────────────

#[derive(Serialize)]
pub struct UpdateUserResponse {
    pub message: String,
    pub user: ProfileView,
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: std::result::Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Json<UpdateUserResponse>> {
    let update = json_body(body)?;
    let profile = profile::update_profile(&state.store, &user.user_id, update).await?;

    Ok(Json(UpdateUserResponse {
        message: "Profile updated successfully".to_string(),
        user: profile,
    }))
}

/// Targets derived from the stored profile.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetsResponse {
    pub bmi: f64,
    pub bmi_category: String,
    pub bmr: f64,
    pub tdee: f64,
    pub macros: MacroSplit,
}

impl TargetsResponse {
    fn new(bmi: Bmi, daily: DailyTargets) -> Self {
        Self {
            bmi: bmi.value,
            bmi_category: bmi.category.label().to_string(),
            bmr: daily.bmr,
            tdee: daily.tdee,
            macros: daily.macros,
        }
    }
}

async fn get_targets(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<TargetsResponse>> {
    let stored = state
        .store
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    let targets = profile::profile_targets(&stored)?;
    Ok(Json(TargetsResponse::new(targets.bmi, targets.daily)))
}

// ─── Search ──────────────────────────────────────────────────

/// Unwrap query parameters, reporting a malformed query string as a
/// validation error.
fn query_params<T>(params: std::result::Result<Query<T>, QueryRejection>) -> Result<T> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

#[derive(Deserialize)]
struct FoodSearchQuery {
    #[serde(default)]
    query: String,
}

#[derive(Serialize)]
pub struct FoodSearchResponse {
    pub foods: Vec<FoodItem>,
}

async fn search_foods(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Query<FoodSearchQuery>, QueryRejection>,
) -> Result<Json<FoodSearchResponse>> {
    let params = query_params(params)?;
    let foods = state.nutritionix.search_foods(&params.query).await?;
    Ok(Json(FoodSearchResponse { foods }))
}

#[derive(Deserialize)]
struct RecipeSearchQuery {
    #[serde(default)]
    query: String,
    #[serde(default = "default_page")]
    page: u32,
}

fn default_page() -> u32 {
    1
}

async fn search_recipes(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Query<RecipeSearchQuery>, QueryRejection>,
) -> Result<Json<RecipePage>> {
    let params = query_params(params)?;
    if params.page > MAX_RECIPE_PAGE {
        return Err(AppError::Validation(format!(
            "Page must be at most {MAX_RECIPE_PAGE}"
        )));
    }

    let page = state
        .spoonacular
        .search_recipes(&params.query, params.page)
        .await?;
    Ok(Json(page))
}
