// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spoonacular API client for recipe search.

use crate::error::AppError;
use crate::models::{Recipe, RecipePage};
use crate::services::upstream;
use serde::Deserialize;
use std::time::Duration;

const SERVICE: &str = "spoonacular";

/// Recipes per page.
pub const PAGE_SIZE: u32 = 12;

/// Spoonacular API client.
#[derive(Clone)]
pub struct SpoonacularClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComplexSearchResponse {
    #[serde(default)]
    results: Vec<Recipe>,
    #[serde(default)]
    total_results: u64,
}

impl SpoonacularClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, AppError> {
        Ok(Self {
            http: upstream::http_client(timeout)?,
            base_url: "https://api.spoonacular.com".to_string(),
            api_key,
        })
    }

    /// Point the client at a different host (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Search recipes; `page` is 1-indexed.
    pub async fn search_recipes(&self, query: &str, page: u32) -> Result<RecipePage, AppError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::Validation("Search query is required".to_string()));
        }
        if page == 0 {
            return Err(AppError::Validation("Page must be at least 1".to_string()));
        }

        let url = format!("{}/recipes/complexSearch", self.base_url);
        let offset = (page - 1).saturating_mul(PAGE_SIZE).to_string();
        let number = PAGE_SIZE.to_string();

        let response: ComplexSearchResponse = upstream::send_json(SERVICE, || {
            self.http.get(&url).query(&[
                ("apiKey", self.api_key.as_str()),
                ("query", query),
                ("offset", offset.as_str()),
                ("number", number.as_str()),
                ("addRecipeInformation", "true"),
                ("instructionsRequired", "true"),
                ("fillIngredients", "true"),
            ])
        })
        .await?;

        let has_more = response.total_results > u64::from(page) * u64::from(PAGE_SIZE);
        tracing::debug!(
            query,
            page,
            total = response.total_results,
            "Recipe search complete"
        );

        Ok(RecipePage {
            results: response.results,
            total_results: response.total_results,
            has_more,
        })
    }
}
