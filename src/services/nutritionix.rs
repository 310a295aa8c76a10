// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Nutritionix API client for food search.
//!
//! A search runs the instant endpoint, resolves the first few common foods
//! to full nutrients through the natural-language endpoint, and maps the
//! first few branded foods directly.

use crate::error::AppError;
use crate::models::FoodItem;
use crate::services::upstream;
use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SERVICE: &str = "nutritionix";

/// Common and branded results taken from each instant search.
pub const RESULTS_PER_KIND: usize = 5;

/// Nutritionix API client.
#[derive(Clone)]
pub struct NutritionixClient {
    http: reqwest::Client,
    base_url: String,
    app_id: String,
    app_key: String,
}

#[derive(Debug, Deserialize)]
struct InstantSearchResponse {
    #[serde(default)]
    common: Vec<CommonMatch>,
    #[serde(default)]
    branded: Vec<NutritionixFood>,
}

#[derive(Debug, Deserialize)]
struct CommonMatch {
    food_name: String,
}

#[derive(Debug, Serialize)]
struct NaturalQuery<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct NaturalNutrientsResponse {
    #[serde(default)]
    foods: Vec<NutritionixFood>,
}

/// Food as Nutritionix reports it. Branded instant results may omit macros.
#[derive(Debug, Deserialize)]
struct NutritionixFood {
    food_name: String,
    #[serde(default)]
    serving_qty: Option<f64>,
    #[serde(default)]
    serving_unit: Option<String>,
    #[serde(default)]
    nf_calories: Option<f64>,
    #[serde(default)]
    nf_protein: Option<f64>,
    #[serde(default)]
    nf_total_carbohydrate: Option<f64>,
    #[serde(default)]
    nf_total_fat: Option<f64>,
    #[serde(default)]
    brand_name: Option<String>,
}

impl From<NutritionixFood> for FoodItem {
    fn from(food: NutritionixFood) -> Self {
        FoodItem {
            name: food.food_name,
            serving_qty: food.serving_qty.unwrap_or(1.0),
            serving_unit: food.serving_unit.unwrap_or_else(|| "serving".to_string()),
            calories: food.nf_calories.unwrap_or(0.0),
            protein: food.nf_protein.unwrap_or(0.0),
            carbs: food.nf_total_carbohydrate.unwrap_or(0.0),
            fat: food.nf_total_fat.unwrap_or(0.0),
            brand_name: food.brand_name,
        }
    }
}

impl NutritionixClient {
    pub fn new(app_id: String, app_key: String, timeout: Duration) -> Result<Self, AppError> {
        Ok(Self {
            http: upstream::http_client(timeout)?,
            base_url: "https://trackapi.nutritionix.com".to_string(),
            app_id,
            app_key,
        })
    }

    /// Point the client at a different host (tests, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Search foods, returning resolved common foods followed by branded foods.
    pub async fn search_foods(&self, query: &str) -> Result<Vec<FoodItem>, AppError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::Validation("Search query is required".to_string()));
        }

        let instant = self.instant_search(query).await?;

        let common = try_join_all(
            instant
                .common
                .iter()
                .take(RESULTS_PER_KIND)
                .map(|item| self.natural_nutrients(&item.food_name)),
        )
        .await?;

        let branded = instant
            .branded
            .into_iter()
            .take(RESULTS_PER_KIND)
            .map(FoodItem::from);

        let foods: Vec<FoodItem> = common.into_iter().flatten().chain(branded).collect();

        tracing::debug!(query, results = foods.len(), "Food search complete");
        Ok(foods)
    }

    async fn instant_search(&self, query: &str) -> Result<InstantSearchResponse, AppError> {
        let url = format!("{}/v2/search/instant", self.base_url);
        upstream::send_json(SERVICE, || {
            self.http
                .get(&url)
                .header("x-app-id", &self.app_id)
                .header("x-app-key", &self.app_key)
                .query(&[("query", query)])
        })
        .await
    }

    /// Full nutrients for the best match of a free-text food name.
    ///
    /// Nutritionix answers 404 when it cannot match the name; that food is
    /// skipped rather than failing the whole search.
    async fn natural_nutrients(&self, food_name: &str) -> Result<Option<FoodItem>, AppError> {
        let url = format!("{}/v2/natural/nutrients", self.base_url);
        let response = upstream::send_unchecked(SERVICE, || {
            self.http
                .post(&url)
                .header("x-app-id", &self.app_id)
                .header("x-app-key", &self.app_key)
                .json(&NaturalQuery { query: food_name })
        })
        .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!(food_name, "No nutrient match, skipping");
            return Ok(None);
        }

        let response = upstream::check_status(SERVICE, response).await?;
        let nutrients: NaturalNutrientsResponse = upstream::decode_json(SERVICE, response).await?;
        Ok(nutrients.foods.into_iter().next().map(FoodItem::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> NutritionixClient {
        NutritionixClient::new("id".into(), "key".into(), Duration::from_secs(2))
            .unwrap()
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_search_combines_common_and_branded() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/search/instant"))
            .and(query_param("query", "apple"))
            .and(header("x-app-id", "id"))
            .and(header("x-app-key", "key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "common": [{"food_name": "apple"}],
                "branded": [{
                    "food_name": "Apple Chips",
                    "serving_qty": 1,
                    "serving_unit": "bag",
                    "nf_calories": 140,
                    "brand_name": "Crunchy"
                }]
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v2/natural/nutrients"))
            .and(body_json(json!({"query": "apple"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "foods": [{
                    "food_name": "apple",
                    "serving_qty": 1,
                    "serving_unit": "medium",
                    "nf_calories": 94.6,
                    "nf_protein": 0.5,
                    "nf_total_carbohydrate": 25.1,
                    "nf_total_fat": 0.3
                }]
            })))
            .mount(&server)
            .await;

        let foods = client(&server).search_foods("apple").await.unwrap();

        assert_eq!(foods.len(), 2);
        assert_eq!(foods[0].name, "apple");
        assert_eq!(foods[0].carbs, 25.1);
        assert_eq!(foods[0].brand_name, None);
        assert_eq!(foods[1].name, "Apple Chips");
        assert_eq!(foods[1].protein, 0.0);
        assert_eq!(foods[1].brand_name.as_deref(), Some("Crunchy"));
    }

    #[tokio::test]
    async fn test_search_caps_results_and_drops_unresolved() {
        let server = MockServer::start().await;

        let common: Vec<_> = (0..8).map(|i| json!({"food_name": format!("food{i}")})).collect();
        let branded: Vec<_> = (0..8)
            .map(|i| json!({"food_name": format!("brand{i}"), "nf_calories": 10}))
            .collect();
        Mock::given(method("GET"))
            .and(path("/v2/search/instant"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"common": common, "branded": branded})),
            )
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v2/natural/nutrients"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"foods": []})))
            .expect(5)
            .mount(&server)
            .await;

        let foods = client(&server).search_foods("x").await.unwrap();

        assert_eq!(foods.len(), 5);
        assert!(foods.iter().all(|f| f.name.starts_with("brand")));
    }

    #[tokio::test]
    async fn test_empty_query_rejected_without_request() {
        let server = MockServer::start().await;
        let err = client(&server).search_foods("   ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_upstream_failure_surfaces() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let err = client(&server).search_foods("apple").await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_unmatched_common_food_is_skipped() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/search/instant"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "common": [{"food_name": "apple"}, {"food_name": "weird thing"}],
                "branded": [{"food_name": "Apple Chips", "nf_calories": 140}]
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v2/natural/nutrients"))
            .and(body_json(json!({"query": "apple"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "foods": [{"food_name": "apple", "nf_calories": 94.6}]
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v2/natural/nutrients"))
            .and(body_json(json!({"query": "weird thing"})))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "We couldn't match any of your foods"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let foods = client(&server).search_foods("apple").await.unwrap();

        let names: Vec<_> = foods.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["apple", "Apple Chips"]);
    }

    #[tokio::test]
    async fn test_nutrients_server_error_still_fails() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/search/instant"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "common": [{"food_name": "apple"}],
                "branded": []
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v2/natural/nutrients"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let err = client(&server).search_foods("apple").await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }
}
