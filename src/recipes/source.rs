use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::{AreaRecord, CategoriesEnvelope, MealRecord, MealsEnvelope};
use super::model::{Category, Recipe};

/// Read-only recipe catalog. Failures never escape: they are logged and
/// surface as an empty list or `None`.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    async fn recipes_by_category(&self, category: &str) -> Vec<Recipe>;
    async fn recipe_by_id(&self, id: &str) -> Option<Recipe>;
    async fn categories(&self) -> Vec<Category>;
    async fn search(&self, query: &str) -> Vec<Recipe>;
    async fn random(&self) -> Option<Recipe>;
    async fn recipes_by_area(&self, area: &str) -> Vec<Recipe>;
    async fn areas(&self) -> Vec<String>;
}

/// Reqwest-backed client for the public MealDB JSON API.
#[derive(Clone)]
pub struct MealDbClient {
    client: Client,
    base_url: Url,
}

impl MealDbClient {
    pub fn new(base_url: Url, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("build recipe api client")?;
        Ok(Self { client, base_url })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> anyhow::Result<T> {
        let url = self
            .base_url
            .join(endpoint)
            .with_context(|| format!("join {endpoint}"))?;
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("GET {endpoint}"))?
            .error_for_status()
            .with_context(|| format!("GET {endpoint}"))?;
        let body = response
            .json::<T>()
            .await
            .with_context(|| format!("decode {endpoint}"))?;
        debug!(endpoint, "recipe api call ok");
        Ok(body)
    }

    async fn meals(&self, endpoint: &str, query: &[(&str, &str)]) -> Vec<MealRecord> {
        match self.fetch::<MealsEnvelope<MealRecord>>(endpoint, query).await {
            Ok(env) => env.into_vec(),
            Err(e) => {
                warn!(error = %format!("{e:#}"), endpoint, "recipe api call failed");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl RecipeSource for MealDbClient {
    async fn recipes_by_category(&self, category: &str) -> Vec<Recipe> {
        self.meals("filter.php", &[("c", category)])
            .await
            .into_iter()
            .map(|m| m.into_filtered(Some(category), None))
            .collect()
    }

    async fn recipe_by_id(&self, id: &str) -> Option<Recipe> {
        self.meals("lookup.php", &[("i", id)])
            .await
            .into_iter()
            .next()
            .map(MealRecord::into_detail)
    }

    async fn categories(&self) -> Vec<Category> {
        match self.fetch::<CategoriesEnvelope>("categories.php", &[]).await {
            Ok(env) => env
                .categories
                .unwrap_or_default()
                .into_iter()
                .map(Category::from)
                .collect(),
            Err(e) => {
                warn!(error = %format!("{e:#}"), "fetching categories failed");
                Vec::new()
            }
        }
    }

    async fn search(&self, query: &str) -> Vec<Recipe> {
        self.meals("search.php", &[("s", query)])
            .await
            .into_iter()
            .map(MealRecord::into_search_hit)
            .collect()
    }

    async fn random(&self) -> Option<Recipe> {
        self.meals("random.php", &[])
            .await
            .into_iter()
            .next()
            .map(MealRecord::into_detail)
    }

    async fn recipes_by_area(&self, area: &str) -> Vec<Recipe> {
        self.meals("filter.php", &[("a", area)])
            .await
            .into_iter()
            .map(|m| m.into_filtered(None, Some(area)))
            .collect()
    }

    async fn areas(&self) -> Vec<String> {
        match self
            .fetch::<MealsEnvelope<AreaRecord>>("list.php", &[("a", "list")])
            .await
        {
            Ok(env) => env.into_vec().into_iter().map(|a| a.str_area).collect(),
            Err(e) => {
                warn!(error = %format!("{e:#}"), "fetching areas failed");
                Vec::new()
            }
        }
    }
}

/// Canned catalog for tests and `AppState::fake`.
#[cfg(test)]
#[derive(Default)]
pub struct StaticRecipeSource {
    pub recipes: Vec<Recipe>,
    pub categories: Vec<Category>,
}

#[cfg(test)]
#[async_trait]
impl RecipeSource for StaticRecipeSource {
    async fn recipes_by_category(&self, category: &str) -> Vec<Recipe> {
        self.recipes
            .iter()
            .filter(|r| r.category.as_deref() == Some(category))
            .cloned()
            .collect()
    }

    async fn recipe_by_id(&self, id: &str) -> Option<Recipe> {
        self.recipes.iter().find(|r| r.id == id).cloned()
    }

    async fn categories(&self) -> Vec<Category> {
        self.categories.clone()
    }

    async fn search(&self, query: &str) -> Vec<Recipe> {
        let needle = query.to_lowercase();
        self.recipes
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    async fn random(&self) -> Option<Recipe> {
        self.recipes.first().cloned()
    }

    async fn recipes_by_area(&self, area: &str) -> Vec<Recipe> {
        self.recipes
            .iter()
            .filter(|r| r.area.as_deref() == Some(area))
            .cloned()
            .collect()
    }

    async fn areas(&self) -> Vec<String> {
        let mut areas: Vec<String> = self.recipes.iter().filter_map(|r| r.area.clone()).collect();
        areas.sort();
        areas.dedup();
        areas
    }
}

#[cfg(test)]
mod source_tests {
    use super::*;
    use axum::{extract::Query, routing::get, Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;

    async fn lookup(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
        if q.get("i").map(String::as_str) == Some("52772") {
            Json(json!({ "meals": [{
                "idMeal": "52772",
                "strMeal": "Teriyaki Chicken Casserole",
                "strMealThumb": "t.jpg",
                "strIngredient1": "soy sauce",
                "strMeasure1": "3/4 cup",
                "strIngredient2": ""
            }]}))
        } else {
            Json(json!({ "meals": null }))
        }
    }

    async fn filter(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
        let c = q.get("c").cloned().unwrap_or_default();
        Json(json!({ "meals": [
            { "idMeal": "1", "strMeal": format!("{c} One"), "strMealThumb": "1.jpg" },
            { "idMeal": "2", "strMeal": format!("{c} Two"), "strMealThumb": "2.jpg" }
        ]}))
    }

    async fn spawn_fake_api() -> Url {
        let app = Router::new()
            .route("/api/lookup.php", get(lookup))
            .route("/api/filter.php", get(filter))
            .route("/api/categories.php", get(|| async { Json(json!({ "nope": [] })) }))
            .route("/api/list.php", get(|| async { "not json" }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Url::parse(&format!("http://{addr}/api/")).unwrap()
    }

    #[tokio::test]
    async fn lookup_and_filter_against_fake_api() {
        let client = MealDbClient::new(spawn_fake_api().await, Duration::from_secs(5)).unwrap();

        let recipe = client.recipe_by_id("52772").await.expect("recipe");
        assert_eq!(recipe.name, "Teriyaki Chicken Casserole");
        assert_eq!(recipe.ingredients.as_ref().map(Vec::len), Some(1));

        assert!(client.recipe_by_id("0").await.is_none());

        let chicken = client.recipes_by_category("Chicken").await;
        assert_eq!(chicken.len(), 2);
        assert_eq!(chicken[0].name, "Chicken One");
        assert_eq!(chicken[0].category.as_deref(), Some("Chicken"));
    }

    #[tokio::test]
    async fn failures_degrade_to_empty() {
        let client = MealDbClient::new(spawn_fake_api().await, Duration::from_secs(5)).unwrap();
        // missing top-level collection
        assert!(client.categories().await.is_empty());
        // undecodable body
        assert!(client.areas().await.is_empty());
        // 404
        assert!(client.random().await.is_none());
        assert!(client.search("anything").await.is_empty());
    }
}
