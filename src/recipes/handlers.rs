use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{instrument, warn};

use crate::recipes::{
    dto::{RecipeQuery, RecipeView},
    model::{Category, Recipe},
    services::list_recipes,
};
use crate::state::AppState;

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list))
        .route("/recipes/random", get(random))
        .route("/recipes/:id", get(get_recipe))
        .route("/categories", get(categories))
        .route("/areas", get(areas))
}

async fn with_favorite(state: &AppState, recipe: Recipe) -> RecipeView {
    let is_favorite = state.session.lock().await.favorites.is_favorite(&recipe.id);
    RecipeView {
        recipe,
        is_favorite,
    }
}

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<RecipeQuery>,
) -> Json<Vec<Recipe>> {
    Json(list_recipes(state.recipes.as_ref(), &query).await)
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecipeView>, (StatusCode, String)> {
    let Some(recipe) = state.recipes.recipe_by_id(&id).await else {
        warn!(%id, "recipe not found");
        return Err((StatusCode::NOT_FOUND, "Recipe not found".into()));
    };
    Ok(Json(with_favorite(&state, recipe).await))
}

#[instrument(skip(state))]
pub async fn random(
    State(state): State<AppState>,
) -> Result<Json<RecipeView>, (StatusCode, String)> {
    let Some(recipe) = state.recipes.random().await else {
        return Err((StatusCode::NOT_FOUND, "No recipe available".into()));
    };
    Ok(Json(with_favorite(&state, recipe).await))
}

#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.recipes.categories().await)
}

#[instrument(skip(state))]
pub async fn areas(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.recipes.areas().await)
}
