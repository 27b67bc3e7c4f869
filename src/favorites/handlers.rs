use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::instrument;

use crate::recipes::model::Recipe;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteStatus {
    pub recipe_id: String,
    pub is_favorite: bool,
}

pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/favorites", get(list_favorites).post(add_favorite))
        .route("/favorites/:id", get(favorite_status).delete(remove_favorite))
}

#[instrument(skip(state))]
pub async fn list_favorites(State(state): State<AppState>) -> Json<Vec<Recipe>> {
    Json(state.session.lock().await.favorites.favorites().to_vec())
}

/// Adding an already saved recipe answers 200 with the unchanged list.
#[instrument(skip(state, recipe))]
pub async fn add_favorite(
    State(state): State<AppState>,
    Json(recipe): Json<Recipe>,
) -> (StatusCode, Json<Vec<Recipe>>) {
    let mut session = state.session.lock().await;
    let status = if session.favorites.add(recipe) {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    (status, Json(session.favorites.favorites().to_vec()))
}

#[instrument(skip(state))]
pub async fn remove_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<Vec<Recipe>> {
    let mut session = state.session.lock().await;
    session.favorites.remove(&id);
    Json(session.favorites.favorites().to_vec())
}

#[instrument(skip(state))]
pub async fn favorite_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<FavoriteStatus> {
    let is_favorite = state.session.lock().await.favorites.is_favorite(&id);
    Json(FavoriteStatus {
        recipe_id: id,
        is_favorite,
    })
}
