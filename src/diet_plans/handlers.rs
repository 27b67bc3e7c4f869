use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{debug, instrument};

use crate::{
    diet_plans::{
        dto::{CreateDietPlanRequest, DietPlanDraft, RebalanceRequest},
        macros::MacroBreakdown,
        model::DietPlan,
        templates::{find_template, templates, DietPlanTemplate},
    },
    error::StoreError,
    state::AppState,
};

pub fn diet_plan_routes() -> Router<AppState> {
    Router::new()
        .route("/diet-plans", get(list_diet_plans).post(create_diet_plan))
        .route("/diet-plans/templates", get(list_templates))
        .route("/diet-plans/templates/:slug", get(template_draft))
        .route("/diet-plans/macros/rebalance", post(rebalance_macros))
        .route("/diet-plans/:id", delete(delete_diet_plan))
}

#[instrument]
pub async fn list_templates() -> Json<Vec<DietPlanTemplate>> {
    Json(templates())
}

/// Editor draft prefilled from a preset.
#[instrument]
pub async fn template_draft(
    Path(slug): Path<String>,
) -> Result<Json<DietPlanDraft>, (StatusCode, String)> {
    find_template(&slug)
        .map(|t| Json(DietPlanDraft::from_template(&t)))
        .ok_or_else(|| StoreError::NotFound(format!("template {slug}")).into())
}

#[instrument(skip(state))]
pub async fn list_diet_plans(State(state): State<AppState>) -> Json<Vec<DietPlan>> {
    Json(state.session.lock().await.diet_plans.plans().to_vec())
}

#[instrument(skip(state, payload))]
pub async fn create_diet_plan(
    State(state): State<AppState>,
    Json(payload): Json<CreateDietPlanRequest>,
) -> Result<(StatusCode, Json<DietPlan>), (StatusCode, String)> {
    let mut session = state.session.lock().await;
    let session = &mut *session;
    let plan = session
        .diet_plans
        .create(payload.into_draft(), &mut session.meal_plans)?;
    Ok((StatusCode::CREATED, Json(plan)))
}

#[instrument(skip(state))]
pub async fn delete_diet_plan(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    if state.session.lock().await.diet_plans.delete(&id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

#[instrument(skip(payload))]
pub async fn rebalance_macros(Json(payload): Json<RebalanceRequest>) -> Json<MacroBreakdown> {
    let macros = payload.macros.0.rebalance_on_slider(payload.changed, payload.value);
    debug!(
        changed = ?payload.changed,
        requested = payload.value,
        applied = macros.get(payload.changed),
        "macros rebalanced"
    );
    Json(macros)
}
