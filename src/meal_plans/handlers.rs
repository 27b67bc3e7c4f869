use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    error::StoreError,
    meal_plans::{
        dto::CreateMealPlanRequest,
        model::{MealItem, MealPlan, MealPlanDay, NewMealItem},
        services::MealPlanSnapshot,
    },
    state::AppState,
};

pub fn meal_plan_routes() -> Router<AppState> {
    Router::new()
        .route("/meal-plans", get(list_meal_plans).post(create_meal_plan))
        .route("/meal-plans/active", get(get_active))
        .route("/meal-plans/:id", put(update_meal_plan).delete(delete_meal_plan))
        .route("/meal-plans/:id/activate", post(activate))
        .route("/meal-plans/active/days/:day_id", get(get_active_day))
        .route("/meal-plans/active/days/:day_id/meals", post(add_meal))
        .route(
            "/meal-plans/active/days/:day_id/meals/:meal_id",
            delete(remove_meal),
        )
}

#[instrument(skip(state))]
pub async fn list_meal_plans(State(state): State<AppState>) -> Json<MealPlanSnapshot> {
    Json(state.session.lock().await.meal_plans.snapshot())
}

#[instrument(skip(state, payload))]
pub async fn create_meal_plan(
    State(state): State<AppState>,
    Json(payload): Json<CreateMealPlanRequest>,
) -> Result<(StatusCode, Json<MealPlan>), (StatusCode, String)> {
    let plan = state
        .session
        .lock()
        .await
        .meal_plans
        .create(&payload.name, payload.description())
        .inspect_err(|e| warn!(error = %e, "meal plan rejected"))?;
    Ok((StatusCode::CREATED, Json(plan)))
}

#[instrument(skip(state, plan))]
pub async fn update_meal_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(plan): Json<MealPlan>,
) -> Result<Json<MealPlan>, (StatusCode, String)> {
    if plan.id != id {
        return Err(StoreError::validation("Path and body identifiers differ").into());
    }
    let mut session = state.session.lock().await;
    Ok(Json(session.meal_plans.update(plan)?))
}

#[instrument(skip(state))]
pub async fn delete_meal_plan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MealPlanSnapshot>, (StatusCode, String)> {
    let mut session = state.session.lock().await;
    if !session.meal_plans.delete(&id) {
        return Err(StoreError::NotFound("meal plan".into()).into());
    }
    Ok(Json(session.meal_plans.snapshot()))
}

#[instrument(skip(state))]
pub async fn activate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MealPlan>, (StatusCode, String)> {
    let mut session = state.session.lock().await;
    if !session.meal_plans.set_active(&id) {
        return Err(StoreError::NotFound("meal plan".into()).into());
    }
    session
        .meal_plans
        .active()
        .cloned()
        .map(Json)
        .ok_or_else(|| StoreError::NotFound("active meal plan".into()).into())
}

#[instrument(skip(state))]
pub async fn get_active(
    State(state): State<AppState>,
) -> Result<Json<MealPlan>, (StatusCode, String)> {
    state
        .session
        .lock()
        .await
        .meal_plans
        .active()
        .cloned()
        .map(Json)
        .ok_or_else(|| StoreError::NotFound("active meal plan".into()).into())
}

#[instrument(skip(state))]
pub async fn get_active_day(
    State(state): State<AppState>,
    Path(day_id): Path<String>,
) -> Result<Json<MealPlanDay>, (StatusCode, String)> {
    let session = state.session.lock().await;
    let plan = session
        .meal_plans
        .active()
        .ok_or_else(|| StoreError::NotFound("active meal plan".into()))?;
    plan.day(&day_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| StoreError::NotFound(format!("day {day_id}")).into())
}

#[instrument(skip(state, item))]
pub async fn add_meal(
    State(state): State<AppState>,
    Path(day_id): Path<String>,
    Json(item): Json<NewMealItem>,
) -> Result<(StatusCode, Json<MealItem>), (StatusCode, String)> {
    let mut session = state.session.lock().await;
    if session.meal_plans.active().is_none() {
        return Err(StoreError::NotFound("active meal plan".into()).into());
    }
    match session.meal_plans.add_meal_to_day(&day_id, item) {
        Some(meal) => Ok((StatusCode::CREATED, Json(meal))),
        None => Err(StoreError::NotFound(format!("day {day_id}")).into()),
    }
}

#[instrument(skip(state))]
pub async fn remove_meal(
    State(state): State<AppState>,
    Path((day_id, meal_id)): Path<(String, String)>,
) -> StatusCode {
    let mut session = state.session.lock().await;
    if session.meal_plans.remove_meal_from_day(&day_id, &meal_id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
