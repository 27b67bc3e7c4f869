pub mod dto;
pub mod handlers;
pub mod macros;
pub mod model;
pub mod services;
pub mod templates;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::diet_plan_routes()
}
