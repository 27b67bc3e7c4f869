mod app;
mod auth;
mod collection;
mod config;
mod diet_plans;
mod error;
mod favorites;
mod meal_plans;
mod recipes;
mod session;
mod state;
mod storage;

use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "culinary=debug,axum=info,tower_http=info";

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json_logs {
        builder.with_target(false).json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let app_state = state::AppState::init().await?;
    let app = app::build_app(app_state.clone());
    app::serve(app, &app_state).await
}
