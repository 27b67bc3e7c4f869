use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::dto::{AuthState, LoginRequest, SignupRequest},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/signup", post(signup))
        .route("/auth/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn rejected(state: AuthState) -> (StatusCode, String) {
    let msg = state.error.unwrap_or_else(|| "Authentication failed".into());
    warn!(error = %msg, "authentication rejected");
    (StatusCode::BAD_REQUEST, msg)
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthState>, (StatusCode, String)> {
    let mut session = state.session.lock().await;
    if !session.login(&payload.email, &payload.password) {
        return Err(rejected(session.identity.snapshot()));
    }
    Ok(Json(session.identity.snapshot()))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<AuthState>, (StatusCode, String)> {
    let mut session = state.session.lock().await;
    if !session.signup(&payload.name, &payload.email, &payload.password) {
        return Err(rejected(session.identity.snapshot()));
    }
    Ok(Json(session.identity.snapshot()))
}

#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> Json<AuthState> {
    let mut session = state.session.lock().await;
    session.logout();
    Json(session.identity.snapshot())
}

#[instrument(skip(state))]
pub async fn get_me(State(state): State<AppState>) -> Json<AuthState> {
    Json(state.session.lock().await.identity.snapshot())
}

#[cfg(test)]
mod auth_handler_tests {
    use super::*;

    #[tokio::test]
    async fn signup_then_me_then_logout() {
        let state = AppState::fake();
        let Json(auth) = signup(
            State(state.clone()),
            Json(SignupRequest {
                name: "Alex".into(),
                email: "alex@example.com".into(),
                password: "x".into(),
            }),
        )
        .await
        .expect("signup ok");
        assert!(auth.is_authenticated);

        let Json(me) = get_me(State(state.clone())).await;
        assert_eq!(me.user.as_ref().map(|u| u.name.as_str()), Some("Alex"));

        let Json(after) = logout(State(state.clone())).await;
        assert!(!after.is_authenticated);
        assert!(after.user.is_none());
    }

    #[tokio::test]
    async fn login_with_missing_password_is_bad_request() {
        let state = AppState::fake();
        let err = login(
            State(state),
            Json(LoginRequest {
                email: "a@b.c".into(),
                password: String::new(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        assert_eq!(err.1, "Email and password are required");
    }

    #[test]
    fn auth_state_serializes_camel_case() {
        let json = serde_json::to_value(AuthState::signed_out()).unwrap();
        assert_eq!(json["isAuthenticated"], false);
        assert_eq!(json["isLoading"], false);
        assert!(json["user"].is_null());
    }
}
