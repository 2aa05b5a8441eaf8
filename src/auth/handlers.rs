use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    app::not_found,
    auth::{
        dto::{AuthResponse, LoginRequest, RegisterRequest},
        errors::AuthError,
        services::AuthService,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register).fallback(not_found))
        .route("/auth/login", post(login).fallback(not_found))
}

#[instrument(skip(auth, payload))]
pub async fn register(
    State(auth): State<AuthService>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), AuthError> {
    let Json(payload) = payload.map_err(bad_body)?;
    let res = auth.register(payload).await?;
    Ok((StatusCode::CREATED, Json(res)))
}

#[instrument(skip(auth, payload))]
pub async fn login(
    State(auth): State<AuthService>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AuthError> {
    let Json(payload) = payload.map_err(bad_body)?;
    Ok(Json(auth.login(payload).await?))
}

fn bad_body(rejection: JsonRejection) -> AuthError {
    warn!(error = %rejection, "rejected request body");
    AuthError::Validation(rejection.body_text())
}
