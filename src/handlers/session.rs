use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::auth::{self, Claims};
use crate::error::ApiError;
use crate::models::User;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

/// POST /login - username/password exchange for a bearer token.
///
/// Unknown user and wrong password share one rejection path so the response
/// cannot be used for user enumeration.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state.store.find_user(&payload.username).await?;

    let user = match user {
        Some(user) if auth::verify_password(&payload.password, &user.password_hash) => user,
        _ => {
            tracing::debug!(username = %payload.username, "login rejected");
            return Err(ApiError::unauthorized("invalid username or password"));
        }
    };

    let token = auth::generate_jwt(&Claims::new(&user.username))?;
    tracing::info!(username = %user.username, "login succeeded");
    Ok(Json(LoginResponse { user, token }))
}
