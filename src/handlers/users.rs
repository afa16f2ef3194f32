use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::auth;
use crate::error::{ApiError, FieldError};
use crate::middleware::auth::AuthUser;
use crate::models::{User, UserFields};
use crate::AppState;

/// GET /users
pub async fn list(_auth: AuthUser, State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.store.list_users().await?))
}

/// GET /users/:Username - the user, or JSON null
pub async fn show(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Option<User>>, ApiError> {
    Ok(Json(state.store.find_user(&username).await?))
}

/// POST /users - registration, the only validated route
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<UserFields>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let errors = validate_registration(&payload);
    if !errors.is_empty() {
        return Err(ApiError::validation("registration failed validation", errors));
    }

    let password_hash = auth::hash_password(&payload.password)?;
    let user = state.store.create_user(payload, password_hash).await?;
    tracing::info!(username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT/PATCH /users/:Username - full-field update; body values are forwarded
/// to the store unvalidated
pub async fn update(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(payload): Json<UserFields>,
) -> Result<Json<User>, ApiError> {
    let password_hash = auth::hash_password(&payload.password)?;
    let user = state.store.update_user(&username, payload, password_hash).await?;
    Ok(Json(user))
}

/// DELETE /users/:Username
pub async fn delete(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<String, ApiError> {
    state.store.delete_user(&username).await?;
    tracing::info!(username = %username, "user deleted");
    Ok(format!("{username} was deleted."))
}

/// POST /users/:Username/movies/:MovieID - add a favorite (set semantics)
pub async fn favorite_add(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path((username, movie_id)): Path<(String, Uuid)>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.store.add_favorite(&username, movie_id).await?))
}

/// PUT/PATCH /users/:Username/movies/:MovieID - remove a favorite
pub async fn favorite_remove(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path((username, movie_id)): Path<(String, Uuid)>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.store.remove_favorite(&username, movie_id).await?))
}

/// Registration rules, checked independently so each violated rule yields its
/// own entry.
fn validate_registration(fields: &UserFields) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if fields.username.chars().count() < 5 {
        errors.push(FieldError::new("Username", "must be at least 5 characters"));
    }
    if !fields.username.chars().all(|c| c.is_ascii_alphanumeric()) {
        errors.push(FieldError::new("Username", "must contain only alphanumeric characters"));
    }
    if fields.password.is_empty() {
        errors.push(FieldError::new("Password", "must not be empty"));
    }
    if !is_valid_email(&fields.email) {
        errors.push(FieldError::new("Email", "must be a valid email address"));
    }

    errors
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(username: &str, password: &str, email: &str) -> UserFields {
        UserFields {
            username: username.to_string(),
            password: password.to_string(),
            email: email.to_string(),
            birthday: None,
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert!(validate_registration(&fields("validuser1", "p", "a@b.com")).is_empty());
    }

    #[test]
    fn short_username_yields_one_error() {
        let errors = validate_registration(&fields("abcd", "p", "a@b.com"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "Username");
    }

    #[test]
    fn non_alphanumeric_username_is_flagged() {
        let errors = validate_registration(&fields("user_name", "p", "a@b.com"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "Username");
    }

    #[test]
    fn short_and_non_alphanumeric_username_yields_two_errors() {
        let errors = validate_registration(&fields("a b", "p", "a@b.com"));
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.field == "Username"));
    }

    #[test]
    fn empty_password_is_flagged() {
        let errors = validate_registration(&fields("validuser1", "", "a@b.com"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "Password");
    }

    #[test]
    fn malformed_email_yields_email_violation_only() {
        let errors = validate_registration(&fields("validuser1", "p", "not-an-email"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "Email");
    }

    #[test]
    fn email_edge_cases() {
        assert!(is_valid_email("user@example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@com"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user name@example.com"));
    }
}
