use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::models::{Director, Genre, Movie};
use crate::store::MovieFilter;
use crate::AppState;

/// GET /movies - full catalog
pub async fn list(_auth: AuthUser, State(state): State<AppState>) -> Result<Json<Vec<Movie>>, ApiError> {
    let movies = state.store.find_movies(MovieFilter::default()).await?;
    Ok(Json(movies))
}

/// GET /movies/:Title - exact-title match; a miss is an empty array, not an
/// error
pub async fn by_title(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<Json<Vec<Movie>>, ApiError> {
    let movies = state.store.find_movies(MovieFilter::by_title(title)).await?;
    Ok(Json(movies))
}

/// GET /genres/:Name - genre of the first movie carrying it
pub async fn genre_by_name(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Genre>, ApiError> {
    let movies = state.store.find_movies(MovieFilter::by_genre(name.as_str())).await?;
    movies
        .into_iter()
        .find_map(|movie| movie.genre)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("genre {name} was not found")))
}

/// GET /directors/:Name - director of the first movie carrying them
pub async fn director_by_name(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Director>, ApiError> {
    let movies = state.store.find_movies(MovieFilter::by_director(name.as_str())).await?;
    movies
        .into_iter()
        .find_map(|movie| movie.director)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("director {name} was not found")))
}
