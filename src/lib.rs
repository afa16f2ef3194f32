pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod store;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::store::CatalogStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
}

/// Builds the full router over any store implementation. Home, registration,
/// and login are public; every other route authenticates via the
/// [`middleware::auth::AuthUser`] extractor. Unmatched paths fall through to
/// static files, mirroring how the public directory sat behind the routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::welcome))
        .route("/login", post(handlers::session::login))
        .route("/movies", get(handlers::movies::list))
        .route("/movies/:title", get(handlers::movies::by_title))
        .route("/genres/:name", get(handlers::movies::genre_by_name))
        .route("/directors/:name", get(handlers::movies::director_by_name))
        .route("/users", get(handlers::users::list).post(handlers::users::register))
        .route(
            "/users/:username",
            get(handlers::users::show)
                .put(handlers::users::update)
                .patch(handlers::users::update)
                .delete(handlers::users::delete),
        )
        .route(
            "/users/:username/movies/:movie_id",
            post(handlers::users::favorite_add)
                .put(handlers::users::favorite_remove)
                .patch(handlers::users::favorite_remove),
        )
        .fallback_service(ServeDir::new(&config::config().public_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
