use std::sync::Arc;

use myflix_api::store::postgres::PgStore;
use myflix_api::{app, config, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL and JWT_SECRET.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();

    let database_url = match config.database_url.as_deref() {
        Some(url) => url,
        None => {
            tracing::error!("DATABASE_URL is not set");
            std::process::exit(1);
        }
    };

    let store = match PgStore::connect(database_url).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("failed to initialize store: {e}");
            std::process::exit(1);
        }
    };

    let app = app(AppState { store: Arc::new(store) });

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("myFlix API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
