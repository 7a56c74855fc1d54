use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use soapbox_api::auth::{self, AppState, AppStateInner};
use soapbox_api::error::ApiError;
use soapbox_api::feedback;
use soapbox_api::middleware::require_auth;
use soapbox_api::users;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soapbox=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let session_secret =
        std::env::var("SOAPBOX_SESSION_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("SOAPBOX_DB_PATH").unwrap_or_else(|_| "soapbox.db".into());
    let host = std::env::var("SOAPBOX_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("SOAPBOX_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Init database
    let db = soapbox_db::Database::open(&PathBuf::from(&db_path))?;

    // Shared state
    let state: AppState = Arc::new(AppStateInner { db, session_secret });

    // Routes
    let public_routes = Router::new()
        .route("/", get(home))
        .route("/register", get(auth::show_register).post(auth::register))
        .route("/login", get(auth::show_login).post(auth::login))
        .route("/logout", get(auth::logout))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/users/{username}", get(users::show_user))
        .route("/users/{username}/delete", post(users::delete_user))
        .route(
            "/users/{username}/feedback/add",
            get(feedback::show_add).post(feedback::add),
        )
        .route(
            "/feedback/{id}/update",
            get(feedback::show_update).post(feedback::update),
        )
        .route("/feedback/{id}/delete", post(feedback::delete))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Soapbox server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn home() -> Redirect {
    Redirect::to("/register")
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}
