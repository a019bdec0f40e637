//! PawHaven Backend
//!
//! A production-grade REST backend for a pet-adoption platform, with SQLite
//! persistence and Tantivy full-text search over adoption requests.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod search;

use std::sync::Arc;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;
use search::SearchIndex;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub search: Arc<SearchIndex>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting PawHaven Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Index path: {:?}", config.index_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Initialize search index
    let search = Arc::new(SearchIndex::open(&config.index_path)?);

    // Build initial search index from database
    tracing::info!("Building search index...");
    let requests = repo.list_all_adoptions().await?;
    search.rebuild(&requests).await?;
    tracing::info!("Search index built with {} adoption requests", requests.len());

    // Create application state
    let state = AppState {
        repo,
        search,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes; auth requirements are declared per-handler via extractors
    let api_routes = Router::new()
        // Accounts & sessions
        .route("/auth/register", post(api::register))
        .route("/auth/login", post(api::login))
        .route("/auth/logout", post(api::logout))
        .route("/auth/me", get(api::me))
        .route("/users/{id}/role", patch(api::set_user_role))
        // Shelters
        .route("/shelters", get(api::list_shelters))
        .route("/shelters", post(api::create_shelter))
        .route("/shelters/{id}", get(api::get_shelter))
        .route("/shelters/{id}", patch(api::update_shelter))
        .route("/shelters/{id}/status", patch(api::set_shelter_status))
        .route("/shelters/{id}/members", get(api::list_shelter_members))
        .route(
            "/shelters/{id}/members/{user_id}",
            delete(api::remove_shelter_member),
        )
        // Invites
        .route("/shelters/{id}/invites", post(api::create_invite))
        .route("/shelters/{id}/invites", get(api::list_shelter_invites))
        .route("/invites/{id}", get(api::invite_status))
        .route("/invites/{id}/accept", post(api::accept_invite))
        .route("/invites/{id}/revoke", post(api::revoke_invite))
        .route("/invites/{id}/resend", post(api::resend_invite))
        // Pets
        .route("/pets", get(api::list_pets))
        .route("/pets", post(api::create_pet))
        .route("/pets/{id}", get(api::get_pet))
        .route("/pets/{id}", patch(api::update_pet))
        .route("/pets/{id}", delete(api::delete_pet))
        // Adoption requests
        .route("/adoption-requests", post(api::submit_adoption))
        .route("/adoption-requests", get(api::list_adoptions))
        .route("/adoption-requests/{id}", get(api::get_adoption))
        .route("/adoption-requests/{id}", patch(api::transition_adoption))
        .route("/adoption-requests/{id}", delete(api::cancel_adoption))
        // Campaigns
        .route("/campaigns", get(api::list_campaigns))
        .route("/campaigns", post(api::create_campaign))
        .route("/campaigns/{id}", get(api::get_campaign))
        .route("/campaigns/{id}", patch(api::set_campaign_status))
        .route("/campaigns/{id}/donations", post(api::donate))
        // Bookings
        .route("/bookings", get(api::list_bookings))
        .route("/bookings", post(api::create_booking))
        .route("/bookings/{id}", delete(api::cancel_booking));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
