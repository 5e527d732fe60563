//! Code Review Scan API Server

mod auth;
mod db;
mod error;
mod models;
mod orchestrator;
mod routes;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use crs_analyzer::{AnalyzerClient, AnalyzerConfig};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across handlers
pub struct AppState {
    pub db: sqlx::PgPool,
    pub analyzer: AnalyzerClient,
    pub config: AppConfig,
}

/// Application configuration
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub analyzer: AnalyzerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/code_review_scans".to_string()),
            jwt_secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "development-secret-change-in-production".to_string()),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            analyzer: AnalyzerConfig {
                endpoint: std::env::var("ANALYZER_URL")
                    .unwrap_or_else(|_| AnalyzerConfig::default().endpoint),
                bearer_token: std::env::var("ANALYZER_TOKEN").ok(),
                timeout_secs: std::env::var("ANALYZER_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok()),
            },
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "crs_api=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Code Review Scan API Server");

    let config = AppConfig::default();

    // Connect to database
    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("Failed to run migrations");

    info!("Database migrations complete");

    // Create analyzer client
    let analyzer =
        AnalyzerClient::new(config.analyzer.clone()).expect("Failed to build analyzer client");

    // Create shared state
    let state = Arc::new(AppState {
        db,
        analyzer,
        config,
    });

    // Build router
    let app = Router::new()
        // Health check
        .route("/health", get(routes::health_check))

        // Authentication & profile
        .route("/api/auth/signup", post(routes::auth::signup))
        .route("/api/auth/login", post(routes::auth::login))
        .route("/api/auth/me", get(routes::auth::me))
        .route("/api/auth/logout", post(routes::auth::logout))
        .route("/api/profile", get(routes::auth::profile))

        // Projects
        .route("/api/projects", get(routes::projects::list_projects))
        .route("/api/projects", post(routes::projects::create_project))
        .route("/api/projects/:id", get(routes::projects::get_project))
        .route("/api/projects/:id", delete(routes::projects::delete_project))

        // Scans
        .route("/api/scans/run", post(routes::scans::run_scan))
        .route("/api/scans", get(routes::scans::list_scans))
        .route("/api/scans/:id", get(routes::scans::get_scan))
        .route("/api/scans/:id/suggestions", get(routes::scans::get_suggestions))

        // Suggestions
        .route("/api/suggestions/:id", patch(routes::suggestions::update_status))

        // Reports
        .route("/api/scans/:id/report", get(routes::reports::get_report))
        .route("/api/scans/:id/report/download", get(routes::reports::download_report))
        .route("/api/reports/latest", get(routes::reports::latest_report))

        // Read models
        .route("/api/dashboard", get(routes::dashboard::overview))
        .route("/api/analytics", get(routes::analytics::overview))

        // CORS
        .layer(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any))

        // Tracing
        .layer(TraceLayer::new_for_http())

        // State
        .with_state(state.clone());

    // Start server
    let addr = state.config.bind_addr.clone();
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
