//! Backyard Eggs Backend
//!
//! Reservation and admin functions for the Backyard Eggs site. JSON documents
//! live in a GitHub repository and are updated through the Contents API.

mod api;
mod auth;
mod config;
mod errors;
mod models;
mod notify;
mod store;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, StoreBackend};
use errors::AppError;
use notify::{DisabledNotifier, DiscordNotifier, Notifier};
use store::{GithubStore, MemoryStore, RemoteFileStore};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RemoteFileStore>,
    pub notifier: Arc<dyn Notifier>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Backyard Eggs Backend");
    match config.store {
        StoreBackend::Github => tracing::info!(
            "Document repository: {}/{}@{}",
            config.github.owner,
            config.github.repo,
            config.github.branch
        ),
        StoreBackend::Memory => tracing::info!("Document store: in memory"),
    }
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.admin_password.is_none() {
        tracing::warn!("No admin password configured (ADMIN_PASSWORD). Admin functions will reject every request!");
    }

    let client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()?;

    let state = build_state(config.clone(), client)?;

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Wire the store and notifier implementations selected by the configuration.
pub fn build_state(config: Config, client: reqwest::Client) -> Result<AppState, AppError> {
    let store: Arc<dyn RemoteFileStore> = match config.store {
        StoreBackend::Github => {
            let token = config.github.token.clone().ok_or_else(|| {
                AppError::Config("GITHUB_TOKEN is required for the GitHub store".to_string())
            })?;
            Arc::new(GithubStore::new(client.clone(), &config.github, token))
        }
        StoreBackend::Memory => {
            tracing::warn!("EGGS_STORE=memory: documents are kept in memory and lost on restart!");
            Arc::new(MemoryStore::new())
        }
    };

    let notifier: Arc<dyn Notifier> = match &config.discord_webhook_url {
        Some(url) => Arc::new(DiscordNotifier::new(client, url.clone())),
        None => {
            tracing::info!("No Discord webhook configured; reservation notifications disabled");
            Arc::new(DisabledNotifier)
        }
    };

    Ok(AppState {
        store,
        notifier,
        config: Arc::new(config),
    })
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Functions accept POST only
    let functions = Router::new()
        .route(
            "/submit-reservation",
            post(api::submit_reservation).fallback(api::method_not_allowed),
        )
        .route(
            "/update-batches",
            post(api::update_batches).fallback(api::method_not_allowed),
        )
        .route(
            "/update-content",
            post(api::update_content).fallback(api::method_not_allowed),
        )
        .route(
            "/validate-password",
            post(api::validate_password).fallback(api::method_not_allowed),
        );

    // Health check
    let mut app = Router::new()
        .nest("/api", functions.clone())
        // Path the existing front end posts to
        .nest("/.netlify/functions", functions)
        .route("/health", get(health_check));

    if let Some(site_dir) = &state.config.site_dir {
        tracing::info!("Serving static site from {:?}", site_dir);
        app = app.fallback_service(ServeDir::new(site_dir));
    }

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    )
    .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
