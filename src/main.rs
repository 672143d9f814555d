//! Pawtrack Server - Shelter Adoption Lifecycle
//!
//! REST API server for adoption requests, follow-up visits and campaigns.

use anyhow::Context;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pawtrack_server::{
    api,
    config::{AppConfig, LoggingConfig},
    repository::Repository,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    tracing::info!("Starting Pawtrack Server v{}", env!("CARGO_PKG_VERSION"));

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    let repository = Repository::new(pool);
    let services = Services::new(repository.clone(), &config.followup);

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
        repository,
    };

    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `RUST_LOG` wins over the configured level
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("pawtrack_server={},tower_http=debug", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Pets
        .route("/pets", post(api::pets::create_pet))
        .route("/pets/:id", get(api::pets::get_pet))
        .route("/pets/:id/publish", post(api::pets::publish_pet))
        .route("/pets/:id/withdraw", post(api::pets::withdraw_pet))
        .route("/pets/:id/mark-adopted", post(api::pets::mark_pet_adopted))
        .route("/shelters/:id/pets", get(api::pets::list_shelter_pets))
        // Adoption requests
        .route("/requests", get(api::requests::list_requests).post(api::requests::submit_request))
        .route("/requests/:id", get(api::requests::get_request))
        .route("/requests/:id/approve", post(api::requests::approve_request))
        .route("/requests/:id/reject", post(api::requests::reject_request))
        .route("/requests/:id/cancel", post(api::requests::cancel_request))
        .route("/requests/:id/reset", post(api::requests::reset_request))
        .route("/requests/:id/review", post(api::requests::review_request))
        // Adoptions
        .route("/adoptions/:id", get(api::adoptions::get_adoption))
        .route("/adoptions/:id/start-followup", post(api::adoptions::start_followup))
        .route("/adoptions/:id/add-strike", post(api::adoptions::add_strike))
        .route("/adoptions/:id/remove-strike", post(api::adoptions::remove_strike))
        .route("/adoptions/:id/finalize", post(api::adoptions::finalize_adoption))
        .route("/adoptions/:id/close", post(api::adoptions::close_adoption))
        .route("/adoptions/:id/contract", put(api::adoptions::update_contract))
        // Visits
        .route(
            "/adoptions/:id/visits",
            get(api::visits::list_visits).post(api::visits::schedule_visit),
        )
        .route("/visits/:id", delete(api::visits::delete_visit))
        .route("/visits/:id/outcome", post(api::visits::record_outcome))
        .route("/visits/:id/not-performed", post(api::visits::mark_not_performed))
        // Campaigns
        .route("/campaigns", post(api::campaigns::create_campaign))
        .route("/campaigns/:id", get(api::campaigns::get_campaign))
        .route("/campaigns/:id/pause", post(api::campaigns::pause_campaign))
        .route("/campaigns/:id/activate", post(api::campaigns::activate_campaign))
        .route("/campaigns/:id/finish", post(api::campaigns::finish_campaign))
        .route("/campaigns/:id/join", post(api::campaigns::join_campaign))
        .route("/campaigns/:id/leave", post(api::campaigns::leave_campaign))
        .route("/campaigns/:id/participants", get(api::campaigns::list_participants))
        .route(
            "/campaigns/:id/participants/:participation_id/attendance",
            put(api::campaigns::mark_attendance),
        )
        .route("/shelters/:id/campaigns", get(api::campaigns::list_shelter_campaigns))
        // Notifications
        .route("/notifications", get(api::notifications::list_notifications))
        .route("/notifications/unread-count", get(api::notifications::unread_count))
        .route("/notifications/read-all", post(api::notifications::mark_all_read))
        .route("/notifications/:id/read", post(api::notifications::mark_read))
        .with_state(state);

    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
