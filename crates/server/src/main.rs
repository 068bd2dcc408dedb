//! Clipcommerce server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use clipcommerce_api::{endpoints::health_router, middleware::AppState, router as api_router};
use clipcommerce_common::Config;
use clipcommerce_core::{
    HttpPaymentGateway, HttpVideoProvider, NotificationService, PaymentGateway, ProfileService,
    SettlementConfig, SettlementService, StatsService, SubmissionService, UserService,
    VideoProvider,
};
use clipcommerce_db::repositories::{
    ClipperProfileRepository, CreatorProfileRepository, NotificationRepository,
    SubmissionRepository, TransactionRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clipcommerce=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting clipcommerce server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = clipcommerce_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    clipcommerce_db::migrate(&db).await?;
    info!("Migrations completed");

    let db = Arc::new(db);

    // Initialize repositories
    let user_repo = UserRepository::new(Arc::clone(&db));
    let creator_repo = CreatorProfileRepository::new(Arc::clone(&db));
    let clipper_repo = ClipperProfileRepository::new(Arc::clone(&db));
    let submission_repo = SubmissionRepository::new(Arc::clone(&db));
    let transaction_repo = TransactionRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(Arc::clone(&db));

    // External providers
    let video_provider: Arc<dyn VideoProvider> =
        Arc::new(HttpVideoProvider::new(&config.video)?);
    let payment_gateway: Arc<dyn PaymentGateway> =
        Arc::new(HttpPaymentGateway::new(&config.payments)?);

    // Initialize services
    let notification_service = NotificationService::new(notification_repo);
    let stats_service = StatsService::new(submission_repo.clone(), clipper_repo.clone());

    let submission_service = SubmissionService::new(
        Arc::clone(&db),
        submission_repo.clone(),
        creator_repo.clone(),
        clipper_repo.clone(),
        video_provider,
        stats_service,
        notification_service.clone(),
    );

    let settlement_service = SettlementService::new(
        Arc::clone(&db),
        submission_repo,
        transaction_repo,
        clipper_repo.clone(),
        submission_service.clone(),
        payment_gateway,
        notification_service.clone(),
        SettlementConfig {
            fee_rate: config.payments.fee_rate,
            webhook_secret: config.payments.webhook_secret.clone(),
        },
    );

    let state = AppState {
        user_service: UserService::new(user_repo),
        profile_service: ProfileService::new(creator_repo, clipper_repo),
        submission_service,
        settlement_service,
        notification_service,
    };

    // Build router
    let app = Router::new()
        .merge(health_router())
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            clipcommerce_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
