use axum::{
    Router,
    routing::{delete, get, post},
};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::env;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auctionhouse_backend::AppState;
use auctionhouse_backend::handlers;
use auctionhouse_backend::jobs::lifecycle_sweep::start_lifecycle_sweep_job;
use auctionhouse_backend::services::notification::{
    LogNotifier, WebhookNotifier, WinnerNotifier,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,auctionhouse_backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Connect to database
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    tracing::info!("Connecting to database...");
    let db = Database::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    // Run migrations
    tracing::info!("Running migrations...");
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let notifier: Arc<dyn WinnerNotifier> = match WebhookNotifier::from_env() {
        Some(webhook) => Arc::new(webhook),
        None => Arc::new(LogNotifier),
    };

    // Background lifecycle sweep (runs once immediately, then every 5 min)
    start_lifecycle_sweep_job(db.clone(), notifier.clone()).await;

    let state = AppState { db, notifier };

    // Build router
    let app = Router::new()
        .route("/", get(hello_auctionhouse))
        .route("/api/auctions", post(handlers::auction::create_auction))
        .route("/api/auctions/{id}", get(handlers::auction::get_auction))
        .route("/api/auctions/{id}", delete(handlers::auction::delete_auction))
        .route("/api/auctions/{id}/bids", post(handlers::bid::place_bid))
        .route(
            "/api/auctions/{id}/force-end",
            post(handlers::auction::force_end_auction),
        )
        .route(
            "/api/auctions/{id}/payments/participation",
            post(handlers::payment::submit_participation_payment),
        )
        .route(
            "/api/auctions/{id}/payments/winner",
            post(handlers::payment::submit_winner_payment),
        )
        .route(
            "/api/auctions/{id}/settlement/{user_id}",
            get(handlers::payment::get_amount_due),
        )
        .route(
            "/api/auction-requests",
            post(handlers::approval::submit_auction_request),
        )
        .route(
            "/api/admin/auction-requests/{id}/approve",
            post(handlers::approval::approve_request),
        )
        .route(
            "/api/admin/auction-requests/{id}/reject",
            post(handlers::approval::reject_request),
        )
        .route(
            "/api/admin/payments/{id}/approve",
            post(handlers::payment::approve_payment),
        )
        .route(
            "/api/admin/payments/{id}/reject",
            post(handlers::payment::reject_payment),
        )
        .route(
            "/api/admin/lifecycle/sweep",
            post(handlers::auction::run_sweep),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000")
        .await
        .unwrap();

    tracing::info!("Server listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}

async fn hello_auctionhouse() -> &'static str {
    "Hello from Auctionhouse Backend!"
}
