use std::sync::Arc;

use actix_web::{web, App, HttpResponse, HttpServer};
use anyhow::Context;
use gatewaypack::config::{Config, DatabaseConfig};
use gatewaypack::gateways::{
    self, AppState, GatewayContext, GatewayPack, GatewayService, HostUrls, MySqlGatewayRepository,
    ProviderClient,
};
use gatewaypack::payments::MySqlPaymentRepository;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gatewaypack=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    tracing::info!("Starting GatewayPack");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    // Create database connection pool
    let db_pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;
    DatabaseConfig::run_migrations(&db_pool)
        .await
        .context("Failed to run migrations")?;

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.pool_size
    );

    let payments = Arc::new(MySqlPaymentRepository::new(db_pool.clone()));
    let ctx = GatewayContext::new(
        ProviderClient::new(&config.http).context("Failed to build provider HTTP client")?,
        HostUrls::new(&config.app.url).context("Invalid APP_URL")?,
        payments.clone(),
    );
    let pack = GatewayPack::new();
    tracing::info!("Gateways available: {:?}", pack.endpoints());

    let state = AppState {
        service: Arc::new(GatewayService::new(pack, ctx)),
        payments,
        gateways: Arc::new(MySqlGatewayRepository::new(db_pool)),
    };

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let workers = config.server.workers;
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .route("/health", web::get().to(health_check))
            .configure(gateways::configure)
    })
    .workers(workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "gatewaypack"
    }))
}
