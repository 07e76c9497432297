//! Spendflow API Server
//!
//! Main entry point for the Spendflow expense approval service.

mod seed;

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use spendflow_api::{AppState, create_router};
use spendflow_core::currency::ExchangeRateClient;
use spendflow_core::directory::InMemoryDirectory;
use spendflow_core::store::InMemoryExpenseStore;
use spendflow_core::workflow::{ApprovalEngine, ApprovalPolicy, ApproverResolver};
use spendflow_shared::{AppConfig, LoggingConfig};

const DEFAULT_LOG_FILTER: &str = "spendflow=debug,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_tracing(&config.logging);

    let policy = ApprovalPolicy::from(&config.approval);
    info!(
        manager_chain_depth = policy.manager_chain_depth,
        escalation_threshold = ?policy.escalation_threshold,
        include_company_admins = policy.include_company_admins,
        "Approval policy loaded"
    );

    let directory = Arc::new(InMemoryDirectory::new());
    let engine = ApprovalEngine::new(
        InMemoryExpenseStore::new(),
        directory.clone(),
        ApproverResolver::new(policy),
    );

    if config.seed.demo_data {
        let users = seed::seed_directory(&directory);
        let expenses = seed::seed_expenses(&engine, &users)?;
        info!(users = directory.len(), expenses, "Demo data seeded");
    }

    let converter = ExchangeRateClient::from_config(&config.fx)?;
    info!(
        base_url = %config.fx.base_url,
        display_currency = %config.fx.display_currency,
        "Exchange rate client configured"
    );

    let state = AppState {
        engine: Arc::new(engine),
        converter: Arc::new(converter),
        display_currency: config.fx.display_currency,
    };

    let app = create_router(state).layer(TimeoutLayer::new(Duration::from_secs(
        config.server.request_timeout_secs,
    )));

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(logging.filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
