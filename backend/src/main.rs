//! Backend entry-point: runs migrations, builds the pool and serves the
//! REST API.

use actix_web::{HttpServer, web};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use backend::server::{ServerConfig, build_app, build_state};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = ServerConfig::parse();
    let database_url = config
        .database_url()
        .ok_or_else(|| std::io::Error::other("DATABASE_URL must be set"))?;

    // Migrations use a dedicated blocking connection before the pool exists.
    let migration_url = database_url.clone();
    tokio::task::spawn_blocking(move || run_migrations(&migration_url))
        .await
        .map_err(std::io::Error::other)?
        .map_err(std::io::Error::other)?;

    let pool = DbPool::new(PoolConfig::new(&database_url).with_max_size(config.pool_size))
        .await
        .map_err(std::io::Error::other)?;
    let state = build_state(&pool);

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness flip stays visible here.
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || build_app(state.clone(), server_health_state.clone()))
        .bind((config.bind.as_str(), config.port))?;

    info!(bind = %config.bind, port = config.port, "server listening");
    health_state.mark_ready();
    server.run().await
}
