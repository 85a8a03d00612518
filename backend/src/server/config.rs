//! Server configuration from CLI flags and the environment.

use clap::Parser;

/// Runtime configuration for the HTTP server.
///
/// The database URL deliberately comes from the environment only; it carries
/// credentials and must not end up in shell history or process listings.
#[derive(Debug, Clone, Parser)]
#[command(name = "news-api", about = "News-article REST API")]
pub struct ServerConfig {
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    pub bind: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// Maximum connections in the database pool.
    #[arg(long, default_value_t = 10)]
    pub pool_size: u32,
}

impl ServerConfig {
    /// Read the database URL from `DATABASE_URL`.
    pub fn database_url(&self) -> Option<String> {
        std::env::var("DATABASE_URL").ok()
    }
}
