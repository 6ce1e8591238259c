//! Server configuration module

use clap::Parser;
use coupon_app::database::DbConfig;

use crate::config::{
    claims::ClaimsConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
};

pub(crate) mod claims;
pub(crate) mod observability;
pub(crate) mod server;

/// Coupon JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "coupon-json", about = "Coupon JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Request diagnostics settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Connection pool settings.
    #[command(flatten)]
    pub database: DbConfig,

    /// Claim processing settings.
    #[command(flatten)]
    pub claims: ClaimsConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // A missing .env file is fine.
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}
