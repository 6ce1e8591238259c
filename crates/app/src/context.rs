//! App Context

use std::{sync::Arc, time::Duration};

use sqlx::migrate::MigrateError;
use thiserror::Error;

use crate::{
    database::{self, Db, DbConfig},
    domain::coupons::{CouponsService, PgCouponsService},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrations(#[source] MigrateError),
}

#[derive(Clone)]
pub struct AppContext {
    pub coupons: Arc<dyn CouponsService>,
}

impl AppContext {
    /// Connect to the database and build the services on top of it.
    ///
    /// Pending migrations are applied first when `config.run_migrations` is set.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or applying
    /// migrations fails.
    pub async fn from_config(
        config: &DbConfig,
        claim_timeout: Duration,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(config)
            .await
            .map_err(AppInitError::Database)?;

        if config.run_migrations {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrations)?;
        }

        let coupons = PgCouponsService::new(Db::new(pool)).with_claim_timeout(claim_timeout);

        Ok(Self {
            coupons: Arc::new(coupons),
        })
    }
}
