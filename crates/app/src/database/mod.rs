//! Database connection management

use std::time::Duration;

use clap::Args;
use sqlx::{
    PgPool, Postgres, Transaction, migrate::MigrateError, postgres::PgPoolOptions, query,
};

mod executor;

pub use executor::{Executor, Statement};

/// SQL used to bound how long a transaction may wait on a row lock.
pub const SET_LOCK_TIMEOUT_SQL: &str = "SELECT set_config('lock_timeout', $1, true)";

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_MIN_CONNECTIONS: u32 = 0;
pub const DEFAULT_ACQUIRE_TIMEOUT_MS: u64 = 3_000;
pub const DEFAULT_RUN_MIGRATIONS: bool = true;

/// Connection pool settings.
#[derive(Debug, Clone, Args)]
pub struct DbConfig {
    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    /// Maximum number of pooled connections
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Minimum number of idle connections kept open
    #[arg(long, env = "DATABASE_MIN_CONNECTIONS", default_value_t = DEFAULT_MIN_CONNECTIONS)]
    pub min_connections: u32,

    /// How long a caller waits for a free connection before failing, in milliseconds
    #[arg(long, env = "DATABASE_ACQUIRE_TIMEOUT_MS", default_value_t = DEFAULT_ACQUIRE_TIMEOUT_MS)]
    pub acquire_timeout_ms: u64,

    /// Apply pending migrations on startup
    #[arg(
        long,
        env = "DATABASE_RUN_MIGRATIONS",
        default_value_t = DEFAULT_RUN_MIGRATIONS,
        action = clap::ArgAction::Set
    )]
    pub run_migrations: bool,
}

impl DbConfig {
    /// Config with default pool settings for the given URL.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout_ms: DEFAULT_ACQUIRE_TIMEOUT_MS,
            run_migrations: DEFAULT_RUN_MIGRATIONS,
        }
    }

    #[must_use]
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }
}

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begin a transaction whose row-lock waits give up after `lock_timeout`.
    ///
    /// Postgres reads a zero `lock_timeout` as "wait forever", so anything under
    /// a millisecond is rounded up to one.
    ///
    /// The returned transaction rolls back when dropped without a commit.
    ///
    /// # Errors
    ///
    /// Returns an error when no connection can be acquired, or when starting the
    /// transaction or applying the lock timeout fails.
    pub async fn begin_with_lock_timeout(
        &self,
        lock_timeout: Duration,
    ) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let lock_timeout_ms = lock_timeout.as_millis().max(1);

        tx.execute(query(SET_LOCK_TIMEOUT_SQL).bind(lock_timeout_ms.to_string()))
            .await?;

        Ok(tx)
    }

    /// Round-trip a trivial statement to check the database is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error when no connection can be acquired or the statement fails.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        let mut pool = self.pool.clone();

        pool.execute(query("SELECT 1")).await?;

        Ok(())
    }
}

/// Connect to `PostgreSQL` with a bounded acquire timeout.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DbConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect(&config.database_url)
        .await
}

/// Apply the embedded migrations.
///
/// # Errors
///
/// Returns an error if a migration fails to apply.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use sqlx::query_scalar;
    use testresult::TestResult;

    use crate::test::TestDb;

    use super::*;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        database: DbConfig,
    }

    async fn lock_timeout_setting(tx: &mut Transaction<'static, Postgres>) -> TestResult<String> {
        let row = tx
            .query_row(query("SELECT current_setting('lock_timeout') AS lock_timeout"))
            .await?;

        Ok(sqlx::Row::try_get(&row, "lock_timeout")?)
    }

    #[test]
    fn parsed_defaults_match_new() -> TestResult {
        let parsed = Cli::try_parse_from(["db", "--database-url", "postgres://localhost/coupons"])?;
        let built = DbConfig::new("postgres://localhost/coupons");

        assert_eq!(parsed.database.max_connections, built.max_connections);
        assert_eq!(parsed.database.min_connections, built.min_connections);
        assert_eq!(parsed.database.acquire_timeout_ms, built.acquire_timeout_ms);
        assert_eq!(parsed.database.run_migrations, built.run_migrations);

        Ok(())
    }

    #[tokio::test]
    async fn lock_timeout_applies_to_the_transaction() -> TestResult {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());

        let mut tx = db.begin_with_lock_timeout(Duration::from_millis(250)).await?;

        assert_eq!(lock_timeout_setting(&mut tx).await?, "250ms");

        tx.rollback().await?;

        let outside: String = query_scalar("SELECT current_setting('lock_timeout')")
            .fetch_one(test_db.pool())
            .await?;

        assert_eq!(outside, "0", "lock_timeout must stay transaction-local");

        Ok(())
    }

    #[tokio::test]
    async fn zero_lock_timeout_still_bounds_the_wait() -> TestResult {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());

        let mut tx = db.begin_with_lock_timeout(Duration::ZERO).await?;

        assert_eq!(lock_timeout_setting(&mut tx).await?, "1ms");

        Ok(())
    }

    #[tokio::test]
    async fn ping_succeeds_against_a_live_database() -> TestResult {
        let test_db = TestDb::new().await;

        Db::new(test_db.pool().clone()).ping().await?;

        Ok(())
    }
}
