//! Statement executor shared by pools, connections and transactions.
//!
//! Repository methods take `&mut dyn Executor` so the same body runs either
//! standalone against the pool or as one step of a larger transaction.

use async_trait::async_trait;
use sqlx::{
    PgConnection, PgPool, Postgres, Transaction,
    postgres::{PgArguments, PgQueryResult, PgRow},
    query::Query,
};

/// A parameterised statement with its positional arguments bound.
pub type Statement<'q> = Query<'q, Postgres, PgArguments>;

#[async_trait]
pub trait Executor: Send {
    /// Execute a statement, returning the affected-row tag.
    async fn execute<'q>(&mut self, statement: Statement<'q>)
    -> Result<PgQueryResult, sqlx::Error>;

    /// Fetch exactly one row; `sqlx::Error::RowNotFound` when there is none.
    async fn query_row<'q>(&mut self, statement: Statement<'q>) -> Result<PgRow, sqlx::Error>;

    /// Fetch every row produced by the statement.
    async fn query_rows<'q>(&mut self, statement: Statement<'q>)
    -> Result<Vec<PgRow>, sqlx::Error>;
}

#[async_trait]
impl Executor for PgPool {
    async fn execute<'q>(
        &mut self,
        statement: Statement<'q>,
    ) -> Result<PgQueryResult, sqlx::Error> {
        statement.execute(&*self).await
    }

    async fn query_row<'q>(&mut self, statement: Statement<'q>) -> Result<PgRow, sqlx::Error> {
        statement.fetch_one(&*self).await
    }

    async fn query_rows<'q>(
        &mut self,
        statement: Statement<'q>,
    ) -> Result<Vec<PgRow>, sqlx::Error> {
        statement.fetch_all(&*self).await
    }
}

#[async_trait]
impl Executor for PgConnection {
    async fn execute<'q>(
        &mut self,
        statement: Statement<'q>,
    ) -> Result<PgQueryResult, sqlx::Error> {
        statement.execute(&mut *self).await
    }

    async fn query_row<'q>(&mut self, statement: Statement<'q>) -> Result<PgRow, sqlx::Error> {
        statement.fetch_one(&mut *self).await
    }

    async fn query_rows<'q>(
        &mut self,
        statement: Statement<'q>,
    ) -> Result<Vec<PgRow>, sqlx::Error> {
        statement.fetch_all(&mut *self).await
    }
}

#[async_trait]
impl Executor for Transaction<'_, Postgres> {
    async fn execute<'q>(
        &mut self,
        statement: Statement<'q>,
    ) -> Result<PgQueryResult, sqlx::Error> {
        statement.execute(&mut **self).await
    }

    async fn query_row<'q>(&mut self, statement: Statement<'q>) -> Result<PgRow, sqlx::Error> {
        statement.fetch_one(&mut **self).await
    }

    async fn query_rows<'q>(
        &mut self,
        statement: Statement<'q>,
    ) -> Result<Vec<PgRow>, sqlx::Error> {
        statement.fetch_all(&mut **self).await
    }
}
