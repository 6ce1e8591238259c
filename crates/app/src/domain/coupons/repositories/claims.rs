//! Claims Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{
    FromRow, Row,
    error::{DatabaseError, ErrorKind},
    postgres::PgRow,
    query,
};

use crate::{
    database::Executor,
    domain::coupons::{errors::CouponsServiceError, records::ClaimRecord},
};

const INSERT_CLAIM_SQL: &str = include_str!("../sql/insert_claim.sql");
const LIST_CLAIMANTS_SQL: &str = include_str!("../sql/list_claimants.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgClaimsRepository;

impl PgClaimsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Record a claim in the ledger.
    ///
    /// The `(user_id, coupon_name)` unique constraint decides between racing
    /// inserts for the same pair; the loser gets `AlreadyClaimed`.
    pub(crate) async fn insert_claim(
        &self,
        executor: &mut dyn Executor,
        user_id: &str,
        coupon_name: &str,
    ) -> Result<ClaimRecord, CouponsServiceError> {
        let row = executor
            .query_row(query(INSERT_CLAIM_SQL).bind(user_id).bind(coupon_name))
            .await
            .map_err(|error| match error.as_database_error().map(DatabaseError::kind) {
                Some(ErrorKind::UniqueViolation) => CouponsServiceError::AlreadyClaimed,
                _ => CouponsServiceError::from(error),
            })?;

        Ok(ClaimRecord::from_row(&row)?)
    }

    pub(crate) async fn list_claimants(
        &self,
        executor: &mut dyn Executor,
        coupon_name: &str,
    ) -> Result<Vec<String>, CouponsServiceError> {
        let rows = executor
            .query_rows(query(LIST_CLAIMANTS_SQL).bind(coupon_name))
            .await?;

        let claimants = rows
            .iter()
            .map(|row| row.try_get::<String, _>("user_id"))
            .collect::<Result<_, _>>()?;

        Ok(claimants)
    }
}

impl<'r> FromRow<'r, PgRow> for ClaimRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            coupon_name: row.try_get("coupon_name")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
