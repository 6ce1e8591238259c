//! Coupons Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Row, postgres::PgRow, query};

use crate::{
    database::Executor,
    domain::coupons::{data::NewCoupon, errors::CouponsServiceError, records::CouponRecord},
};

const CREATE_COUPON_SQL: &str = include_str!("../sql/create_coupon.sql");
const GET_COUPON_SQL: &str = include_str!("../sql/get_coupon.sql");
const LOCK_COUPON_SQL: &str = include_str!("../sql/lock_coupon.sql");
const DECREMENT_COUPON_SQL: &str = include_str!("../sql/decrement_coupon.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCouponsRepository;

impl PgCouponsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_coupon(
        &self,
        executor: &mut dyn Executor,
        coupon: &NewCoupon,
    ) -> Result<CouponRecord, CouponsServiceError> {
        let amount = i64::try_from(coupon.amount)?;

        let row = executor
            .query_row(query(CREATE_COUPON_SQL).bind(coupon.name.as_str()).bind(amount))
            .await?;

        Ok(CouponRecord::from_row(&row)?)
    }

    pub(crate) async fn get_coupon(
        &self,
        executor: &mut dyn Executor,
        name: &str,
    ) -> Result<CouponRecord, CouponsServiceError> {
        let row = executor.query_row(query(GET_COUPON_SQL).bind(name)).await?;

        Ok(CouponRecord::from_row(&row)?)
    }

    /// Read the coupon row under an exclusive row lock.
    ///
    /// Must run inside an open transaction; the lock is held until that
    /// transaction commits or rolls back, and a concurrent caller blocks here
    /// until then.
    pub(crate) async fn lock_for_update(
        &self,
        executor: &mut dyn Executor,
        name: &str,
    ) -> Result<CouponRecord, CouponsServiceError> {
        let row = executor.query_row(query(LOCK_COUPON_SQL).bind(name)).await?;

        Ok(CouponRecord::from_row(&row)?)
    }

    /// Take one unit of stock. The caller must already hold the row lock and
    /// have seen `remaining_amount > 0`; no re-check happens here.
    pub(crate) async fn decrement(
        &self,
        executor: &mut dyn Executor,
        name: &str,
    ) -> Result<u64, CouponsServiceError> {
        let rows_affected = executor
            .execute(query(DECREMENT_COUPON_SQL).bind(name))
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CouponRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            name: row.try_get("name")?,
            amount: try_get_count(row, "amount")?,
            remaining_amount: try_get_count(row, "remaining_amount")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

fn try_get_count(row: &PgRow, column: &str) -> sqlx::Result<u64> {
    let value: i64 = row.try_get(column)?;

    u64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use testresult::TestResult;

    use crate::test::TestDb;

    use super::*;

    async fn seed(db: &TestDb, name: &str, amount: u64) -> Result<CouponRecord, CouponsServiceError> {
        let mut pool = db.pool().clone();

        PgCouponsRepository::new()
            .create_coupon(
                &mut pool,
                &NewCoupon {
                    name: name.to_string(),
                    amount,
                },
            )
            .await
    }

    #[tokio::test]
    async fn create_coupon_starts_with_full_stock() -> TestResult {
        let db = TestDb::new().await;

        let coupon = seed(&db, "spring-sale", 25).await?;

        assert_eq!(coupon.name, "spring-sale");
        assert_eq!(coupon.amount, 25);
        assert_eq!(coupon.remaining_amount, 25);

        Ok(())
    }

    #[tokio::test]
    async fn create_coupon_duplicate_name_returns_already_exists() -> TestResult {
        let db = TestDb::new().await;

        seed(&db, "dupe", 1).await?;
        let result = seed(&db, "dupe", 2).await;

        assert!(
            matches!(result, Err(CouponsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_coupon_zero_amount_violates_check() {
        let db = TestDb::new().await;

        let result = seed(&db, "empty", 0).await;

        assert!(
            matches!(result, Err(CouponsServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );
    }

    #[tokio::test]
    async fn create_coupon_amount_beyond_bigint_is_invalid_amount() {
        let db = TestDb::new().await;

        let result = seed(&db, "huge", u64::MAX).await;

        assert!(
            matches!(result, Err(CouponsServiceError::InvalidAmount(_))),
            "expected InvalidAmount, got {result:?}"
        );
    }

    #[tokio::test]
    async fn lock_for_update_unknown_coupon_returns_not_found() -> TestResult {
        let db = TestDb::new().await;
        let mut tx = db.begin_test_transaction().await;

        let result = PgCouponsRepository::new()
            .lock_for_update(&mut tx, "missing")
            .await;

        assert!(
            matches!(result, Err(CouponsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn decrement_takes_exactly_one_unit() -> TestResult {
        let db = TestDb::new().await;
        let repository = PgCouponsRepository::new();

        seed(&db, "one-off", 3).await?;

        let mut tx = db.begin_test_transaction().await;
        let locked = repository.lock_for_update(&mut tx, "one-off").await?;
        let affected = repository.decrement(&mut tx, "one-off").await?;
        tx.commit().await?;

        let mut pool = db.pool().clone();
        let after = repository.get_coupon(&mut pool, "one-off").await?;

        assert_eq!(locked.remaining_amount, 3);
        assert_eq!(affected, 1);
        assert_eq!(after.remaining_amount, 2);
        assert_eq!(after.amount, 3);

        Ok(())
    }

    #[tokio::test]
    async fn decrement_below_zero_is_rejected_by_check_constraint() -> TestResult {
        let db = TestDb::new().await;
        let repository = PgCouponsRepository::new();

        seed(&db, "last-one", 1).await?;

        let mut pool = db.pool().clone();
        repository.decrement(&mut pool, "last-one").await?;

        let result = repository.decrement(&mut pool, "last-one").await;

        assert!(
            matches!(result, Err(CouponsServiceError::InvalidData)),
            "expected InvalidData from the check constraint, got {result:?}"
        );

        let after = repository.get_coupon(&mut pool, "last-one").await?;
        assert_eq!(after.remaining_amount, 0);

        Ok(())
    }

    #[tokio::test]
    async fn lock_for_update_blocks_until_holder_finishes() -> TestResult {
        let db = TestDb::new().await;
        let repository = PgCouponsRepository::new();

        seed(&db, "contended", 2).await?;

        let mut holder = db.begin_test_transaction().await;
        repository.lock_for_update(&mut holder, "contended").await?;

        let pool = db.pool().clone();
        let waiter = tokio::spawn(async move {
            let repository = PgCouponsRepository::new();
            let mut tx = pool.begin().await?;
            let coupon = repository.lock_for_update(&mut tx, "contended").await?;
            tx.commit().await?;

            Ok::<_, CouponsServiceError>(coupon)
        });

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!waiter.is_finished(), "second locker should wait for the first");

        repository.decrement(&mut holder, "contended").await?;
        holder.commit().await?;

        let seen = waiter.await??;

        assert_eq!(seen.remaining_amount, 1, "waiter must observe the committed decrement");

        Ok(())
    }
}
