//! Coupons service.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span, debug, error, field, info, info_span, warn};

use crate::{
    database::Db,
    domain::coupons::{
        data::{NewClaim, NewCoupon},
        errors::CouponsServiceError,
        records::{CouponDetails, CouponRecord},
        repositories::{PgClaimsRepository, PgCouponsRepository},
    },
};

pub const DEFAULT_CLAIM_TIMEOUT_MS: u64 = 5_000;

/// Upper bound on a claim attempt up to its commit, row-lock wait included.
pub const DEFAULT_CLAIM_TIMEOUT: Duration = Duration::from_millis(DEFAULT_CLAIM_TIMEOUT_MS);

/// How far a claim attempt got before it committed or was rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimStage {
    Started,
    Locked,
    Validated,
    Claimed,
    Decremented,
    Committed,
}

impl ClaimStage {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Locked => "locked",
            Self::Validated => "validated",
            Self::Claimed => "claimed",
            Self::Decremented => "decremented",
            Self::Committed => "committed",
        }
    }

    fn record(self) {
        Span::current().record("stage", self.as_str());
    }
}

impl fmt::Display for ClaimStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct PgCouponsService {
    db: Db,
    coupons_repository: PgCouponsRepository,
    claims_repository: PgClaimsRepository,
    claim_timeout: Duration,
}

impl PgCouponsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            coupons_repository: PgCouponsRepository::new(),
            claims_repository: PgClaimsRepository::new(),
            claim_timeout: DEFAULT_CLAIM_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_claim_timeout(mut self, claim_timeout: Duration) -> Self {
        self.claim_timeout = claim_timeout;
        self
    }

    /// Run one attempt up to, but not including, its commit.
    ///
    /// Every early return rolls back; if the future is dropped instead,
    /// dropping the transaction does.
    async fn prepare_claim(
        &self,
        claim: &NewClaim,
    ) -> Result<Transaction<'static, Postgres>, CouponsServiceError> {
        let mut tx = self.db.begin_with_lock_timeout(self.claim_timeout).await?;

        ClaimStage::Started.record();

        if let Err(error) = self.claim_in(&mut tx, claim).await {
            if let Err(rollback_error) = tx.rollback().await {
                warn!(error = %rollback_error, "failed to roll back claim transaction");
            }

            return Err(error);
        }

        Ok(tx)
    }

    async fn commit_claim(tx: Transaction<'static, Postgres>) -> Result<(), CouponsServiceError> {
        tx.commit().await?;

        ClaimStage::Committed.record();

        Ok(())
    }

    async fn claim_in(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        claim: &NewClaim,
    ) -> Result<(), CouponsServiceError> {
        let coupon = self
            .coupons_repository
            .lock_for_update(tx, &claim.coupon_name)
            .await?;

        ClaimStage::Locked.record();

        if coupon.remaining_amount == 0 {
            return Err(CouponsServiceError::OutOfStock);
        }

        ClaimStage::Validated.record();

        self.claims_repository
            .insert_claim(tx, &claim.user_id, &claim.coupon_name)
            .await?;

        ClaimStage::Claimed.record();

        let rows_affected = self
            .coupons_repository
            .decrement(tx, &claim.coupon_name)
            .await?;

        if rows_affected == 0 {
            return Err(CouponsServiceError::NotFound);
        }

        ClaimStage::Decremented.record();

        Ok(())
    }
}

fn log_claim_outcome(result: &Result<(), CouponsServiceError>) {
    match result {
        Ok(()) => info!("coupon claimed"),
        Err(error) if error.is_rejection() => debug!(%error, "claim rejected"),
        Err(error @ (CouponsServiceError::Cancelled | CouponsServiceError::TimedOut)) => {
            warn!(%error, "claim abandoned");
        }
        Err(
            error @ (CouponsServiceError::Unavailable(source) | CouponsServiceError::Sql(source)),
        ) => {
            error!(%error, %source, "claim failed");
        }
        Err(error) => error!(%error, "claim failed"),
    }
}

#[async_trait]
impl CouponsService for PgCouponsService {
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<CouponRecord, CouponsServiceError> {
        let mut pool = self.db.pool().clone();

        let created = self
            .coupons_repository
            .create_coupon(&mut pool, &coupon)
            .await?;

        info!(coupon = %created.name, amount = created.amount, "coupon created");

        Ok(created)
    }

    async fn get_coupon(&self, name: &str) -> Result<CouponDetails, CouponsServiceError> {
        let mut pool = self.db.pool().clone();

        let coupon = self.coupons_repository.get_coupon(&mut pool, name).await?;

        let claimed_by = self
            .claims_repository
            .list_claimants(&mut pool, name)
            .await?;

        Ok(CouponDetails { coupon, claimed_by })
    }

    async fn ping(&self) -> Result<(), CouponsServiceError> {
        self.db.ping().await?;

        Ok(())
    }

    async fn claim_coupon(
        &self,
        claim: NewClaim,
        cancel: CancellationToken,
    ) -> Result<(), CouponsServiceError> {
        let span = info_span!(
            "coupon.claim",
            coupon = %claim.coupon_name,
            user = %claim.user_id,
            stage = field::Empty
        );

        async {
            let prepared = tokio::select! {
                biased;

                () = cancel.cancelled() => Err(CouponsServiceError::Cancelled),

                attempt = timeout(self.claim_timeout, self.prepare_claim(&claim)) => {
                    attempt.unwrap_or(Err(CouponsServiceError::TimedOut))
                }
            };

            // The commit is never raced: its result is the claim's result.
            let result = match prepared {
                Ok(tx) => Self::commit_claim(tx).await,
                Err(error) => Err(error),
            };

            log_claim_outcome(&result);

            result
        }
        .instrument(span)
        .await
    }
}

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Create a coupon with its full amount in stock.
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<CouponRecord, CouponsServiceError>;

    /// Retrieve a coupon and the users that have claimed it, in claim order.
    async fn get_coupon(&self, name: &str) -> Result<CouponDetails, CouponsServiceError>;

    /// Claim one unit of a coupon for a user.
    ///
    /// Succeeds at most once per user and coupon, and never takes stock below
    /// zero. Firing `cancel` before the attempt reaches its commit abandons it
    /// and rolls back anything it did; a commit already under way is awaited
    /// and its result returned.
    async fn claim_coupon(
        &self,
        claim: NewClaim,
        cancel: CancellationToken,
    ) -> Result<(), CouponsServiceError>;

    /// Check that the coupon store can be reached.
    async fn ping(&self) -> Result<(), CouponsServiceError>;
}
