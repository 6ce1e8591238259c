//! Healthcheck Handler

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::extensions::*;

/// Healthcheck response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// `ok`, or `unavailable` when the coupon store cannot be reached
    pub status: String,
}

/// Healthcheck handler
///
/// Reports whether the server can reach its database.
#[endpoint(
    tags("health"),
    summary = "Health check endpoint",
    responses(
        (status_code = StatusCode::OK, description = "Database reachable", body = HealthResponse),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Database unreachable", body = HealthResponse),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<HealthResponse>, StatusError> {
    let state = depot.state_or_500()?;

    let status = match state.app.coupons.ping().await {
        Ok(()) => "ok",
        Err(error) => {
            warn!(%error, "healthcheck failed to reach the database");
            res.status_code(StatusCode::SERVICE_UNAVAILABLE);

            "unavailable"
        }
    };

    Ok(Json(HealthResponse {
        status: status.to_string(),
    }))
}
