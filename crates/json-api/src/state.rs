//! State

use std::sync::Arc;

use coupon_app::context::AppContext;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,

    /// Cancelled when the server begins shutting down.
    pub(crate) shutdown: CancellationToken,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext, shutdown: CancellationToken) -> Self {
        Self { app, shutdown }
    }

    #[must_use]
    pub(crate) fn shared(app: AppContext, shutdown: CancellationToken) -> Arc<Self> {
        Arc::new(Self::new(app, shutdown))
    }
}
