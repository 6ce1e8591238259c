//! App Router

use std::sync::Arc;

use salvo::{
    affix_state::inject,
    oapi::{OpenApi, swagger_ui::SwaggerUi},
    prelude::*,
    trailing_slash::remove_slash,
};

use crate::{coupons, healthcheck, observability, state::State};

/// Routes served by the coupon API, documented in the OpenAPI document.
pub(crate) fn app_router() -> Router {
    Router::with_path("coupons").post(coupons::create::handler).push(
        Router::with_path("{name}")
            .get(coupons::get::handler)
            .push(Router::with_path("claims").post(coupons::claim::handler)),
    )
}

/// The full service: shared hoops, state, operational routes and docs.
pub(crate) fn service(state: Arc<State>) -> Service {
    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(observability::request_logging)
        .hoop(remove_slash())
        .hoop(inject(state))
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(observability::metrics_handler))
        .push(app_router());

    let doc = OpenApi::new("Coupon API", env!("CARGO_PKG_VERSION")).merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    Service::new(router)
}
