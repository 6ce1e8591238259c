//! Route labels for request spans and metrics.

/// Collapse coupon names in a request path so labels stay low-cardinality.
pub(super) fn route_label(path: &str) -> String {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    match segments.as_slice() {
        [""] => "/".to_owned(),
        ["coupons", _] => "/coupons/{name}".to_owned(),
        ["coupons", _, rest @ ..] => format!("/coupons/{{name}}/{}", rest.join("/")),
        _ => format!("/{}", segments.join("/")),
    }
}
