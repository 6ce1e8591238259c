//! Coupon Handlers

use salvo::prelude::StatusError;

pub(crate) mod claim;
pub(crate) mod create;
pub(crate) mod get;

/// Trim a required text field, rejecting blanks with a 400.
fn required<'a>(value: &'a str, field: &str) -> Result<&'a str, StatusError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(StatusError::bad_request().brief(format!("{field} must not be empty")));
    }

    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_surrounding_whitespace() {
        assert_eq!(required("  alice ", "user_id").ok(), Some("alice"));
    }

    #[test]
    fn required_rejects_blank_values() {
        let error = required("   ", "user_id").err();

        assert_eq!(
            error.map(|error| error.code),
            Some(salvo::http::StatusCode::BAD_REQUEST)
        );
    }
}
