//! Shared validation helpers for inbound HTTP adapters.

use actix_web::HttpRequest;
use actix_web::error::JsonPayloadError;
use serde_json::json;

use crate::domain::{Error, IdValidationError};

/// Newtype wrapper for client-facing field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const COHORT_ID: FieldName = FieldName::new("cohortId");
pub(crate) const PARTICIPANT_ID: FieldName = FieldName::new("participantId");

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("{field} must be a valid UUID")).with_details(json!({
        "field": field,
        "value": value,
        "code": "invalid_uuid",
    }))
}

/// Parse a UUID path segment into one of the domain identifier types.
pub(crate) fn parse_path_id<T>(raw: String, field: FieldName) -> Result<T, Error>
where
    T: TryFrom<String, Error = IdValidationError>,
{
    let error = invalid_uuid_error(field, &raw);
    T::try_from(raw).map_err(|_| error)
}

/// Recover the envelope built by [`json_error_handler`] from a deferred
/// body extraction error.
pub(crate) fn body_error(err: actix_web::Error) -> Error {
    err.as_error::<Error>()
        .cloned()
        .unwrap_or_else(|| Error::invalid_request("request body is not valid JSON"))
}

/// `JsonConfig` error handler rendering body problems as `invalid_request`.
///
/// Without it actix answers malformed bodies with a plain-text 400.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let (message, code) = match &err {
        JsonPayloadError::ContentType => ("request body must be application/json", "invalid_content_type"),
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            ("request body is too large", "payload_too_large")
        }
        _ => ("request body is not valid JSON", "malformed_json"),
    };
    Error::invalid_request(message)
        .with_details(json!({ "code": code, "reason": err.to_string() }))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CohortId, ErrorCode};
    use rstest::rstest;

    #[rstest]
    fn parse_path_id_accepts_uuid() {
        let id: CohortId =
            parse_path_id("3fa85f64-5717-4562-b3fc-2c963f66afa6".to_owned(), COHORT_ID)
                .expect("valid id");
        assert_eq!(id.as_ref(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[rstest]
    #[case("")]
    #[case("cohort-1")]
    fn parse_path_id_reports_field_and_value(#[case] raw: &str) {
        let err = parse_path_id::<CohortId>(raw.to_owned(), COHORT_ID).expect_err("invalid id");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            err.details(),
            Some(&json!({"field": "cohortId", "value": raw, "code": "invalid_uuid"}))
        );
    }
}
