//! OpenAPI schema definitions for domain types.
//!
//! Domain types do not derive `ToSchema`; these wrappers mirror their wire
//! shape so the adapter layer owns every utoipa concern.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    #[schema(rename = "unauthorized")]
    Unauthorized,
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    #[schema(rename = "conflict")]
    Conflict,
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// `details.code` refines the category, e.g. `cohort_full` or
/// `already_enrolled`; validation failures list offending fields under
/// `details.fields`.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "cohort is full")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "6f1c2a8e-1d4b-4c1e-9a55-0c2d3b4a5e6f")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    #[schema(example = json!({"code": "cohort_full"}))]
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::FieldError`].
#[derive(ToSchema)]
#[schema(as = crate::domain::FieldError)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct FieldErrorSchema {
    /// JSON path of the offending field.
    #[schema(example = "tags[1]")]
    field: String,
    /// One of `missing_field`, `invalid_type`, `empty_tag`, `tag_too_long`,
    /// `invalid_tag`.
    #[schema(example = "empty_tag")]
    code: String,
    /// Human-readable explanation.
    #[schema(example = "tag must not be empty")]
    message: String,
}
