//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the participant and health endpoints, the schema
//! wrappers from [`crate::inbound::http::schemas`] that keep domain types free
//! of utoipa, and the session cookie security scheme. Swagger UI serves it in
//! debug builds.

use crate::inbound::http::participants::{EnrolmentPayload, ParticipantResponse, TagResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, FieldErrorSchema};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Signed session cookie issued by the identity subsystem.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Mentor Match enrolment API",
        description = "Cohort enrolment for mentors and mentees, plus health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::participants::enrol_participant,
        crate::inbound::http::participants::list_participants,
        crate::inbound::http::participants::get_participant,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        EnrolmentPayload,
        ParticipantResponse,
        TagResponse,
        ErrorSchema,
        ErrorCodeSchema,
        FieldErrorSchema
    )),
    tags(
        (name = "participants", description = "Cohort enrolment"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
