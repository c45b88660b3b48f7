//! Cohort participant HTTP handlers.
//!
//! ```text
//! POST /api/v1/cohorts/{cohortId}/participants
//! GET  /api/v1/cohorts/{cohortId}/participants
//! GET  /api/v1/cohorts/{cohortId}/participants/{participantId}
//! ```

use actix_web::{HttpResponse, get, http::header, post, web};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;

use crate::domain::ports::EnrolmentRequest;
use crate::domain::{
    CohortId, EnrolmentApplication, EnrolmentError, Error, Participant, ParticipantId, Tag,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{COHORT_ID, PARTICIPANT_ID, body_error, parse_path_id};

/// Request payload for joining a cohort.
///
/// Members are kept as raw JSON so type errors are reported per field
/// alongside every other validation problem.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrolmentPayload {
    /// Join as a mentor (`true`) or mentee (`false`). Required.
    #[schema(value_type = bool, example = true)]
    pub is_mentor: Option<Value>,
    /// Interest or skill labels; names that differ only in case, spacing or
    /// separators count as one tag.
    #[schema(value_type = Option<Vec<String>>, example = json!(["node.js", "Sports"]))]
    pub tags: Option<Value>,
}

/// Tag attached to a participant.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagResponse {
    /// Tag identifier.
    #[schema(format = Uuid)]
    pub id: String,
    /// Display name as first submitted.
    #[schema(example = "node.js")]
    pub name: String,
    /// Normalised name used for deduplication.
    #[schema(example = "nodejs")]
    pub slug: String,
}

impl From<Tag> for TagResponse {
    fn from(value: Tag) -> Self {
        Self {
            id: value.id.into(),
            name: value.name.into(),
            slug: value.slug.into(),
        }
    }
}

/// Enrolment record returned to clients.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantResponse {
    /// Participant identifier.
    #[schema(format = Uuid)]
    pub id: String,
    /// Enrolled user.
    #[schema(format = Uuid)]
    pub user_id: String,
    /// Cohort joined.
    #[schema(format = Uuid)]
    pub cohort_id: String,
    /// Mentor or mentee.
    pub is_mentor: bool,
    /// Whether a pairing has been made; `false` on creation.
    pub is_matched: bool,
    /// RFC 3339 timestamp.
    #[schema(format = DateTime)]
    pub sign_up_date: String,
    /// Attached tags ordered by slug.
    pub tags: Vec<TagResponse>,
}

impl From<Participant> for ParticipantResponse {
    fn from(value: Participant) -> Self {
        Self {
            id: value.id.into(),
            user_id: value.user_id.into(),
            cohort_id: value.cohort_id.into(),
            is_mentor: value.is_mentor,
            is_matched: value.is_matched,
            sign_up_date: value.sign_up_date.to_rfc3339(),
            tags: value.tags.into_iter().map(TagResponse::from).collect(),
        }
    }
}

fn participant_location(participant: &Participant) -> String {
    format!(
        "/api/v1/cohorts/{}/participants/{}",
        participant.cohort_id, participant.id
    )
}

fn participant_not_found(id: &ParticipantId) -> Error {
    Error::not_found("participant not found").with_details(json!({
        "code": "participant_not_found",
        "participantId": id,
    }))
}

/// Enrol the authenticated user in a cohort.
///
/// Body errors are deferred so anonymous callers always get 401.
#[utoipa::path(
    post,
    path = "/api/v1/cohorts/{cohort_id}/participants",
    request_body = EnrolmentPayload,
    params(("cohort_id" = String, Path, description = "Cohort to join")),
    responses(
        (
            status = 201,
            description = "Participant created",
            headers(("Location" = String, description = "URL of the new participant")),
            body = ParticipantResponse
        ),
        (status = 400, description = "Invalid fields or cohort full", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Cohort not found", body = ErrorSchema),
        (status = 409, description = "Already enrolled in this cohort", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["participants"],
    operation_id = "enrolParticipant"
)]
#[post("/cohorts/{cohort_id}/participants")]
pub async fn enrol_participant(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: Result<web::Json<EnrolmentPayload>, actix_web::Error>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let cohort_id: CohortId = parse_path_id(path.into_inner(), COHORT_ID)?;
    let payload = payload.map_err(body_error)?.into_inner();
    let application =
        EnrolmentApplication::from_raw(payload.is_mentor.as_ref(), payload.tags.as_ref())
            .map_err(EnrolmentError::from)?;

    let participant = state
        .enrolment
        .enrol(EnrolmentRequest {
            user_id,
            cohort_id,
            application,
        })
        .await?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, participant_location(&participant)))
        .json(ParticipantResponse::from(participant)))
}

/// List a cohort's participants ordered by sign-up date.
#[utoipa::path(
    get,
    path = "/api/v1/cohorts/{cohort_id}/participants",
    params(("cohort_id" = String, Path, description = "Cohort to list")),
    responses(
        (status = 200, description = "Participants", body = [ParticipantResponse]),
        (status = 400, description = "Invalid cohort id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Cohort not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["participants"],
    operation_id = "listParticipants"
)]
#[get("/cohorts/{cohort_id}/participants")]
pub async fn list_participants(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<ParticipantResponse>>> {
    session.require_user_id()?;
    let cohort_id: CohortId = parse_path_id(path.into_inner(), COHORT_ID)?;
    let participants = state.participants.list_for_cohort(&cohort_id).await?;
    Ok(web::Json(
        participants
            .into_iter()
            .map(ParticipantResponse::from)
            .collect(),
    ))
}

/// Fetch one participant of a cohort.
#[utoipa::path(
    get,
    path = "/api/v1/cohorts/{cohort_id}/participants/{participant_id}",
    params(
        ("cohort_id" = String, Path, description = "Owning cohort"),
        ("participant_id" = String, Path, description = "Participant to fetch")
    ),
    responses(
        (status = 200, description = "Participant", body = ParticipantResponse),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Participant not found", body = ErrorSchema)
    ),
    tags = ["participants"],
    operation_id = "getParticipant"
)]
#[get("/cohorts/{cohort_id}/participants/{participant_id}")]
pub async fn get_participant(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<ParticipantResponse>> {
    session.require_user_id()?;
    let (raw_cohort, raw_participant) = path.into_inner();
    let cohort_id: CohortId = parse_path_id(raw_cohort, COHORT_ID)?;
    let participant_id: ParticipantId = parse_path_id(raw_participant, PARTICIPANT_ID)?;

    match state.participants.find(&participant_id).await? {
        Some(participant) if participant.cohort_id.as_uuid() == cohort_id.as_uuid() => {
            Ok(web::Json(ParticipantResponse::from(participant)))
        }
        _ => Err(participant_not_found(&participant_id)),
    }
}

#[cfg(test)]
#[path = "participants_tests.rs"]
mod tests;
