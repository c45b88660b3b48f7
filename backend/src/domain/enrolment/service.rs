//! Enrolment domain service.
//!
//! Implements the [`EnrolmentCommand`] and [`ParticipantQuery`] driving ports.
//! An enrolment runs these steps in order:
//!
//! 1. look up the cohort;
//! 2. reject the request when the cohort is already at capacity;
//! 3. resolve each distinct tag slug to a stored tag, creating missing ones;
//! 4. insert the participant, letting storage reject duplicate enrolments.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    CohortRepository, CohortRepositoryError, EnrolmentCommand, EnrolmentRequest,
    ParticipantQuery, ParticipantRepository, ParticipantRepositoryError, TagRepository,
    TagRepositoryError,
};
use crate::domain::{
    Cohort, CohortId, Error, NewParticipant, Participant, ParticipantId, Tag, TagName, TagSlug,
};

use super::FieldErrors;

/// Reasons an enrolment or participant lookup fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnrolmentError {
    /// The payload failed field validation.
    #[error("{0}")]
    InvalidFields(FieldErrors),
    /// No cohort has the requested id.
    #[error("cohort {cohort_id} does not exist")]
    CohortNotFound { cohort_id: CohortId },
    /// The cohort has no free slot.
    #[error("cohort {cohort_id} is full")]
    CohortFull { cohort_id: CohortId },
    /// The user already holds a place in the cohort.
    #[error("user is already enrolled in cohort {cohort_id}")]
    AlreadyEnrolled { cohort_id: CohortId },
    /// Storage could not be reached.
    #[error("storage unavailable: {message}")]
    Unavailable { message: String },
    /// Storage failed for another reason.
    #[error("storage failure: {message}")]
    Storage { message: String },
}

impl From<FieldErrors> for EnrolmentError {
    fn from(value: FieldErrors) -> Self {
        Self::InvalidFields(value)
    }
}

impl From<EnrolmentError> for Error {
    fn from(value: EnrolmentError) -> Self {
        match value {
            EnrolmentError::InvalidFields(fields) => {
                Error::invalid_request("request contains invalid fields").with_details(json!({
                    "code": "invalid_fields",
                    "fields": fields,
                }))
            }
            EnrolmentError::CohortFull { cohort_id } => Error::invalid_request("cohort is full")
                .with_details(json!({
                    "code": "cohort_full",
                    "cohortId": cohort_id,
                })),
            EnrolmentError::CohortNotFound { cohort_id } => Error::not_found("cohort not found")
                .with_details(json!({
                    "code": "cohort_not_found",
                    "cohortId": cohort_id,
                })),
            EnrolmentError::AlreadyEnrolled { cohort_id } => {
                Error::conflict("user is already enrolled in this cohort").with_details(json!({
                    "code": "already_enrolled",
                    "cohortId": cohort_id,
                }))
            }
            EnrolmentError::Unavailable { message } => Error::service_unavailable(message),
            EnrolmentError::Storage { message } => Error::internal(message),
        }
    }
}

fn map_cohort_error(error: CohortRepositoryError) -> EnrolmentError {
    match error {
        CohortRepositoryError::Connection { message } => EnrolmentError::Unavailable {
            message: format!("cohort repository unavailable: {message}"),
        },
        CohortRepositoryError::Query { message } => EnrolmentError::Storage {
            message: format!("cohort repository error: {message}"),
        },
    }
}

fn map_tag_error(error: TagRepositoryError) -> EnrolmentError {
    match error {
        TagRepositoryError::Connection { message } => EnrolmentError::Unavailable {
            message: format!("tag repository unavailable: {message}"),
        },
        TagRepositoryError::Query { message } => EnrolmentError::Storage {
            message: format!("tag repository error: {message}"),
        },
        TagRepositoryError::DuplicateSlug { slug } => EnrolmentError::Storage {
            message: format!("unexpected tag slug conflict: {slug}"),
        },
    }
}

fn map_participant_error(cohort_id: &CohortId, error: ParticipantRepositoryError) -> EnrolmentError {
    match error {
        ParticipantRepositoryError::Connection { message } => EnrolmentError::Unavailable {
            message: format!("participant repository unavailable: {message}"),
        },
        ParticipantRepositoryError::Query { message } => EnrolmentError::Storage {
            message: format!("participant repository error: {message}"),
        },
        ParticipantRepositoryError::DuplicateEnrolment { .. } => EnrolmentError::AlreadyEnrolled {
            cohort_id: cohort_id.clone(),
        },
        ParticipantRepositoryError::CohortFull { .. } => EnrolmentError::CohortFull {
            cohort_id: cohort_id.clone(),
        },
        ParticipantRepositoryError::CohortMissing { .. } => EnrolmentError::CohortNotFound {
            cohort_id: cohort_id.clone(),
        },
    }
}

/// Enrolment service implementing the driving ports.
#[derive(Clone)]
pub struct EnrolmentService<C, P, T> {
    cohorts: Arc<C>,
    participants: Arc<P>,
    tags: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<C, P, T> EnrolmentService<C, P, T> {
    /// Create a new service with the given repositories and clock.
    pub fn new(cohorts: Arc<C>, participants: Arc<P>, tags: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            cohorts,
            participants,
            tags,
            clock,
        }
    }
}

impl<C, P, T> EnrolmentService<C, P, T>
where
    C: CohortRepository,
    P: ParticipantRepository,
    T: TagRepository,
{
    async fn ensure_cohort_exists(
        &self,
        cohort_id: &CohortId,
    ) -> Result<Cohort, EnrolmentError> {
        self.cohorts
            .find_by_id(cohort_id)
            .await
            .map_err(map_cohort_error)?
            .ok_or_else(|| EnrolmentError::CohortNotFound {
                cohort_id: cohort_id.clone(),
            })
    }

    async fn resolve_tag(&self, slug: TagSlug, name: TagName) -> Result<Tag, EnrolmentError> {
        if let Some(existing) = self
            .tags
            .find_by_slug(&slug)
            .await
            .map_err(map_tag_error)?
        {
            return Ok(existing);
        }

        let tag = Tag::new(name);
        match self.tags.create(&tag).await {
            Ok(()) => {
                debug!(slug = %slug, tag_id = %tag.id, "created tag");
                Ok(tag)
            }
            Err(TagRepositoryError::DuplicateSlug { .. }) => {
                // Lost a race against a concurrent create; reuse the winner.
                self.tags
                    .find_by_slug(&slug)
                    .await
                    .map_err(map_tag_error)?
                    .ok_or_else(|| EnrolmentError::Storage {
                        message: format!("tag {slug} missing after slug conflict"),
                    })
            }
            Err(err) => Err(map_tag_error(err)),
        }
    }
}

#[async_trait]
impl<C, P, T> EnrolmentCommand for EnrolmentService<C, P, T>
where
    C: CohortRepository,
    P: ParticipantRepository,
    T: TagRepository,
{
    async fn enrol(&self, request: EnrolmentRequest) -> Result<Participant, EnrolmentError> {
        let EnrolmentRequest {
            user_id,
            cohort_id,
            application,
        } = request;

        let cohort = self.ensure_cohort_exists(&cohort_id).await?;
        let enrolled = self
            .participants
            .count_for_cohort(&cohort_id)
            .await
            .map_err(|err| map_participant_error(&cohort_id, err))?;
        if cohort.cohort_size.is_full(enrolled) {
            debug!(
                cohort_id = %cohort_id,
                enrolled,
                capacity = cohort.cohort_size.get(),
                "rejecting enrolment into full cohort"
            );
            return Err(EnrolmentError::CohortFull { cohort_id });
        }

        let mut tags = Vec::new();
        for (slug, name) in application.unique_tags() {
            tags.push(self.resolve_tag(slug, name).await?);
        }

        let participant = NewParticipant {
            user_id,
            cohort_id: cohort_id.clone(),
            is_mentor: application.is_mentor(),
            sign_up_date: self.clock.utc(),
            tags,
        }
        .into_participant();

        self.participants
            .insert(&participant)
            .await
            .map_err(|err| map_participant_error(&cohort_id, err))?;

        info!(
            participant_id = %participant.id,
            cohort_id = %cohort_id,
            is_mentor = participant.is_mentor,
            tags = participant.tags.len(),
            "participant enrolled"
        );
        Ok(participant)
    }
}

#[async_trait]
impl<C, P, T> ParticipantQuery for EnrolmentService<C, P, T>
where
    C: CohortRepository,
    P: ParticipantRepository,
    T: TagRepository,
{
    async fn list_for_cohort(
        &self,
        cohort_id: &CohortId,
    ) -> Result<Vec<Participant>, EnrolmentError> {
        self.ensure_cohort_exists(cohort_id).await?;
        self.participants
            .list_for_cohort(cohort_id)
            .await
            .map_err(|err| map_participant_error(cohort_id, err))
    }

    async fn find(&self, id: &ParticipantId) -> Result<Option<Participant>, EnrolmentError> {
        self.participants
            .find(id)
            .await
            .map_err(|err| EnrolmentError::from_lookup(id, err))
    }
}

impl EnrolmentError {
    fn from_lookup(id: &ParticipantId, error: ParticipantRepositoryError) -> Self {
        match error {
            ParticipantRepositoryError::Connection { message } => Self::Unavailable {
                message: format!("participant repository unavailable: {message}"),
            },
            other => Self::Storage {
                message: format!("failed to load participant {id}: {other}"),
            },
        }
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
