//! Driving port for reading enrolments.

use async_trait::async_trait;

use crate::domain::{CohortId, EnrolmentError, Participant, ParticipantId};

/// Domain use-case port for reading a cohort's participants.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParticipantQuery: Send + Sync {
    /// Participants of `cohort_id` ordered by sign-up date.
    ///
    /// Fails with [`EnrolmentError::CohortNotFound`] for unknown cohorts.
    async fn list_for_cohort(&self, cohort_id: &CohortId)
    -> Result<Vec<Participant>, EnrolmentError>;

    /// Fetch one participant, returning `None` when the id is unknown.
    async fn find(&self, id: &ParticipantId) -> Result<Option<Participant>, EnrolmentError>;
}
