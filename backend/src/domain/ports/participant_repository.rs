//! Port for participant persistence.
//!
//! The [`ParticipantRepository`] trait stores enrolment records together with
//! their tag links. Adapters own two guarantees the domain relies on:
//!
//! - a `(user_id, cohort_id)` pair is stored at most once, and a second insert
//!   fails with [`ParticipantRepositoryError::DuplicateEnrolment`];
//! - an insert re-checks the cohort's capacity atomically with the write and
//!   fails with [`ParticipantRepositoryError::CohortFull`] when no slot is
//!   left.

use async_trait::async_trait;

use crate::domain::{CohortId, Participant, ParticipantId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by participant repository adapters.
    pub enum ParticipantRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "participant repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "participant repository query failed: {message}",
        /// The user is already enrolled in the cohort.
        DuplicateEnrolment { cohort_id: String } =>
            "user is already enrolled in cohort {cohort_id}",
        /// The cohort filled up before the insert committed.
        CohortFull { cohort_id: String } =>
            "cohort {cohort_id} has no free slot",
        /// The cohort vanished before the insert committed.
        CohortMissing { cohort_id: String } =>
            "cohort {cohort_id} does not exist",
    }
}

/// Storage for enrolment records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    /// Number of participants currently enrolled in `cohort_id`.
    async fn count_for_cohort(&self, cohort_id: &CohortId)
    -> Result<u64, ParticipantRepositoryError>;

    /// Persist a participant and link its tags in one atomic step.
    ///
    /// The tags must already exist.
    async fn insert(&self, participant: &Participant) -> Result<(), ParticipantRepositoryError>;

    /// Participants of a cohort ordered by sign-up date.
    async fn list_for_cohort(
        &self,
        cohort_id: &CohortId,
    ) -> Result<Vec<Participant>, ParticipantRepositoryError>;

    /// Fetch one participant with its tags.
    async fn find(
        &self,
        id: &ParticipantId,
    ) -> Result<Option<Participant>, ParticipantRepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(
        ParticipantRepositoryError::duplicate_enrolment("c-1"),
        "user is already enrolled in cohort c-1"
    )]
    #[case(ParticipantRepositoryError::cohort_full("c-2"), "cohort c-2 has no free slot")]
    #[case(
        ParticipantRepositoryError::connection("refused"),
        "participant repository connection failed: refused"
    )]
    fn error_messages(#[case] error: ParticipantRepositoryError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }
}
