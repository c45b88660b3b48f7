//! Driving port for enrolling users into cohorts.
//!
//! Inbound adapters validate the raw payload into an
//! [`EnrolmentApplication`](crate::domain::EnrolmentApplication) and hand it
//! over with the caller's identity.

use async_trait::async_trait;

use crate::domain::{CohortId, EnrolmentApplication, EnrolmentError, Participant, UserId};

/// A validated enrolment request for one user and cohort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrolmentRequest {
    /// Authenticated applicant.
    pub user_id: UserId,
    /// Cohort being joined.
    pub cohort_id: CohortId,
    /// Validated payload.
    pub application: EnrolmentApplication,
}

/// Domain use-case port for enrolling a participant.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrolmentCommand: Send + Sync {
    /// Enrol the user, resolving tags and enforcing capacity and uniqueness.
    async fn enrol(&self, request: EnrolmentRequest) -> Result<Participant, EnrolmentError>;
}
