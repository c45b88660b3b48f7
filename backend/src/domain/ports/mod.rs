//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by storage adapters; driving
//! ports (`EnrolmentCommand`, `ParticipantQuery`) are what inbound adapters
//! call. Each driven port has its own error enum so adapters map failures
//! into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod cohort_repository;
mod enrolment_command;
mod participant_query;
mod participant_repository;
mod tag_repository;

#[cfg(test)]
pub use cohort_repository::MockCohortRepository;
pub use cohort_repository::{CohortRepository, CohortRepositoryError};
#[cfg(test)]
pub use enrolment_command::MockEnrolmentCommand;
pub use enrolment_command::{EnrolmentCommand, EnrolmentRequest};
#[cfg(test)]
pub use participant_query::MockParticipantQuery;
pub use participant_query::ParticipantQuery;
#[cfg(test)]
pub use participant_repository::MockParticipantRepository;
pub use participant_repository::{ParticipantRepository, ParticipantRepositoryError};
#[cfg(test)]
pub use tag_repository::MockTagRepository;
pub use tag_repository::{TagRepository, TagRepositoryError};
