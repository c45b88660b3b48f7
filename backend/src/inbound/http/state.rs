//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and only see the driving ports, so
//! they can be tested with mocks and no storage at all.

use std::sync::Arc;

use crate::domain::ports::{EnrolmentCommand, ParticipantQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Enrolment use case.
    pub enrolment: Arc<dyn EnrolmentCommand>,
    /// Participant reads.
    pub participants: Arc<dyn ParticipantQuery>,
}

impl HttpState {
    /// Bundle the enrolment command and participant query ports.
    ///
    /// A single service usually implements both; pass it twice.
    pub fn new(
        enrolment: Arc<dyn EnrolmentCommand>,
        participants: Arc<dyn ParticipantQuery>,
    ) -> Self {
        Self {
            enrolment,
            participants,
        }
    }
}
