//! Builders wiring repositories into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use mentor_match::domain::EnrolmentService;
use mentor_match::domain::ports::{EnrolmentCommand, ParticipantQuery};
use mentor_match::inbound::http::state::HttpState;
use mentor_match::outbound::persistence::{
    DbPool, DieselCohortRepository, DieselParticipantRepository, DieselTagRepository,
};

fn state_from_service<S>(service: S) -> web::Data<HttpState>
where
    S: EnrolmentCommand + ParticipantQuery + 'static,
{
    let service = Arc::new(service);
    web::Data::new(HttpState::new(service.clone(), service))
}

/// Build handler state backed by the PostgreSQL repositories.
pub(super) fn build_http_state(pool: &DbPool) -> web::Data<HttpState> {
    state_from_service(EnrolmentService::new(
        Arc::new(DieselCohortRepository::new(pool.clone())),
        Arc::new(DieselParticipantRepository::new(pool.clone())),
        Arc::new(DieselTagRepository::new(pool.clone())),
        Arc::new(DefaultClock),
    ))
}

/// Build handler state over a shared in-memory store.
#[cfg(test)]
pub(super) fn memory_http_state(
    store: mentor_match::outbound::memory::InMemoryStore,
) -> web::Data<HttpState> {
    let store = Arc::new(store);
    state_from_service(EnrolmentService::new(
        store.clone(),
        store.clone(),
        store,
        Arc::new(DefaultClock),
    ))
}
