//! Cohort enrolment backend for mentorship programmes.
//!
//! Users join a cohort as mentor or mentee and label themselves with tags.
//! The crate is laid out hexagonally: [`domain`] owns the rules and the port
//! traits, [`inbound`] adapts HTTP onto them, and [`outbound`] implements the
//! ports over PostgreSQL or an in-process store.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
