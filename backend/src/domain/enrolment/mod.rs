//! Cohort enrolment: payload validation and the enrolment service.

mod application;
mod service;

pub use application::{EnrolmentApplication, FieldError, FieldErrorCode, FieldErrors};
pub use service::{EnrolmentError, EnrolmentService};
