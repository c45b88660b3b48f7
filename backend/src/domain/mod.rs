//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities for cohort enrolment and the
//! service that enforces enrolment rules. Adapters reach the domain only
//! through the traits in [`ports`].
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic error payload.
//! - `Cohort`, `Programme`, `CohortSize`: externally administered runs.
//! - `Participant`, `Tag`, `TagName`, `TagSlug`: enrolment records and labels.
//! - `EnrolmentService`: implements `EnrolmentCommand` and `ParticipantQuery`.

pub mod cohort;
pub mod enrolment;
pub mod error;
pub mod ids;
pub mod participant;
pub mod ports;
pub mod slug;
pub mod tag;
pub mod trace_id;
pub mod user;

pub use self::cohort::{Cohort, CohortSize, CohortSizeValidationError, Programme};
pub use self::enrolment::{
    EnrolmentApplication, EnrolmentError, EnrolmentService, FieldError, FieldErrorCode,
    FieldErrors,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{CohortId, IdValidationError, ParticipantId, ProgrammeId, TagId};
pub use self::participant::{NewParticipant, Participant};
pub use self::slug::slugify;
pub use self::tag::{TAG_NAME_MAX, Tag, TagName, TagSlug, TagValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{UserId, UserIdValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use mentor_match::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
