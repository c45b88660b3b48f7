//! Programmes and cohorts.
//!
//! Both are administered outside this backend; the enrolment service only
//! reads them. A cohort's capacity is fixed when it is created, usually from
//! its programme's default.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CohortId, ProgrammeId, UserId};

/// Validation errors for [`CohortSize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CohortSizeValidationError {
    /// Capacity must admit at least one participant.
    #[error("cohort size must be at least 1, got {0}")]
    NotPositive(i64),
    /// Capacity does not fit the storage column.
    #[error("cohort size {0} exceeds the supported maximum")]
    TooLarge(i64),
}

/// Maximum number of participants a cohort may admit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct CohortSize(u32);

impl CohortSize {
    /// Validate a capacity read from storage or configuration.
    ///
    /// # Examples
    /// ```
    /// use mentor_match::domain::CohortSize;
    ///
    /// assert_eq!(CohortSize::new(100).expect("valid size").get(), 100);
    /// assert!(CohortSize::new(0).is_err());
    /// ```
    pub fn new(value: i64) -> Result<Self, CohortSizeValidationError> {
        if value < 1 {
            return Err(CohortSizeValidationError::NotPositive(value));
        }
        u32::try_from(value)
            .map(Self)
            .map_err(|_| CohortSizeValidationError::TooLarge(value))
    }

    /// Capacity as a plain integer.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Whether a cohort holding `enrolled` participants has no free slot.
    pub fn is_full(self, enrolled: u64) -> bool {
        enrolled >= u64::from(self.0)
    }
}

impl TryFrom<i64> for CohortSize {
    type Error = CohortSizeValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CohortSize> for u32 {
    fn from(value: CohortSize) -> Self {
        value.0
    }
}

/// A named mentorship programme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Programme {
    /// Programme identifier.
    pub id: ProgrammeId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Capacity given to new cohorts unless overridden.
    pub default_cohort_size: CohortSize,
    /// User who created the programme.
    pub created_by: UserId,
}

/// One run of a programme that participants enrol into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cohort {
    /// Cohort identifier.
    pub id: CohortId,
    /// Owning programme.
    pub programme_id: ProgrammeId,
    /// User who opened the cohort.
    pub created_by: UserId,
    /// Maximum number of participants.
    pub cohort_size: CohortSize,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Cohort {
    /// Open a new cohort for `programme` using its default capacity.
    pub fn for_programme(programme: &Programme, created_by: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id: CohortId::random(),
            programme_id: programme.id.clone(),
            created_by,
            cohort_size: programme.default_cohort_size,
            created_at: now,
        }
    }
}
