//! Enrolment records joining a user to a cohort.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CohortId, ParticipantId, Tag, UserId};

/// A user's enrolment in a cohort.
///
/// At most one participant exists per `(user_id, cohort_id)` pair; storage
/// adapters enforce this with a uniqueness constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Enrolment identifier.
    pub id: ParticipantId,
    /// Enrolled user.
    pub user_id: UserId,
    /// Cohort the user joined.
    pub cohort_id: CohortId,
    /// Whether the user signed up as a mentor rather than a mentee.
    pub is_mentor: bool,
    /// Whether the participant has been paired yet.
    pub is_matched: bool,
    /// When the enrolment was recorded.
    pub sign_up_date: DateTime<Utc>,
    /// Interest and skill tags, deduplicated by slug.
    pub tags: Vec<Tag>,
}

/// A participant ready to be persisted.
///
/// Tags are already resolved to stored [`Tag`] rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParticipant {
    /// Enrolling user.
    pub user_id: UserId,
    /// Target cohort.
    pub cohort_id: CohortId,
    /// Mentor or mentee.
    pub is_mentor: bool,
    /// Creation time from the injected clock.
    pub sign_up_date: DateTime<Utc>,
    /// Resolved, deduplicated tags.
    pub tags: Vec<Tag>,
}

impl NewParticipant {
    /// Assign an identifier and the creation defaults.
    pub fn into_participant(self) -> Participant {
        Participant {
            id: ParticipantId::random(),
            user_id: self.user_id,
            cohort_id: self.cohort_id,
            is_mentor: self.is_mentor,
            is_matched: false,
            sign_up_date: self.sign_up_date,
            tags: self.tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn new_participant_starts_unmatched() {
        let now = Utc::now();
        let participant = NewParticipant {
            user_id: UserId::random(),
            cohort_id: CohortId::random(),
            is_mentor: true,
            sign_up_date: now,
            tags: Vec::new(),
        }
        .into_participant();

        assert!(!participant.is_matched);
        assert!(participant.is_mentor);
        assert_eq!(participant.sign_up_date, now);
    }

    #[rstest]
    fn participant_serialises_in_camel_case() {
        let participant = NewParticipant {
            user_id: UserId::random(),
            cohort_id: CohortId::random(),
            is_mentor: false,
            sign_up_date: Utc::now(),
            tags: Vec::new(),
        }
        .into_participant();

        let value = serde_json::to_value(&participant).expect("serialise participant");
        assert_eq!(value["isMentor"], json!(false));
        assert_eq!(value["isMatched"], json!(false));
        assert_eq!(value["userId"], json!(participant.user_id.to_string()));
        assert!(value.get("signUpDate").is_some());
        assert_eq!(value["tags"], json!([]));
    }
}
