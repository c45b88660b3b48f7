//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; repositories convert them to and
//! from domain types.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{cohorts, participant_tags, participants, tags};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = cohorts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CohortRow {
    pub id: Uuid,
    pub programme_id: Uuid,
    pub created_by: Uuid,
    pub cohort_size: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TagRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tags)]
pub(crate) struct NewTagRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub slug: &'a str,
}

/// Participant columns, used for both reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = participants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ParticipantRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub cohort_id: Uuid,
    pub is_mentor: bool,
    pub is_matched: bool,
    pub sign_up_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = participant_tags)]
pub(crate) struct ParticipantTagRow {
    pub participant_id: Uuid,
    pub tag_id: Uuid,
}
