//! PostgreSQL-backed `ParticipantRepository`.
//!
//! An insert runs in one transaction that locks the cohort row with
//! `SELECT ... FOR UPDATE`, re-counts its participants, mirrors the user id
//! into `users`, writes the participant and links its tags. Concurrent enrolments into the same cohort
//! therefore serialise on the lock and cannot overfill it. The
//! `(user_id, cohort_id)` unique constraint rejects duplicate enrolment.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::ports::{ParticipantRepository, ParticipantRepositoryError};
use crate::domain::{CohortId, Participant, ParticipantId, Tag, UserId};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::diesel_tag_repository::row_to_tag;
use super::models::{ParticipantRow, ParticipantTagRow, TagRow};
use super::pool::{DbPool, PoolError};
use super::schema::{cohorts, participant_tags, participants, tags, users};

/// Diesel implementation of the participant port.
#[derive(Clone)]
pub struct DieselParticipantRepository {
    pool: DbPool,
}

impl DieselParticipantRepository {
    /// Create a repository drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Reasons an insert transaction rolls back.
#[derive(Debug)]
enum InsertFailure {
    CohortMissing,
    CohortFull,
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for InsertFailure {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

fn map_pool_error(error: PoolError) -> ParticipantRepositoryError {
    ParticipantRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> ParticipantRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => ParticipantRepositoryError::connection(message),
        DieselFailure::Query(message) => ParticipantRepositoryError::query(message),
        DieselFailure::UniqueViolation { .. } | DieselFailure::ForeignKeyViolation { .. } => {
            ParticipantRepositoryError::query("database error")
        }
    }
}

fn map_insert_failure(failure: InsertFailure, cohort_id: &CohortId) -> ParticipantRepositoryError {
    let cohort = cohort_id.to_string();
    match failure {
        InsertFailure::CohortMissing => ParticipantRepositoryError::cohort_missing(cohort),
        InsertFailure::CohortFull => ParticipantRepositoryError::cohort_full(cohort),
        InsertFailure::Diesel(error) => match classify_diesel_error(error) {
            DieselFailure::UniqueViolation { .. } => {
                ParticipantRepositoryError::duplicate_enrolment(cohort)
            }
            DieselFailure::ForeignKeyViolation { constraint }
                if constraint
                    .as_deref()
                    .is_some_and(|name| name.contains("cohort_id")) =>
            {
                ParticipantRepositoryError::cohort_missing(cohort)
            }
            DieselFailure::ForeignKeyViolation { constraint } => {
                warn!(?constraint, "participant insert rejected by foreign key");
                ParticipantRepositoryError::query("referenced record does not exist")
            }
            DieselFailure::Connection(message) => ParticipantRepositoryError::connection(message),
            DieselFailure::Query(message) => ParticipantRepositoryError::query(message),
        },
    }
}

fn participant_row(participant: &Participant) -> ParticipantRow {
    ParticipantRow {
        id: *participant.id.as_uuid(),
        user_id: *participant.user_id.as_uuid(),
        cohort_id: *participant.cohort_id.as_uuid(),
        is_mentor: participant.is_mentor,
        is_matched: participant.is_matched,
        sign_up_date: participant.sign_up_date,
    }
}

/// Assemble participants from their rows and `(participant_id, tag)` links.
fn assemble(
    rows: Vec<ParticipantRow>,
    links: Vec<(Uuid, TagRow)>,
) -> Result<Vec<Participant>, ParticipantRepositoryError> {
    let mut tags_by_participant: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    for (participant_id, row) in links {
        let tag = row_to_tag(row).map_err(ParticipantRepositoryError::query)?;
        tags_by_participant.entry(participant_id).or_default().push(tag);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let mut tags = tags_by_participant.remove(&row.id).unwrap_or_default();
            tags.sort_by(|left, right| left.slug.cmp(&right.slug));
            Participant {
                id: ParticipantId::from_uuid(row.id),
                user_id: UserId::from_uuid(row.user_id),
                cohort_id: CohortId::from_uuid(row.cohort_id),
                is_mentor: row.is_mentor,
                is_matched: row.is_matched,
                sign_up_date: row.sign_up_date,
                tags,
            }
        })
        .collect())
}

async fn load_tag_links(
    conn: &mut AsyncPgConnection,
    participant_ids: &[Uuid],
) -> Result<Vec<(Uuid, TagRow)>, diesel::result::Error> {
    if participant_ids.is_empty() {
        return Ok(Vec::new());
    }
    participant_tags::table
        .inner_join(tags::table)
        .filter(participant_tags::participant_id.eq_any(participant_ids))
        .select((participant_tags::participant_id, TagRow::as_select()))
        .load(conn)
        .await
}

#[async_trait]
impl ParticipantRepository for DieselParticipantRepository {
    async fn count_for_cohort(
        &self,
        cohort_id: &CohortId,
    ) -> Result<u64, ParticipantRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = participants::table
            .filter(participants::cohort_id.eq(cohort_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        u64::try_from(count).map_err(|_| ParticipantRepositoryError::query("negative row count"))
    }

    async fn insert(&self, participant: &Participant) -> Result<(), ParticipantRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = participant_row(participant);
        let links: Vec<ParticipantTagRow> = participant
            .tags
            .iter()
            .map(|tag| ParticipantTagRow {
                participant_id: row.id,
                tag_id: *tag.id.as_uuid(),
            })
            .collect();
        let cohort_id = row.cohort_id;
        let user_id = row.user_id;

        conn.transaction::<_, InsertFailure, _>(|conn| {
            async move {
                let capacity: Option<i32> = cohorts::table
                    .filter(cohorts::id.eq(cohort_id))
                    .select(cohorts::cohort_size)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let Some(capacity) = capacity else {
                    return Err(InsertFailure::CohortMissing);
                };

                let enrolled: i64 = participants::table
                    .filter(participants::cohort_id.eq(cohort_id))
                    .count()
                    .get_result(conn)
                    .await?;
                if enrolled >= i64::from(capacity) {
                    return Err(InsertFailure::CohortFull);
                }

                diesel::insert_into(users::table)
                    .values(users::id.eq(user_id))
                    .on_conflict_do_nothing()
                    .execute(conn)
                    .await?;
                diesel::insert_into(participants::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                if !links.is_empty() {
                    diesel::insert_into(participant_tags::table)
                        .values(&links)
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|failure| map_insert_failure(failure, &participant.cohort_id))?;

        debug!(participant_id = %participant.id, cohort_id = %participant.cohort_id, "participant stored");
        Ok(())
    }

    async fn list_for_cohort(
        &self,
        cohort_id: &CohortId,
    ) -> Result<Vec<Participant>, ParticipantRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ParticipantRow> = participants::table
            .filter(participants::cohort_id.eq(cohort_id.as_uuid()))
            .order_by((participants::sign_up_date, participants::id))
            .select(ParticipantRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let links = load_tag_links(&mut conn, &ids)
            .await
            .map_err(map_diesel_error)?;

        assemble(rows, links)
    }

    async fn find(
        &self,
        id: &ParticipantId,
    ) -> Result<Option<Participant>, ParticipantRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ParticipantRow> = participants::table
            .filter(participants::id.eq(id.as_uuid()))
            .select(ParticipantRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let links = load_tag_links(&mut conn, &[row.id])
            .await
            .map_err(map_diesel_error)?;

        Ok(assemble(vec![row], links)?.into_iter().next())
    }
}
