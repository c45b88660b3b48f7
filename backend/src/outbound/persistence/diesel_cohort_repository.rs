//! PostgreSQL-backed `CohortRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{CohortRepository, CohortRepositoryError};
use crate::domain::{Cohort, CohortId, CohortSize, ProgrammeId, UserId};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::CohortRow;
use super::pool::{DbPool, PoolError};
use super::schema::cohorts;

/// Diesel implementation of the read-only cohort port.
#[derive(Clone)]
pub struct DieselCohortRepository {
    pool: DbPool,
}

impl DieselCohortRepository {
    /// Create a repository drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CohortRepositoryError {
    CohortRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error) -> CohortRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => CohortRepositoryError::connection(message),
        DieselFailure::Query(message) => CohortRepositoryError::query(message),
        DieselFailure::UniqueViolation { .. } | DieselFailure::ForeignKeyViolation { .. } => {
            CohortRepositoryError::query("database error")
        }
    }
}

pub(crate) fn row_to_cohort(row: CohortRow) -> Result<Cohort, CohortRepositoryError> {
    let cohort_size = CohortSize::new(i64::from(row.cohort_size)).map_err(|err| {
        warn!(cohort_id = %row.id, error = %err, "stored cohort has invalid capacity");
        CohortRepositoryError::query(err.to_string())
    })?;
    Ok(Cohort {
        id: CohortId::from_uuid(row.id),
        programme_id: ProgrammeId::from_uuid(row.programme_id),
        created_by: UserId::from_uuid(row.created_by),
        cohort_size,
        created_at: row.created_at,
    })
}

#[async_trait]
impl CohortRepository for DieselCohortRepository {
    async fn find_by_id(&self, id: &CohortId) -> Result<Option<Cohort>, CohortRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CohortRow> = cohorts::table
            .filter(cohorts::id.eq(id.as_uuid()))
            .select(CohortRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_cohort).transpose()
    }
}
