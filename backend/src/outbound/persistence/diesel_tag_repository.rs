//! PostgreSQL-backed `TagRepository`.
//!
//! The `tags.slug` unique constraint arbitrates concurrent creation; the
//! loser receives [`TagRepositoryError::DuplicateSlug`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{TagRepository, TagRepositoryError};
use crate::domain::{Tag, TagId, TagName, TagSlug};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error};
use super::models::{NewTagRow, TagRow};
use super::pool::{DbPool, PoolError};
use super::schema::tags;

/// Diesel implementation of the tag catalogue port.
#[derive(Clone)]
pub struct DieselTagRepository {
    pool: DbPool,
}

impl DieselTagRepository {
    /// Create a repository drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TagRepositoryError {
    TagRepositoryError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error, slug: &TagSlug) -> TagRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::UniqueViolation { .. } => TagRepositoryError::duplicate_slug(slug.as_str()),
        DieselFailure::Connection(message) => TagRepositoryError::connection(message),
        DieselFailure::Query(message) => TagRepositoryError::query(message),
        DieselFailure::ForeignKeyViolation { .. } => TagRepositoryError::query("database error"),
    }
}

/// Convert a stored row, rejecting names or slugs that no longer validate.
pub(crate) fn row_to_tag(row: TagRow) -> Result<Tag, String> {
    let name = TagName::new(&row.name).map_err(|err| format!("tag {}: {err}", row.id))?;
    let slug = TagSlug::new(row.slug).map_err(|err| format!("tag {}: {err}", row.id))?;
    Ok(Tag {
        id: TagId::from_uuid(row.id),
        name,
        slug,
    })
}

#[async_trait]
impl TagRepository for DieselTagRepository {
    async fn find_by_slug(&self, slug: &TagSlug) -> Result<Option<Tag>, TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<TagRow> = tags::table
            .filter(tags::slug.eq(slug.as_str()))
            .select(TagRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, slug))?;

        row.map(row_to_tag)
            .transpose()
            .map_err(TagRepositoryError::query)
    }

    async fn create(&self, tag: &Tag) -> Result<(), TagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewTagRow {
            id: *tag.id.as_uuid(),
            name: tag.name.as_str(),
            slug: tag.slug.as_str(),
        };
        diesel::insert_into(tags::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, &tag.slug))
    }
}
