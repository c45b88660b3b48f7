//! Port for the global tag catalogue.

use async_trait::async_trait;

use crate::domain::{Tag, TagSlug};

use super::define_port_error;

define_port_error! {
    /// Errors raised by tag repository adapters.
    pub enum TagRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "tag repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "tag repository query failed: {message}",
        /// Another tag already owns this slug.
        DuplicateSlug { slug: String } =>
            "tag with slug {slug} already exists",
    }
}

/// Lookup-or-create storage for tags keyed by slug.
///
/// Slugs are unique. [`TagRepository::create`] must report a clash as
/// [`TagRepositoryError::DuplicateSlug`] so callers can re-read the winner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Fetch the tag owning `slug`.
    async fn find_by_slug(&self, slug: &TagSlug) -> Result<Option<Tag>, TagRepositoryError>;

    /// Persist a new tag.
    async fn create(&self, tag: &Tag) -> Result<(), TagRepositoryError>;
}
