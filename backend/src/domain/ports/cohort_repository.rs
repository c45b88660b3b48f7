//! Port for reading cohorts.
//!
//! Cohorts are administered elsewhere; the enrolment flow only needs to look
//! one up to learn its capacity.

use async_trait::async_trait;

use crate::domain::{Cohort, CohortId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by cohort repository adapters.
    pub enum CohortRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "cohort repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "cohort repository query failed: {message}",
    }
}

/// Read access to cohorts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CohortRepository: Send + Sync {
    /// Fetch a cohort by id, returning `None` when it does not exist.
    async fn find_by_id(&self, id: &CohortId) -> Result<Option<Cohort>, CohortRepositoryError>;
}
