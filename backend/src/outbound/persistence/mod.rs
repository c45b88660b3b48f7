//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the enrolment ports backed by PostgreSQL via
//! `diesel-async` and a `bb8` pool.
//!
//! - **Thin adapters**: repositories translate between Diesel rows and domain
//!   types. The only rules enforced here are the uniqueness and capacity
//!   guarantees the ports document.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never reach the domain.
//! - **Typed errors**: every Diesel or pool failure becomes a port error.
//!
//! # Example
//!
//! ```ignore
//! use mentor_match::outbound::persistence::{DbPool, DieselTagRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/mentor_match")).await?;
//! let tags = DieselTagRepository::new(pool);
//! ```

mod diesel_cohort_repository;
mod diesel_error_mapping;
mod diesel_participant_repository;
mod diesel_tag_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_cohort_repository::DieselCohortRepository;
pub use diesel_participant_repository::DieselParticipantRepository;
pub use diesel_tag_repository::DieselTagRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
