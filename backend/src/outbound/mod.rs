//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: in-process store used without a database and in tests
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. Beyond the uniqueness and
//! capacity guarantees the ports demand, they contain no business logic.

pub mod memory;
pub mod persistence;
