//! Embedded PostgreSQL helpers shared by the Diesel integration suites.
//!
//! Each test gets its own database on the shared cluster, migrated with the
//! crate's embedded migrations.

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel_migrations::MigrationHarness;
use mentor_match::outbound::persistence::MIGRATIONS;
use pg_embedded_setup_unpriv::ClusterHandle;
use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;
use uuid::Uuid;

/// Returns true when `SKIP_TEST_CLUSTER` is set to a truthy value.
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip when `SKIP_TEST_CLUSTER` is truthy, otherwise fail loudly so CI
/// breakage is not masked.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// Create a fresh, migrated database and return its URL.
pub fn provision_database() -> Result<String, String> {
    let cluster: &ClusterHandle =
        shared_cluster_handle().map_err(|err| format!("start cluster: {err:?}"))?;
    let name = format!("mentor_match_{}", Uuid::new_v4().simple());
    cluster
        .create_database(name.as_str())
        .map_err(|err| format!("create database: {err:?}"))?;
    let url = cluster.connection().database_url(&name);

    let mut conn = PgConnection::establish(&url).map_err(|err| format!("connect: {err}"))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| format!("migrate: {err}"))?;
    Ok(url)
}

/// Run raw SQL against `url`, for seeding rows owned by other subsystems.
pub fn execute_sql(url: &str, sql: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(url).map_err(|err| format!("connect: {err}"))?;
    conn.batch_execute(sql).map_err(|err| format!("execute: {err}"))
}

#[derive(QueryableByName)]
struct RowCount {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

/// Number of rows in `table`.
pub fn count_rows(url: &str, table: &str) -> Result<i64, String> {
    let mut conn = PgConnection::establish(url).map_err(|err| format!("connect: {err}"))?;
    diesel::sql_query(format!("SELECT COUNT(*) AS count FROM {table}"))
        .get_result::<RowCount>(&mut conn)
        .map(|row| row.count)
        .map_err(|err| format!("count {table}: {err}"))
}
