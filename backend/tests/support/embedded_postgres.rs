//! Embedded PostgreSQL for the Diesel adapter suites.
//!
//! One cluster is shared by every test in the binary and each test gets its
//! own freshly migrated database. When the cluster cannot start, set
//! `SKIP_TEST_CLUSTER=1` to turn the failure into a logged skip.

use std::future::Future;

use kudotrio::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;
use tokio::runtime::Runtime;

/// A migrated throwaway database plus the runtime that drives its pool.
pub struct MigratedDatabase {
    runtime: Runtime,
    pub pool: DbPool,
    _database: TemporaryDatabase,
}

impl MigratedDatabase {
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn provision() -> Result<MigratedDatabase, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster_handle().map_err(|err| err.to_string())?;
    let database_name = format!("test_{}", uuid::Uuid::new_v4().simple());
    let database = cluster
        .temporary_database(database_name.as_str())
        .map_err(|err| format!("create database: {err:?}"))?;
    let url = database.url().to_string();

    runtime
        .block_on(run_pending_migrations(&url))
        .map_err(|err| err.to_string())?;
    let pool = runtime
        .block_on(DbPool::new(PoolConfig::new(url).with_max_size(2)))
        .map_err(|err| err.to_string())?;

    Ok(MigratedDatabase {
        runtime,
        pool,
        _database: database,
    })
}

/// Provision a database, or `None` when cluster failures are being skipped.
///
/// Must be called outside any Tokio runtime; the cluster bootstrap blocks.
pub fn migrated_database() -> Option<MigratedDatabase> {
    match provision() {
        Ok(database) => Some(database),
        Err(reason) if should_skip_test_cluster() => {
            eprintln!("SKIP-TEST-CLUSTER: {reason}");
            None
        }
        Err(reason) => {
            panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.")
        }
    }
}
