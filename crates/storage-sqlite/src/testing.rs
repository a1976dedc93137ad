//! Temporary migrated databases for repository tests.

use std::sync::Arc;
use tempfile::TempDir;

use crate::currencies::CurrencyRepository;
use crate::db::{create_pool, init, run_migrations, spawn_writer, DbPool};
use crate::quotations::QuotationRepository;
use crate::users::UserRepository;

pub struct TestDb {
    pub pool: Arc<DbPool>,
    pub currencies: CurrencyRepository,
    pub quotations: QuotationRepository,
    pub users: UserRepository,
    // Keeps the database file alive.
    _dir: TempDir,
}

/// Must be called from inside a tokio runtime since it spawns the writer.
pub fn test_db() -> TestDb {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("nested").join("test.db");
    let db_path = init(&db_path.to_string_lossy()).expect("Failed to init database");

    let pool = create_pool(&db_path).expect("Failed to create pool");
    run_migrations(&pool).expect("Failed to run migrations");
    let writer = spawn_writer((*pool).clone());

    TestDb {
        currencies: CurrencyRepository::new(pool.clone(), writer.clone()),
        quotations: QuotationRepository::new(pool.clone(), writer.clone()),
        users: UserRepository::new(pool.clone(), writer),
        pool,
        _dir: dir,
    }
}
