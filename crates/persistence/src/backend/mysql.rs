// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! MySQL/MariaDB-specific persistence utilities.
//!
//! ## Usage
//!
//! `MySQL` is validated by tests marked `#[ignore]`, executed only via
//! `cargo xtask test-mariadb`, which:
//!
//! 1. Starts a `MariaDB` container via Docker
//! 2. Sets `DATABASE_URL` and `MATRICULA_TEST_BACKEND=mariadb`
//! 3. Runs the ignored tests explicitly
//! 4. Stops and removes the container
//!
//! ## Concurrency
//!
//! Write transactions run at `SERIALIZABLE` isolation. Caseworker and
//! persona rows touched by an assignment are locked with `SELECT ... FOR
//! UPDATE` before they are read, so concurrent submissions queue on the
//! same rows instead of both seeing the same pending counts.
//!
//! ## Schema Parity
//!
//! `MYSQL_MIGRATIONS` embeds `migrations_mysql/`, which must stay
//! schema-equivalent to the `SQLite` migrations in `migrations/`: same
//! tables, columns, nullability, foreign keys, and indexes. Check with
//! `cargo xtask verify-migrations`.

use diesel::connection::{AnsiTransactionManager, TransactionManager};
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer};
use diesel::{Connection, MysqlConnection, QueryableByName, RunQueryDsl};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use matricula_domain::PersonaRol;
use tracing::{debug, info};

use crate::diesel_schema::personas;
use crate::error::PersistenceError;

#[derive(QueryableByName)]
struct ForeignKeyCheck {
    #[diesel(sql_type = Integer)]
    fk_checks: i32,
}

/// Returns the auto-increment ID of the most recent insert on this connection.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut MysqlConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("LAST_INSERT_ID()")).get_result(conn)?)
}

/// `MySQL`-specific migrations.
pub const MYSQL_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations_mysql");

/// Connects to `MySQL`/`MariaDB` and runs migrations.
///
/// # Errors
///
/// Returns an error if connection or migration fails.
pub fn initialize_database(database_url: &str) -> Result<MysqlConnection, PersistenceError> {
    info!("Initializing MySQL database");

    let mut conn: MysqlConnection = MysqlConnection::establish(database_url)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

    run_migrations(&mut conn).map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;

    Ok(conn)
}

/// Runs pending migrations.
///
/// # Errors
///
/// Returns an error if migration execution fails.
pub fn run_migrations(
    conn: &mut MysqlConnection,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Running MySQL database migrations");
    conn.run_pending_migrations(MYSQL_MIGRATIONS)?;
    Ok(())
}

/// Verifies that foreign key enforcement is enabled.
///
/// # Errors
///
/// Returns an error if verification fails.
pub fn verify_foreign_key_enforcement(conn: &mut MysqlConnection) -> Result<(), PersistenceError> {
    // NOTE: raw SQL, Diesel has no system variable DSL
    let result: Result<ForeignKeyCheck, _> =
        diesel::sql_query("SELECT @@foreign_key_checks AS fk_checks").get_result(conn);

    match result {
        Ok(check) => {
            if check.fk_checks == 1 {
                info!("MySQL foreign key enforcement is enabled");
                Ok(())
            } else {
                Err(PersistenceError::ForeignKeyEnforcementNotEnabled)
            }
        }
        Err(e) => Err(PersistenceError::QueryFailed(format!(
            "Failed to verify foreign key enforcement: {e}"
        ))),
    }
}

/// Opens a `SERIALIZABLE` write transaction.
///
/// The isolation level applies to the next transaction only.
///
/// # Errors
///
/// Returns `PersistenceError::TransactionFailed` if the transaction cannot
/// be started.
pub fn begin_write_transaction(conn: &mut MysqlConnection) -> Result<(), PersistenceError> {
    diesel::sql_query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
        .execute(conn)
        .map_err(|e| PersistenceError::TransactionFailed(format!("SET ISOLATION: {e}")))?;
    <AnsiTransactionManager as TransactionManager<MysqlConnection>>::begin_transaction(conn)
        .map_err(|e| PersistenceError::TransactionFailed(format!("BEGIN: {e}")))?;
    debug!("MySQL write transaction opened");
    Ok(())
}

/// Commits the open transaction.
///
/// # Errors
///
/// Returns `PersistenceError::TransactionFailed` if the commit fails.
pub fn commit(conn: &mut MysqlConnection) -> Result<(), PersistenceError> {
    <AnsiTransactionManager as TransactionManager<MysqlConnection>>::commit_transaction(conn)
        .map_err(|e| PersistenceError::TransactionFailed(format!("COMMIT: {e}")))
}

/// Rolls back the open transaction.
///
/// # Errors
///
/// Returns `PersistenceError::TransactionFailed` if the rollback fails.
pub fn rollback(conn: &mut MysqlConnection) -> Result<(), PersistenceError> {
    <AnsiTransactionManager as TransactionManager<MysqlConnection>>::rollback_transaction(conn)
        .map_err(|e| PersistenceError::TransactionFailed(format!("ROLLBACK: {e}")))
}

/// Locks the given persona rows until the transaction ends.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn lock_personas(conn: &mut MysqlConnection, ids: &[i64]) -> Result<(), PersistenceError> {
    let locked: Vec<i64> = personas::table
        .filter(personas::persona_id.eq_any(ids))
        .select(personas::persona_id)
        .for_update()
        .load(conn)?;
    debug!(requested = ids.len(), locked = locked.len(), "Locked persona rows");
    Ok(())
}

/// Locks every caseworker row until the transaction ends.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn lock_empleados(conn: &mut MysqlConnection) -> Result<(), PersistenceError> {
    let locked: Vec<i64> = personas::table
        .filter(personas::rol.eq(PersonaRol::Empleado.as_str()))
        .select(personas::persona_id)
        .for_update()
        .load(conn)?;
    debug!(locked = locked.len(), "Locked caseworker rows");
    Ok(())
}
