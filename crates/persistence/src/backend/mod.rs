// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend-specific code.
//!
//! This module isolates initialization, migrations, transaction control,
//! row locking, and helpers that cannot be expressed in backend-agnostic
//! Diesel DSL.
//!
//! ## Backend Support
//!
//! - `sqlite`: `SQLite` backend (default for development and testing)
//! - `mysql`: MySQL/MariaDB backend (validated via opt-in tests)
//!
//! All domain queries and mutations live in `queries/` and `mutations/`
//! modules and must work across all supported backends.

pub mod mysql;
pub mod sqlite;

use diesel::{Connection, MysqlConnection, SqliteConnection};

use crate::error::PersistenceError;

/// Trait for backend-specific operations.
///
/// Implemented for both `SqliteConnection` and `MysqlConnection` so that
/// `backend_fn!` bodies can call these helpers on either connection type.
pub trait PersistenceBackend: Connection {
    /// Retrieves the last inserted row ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError>;

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError>;

    /// Opens a write transaction with the backend's strongest isolation.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started.
    fn begin_write_transaction(&mut self) -> Result<(), PersistenceError>;

    /// Commits the open transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    fn commit_write_transaction(&mut self) -> Result<(), PersistenceError>;

    /// Rolls back the open transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback fails.
    fn rollback_write_transaction(&mut self) -> Result<(), PersistenceError>;

    /// Locks persona rows for the rest of the transaction.
    ///
    /// A no-op where the write transaction already excludes other writers.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock query fails.
    fn lock_personas(&mut self, ids: &[i64]) -> Result<(), PersistenceError>;

    /// Locks every caseworker row for the rest of the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock query fails.
    fn lock_empleados(&mut self) -> Result<(), PersistenceError>;
}

impl PersistenceBackend for SqliteConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        sqlite::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(self)
    }

    fn begin_write_transaction(&mut self) -> Result<(), PersistenceError> {
        sqlite::begin_write_transaction(self)
    }

    fn commit_write_transaction(&mut self) -> Result<(), PersistenceError> {
        sqlite::commit(self)
    }

    fn rollback_write_transaction(&mut self) -> Result<(), PersistenceError> {
        sqlite::rollback(self)
    }

    // BEGIN IMMEDIATE already holds the database write lock.
    fn lock_personas(&mut self, _ids: &[i64]) -> Result<(), PersistenceError> {
        Ok(())
    }

    fn lock_empleados(&mut self) -> Result<(), PersistenceError> {
        Ok(())
    }
}

impl PersistenceBackend for MysqlConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        mysql::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        mysql::verify_foreign_key_enforcement(self)
    }

    fn begin_write_transaction(&mut self) -> Result<(), PersistenceError> {
        mysql::begin_write_transaction(self)
    }

    fn commit_write_transaction(&mut self) -> Result<(), PersistenceError> {
        mysql::commit(self)
    }

    fn rollback_write_transaction(&mut self) -> Result<(), PersistenceError> {
        mysql::rollback(self)
    }

    fn lock_personas(&mut self, ids: &[i64]) -> Result<(), PersistenceError> {
        mysql::lock_personas(self, ids)
    }

    fn lock_empleados(&mut self) -> Result<(), PersistenceError> {
        mysql::lock_empleados(self)
    }
}
