// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-agnostic mutation modules.
//!
//! This module contains all state-changing operations for the persistence layer.
//! Mutations use Diesel DSL, with backend-specific helpers such as
//! `get_last_insert_rowid()` reached through the `PersistenceBackend` trait.
//!
//! ## Module Organization
//!
//! - `personas`: Persona and account mirror mutations
//! - `registro`: Vehicle, insurance, plate, and application mutations

pub mod personas;
pub mod registro;
