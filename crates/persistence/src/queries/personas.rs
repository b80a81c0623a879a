// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persona, account, and caseworker load queries.
//!
//! Lookups by account or national ID ignore disabled personas, which are
//! soft-deleted and take no part in identity resolution.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use matricula_domain::{EmpleadoLoad, Persona, PersonaEstado, PersonaRol, SolicitudEstado};
use std::collections::HashMap;
use tracing::debug;

use crate::data_models::{CuentaData, CuentaRow, PersonaRow};
use crate::diesel_schema::{cuentas, personas, solicitudes};
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves a persona by ID, including disabled personas.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
/// Returns `Ok(None)` if the persona does not exist.
pub fn get_persona(conn: &mut _, persona_id: i64) -> Result<Option<Persona>, PersistenceError> {
    personas::table
        .filter(personas::persona_id.eq(persona_id))
        .select(PersonaRow::as_select())
        .first::<PersonaRow>(conn)
        .optional()?
        .map(Persona::try_from)
        .transpose()
}
}

backend_fn! {
/// Retrieves the non-disabled persona linked to an account.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
pub fn find_persona_by_cuenta(
    conn: &mut _,
    cuenta_id: i64,
) -> Result<Option<Persona>, PersistenceError> {
    debug!(cuenta_id, "Looking up persona by account");

    personas::table
        .filter(personas::cuenta_id.eq(cuenta_id))
        .filter(personas::estado.ne(PersonaEstado::Deshabilitado.as_str()))
        .order(personas::persona_id.asc())
        .select(PersonaRow::as_select())
        .first::<PersonaRow>(conn)
        .optional()?
        .map(Persona::try_from)
        .transpose()
}
}

backend_fn! {
/// Retrieves the non-disabled persona holding a national ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `cedula` - The normalized 11-digit national ID
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
pub fn find_persona_by_cedula(
    conn: &mut _,
    cedula: &str,
) -> Result<Option<Persona>, PersistenceError> {
    debug!(cedula, "Looking up persona by cedula");

    personas::table
        .filter(personas::cedula.eq(cedula))
        .filter(personas::estado.ne(PersonaEstado::Deshabilitado.as_str()))
        .order(personas::persona_id.asc())
        .select(PersonaRow::as_select())
        .first::<PersonaRow>(conn)
        .optional()?
        .map(Persona::try_from)
        .transpose()
}
}

backend_fn! {
/// Counts the pending applications assigned to a caseworker.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_pending_for_empleado(conn: &mut _, empleado_id: i64) -> Result<i64, PersistenceError> {
    Ok(solicitudes::table
        .filter(solicitudes::empleado_id.eq(empleado_id))
        .filter(solicitudes::estado.eq(SolicitudEstado::Pendiente.as_str()))
        .count()
        .get_result(conn)?)
}
}

backend_fn! {
/// Lists every non-disabled caseworker with their pending count.
///
/// Ordered by persona ID.
///
/// # Errors
///
/// Returns an error if a query fails or a state cannot be decoded.
pub fn list_empleado_loads(conn: &mut _) -> Result<Vec<EmpleadoLoad>, PersistenceError> {
    let empleados: Vec<(i64, String)> = personas::table
        .filter(personas::rol.eq(PersonaRol::Empleado.as_str()))
        .filter(personas::estado.ne(PersonaEstado::Deshabilitado.as_str()))
        .order(personas::persona_id.asc())
        .select((personas::persona_id, personas::estado))
        .load(conn)?;

    let pending: HashMap<i64, i64> = solicitudes::table
        .filter(solicitudes::estado.eq(SolicitudEstado::Pendiente.as_str()))
        .group_by(solicitudes::empleado_id)
        .select((solicitudes::empleado_id, diesel::dsl::count_star()))
        .load::<(i64, i64)>(conn)?
        .into_iter()
        .collect();

    empleados
        .into_iter()
        .map(|(empleado_id, estado)| -> Result<EmpleadoLoad, PersistenceError> {
            Ok(EmpleadoLoad {
                empleado_id,
                estado: estado.parse()?,
                pendientes: pending.get(&empleado_id).copied().unwrap_or(0),
            })
        })
        .collect()
}
}

backend_fn! {
/// Retrieves an account mirror row.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
pub fn get_cuenta(conn: &mut _, cuenta_id: i64) -> Result<Option<CuentaData>, PersistenceError> {
    cuentas::table
        .filter(cuentas::cuenta_id.eq(cuenta_id))
        .select(CuentaRow::as_select())
        .first::<CuentaRow>(conn)
        .optional()?
        .map(CuentaData::try_from)
        .transpose()
}
}
