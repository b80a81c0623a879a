// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Vehicle, plate, and insurance queries.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use matricula_domain::{Matricula, MatriculaEstado, SolicitudEstado, Vehiculo, VehiculoEstado};
use tracing::debug;

use crate::data_models::{MatriculaRow, VehiculoRow};
use crate::diesel_schema::{matriculas, seguros, solicitudes, vehiculos};
use crate::error::PersistenceError;

backend_fn! {
/// Counts the owner's active, plated vehicles.
///
/// A vehicle counts when its application is approved, its plate is
/// issued, and the vehicle itself is active.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_active_vehicles(conn: &mut _, propietario_id: i64) -> Result<i64, PersistenceError> {
    let count: i64 = solicitudes::table
        .inner_join(vehiculos::table.on(vehiculos::vehiculo_id.eq(solicitudes::vehiculo_id)))
        .inner_join(matriculas::table.on(matriculas::matricula_id.eq(solicitudes::matricula_id)))
        .filter(solicitudes::propietario_id.eq(propietario_id))
        .filter(solicitudes::estado.eq(SolicitudEstado::Aprobada.as_str()))
        .filter(matriculas::estado.eq(MatriculaEstado::Generada.as_str()))
        .filter(vehiculos::estado.eq(VehiculoEstado::Activo.as_str()))
        .count()
        .get_result(conn)?;

    debug!(propietario_id, count, "Counted active vehicles");
    Ok(count)
}
}

backend_fn! {
/// Returns true if a non-disabled vehicle already has this chassis number.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn chasis_in_use(conn: &mut _, chasis: &str) -> Result<bool, PersistenceError> {
    let count: i64 = vehiculos::table
        .filter(vehiculos::chasis.eq(chasis))
        .filter(vehiculos::estado.ne(VehiculoEstado::Deshabilitado.as_str()))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}
}

backend_fn! {
/// Returns true if an active insurance already uses this policy number.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn policy_in_use(conn: &mut _, numero_poliza: &str) -> Result<bool, PersistenceError> {
    let count: i64 = seguros::table
        .filter(seguros::numero_poliza.eq(numero_poliza))
        .filter(seguros::activo.eq(1))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}
}

backend_fn! {
/// Returns true if a plate has already been issued with this code.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn plate_code_taken(conn: &mut _, codigo: &str) -> Result<bool, PersistenceError> {
    let count: i64 = matriculas::table
        .filter(matriculas::codigo_emitido.eq(codigo))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}
}

backend_fn! {
/// Retrieves a vehicle by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
pub fn get_vehiculo(conn: &mut _, vehiculo_id: i64) -> Result<Option<Vehiculo>, PersistenceError> {
    vehiculos::table
        .filter(vehiculos::vehiculo_id.eq(vehiculo_id))
        .select(VehiculoRow::as_select())
        .first::<VehiculoRow>(conn)
        .optional()?
        .map(Vehiculo::try_from)
        .transpose()
}
}

backend_fn! {
/// Retrieves a plate by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
pub fn get_matricula(
    conn: &mut _,
    matricula_id: i64,
) -> Result<Option<Matricula>, PersistenceError> {
    matriculas::table
        .filter(matriculas::matricula_id.eq(matricula_id))
        .select(MatriculaRow::as_select())
        .first::<MatriculaRow>(conn)
        .optional()?
        .map(Matricula::try_from)
        .transpose()
}
}

backend_fn! {
/// Lists every issued plate code.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_issued_codes(conn: &mut _) -> Result<Vec<String>, PersistenceError> {
    Ok(matriculas::table
        .filter(matriculas::estado.eq(MatriculaEstado::Generada.as_str()))
        .order(matriculas::matricula_id.asc())
        .select(matriculas::codigo)
        .load(conn)?)
}
}
