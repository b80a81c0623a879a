// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Application queries and the joined application record.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use matricula_domain::{Matricula, Persona, Seguro, Solicitud, Vehiculo};

use crate::data_models::{
    MatriculaRow, PersonaRow, SeguroRow, SolicitudRecord, SolicitudRow, VehiculoRow,
};
use crate::diesel_schema::{matriculas, personas, seguros, solicitudes, vehiculos};
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves an application by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the row cannot be decoded.
/// Returns `Ok(None)` if the application does not exist.
pub fn get_solicitud(
    conn: &mut _,
    solicitud_id: i64,
) -> Result<Option<Solicitud>, PersistenceError> {
    solicitudes::table
        .filter(solicitudes::solicitud_id.eq(solicitud_id))
        .select(SolicitudRow::as_select())
        .first::<SolicitudRow>(conn)
        .optional()?
        .map(Solicitud::try_from)
        .transpose()
}
}

backend_fn! {
/// Lists an owner's applications, newest first.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `propietario_id` - The owning persona
/// * `estado` - Optional state filter (storage representation)
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_solicitudes_by_propietario(
    conn: &mut _,
    propietario_id: i64,
    estado: Option<&str>,
) -> Result<Vec<Solicitud>, PersistenceError> {
    let mut query = solicitudes::table
        .filter(solicitudes::propietario_id.eq(propietario_id))
        .into_boxed();
    if let Some(estado) = estado {
        query = query.filter(solicitudes::estado.eq(estado));
    }

    query
        .order(solicitudes::solicitud_id.desc())
        .select(SolicitudRow::as_select())
        .load::<SolicitudRow>(conn)?
        .into_iter()
        .map(Solicitud::try_from)
        .collect()
}
}

backend_fn! {
/// Lists a caseworker's applications, oldest first.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `empleado_id` - The assigned caseworker
/// * `estado` - Optional state filter (storage representation)
/// * `solo_en_cola` - Restrict to queued assignments
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_solicitudes_by_empleado(
    conn: &mut _,
    empleado_id: i64,
    estado: Option<&str>,
    solo_en_cola: bool,
) -> Result<Vec<Solicitud>, PersistenceError> {
    let mut query = solicitudes::table
        .filter(solicitudes::empleado_id.eq(empleado_id))
        .into_boxed();
    if let Some(estado) = estado {
        query = query.filter(solicitudes::estado.eq(estado));
    }
    if solo_en_cola {
        query = query.filter(solicitudes::en_cola.eq(1));
    }

    query
        .order(solicitudes::solicitud_id.asc())
        .select(SolicitudRow::as_select())
        .load::<SolicitudRow>(conn)?
        .into_iter()
        .map(Solicitud::try_from)
        .collect()
}
}

backend_fn! {
/// Loads an application together with its owner, caseworker, vehicle,
/// plate and insurance.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the application or any row it
/// references is missing, or an error if a query fails.
pub fn get_solicitud_record(
    conn: &mut _,
    solicitud_id: i64,
) -> Result<SolicitudRecord, PersistenceError> {
    let solicitud: Solicitud = solicitudes::table
        .filter(solicitudes::solicitud_id.eq(solicitud_id))
        .select(SolicitudRow::as_select())
        .first::<SolicitudRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("solicitud {solicitud_id}")))?
        .try_into()?;

    let propietario: Persona = personas::table
        .filter(personas::persona_id.eq(solicitud.propietario_id))
        .select(PersonaRow::as_select())
        .first::<PersonaRow>(conn)?
        .try_into()?;

    let empleado: Persona = personas::table
        .filter(personas::persona_id.eq(solicitud.empleado_id))
        .select(PersonaRow::as_select())
        .first::<PersonaRow>(conn)?
        .try_into()?;

    let vehiculo: Vehiculo = vehiculos::table
        .filter(vehiculos::vehiculo_id.eq(solicitud.vehiculo_id))
        .select(VehiculoRow::as_select())
        .first::<VehiculoRow>(conn)?
        .try_into()?;

    let matricula: Matricula = matriculas::table
        .filter(matriculas::matricula_id.eq(solicitud.matricula_id))
        .select(MatriculaRow::as_select())
        .first::<MatriculaRow>(conn)?
        .try_into()?;

    let seguro: Option<Seguro> = match vehiculo.seguro_id {
        Some(seguro_id) => seguros::table
            .filter(seguros::seguro_id.eq(seguro_id))
            .select(SeguroRow::as_select())
            .first::<SeguroRow>(conn)
            .optional()?
            .map(Seguro::from),
        None => None,
    };

    Ok(SolicitudRecord {
        solicitud,
        propietario,
        empleado,
        vehiculo,
        matricula,
        seguro,
    })
}
}
