// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Vehicle, insurance, plate, and application mutations.
//!
//! These are the writes of the registration workflow. Callers run them
//! inside a write transaction; none of them opens one itself.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use matricula_domain::{
    InsuranceData, MatriculaEstado, Solicitud, SolicitudStatus, VehicleData, VehiculoEstado,
    placeholder_code,
};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::data_models::NewSolicitud;
use crate::diesel_schema::{matriculas, seguros, solicitudes, vehiculos};
use crate::error::PersistenceError;

backend_fn! {
/// Inserts an active insurance record and returns its ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_seguro(conn: &mut _, seguro: &InsuranceData) -> Result<i64, PersistenceError> {
    diesel::insert_into(seguros::table)
        .values((
            seguros::aseguradora_id.eq(seguro.aseguradora_id),
            seguros::numero_poliza.eq(&seguro.numero_poliza),
            seguros::activo.eq(1),
        ))
        .execute(conn)?;

    let seguro_id: i64 = conn.get_last_insert_rowid()?;
    debug!(seguro_id, "Insurance created");
    Ok(seguro_id)
}
}

backend_fn! {
/// Inserts an inactive, unowned vehicle and returns its ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_vehiculo(
    conn: &mut _,
    vehiculo: &VehicleData,
    seguro_id: Option<i64>,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(vehiculos::table)
        .values((
            vehiculos::chasis.eq(vehiculo.chasis.value()),
            vehiculos::uso.eq(&vehiculo.uso),
            vehiculos::modelo_id.eq(vehiculo.modelo_id),
            vehiculos::tipo_vehiculo_id.eq(vehiculo.tipo_vehiculo_id),
            vehiculos::anio.eq(vehiculo.anio),
            vehiculos::color.eq(&vehiculo.color),
            vehiculos::seguro_id.eq(seguro_id),
            vehiculos::estado.eq(VehiculoEstado::Inactivo.as_str()),
        ))
        .execute(conn)?;

    let vehiculo_id: i64 = conn.get_last_insert_rowid()?;
    debug!(vehiculo_id, chasis = vehiculo.chasis.value(), "Vehicle created");
    Ok(vehiculo_id)
}
}

backend_fn! {
/// Reserves a pending plate for a vehicle and links it.
///
/// The plate carries a placeholder code derived from the vehicle ID until
/// it is issued.
///
/// # Errors
///
/// Returns an error if a write fails.
pub fn reserve_matricula(conn: &mut _, vehiculo_id: i64) -> Result<i64, PersistenceError> {
    diesel::insert_into(matriculas::table)
        .values((
            matriculas::codigo.eq(placeholder_code(vehiculo_id)),
            matriculas::estado.eq(MatriculaEstado::Pendiente.as_str()),
        ))
        .execute(conn)?;

    let matricula_id: i64 = conn.get_last_insert_rowid()?;

    diesel::update(vehiculos::table)
        .filter(vehiculos::vehiculo_id.eq(vehiculo_id))
        .set(vehiculos::matricula_id.eq(Some(matricula_id)))
        .execute(conn)?;

    debug!(matricula_id, vehiculo_id, "Pending plate reserved");
    Ok(matricula_id)
}
}

backend_fn! {
/// Inserts an application and returns its ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_solicitud(conn: &mut _, solicitud: &NewSolicitud) -> Result<i64, PersistenceError> {
    diesel::insert_into(solicitudes::table)
        .values((
            solicitudes::propietario_id.eq(solicitud.propietario_id),
            solicitudes::empleado_id.eq(solicitud.empleado_id),
            solicitudes::vehiculo_id.eq(solicitud.vehiculo_id),
            solicitudes::matricula_id.eq(solicitud.matricula_id),
            solicitudes::doc_cedula.eq(&solicitud.documentos.cedula),
            solicitudes::doc_licencia.eq(&solicitud.documentos.licencia),
            solicitudes::doc_seguro.eq(&solicitud.documentos.seguro),
            solicitudes::doc_factura.eq(&solicitud.documentos.factura),
            solicitudes::estado.eq(SolicitudStatus::Pendiente.estado().as_str()),
            solicitudes::en_cola.eq(i32::from(solicitud.en_cola)),
            solicitudes::registrada_en.eq(&solicitud.registrada_en),
        ))
        .execute(conn)?;

    let solicitud_id: i64 = conn.get_last_insert_rowid()?;
    info!(
        solicitud_id,
        propietario_id = solicitud.propietario_id,
        empleado_id = solicitud.empleado_id,
        en_cola = solicitud.en_cola,
        "Application registered"
    );
    Ok(solicitud_id)
}
}

backend_fn! {
/// Writes an application's status and decision fields.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the application does not exist,
/// or an error if the update fails.
pub fn update_solicitud_status(conn: &mut _, solicitud: &Solicitud) -> Result<(), PersistenceError> {
    let (nota, motivo, detalle): (Option<&str>, Option<&str>, Option<&str>) =
        match &solicitud.status {
            SolicitudStatus::Pendiente => (None, None, None),
            SolicitudStatus::Aprobada { nota_revision, .. } => {
                (Some(nota_revision.as_str()), None, None)
            }
            SolicitudStatus::Rechazada {
                motivo, detalle, ..
            } => (None, Some(motivo.as_str()), Some(detalle.as_str())),
        };

    let updated: usize = diesel::update(solicitudes::table)
        .filter(solicitudes::solicitud_id.eq(solicitud.solicitud_id))
        .set((
            solicitudes::estado.eq(solicitud.status.estado().as_str()),
            solicitudes::nota_revision.eq(nota),
            solicitudes::motivo_rechazo.eq(motivo),
            solicitudes::detalle_rechazo.eq(detalle),
            solicitudes::procesada_en.eq(solicitud.status.procesada_en()),
        ))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "solicitud {}",
            solicitud.solicitud_id
        )));
    }

    info!(
        solicitud_id = solicitud.solicitud_id,
        estado = solicitud.status.estado().as_str(),
        "Application status written"
    );
    Ok(())
}
}

backend_fn! {
/// Moves an application to another caseworker.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the application does not exist,
/// or an error if the update fails.
pub fn update_assignment(
    conn: &mut _,
    solicitud_id: i64,
    empleado_id: i64,
    en_cola: bool,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(solicitudes::table)
        .filter(solicitudes::solicitud_id.eq(solicitud_id))
        .set((
            solicitudes::empleado_id.eq(empleado_id),
            solicitudes::en_cola.eq(i32::from(en_cola)),
        ))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("solicitud {solicitud_id}")));
    }

    info!(solicitud_id, empleado_id, en_cola, "Application reassigned");
    Ok(())
}
}

backend_fn! {
/// Issues a plate with its final code.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if another plate was issued
/// with the same code, or an error if the update fails.
pub fn issue_matricula(
    conn: &mut _,
    matricula_id: i64,
    codigo: &str,
    fecha_emision: &str,
) -> Result<(), PersistenceError> {
    diesel::update(matriculas::table)
        .filter(matriculas::matricula_id.eq(matricula_id))
        .set((
            matriculas::codigo.eq(codigo),
            matriculas::codigo_emitido.eq(Some(codigo)),
            matriculas::estado.eq(MatriculaEstado::Generada.as_str()),
            matriculas::fecha_emision.eq(Some(fecha_emision)),
        ))
        .execute(conn)?;

    info!(matricula_id, codigo, "Plate issued");
    Ok(())
}
}

backend_fn! {
/// Cancels a plate. Its placeholder code is kept.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn cancel_matricula(conn: &mut _, matricula_id: i64) -> Result<(), PersistenceError> {
    diesel::update(matriculas::table)
        .filter(matriculas::matricula_id.eq(matricula_id))
        .set(matriculas::estado.eq(MatriculaEstado::Cancelada.as_str()))
        .execute(conn)?;

    info!(matricula_id, "Plate cancelled");
    Ok(())
}
}

backend_fn! {
/// Activates a vehicle and records its owner.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn activate_vehiculo(
    conn: &mut _,
    vehiculo_id: i64,
    propietario_id: i64,
) -> Result<(), PersistenceError> {
    diesel::update(vehiculos::table)
        .filter(vehiculos::vehiculo_id.eq(vehiculo_id))
        .set((
            vehiculos::estado.eq(VehiculoEstado::Activo.as_str()),
            vehiculos::propietario_id.eq(Some(propietario_id)),
        ))
        .execute(conn)?;

    info!(vehiculo_id, propietario_id, "Vehicle activated");
    Ok(())
}
}
