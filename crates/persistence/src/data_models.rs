// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use matricula_domain::{
    Cedula, Chasis, DocumentRefs, IdentityFields, Matricula, Persona, PersonaEstado, PersonaRol,
    PersonaUpdate, Seguro, Solicitud, SolicitudEstado, SolicitudStatus, Vehiculo,
};
use serde::{Deserialize, Serialize};

use crate::diesel_schema::{cuentas, matriculas, personas, seguros, solicitudes, vehiculos};
use crate::error::PersistenceError;

/// Data for a persona that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPersona {
    pub nombres: String,
    pub apellidos: String,
    pub cedula: Option<Cedula>,
    pub fecha_nacimiento: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub direccion: Option<String>,
    pub rol: PersonaRol,
    pub cuenta_id: Option<i64>,
    pub estado: PersonaEstado,
}

impl NewPersona {
    /// Builds an active persona from submitted identity fields.
    #[must_use]
    pub fn from_identity(fields: &IdentityFields, rol: PersonaRol, cuenta_id: Option<i64>) -> Self {
        Self {
            nombres: fields.nombres.clone(),
            apellidos: fields.apellidos.clone(),
            cedula: Some(fields.cedula.clone()),
            fecha_nacimiento: fields.fecha_nacimiento.clone(),
            telefono: fields.telefono.clone(),
            email: fields.email.clone(),
            direccion: fields.direccion.clone(),
            rol,
            cuenta_id,
            estado: PersonaEstado::Activo,
        }
    }
}

/// Data for an application row that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSolicitud {
    pub propietario_id: i64,
    pub empleado_id: i64,
    pub vehiculo_id: i64,
    pub matricula_id: i64,
    pub documentos: DocumentRefs,
    pub en_cola: bool,
    pub registrada_en: String,
}

/// A local mirror of an authentication account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuentaData {
    pub cuenta_id: i64,
    pub usuario: String,
    pub rol: PersonaRol,
    pub estado: PersonaEstado,
}

/// A committed application joined with everything it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolicitudRecord {
    pub solicitud: Solicitud,
    pub propietario: Persona,
    pub empleado: Persona,
    pub vehiculo: Vehiculo,
    pub matricula: Matricula,
    pub seguro: Option<Seguro>,
}

/// Diesel Queryable struct for persona rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = personas)]
pub(crate) struct PersonaRow {
    persona_id: i64,
    nombres: String,
    apellidos: String,
    cedula: Option<String>,
    fecha_nacimiento: Option<String>,
    telefono: Option<String>,
    email: Option<String>,
    direccion: Option<String>,
    rol: String,
    cuenta_id: Option<i64>,
    estado: String,
}

impl TryFrom<PersonaRow> for Persona {
    type Error = PersistenceError;

    fn try_from(row: PersonaRow) -> Result<Self, Self::Error> {
        Ok(Self {
            persona_id: row.persona_id,
            nombres: row.nombres,
            apellidos: row.apellidos,
            cedula: row.cedula.as_deref().map(Cedula::parse).transpose()?,
            fecha_nacimiento: row.fecha_nacimiento,
            telefono: row.telefono,
            email: row.email,
            direccion: row.direccion,
            rol: row.rol.parse()?,
            cuenta_id: row.cuenta_id,
            estado: row.estado.parse()?,
        })
    }
}

/// Diesel Queryable struct for account rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = cuentas)]
pub(crate) struct CuentaRow {
    cuenta_id: i64,
    usuario: String,
    rol: String,
    estado: String,
}

impl TryFrom<CuentaRow> for CuentaData {
    type Error = PersistenceError;

    fn try_from(row: CuentaRow) -> Result<Self, Self::Error> {
        Ok(Self {
            cuenta_id: row.cuenta_id,
            usuario: row.usuario,
            rol: row.rol.parse()?,
            estado: row.estado.parse()?,
        })
    }
}

/// Diesel Queryable struct for vehicle rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = vehiculos)]
pub(crate) struct VehiculoRow {
    vehiculo_id: i64,
    chasis: String,
    uso: String,
    modelo_id: i64,
    tipo_vehiculo_id: i64,
    anio: Option<i32>,
    color: Option<String>,
    seguro_id: Option<i64>,
    matricula_id: Option<i64>,
    propietario_id: Option<i64>,
    estado: String,
}

impl TryFrom<VehiculoRow> for Vehiculo {
    type Error = PersistenceError;

    fn try_from(row: VehiculoRow) -> Result<Self, Self::Error> {
        Ok(Self {
            vehiculo_id: row.vehiculo_id,
            chasis: Chasis::parse(&row.chasis)?,
            uso: row.uso,
            modelo_id: row.modelo_id,
            tipo_vehiculo_id: row.tipo_vehiculo_id,
            anio: row.anio,
            color: row.color,
            seguro_id: row.seguro_id,
            matricula_id: row.matricula_id,
            propietario_id: row.propietario_id,
            estado: row.estado.parse()?,
        })
    }
}

/// Diesel Queryable struct for plate rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = matriculas)]
pub(crate) struct MatriculaRow {
    matricula_id: i64,
    codigo: String,
    estado: String,
    fecha_emision: Option<String>,
}

impl TryFrom<MatriculaRow> for Matricula {
    type Error = PersistenceError;

    fn try_from(row: MatriculaRow) -> Result<Self, Self::Error> {
        Ok(Self {
            matricula_id: row.matricula_id,
            codigo: row.codigo,
            estado: row.estado.parse()?,
            fecha_emision: row.fecha_emision,
        })
    }
}

/// Diesel Queryable struct for insurance rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = seguros)]
pub(crate) struct SeguroRow {
    seguro_id: i64,
    aseguradora_id: i64,
    numero_poliza: String,
    activo: i32,
}

impl From<SeguroRow> for Seguro {
    fn from(row: SeguroRow) -> Self {
        Self {
            seguro_id: row.seguro_id,
            aseguradora_id: row.aseguradora_id,
            numero_poliza: row.numero_poliza,
            activo: row.activo != 0,
        }
    }
}

/// Diesel Queryable struct for application rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = solicitudes)]
pub(crate) struct SolicitudRow {
    solicitud_id: i64,
    propietario_id: i64,
    empleado_id: i64,
    vehiculo_id: i64,
    matricula_id: i64,
    doc_cedula: String,
    doc_licencia: String,
    doc_seguro: Option<String>,
    doc_factura: String,
    estado: String,
    en_cola: i32,
    nota_revision: Option<String>,
    motivo_rechazo: Option<String>,
    detalle_rechazo: Option<String>,
    registrada_en: String,
    procesada_en: Option<String>,
}

impl TryFrom<SolicitudRow> for Solicitud {
    type Error = PersistenceError;

    fn try_from(row: SolicitudRow) -> Result<Self, Self::Error> {
        let missing = |field: &str| {
            PersistenceError::CorruptRecord(format!(
                "solicitud {} is '{}' but has no {field}",
                row.solicitud_id, row.estado
            ))
        };

        let estado: SolicitudEstado = row.estado.parse()?;
        let status: SolicitudStatus = match estado {
            SolicitudEstado::Pendiente => SolicitudStatus::Pendiente,
            SolicitudEstado::Aprobada => SolicitudStatus::Aprobada {
                nota_revision: row
                    .nota_revision
                    .clone()
                    .ok_or_else(|| missing("nota_revision"))?,
                procesada_en: row
                    .procesada_en
                    .clone()
                    .ok_or_else(|| missing("procesada_en"))?,
            },
            SolicitudEstado::Rechazada => SolicitudStatus::Rechazada {
                motivo: row
                    .motivo_rechazo
                    .clone()
                    .ok_or_else(|| missing("motivo_rechazo"))?,
                detalle: row
                    .detalle_rechazo
                    .clone()
                    .ok_or_else(|| missing("detalle_rechazo"))?,
                procesada_en: row
                    .procesada_en
                    .clone()
                    .ok_or_else(|| missing("procesada_en"))?,
            },
        };

        Ok(Self {
            solicitud_id: row.solicitud_id,
            propietario_id: row.propietario_id,
            empleado_id: row.empleado_id,
            vehiculo_id: row.vehiculo_id,
            matricula_id: row.matricula_id,
            documentos: DocumentRefs {
                cedula: row.doc_cedula,
                licencia: row.doc_licencia,
                seguro: row.doc_seguro,
                factura: row.doc_factura,
            },
            en_cola: row.en_cola != 0,
            registrada_en: row.registrada_en,
            status,
        })
    }
}

/// Diesel changeset for partial persona updates; `None` fields are skipped.
#[derive(AsChangeset)]
#[diesel(table_name = personas)]
pub(crate) struct PersonaChangeset<'a> {
    nombres: Option<&'a str>,
    apellidos: Option<&'a str>,
    cedula: Option<&'a str>,
    fecha_nacimiento: Option<&'a str>,
    telefono: Option<&'a str>,
    email: Option<&'a str>,
    direccion: Option<&'a str>,
}

impl<'a> From<&'a PersonaUpdate> for PersonaChangeset<'a> {
    fn from(update: &'a PersonaUpdate) -> Self {
        Self {
            nombres: update.nombres.as_deref(),
            apellidos: update.apellidos.as_deref(),
            cedula: update.cedula.as_ref().map(Cedula::value),
            fecha_nacimiento: update.fecha_nacimiento.as_deref(),
            telefono: update.telefono.as_deref(),
            email: update.email.as_deref(),
            direccion: update.direccion.as_deref(),
        }
    }
}
