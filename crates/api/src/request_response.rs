// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use matricula_domain::{
    Cedula, Chasis, Decision, DocumentRefs, DomainError, EmpleadoLoad, IdentityFields,
    InsuranceData, Persona, PersonaEstado, SolicitudEstado, SolicitudStatus, VehicleData,
};
use matricula_persistence::SolicitudRecord;

/// Identity fields as submitted, before parsing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IdentityInput {
    /// Given names.
    pub nombres: String,
    /// Family names.
    pub apellidos: String,
    /// National ID. Hyphens and spaces are accepted.
    pub cedula: String,
    /// Birth date (ISO 8601), optional.
    pub fecha_nacimiento: Option<String>,
    /// Phone number, optional.
    pub telefono: Option<String>,
    /// Email address, optional.
    pub email: Option<String>,
    /// Postal address, optional.
    pub direccion: Option<String>,
}

impl IdentityInput {
    /// Parses the submitted fields into validated domain input.
    ///
    /// # Errors
    ///
    /// Returns an error if the national ID is malformed.
    pub fn into_fields(self) -> Result<IdentityFields, DomainError> {
        Ok(IdentityFields {
            nombres: self.nombres,
            apellidos: self.apellidos,
            cedula: Cedula::parse(&self.cedula)?,
            fecha_nacimiento: self.fecha_nacimiento,
            telefono: self.telefono,
            email: self.email,
            direccion: self.direccion,
        })
    }
}

/// Vehicle fields as submitted, before parsing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VehicleInput {
    /// Chassis number.
    pub chasis: String,
    /// Use category (e.g. "privado").
    pub uso: String,
    /// Model reference.
    pub modelo_id: i64,
    /// Vehicle type reference.
    pub tipo_vehiculo_id: i64,
    /// Model year, optional.
    pub anio: Option<i32>,
    /// Color, optional.
    pub color: Option<String>,
}

impl VehicleInput {
    /// Parses the submitted fields into validated domain input.
    ///
    /// # Errors
    ///
    /// Returns an error if the chassis number is malformed.
    pub fn into_data(self) -> Result<VehicleData, DomainError> {
        Ok(VehicleData {
            chasis: Chasis::parse(&self.chasis)?,
            uso: self.uso,
            modelo_id: self.modelo_id,
            tipo_vehiculo_id: self.tipo_vehiculo_id,
            anio: self.anio,
            color: self.color,
        })
    }
}

/// API request to submit a registration application.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateSolicitudRequest {
    /// The owner's identity.
    pub propietario: IdentityInput,
    /// The vehicle to register.
    pub vehiculo: VehicleInput,
    /// Insurance, if the vehicle carries any.
    pub seguro: Option<InsuranceData>,
    /// Stored document references.
    pub documentos: DocumentRefs,
}

/// API response for a successfully submitted application.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateSolicitudResponse {
    /// The application ID.
    pub solicitud_id: i64,
    /// The plate's placeholder code.
    pub codigo_matricula: String,
    /// RFC 3339 registration timestamp.
    pub registrada_en: String,
    /// The caseworker the application was assigned to.
    pub empleado_id: i64,
    /// True if the assignment is a queued fallback.
    pub en_cola: bool,
    /// The application as committed.
    pub solicitud: SolicitudView,
}

/// API request to approve or reject an application.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProcessSolicitudRequest {
    /// The caseworker's decision.
    pub decision: Decision,
}

/// API request to reassign an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssignSolicitudRequest {
    /// The target caseworker's persona ID.
    pub empleado_id: i64,
}

/// Filters for a caseworker's application list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EmpleadoListFilter {
    /// Only applications in this state.
    pub estado: Option<SolicitudEstado>,
    /// Only applications assigned as a queued fallback.
    #[serde(default)]
    pub solo_en_cola: bool,
}

/// API request to register the persona behind an authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegisterPersonaRequest {
    /// The account's login name, mirrored locally.
    pub usuario: String,
    /// The account holder's identity.
    pub identidad: IdentityInput,
}

/// Summary of a persona as seen from an application.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PersonaView {
    /// The persona ID.
    pub persona_id: i64,
    /// Given names.
    pub nombres: String,
    /// Family names.
    pub apellidos: String,
    /// National ID, if known.
    pub cedula: Option<String>,
    /// Email address, if known.
    pub email: Option<String>,
    /// Role name.
    pub rol: String,
    /// Linked account, if any.
    pub cuenta_id: Option<i64>,
    /// Lifecycle state name.
    pub estado: String,
}

impl From<&Persona> for PersonaView {
    fn from(persona: &Persona) -> Self {
        Self {
            persona_id: persona.persona_id,
            nombres: persona.nombres.clone(),
            apellidos: persona.apellidos.clone(),
            cedula: persona.cedula.as_ref().map(|c| c.value().to_string()),
            email: persona.email.clone(),
            rol: persona.rol.as_str().to_string(),
            cuenta_id: persona.cuenta_id,
            estado: persona.estado.as_str().to_string(),
        }
    }
}

/// API response for persona registration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegisterPersonaResponse {
    /// The resolved persona.
    pub persona: PersonaView,
    /// True if a new persona was created.
    pub created: bool,
}

/// The vehicle as seen from an application.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VehiculoView {
    /// The vehicle ID.
    pub vehiculo_id: i64,
    /// Chassis number, upper-case.
    pub chasis: String,
    /// Use category.
    pub uso: String,
    /// Model reference.
    pub modelo_id: i64,
    /// Vehicle type reference.
    pub tipo_vehiculo_id: i64,
    /// Model year.
    pub anio: Option<i32>,
    /// Color.
    pub color: Option<String>,
    /// Owner, set on approval.
    pub propietario_id: Option<i64>,
    /// Lifecycle state name.
    pub estado: String,
}

/// The plate as seen from an application.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MatriculaView {
    /// The plate ID.
    pub matricula_id: i64,
    /// Issued code, or the placeholder while pending.
    pub codigo: String,
    /// Lifecycle state name.
    pub estado: String,
    /// RFC 3339 issuance timestamp.
    pub fecha_emision: Option<String>,
}

/// The insurance as seen from an application.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SeguroView {
    /// The insurance ID.
    pub seguro_id: i64,
    /// Insurer reference.
    pub aseguradora_id: i64,
    /// Policy number.
    pub numero_poliza: String,
}

/// An application joined with everything it references.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SolicitudView {
    /// The application ID.
    pub solicitud_id: i64,
    /// Lifecycle state.
    pub estado: SolicitudEstado,
    /// True if the current assignment is a queued fallback.
    pub en_cola: bool,
    /// RFC 3339 registration timestamp.
    pub registrada_en: String,
    /// RFC 3339 processing timestamp, once terminal.
    pub procesada_en: Option<String>,
    /// Review note, once approved.
    pub nota_revision: Option<String>,
    /// Rejection reason, once rejected.
    pub motivo_rechazo: Option<String>,
    /// Rejection detail, once rejected.
    pub detalle_rechazo: Option<String>,
    /// Stored document references.
    pub documentos: DocumentRefs,
    /// The owner.
    pub propietario: PersonaView,
    /// The assigned caseworker.
    pub empleado: PersonaView,
    /// The vehicle.
    pub vehiculo: VehiculoView,
    /// The plate.
    pub matricula: MatriculaView,
    /// The insurance, if any.
    pub seguro: Option<SeguroView>,
}

impl From<&SolicitudRecord> for SolicitudView {
    fn from(record: &SolicitudRecord) -> Self {
        let solicitud = &record.solicitud;
        let (nota_revision, motivo_rechazo, detalle_rechazo) = match &solicitud.status {
            SolicitudStatus::Pendiente => (None, None, None),
            SolicitudStatus::Aprobada { nota_revision, .. } => {
                (Some(nota_revision.clone()), None, None)
            }
            SolicitudStatus::Rechazada {
                motivo, detalle, ..
            } => (None, Some(motivo.clone()), Some(detalle.clone())),
        };

        Self {
            solicitud_id: solicitud.solicitud_id,
            estado: solicitud.status.estado(),
            en_cola: solicitud.en_cola,
            registrada_en: solicitud.registrada_en.clone(),
            procesada_en: solicitud.status.procesada_en().map(str::to_string),
            nota_revision,
            motivo_rechazo,
            detalle_rechazo,
            documentos: solicitud.documentos.clone(),
            propietario: PersonaView::from(&record.propietario),
            empleado: PersonaView::from(&record.empleado),
            vehiculo: VehiculoView {
                vehiculo_id: record.vehiculo.vehiculo_id,
                chasis: record.vehiculo.chasis.value().to_string(),
                uso: record.vehiculo.uso.clone(),
                modelo_id: record.vehiculo.modelo_id,
                tipo_vehiculo_id: record.vehiculo.tipo_vehiculo_id,
                anio: record.vehiculo.anio,
                color: record.vehiculo.color.clone(),
                propietario_id: record.vehiculo.propietario_id,
                estado: record.vehiculo.estado.as_str().to_string(),
            },
            matricula: MatriculaView {
                matricula_id: record.matricula.matricula_id,
                codigo: record.matricula.codigo.clone(),
                estado: record.matricula.estado.as_str().to_string(),
                fecha_emision: record.matricula.fecha_emision.clone(),
            },
            seguro: record.seguro.as_ref().map(|s| SeguroView {
                seguro_id: s.seguro_id,
                aseguradora_id: s.aseguradora_id,
                numero_poliza: s.numero_poliza.clone(),
            }),
        }
    }
}

/// A caseworker's state and pending load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EmpleadoLoadInfo {
    /// The caseworker's persona ID.
    pub empleado_id: i64,
    /// Lifecycle state.
    pub estado: PersonaEstado,
    /// Pending applications assigned.
    pub pendientes: i64,
    /// True if the caseworker is eligible for new assignments.
    pub disponible: bool,
}

/// API response listing caseworker loads.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListEmpleadoLoadsResponse {
    /// The configured pending cap.
    pub max_pendientes: i64,
    /// One entry per non-disabled caseworker.
    pub empleados: Vec<EmpleadoLoadInfo>,
}

impl EmpleadoLoadInfo {
    pub(crate) const fn from_load(load: EmpleadoLoad, max_pendientes: i64) -> Self {
        Self {
            empleado_id: load.empleado_id,
            estado: load.estado,
            pendientes: load.pendientes,
            disponible: load.accepts_new_work(max_pendientes),
        }
    }
}

/// API response for a persona disable.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DisablePersonaResponse {
    /// The disabled persona.
    pub persona: PersonaView,
    /// The account that was unlinked, if any.
    pub cuenta_desvinculada: Option<i64>,
}
