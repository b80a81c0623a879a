// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{Chasis, DocumentRefs, MatriculaEstado, SolicitudEstado, VehiculoEstado};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a `Solicitud`, carrying the decision metadata.
///
/// `Pendiente` is the only non-terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "estado", rename_all = "snake_case")]
pub enum SolicitudStatus {
    Pendiente,
    Aprobada {
        nota_revision: String,
        procesada_en: String,
    },
    Rechazada {
        motivo: String,
        detalle: String,
        procesada_en: String,
    },
}

impl SolicitudStatus {
    /// Returns the flat state of this status.
    #[must_use]
    pub const fn estado(&self) -> SolicitudEstado {
        match self {
            Self::Pendiente => SolicitudEstado::Pendiente,
            Self::Aprobada { .. } => SolicitudEstado::Aprobada,
            Self::Rechazada { .. } => SolicitudEstado::Rechazada,
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pendiente)
    }

    /// Returns the processing timestamp, if the application was decided.
    #[must_use]
    pub fn procesada_en(&self) -> Option<&str> {
        match self {
            Self::Pendiente => None,
            Self::Aprobada { procesada_en, .. } | Self::Rechazada { procesada_en, .. } => {
                Some(procesada_en)
            }
        }
    }
}

/// A vehicle-registration application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solicitud {
    pub solicitud_id: i64,
    /// The owning persona.
    pub propietario_id: i64,
    /// The assigned caseworker persona.
    pub empleado_id: i64,
    pub vehiculo_id: i64,
    pub matricula_id: i64,
    pub documentos: DocumentRefs,
    /// Whether the current assignment is a queued (over-capacity) fallback.
    pub en_cola: bool,
    /// RFC 3339 registration timestamp.
    pub registrada_en: String,
    pub status: SolicitudStatus,
}

/// A caseworker's decision on a pending application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    /// Approve with a review note.
    Aprobar { nota_revision: String },
    /// Reject with a reason and detail.
    Rechazar { motivo: String, detalle: String },
}

/// An owned vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehiculo {
    pub vehiculo_id: i64,
    pub chasis: Chasis,
    /// Use category (private, commercial, ...).
    pub uso: String,
    pub modelo_id: i64,
    pub tipo_vehiculo_id: i64,
    pub anio: Option<i32>,
    pub color: Option<String>,
    pub seguro_id: Option<i64>,
    /// Set immediately after the pending plate is created.
    pub matricula_id: Option<i64>,
    /// Set only once the application is approved.
    pub propietario_id: Option<i64>,
    pub estado: VehiculoEstado,
}

/// A registration plate record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matricula {
    pub matricula_id: i64,
    /// The final code once `Generada`, otherwise the placeholder.
    pub codigo: String,
    pub estado: MatriculaEstado,
    pub fecha_emision: Option<String>,
}

/// An insurance policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seguro {
    pub seguro_id: i64,
    pub aseguradora_id: i64,
    pub numero_poliza: String,
    pub activo: bool,
}

/// Vehicle data submitted with an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleData {
    pub chasis: Chasis,
    pub uso: String,
    pub modelo_id: i64,
    pub tipo_vehiculo_id: i64,
    pub anio: Option<i32>,
    pub color: Option<String>,
}

/// Insurance data submitted with an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceData {
    pub aseguradora_id: i64,
    pub numero_poliza: String,
}
