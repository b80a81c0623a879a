// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::persona::IdentityFields;
use crate::solicitud::{Decision, InsuranceData, VehicleData};
use crate::types::DocumentRefs;
use time::Date;
use time::macros::format_description;

/// Earliest model year accepted for a vehicle.
const MIN_MODEL_YEAR: i32 = 1900;
/// Latest model year accepted for a vehicle.
const MAX_MODEL_YEAR: i32 = 2100;

fn require_non_empty(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidField {
            field: field.to_string(),
            reason: String::from("cannot be empty"),
        });
    }
    Ok(())
}

fn require_positive_id(field: &str, value: i64) -> Result<(), DomainError> {
    if value <= 0 {
        return Err(DomainError::InvalidField {
            field: field.to_string(),
            reason: format!("must be a positive identifier, got {value}"),
        });
    }
    Ok(())
}

/// Validates submitted identity fields.
///
/// The cédula is already normalized by construction. This checks that the
/// names are present and that optional fields, when supplied, are well formed.
///
/// # Errors
///
/// Returns an error if:
/// - Either name field is empty
/// - The birth date is not an ISO 8601 calendar date
/// - The email does not contain `@`
pub fn validate_identity_fields(fields: &IdentityFields) -> Result<(), DomainError> {
    if fields.nombres.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Nombres cannot be empty",
        )));
    }
    if fields.apellidos.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Apellidos cannot be empty",
        )));
    }

    if let Some(fecha) = &fields.fecha_nacimiento {
        Date::parse(fecha, format_description!("[year]-[month]-[day]")).map_err(|e| {
            DomainError::InvalidField {
                field: String::from("fecha_nacimiento"),
                reason: format!("'{fecha}' is not a valid date: {e}"),
            }
        })?;
    }

    if let Some(email) = &fields.email
        && !email.contains('@')
    {
        return Err(DomainError::InvalidField {
            field: String::from("email"),
            reason: format!("'{email}' is not an email address"),
        });
    }

    Ok(())
}

/// Validates submitted vehicle data.
///
/// The chassis number is already normalized by construction.
///
/// # Errors
///
/// Returns `DomainError::InvalidField` for an empty use category, a
/// non-positive reference id, or a model year outside 1900..=2100.
pub fn validate_vehicle_data(data: &VehicleData) -> Result<(), DomainError> {
    require_non_empty("uso", &data.uso)?;
    require_positive_id("modelo_id", data.modelo_id)?;
    require_positive_id("tipo_vehiculo_id", data.tipo_vehiculo_id)?;

    if let Some(anio) = data.anio
        && !(MIN_MODEL_YEAR..=MAX_MODEL_YEAR).contains(&anio)
    {
        return Err(DomainError::InvalidField {
            field: String::from("anio"),
            reason: format!("must be between {MIN_MODEL_YEAR} and {MAX_MODEL_YEAR}, got {anio}"),
        });
    }

    Ok(())
}

/// Validates submitted insurance data.
///
/// # Errors
///
/// Returns `DomainError::InvalidField` for a non-positive insurer or an
/// empty policy number.
pub fn validate_insurance_data(data: &InsuranceData) -> Result<(), DomainError> {
    require_positive_id("aseguradora_id", data.aseguradora_id)?;
    require_non_empty("numero_poliza", &data.numero_poliza)
}

/// Validates that every required document reference is present.
///
/// The insurance certificate is required only when insurance data is
/// supplied with the application.
///
/// # Errors
///
/// Returns `DomainError::MissingDocument` naming the first missing document.
pub fn validate_documents(docs: &DocumentRefs, with_insurance: bool) -> Result<(), DomainError> {
    if docs.cedula.trim().is_empty() {
        return Err(DomainError::MissingDocument(String::from("cedula")));
    }
    if docs.licencia.trim().is_empty() {
        return Err(DomainError::MissingDocument(String::from("licencia")));
    }
    if docs.factura.trim().is_empty() {
        return Err(DomainError::MissingDocument(String::from("factura")));
    }
    if with_insurance
        && docs
            .seguro
            .as_deref()
            .is_none_or(|s| s.trim().is_empty())
    {
        return Err(DomainError::MissingDocument(String::from("seguro")));
    }
    Ok(())
}

/// Validates a decision payload.
///
/// # Errors
///
/// Returns `DomainError::InvalidDecision` if an approval has no review note,
/// or a rejection is missing its reason or detail.
pub fn validate_decision(decision: &Decision) -> Result<(), DomainError> {
    match decision {
        Decision::Aprobar { nota_revision } => {
            if nota_revision.trim().is_empty() {
                return Err(DomainError::InvalidDecision(String::from(
                    "Approval requires a review note",
                )));
            }
        }
        Decision::Rechazar { motivo, detalle } => {
            if motivo.trim().is_empty() {
                return Err(DomainError::InvalidDecision(String::from(
                    "Rejection requires a reason",
                )));
            }
            if detalle.trim().is_empty() {
                return Err(DomainError::InvalidDecision(String::from(
                    "Rejection requires a detail",
                )));
            }
        }
    }
    Ok(())
}
