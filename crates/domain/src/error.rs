// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::SolicitudEstado;

/// Errors that can occur during domain validation and rule evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// National ID is malformed.
    InvalidCedula(String),
    /// Chassis number is malformed.
    InvalidChasis(String),
    /// A name field is empty or invalid.
    InvalidName(String),
    /// A required field is missing or has an invalid value.
    InvalidField {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
    /// A required document reference is missing.
    MissingDocument(String),
    /// A decision payload is incomplete.
    InvalidDecision(String),
    /// A stored state string could not be parsed.
    InvalidState {
        /// Which state machine the value belongs to.
        kind: &'static str,
        /// The unparseable value.
        value: String,
    },
    /// A workflow limit is out of range.
    InvalidLimit(String),
    /// The owner already holds the maximum number of active, plated vehicles.
    VehicleLimitExceeded {
        /// Active vehicles currently owned.
        count: i64,
        /// The configured maximum.
        max: i64,
    },
    /// Another non-disabled persona already holds this national ID.
    DuplicateCedula(String),
    /// Another non-disabled vehicle already has this chassis number.
    DuplicateChasis(String),
    /// Another active insurance already uses this policy number.
    DuplicatePolicyNumber(String),
    /// No caseworker exists to receive the application.
    NoCaseworkerAvailable,
    /// The persona cannot receive assignments.
    CaseworkerUnavailable(i64),
    /// The persona is disabled and cannot be used.
    PersonaDisabled(i64),
    /// The application has already been decided.
    SolicitudNotPending {
        /// The application.
        solicitud_id: i64,
        /// Its current state.
        estado: SolicitudEstado,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCedula(msg) => write!(f, "Invalid cedula: {msg}"),
            Self::InvalidChasis(msg) => write!(f, "Invalid chassis number: {msg}"),
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::InvalidField { field, reason } => {
                write!(f, "Invalid value for '{field}': {reason}")
            }
            Self::MissingDocument(kind) => write!(f, "Missing required document: {kind}"),
            Self::InvalidDecision(msg) => write!(f, "Invalid decision: {msg}"),
            Self::InvalidState { kind, value } => {
                write!(f, "Invalid {kind} state: '{value}'")
            }
            Self::InvalidLimit(msg) => write!(f, "Invalid workflow limit: {msg}"),
            Self::VehicleLimitExceeded { count, max } => {
                write!(
                    f,
                    "Owner already has {count} active registered vehicles (maximum {max})"
                )
            }
            Self::DuplicateCedula(cedula) => {
                write!(f, "A persona with cedula '{cedula}' already exists")
            }
            Self::DuplicateChasis(chasis) => {
                write!(f, "A vehicle with chassis '{chasis}' is already registered")
            }
            Self::DuplicatePolicyNumber(poliza) => {
                write!(f, "Insurance policy '{poliza}' is already in use")
            }
            Self::NoCaseworkerAvailable => {
                write!(f, "No caseworker is available to receive the application")
            }
            Self::CaseworkerUnavailable(id) => {
                write!(f, "Persona {id} cannot receive assignments")
            }
            Self::PersonaDisabled(id) => write!(f, "Persona {id} is disabled"),
            Self::SolicitudNotPending {
                solicitud_id,
                estado,
            } => {
                write!(
                    f,
                    "Solicitud {solicitud_id} is already {estado} and can no longer change"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}
