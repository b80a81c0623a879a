// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use matricula::CoreError;
use matricula_domain::DomainError;
use matricula_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Returns the rule name if this is a domain rule violation.
    #[must_use]
    pub fn rule(&self) -> Option<&str> {
        match self {
            Self::DomainRuleViolation { rule, .. } => Some(rule),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound(message) => Self::ResourceNotFound {
                resource_type: String::from("Record"),
                message,
            },
            other => Self::Internal {
                message: other.to_string(),
            },
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidCedula(msg) => ApiError::InvalidInput {
            field: String::from("cedula"),
            message: msg,
        },
        DomainError::InvalidChasis(msg) => ApiError::InvalidInput {
            field: String::from("chasis"),
            message: msg,
        },
        DomainError::InvalidName(msg) => ApiError::InvalidInput {
            field: String::from("nombre"),
            message: msg,
        },
        DomainError::InvalidField { field, reason } => ApiError::InvalidInput {
            field,
            message: reason,
        },
        DomainError::MissingDocument(kind) => ApiError::InvalidInput {
            field: format!("documentos.{kind}"),
            message: format!("Document '{kind}' is required"),
        },
        DomainError::InvalidDecision(msg) => ApiError::InvalidInput {
            field: String::from("decision"),
            message: msg,
        },
        DomainError::InvalidState { kind, value } => ApiError::InvalidInput {
            field: String::from("estado"),
            message: format!("'{value}' is not a valid {kind} state"),
        },
        DomainError::InvalidLimit(msg) => ApiError::InvalidInput {
            field: String::from("limits"),
            message: msg,
        },
        DomainError::VehicleLimitExceeded { count, max } => ApiError::DomainRuleViolation {
            rule: String::from("vehicle_limit"),
            message: format!(
                "Owner already has {count} active registered vehicles; the maximum is {max}"
            ),
        },
        DomainError::DuplicateCedula(cedula) => ApiError::DomainRuleViolation {
            rule: String::from("unique_cedula"),
            message: format!("A persona with cedula '{cedula}' already exists"),
        },
        DomainError::DuplicateChasis(chasis) => ApiError::DomainRuleViolation {
            rule: String::from("unique_chasis"),
            message: format!("A vehicle with chassis '{chasis}' is already registered"),
        },
        DomainError::DuplicatePolicyNumber(poliza) => ApiError::DomainRuleViolation {
            rule: String::from("unique_policy_number"),
            message: format!("Insurance policy '{poliza}' is already in use"),
        },
        DomainError::NoCaseworkerAvailable => ApiError::DomainRuleViolation {
            rule: String::from("caseworker_available"),
            message: String::from("No caseworker is available to receive the application"),
        },
        DomainError::CaseworkerUnavailable(id) => ApiError::DomainRuleViolation {
            rule: String::from("caseworker_available"),
            message: format!("Persona {id} cannot receive assignments"),
        },
        DomainError::PersonaDisabled(id) => ApiError::DomainRuleViolation {
            rule: String::from("persona_enabled"),
            message: format!("Persona {id} is disabled"),
        },
        DomainError::SolicitudNotPending {
            solicitud_id,
            estado,
        } => ApiError::DomainRuleViolation {
            rule: String::from("solicitud_pending"),
            message: format!("Solicitud {solicitud_id} is already {estado}"),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}
