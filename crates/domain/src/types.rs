// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle state of a `Persona` and of its linked account.
///
/// Personas are never hard-deleted; `Deshabilitado` is the soft-delete state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PersonaEstado {
    /// Usable and, for caseworkers, eligible for new assignments.
    #[default]
    Activo,
    /// Temporarily unavailable (a caseworker at capacity).
    Inactivo,
    /// Soft-deleted. Excluded from uniqueness checks and lookups.
    Deshabilitado,
}

impl PersonaEstado {
    /// Returns the storage representation of this state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Activo => "activo",
            Self::Inactivo => "inactivo",
            Self::Deshabilitado => "deshabilitado",
        }
    }
}

impl FromStr for PersonaEstado {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "activo" => Ok(Self::Activo),
            "inactivo" => Ok(Self::Inactivo),
            "deshabilitado" => Ok(Self::Deshabilitado),
            _ => Err(DomainError::InvalidState {
                kind: "persona",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for PersonaEstado {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role category of a `Persona` (and of the account that authenticates as it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PersonaRol {
    /// A citizen submitting applications.
    #[default]
    Ciudadano,
    /// A caseworker who reviews applications.
    Empleado,
    /// An administrator with reassignment and override authority.
    Administrador,
}

impl PersonaRol {
    /// Returns the storage representation of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ciudadano => "ciudadano",
            Self::Empleado => "empleado",
            Self::Administrador => "administrador",
        }
    }
}

impl FromStr for PersonaRol {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ciudadano" => Ok(Self::Ciudadano),
            "empleado" => Ok(Self::Empleado),
            "administrador" => Ok(Self::Administrador),
            _ => Err(DomainError::InvalidState {
                kind: "rol",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for PersonaRol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of a `Vehiculo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VehiculoEstado {
    /// Registered with an application that has not been approved.
    #[default]
    Inactivo,
    /// Plated and owned.
    Activo,
    /// Soft-deleted.
    Deshabilitado,
}

impl VehiculoEstado {
    /// Returns the storage representation of this state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inactivo => "inactivo",
            Self::Activo => "activo",
            Self::Deshabilitado => "deshabilitado",
        }
    }
}

impl FromStr for VehiculoEstado {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inactivo" => Ok(Self::Inactivo),
            "activo" => Ok(Self::Activo),
            "deshabilitado" => Ok(Self::Deshabilitado),
            _ => Err(DomainError::InvalidState {
                kind: "vehiculo",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for VehiculoEstado {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of a `Matricula` (plate record).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatriculaEstado {
    /// Holds a placeholder code until the application is decided.
    #[default]
    Pendiente,
    /// A final, unique code has been issued.
    Generada,
    /// The application was rejected; the plate will never be issued.
    Cancelada,
}

impl MatriculaEstado {
    /// Returns the storage representation of this state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pendiente => "pendiente",
            Self::Generada => "generada",
            Self::Cancelada => "cancelada",
        }
    }
}

impl FromStr for MatriculaEstado {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendiente" => Ok(Self::Pendiente),
            "generada" => Ok(Self::Generada),
            "cancelada" => Ok(Self::Cancelada),
            _ => Err(DomainError::InvalidState {
                kind: "matricula",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for MatriculaEstado {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Flat state of a `Solicitud`, used for storage and list filters.
///
/// The data-carrying form is [`crate::SolicitudStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SolicitudEstado {
    /// Awaiting a caseworker decision.
    #[default]
    Pendiente,
    /// Approved; terminal.
    Aprobada,
    /// Rejected; terminal.
    Rechazada,
}

impl SolicitudEstado {
    /// Returns the storage representation of this state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pendiente => "pendiente",
            Self::Aprobada => "aprobada",
            Self::Rechazada => "rechazada",
        }
    }

    /// Returns true if no further transition is possible from this state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Aprobada | Self::Rechazada)
    }
}

impl FromStr for SolicitudEstado {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendiente" => Ok(Self::Pendiente),
            "aprobada" => Ok(Self::Aprobada),
            "rechazada" => Ok(Self::Rechazada),
            _ => Err(DomainError::InvalidState {
                kind: "solicitud",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for SolicitudEstado {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A national identity number (cédula).
///
/// Always exactly 11 ASCII digits. Hyphens are accepted on input and
/// stripped, so `001-1234567-8` and `00112345678` are the same cédula.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cedula(String);

impl Cedula {
    /// Number of digits in a cédula.
    pub const LENGTH: usize = 11;

    /// Parses and normalizes a cédula.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCedula` if the value does not contain
    /// exactly 11 digits after removing hyphens and surrounding whitespace.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let normalized: String = value.trim().chars().filter(|c| *c != '-').collect();

        if normalized.len() != Self::LENGTH || !normalized.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::InvalidCedula(format!(
                "'{value}' must contain exactly {} digits",
                Self::LENGTH
            )));
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized digits.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Cedula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A vehicle chassis number.
///
/// Stored upper-case. 5 to 30 ASCII alphanumeric characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chasis(String);

impl Chasis {
    /// Parses and normalizes a chassis number.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidChasis` if the value is too short, too
    /// long, or contains characters other than ASCII letters and digits.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let normalized: String = value.trim().to_uppercase();

        if !(5..=30).contains(&normalized.len()) {
            return Err(DomainError::InvalidChasis(format!(
                "'{value}' must be between 5 and 30 characters"
            )));
        }
        if !normalized.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::InvalidChasis(format!(
                "'{value}' may only contain letters and digits"
            )));
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized chassis number.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Chasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// References to the documents supplied with an application.
///
/// These are opaque references produced by the document storage service.
/// Content is never inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRefs {
    /// Identity document.
    pub cedula: String,
    /// Driver's license.
    pub licencia: String,
    /// Insurance certificate, when insurance data is supplied.
    pub seguro: Option<String>,
    /// Purchase invoice.
    pub factura: String,
}
