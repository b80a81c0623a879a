// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod capacity;
mod error;
mod limits;
mod persona;
mod plate;
mod solicitud;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use capacity::{
    Assignment, EmpleadoLoad, capacity_transition, check_vehicle_capacity, evaluate_reassignment,
    select_empleado,
};
pub use error::DomainError;
pub use limits::WorkflowLimits;
pub use persona::{IdentityFields, Persona, PersonaUpdate};
pub use plate::{
    IssuedCode, PLACEHOLDER_PREFIX, PLATE_PREFIX, format_plate_code, is_plate_code,
    issue_plate_code, placeholder_code,
};
pub use solicitud::{
    Decision, InsuranceData, Matricula, Seguro, Solicitud, SolicitudStatus, VehicleData, Vehiculo,
};
pub use types::{
    Cedula, Chasis, DocumentRefs, MatriculaEstado, PersonaEstado, PersonaRol, SolicitudEstado,
    VehiculoEstado,
};
pub use validation::{
    validate_decision, validate_documents, validate_identity_fields, validate_insurance_data,
    validate_vehicle_data,
};
