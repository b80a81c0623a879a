// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the vehicle registration workflow.
//!
//! The handlers here are the operations exposed to a controller layer:
//! submit an application, read and list applications, reassign, and
//! approve or reject. They are synchronous and take an injected
//! [`Persistence`](matricula_persistence::Persistence) handle; no state is
//! held between calls.

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
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod notifications;
mod request_response;
mod workflow;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthorizationService, Role};
pub use error::{ApiError, AuthError, translate_core_error, translate_domain_error};
pub use handlers::{
    assign_to_employee, create_solicitud, disable_persona, get_solicitud, list_by_employee,
    list_by_owner, list_empleado_loads, process_solicitud, register_account_persona,
};
pub use matricula::NotificationKind;
pub use notifications::{NoopNotifier, NotificationEnvelope, NotificationError, Notifier};
pub use request_response::{
    AssignSolicitudRequest, CreateSolicitudRequest, CreateSolicitudResponse,
    DisablePersonaResponse, EmpleadoListFilter, EmpleadoLoadInfo, IdentityInput,
    ListEmpleadoLoadsResponse, MatriculaView, PersonaView, ProcessSolicitudRequest,
    RegisterPersonaRequest, RegisterPersonaResponse, SeguroView, SolicitudView, VehicleInput,
    VehiculoView,
};

/// Authenticates an actor.
///
/// Real credential checks belong to the external authentication service.
/// This only rejects identities that cannot belong to any account.
///
/// # Errors
///
/// Returns an error if `cuenta_id` is not positive.
pub fn authenticate_stub(cuenta_id: i64, role: Role) -> Result<AuthenticatedActor, AuthError> {
    if cuenta_id <= 0 {
        return Err(AuthError::AuthenticationFailed {
            reason: format!("Account ID must be positive, got {cuenta_id}"),
        });
    }
    Ok(AuthenticatedActor::new(cuenta_id, role))
}
