// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actor identity and authorization rules.
//!
//! Authentication itself happens outside this crate. Callers hand every
//! operation an [`AuthenticatedActor`] that has already been verified, and
//! the rules here decide what that actor may see or change.

use matricula_domain::{PersonaRol, Solicitud};

use crate::error::AuthError;

/// Actor roles for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// A citizen. May submit applications and read their own.
    Ciudadano,
    /// A caseworker. May read and decide the applications assigned to them.
    Empleado,
    /// An administrator. May read everything, decide any pending
    /// application, and reassign work.
    Administrador,
}

impl Role {
    /// Returns the role name used in error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ciudadano => "Ciudadano",
            Self::Empleado => "Empleado",
            Self::Administrador => "Administrador",
        }
    }

    /// Returns the persona role stored for accounts with this role.
    #[must_use]
    pub const fn persona_rol(&self) -> PersonaRol {
        match self {
            Self::Ciudadano => PersonaRol::Ciudadano,
            Self::Empleado => PersonaRol::Empleado,
            Self::Administrador => PersonaRol::Administrador,
        }
    }
}

/// A verified account acting on the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The authentication account ID.
    pub cuenta_id: i64,
    /// The role granted to the account.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(cuenta_id: i64, role: Role) -> Self {
        Self { cuenta_id, role }
    }

    /// Returns true if the actor is an administrator.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Administrador)
    }
}

/// Authorization service for enforcing role-based access control.
///
/// Rules that depend on ownership take `persona_id`, the non-disabled
/// persona linked to the actor's account, if any.
pub struct AuthorizationService;

impl AuthorizationService {
    fn require_admin(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        if actor.is_admin() {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: String::from(Role::Administrador.as_str()),
            })
        }
    }

    /// Checks if an actor may read an application.
    ///
    /// Administrators may read any application. Otherwise the actor must be
    /// the owner or the assigned caseworker.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is none of the above.
    pub fn authorize_view_solicitud(
        actor: &AuthenticatedActor,
        persona_id: Option<i64>,
        solicitud: &Solicitud,
    ) -> Result<(), AuthError> {
        if actor.is_admin() {
            return Ok(());
        }

        let is_owner: bool = persona_id == Some(solicitud.propietario_id);
        let is_assignee: bool =
            actor.role == Role::Empleado && persona_id == Some(solicitud.empleado_id);

        if is_owner || is_assignee {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: String::from("get_solicitud"),
                required_role: String::from("owner, assigned Empleado, or Administrador"),
            })
        }
    }

    /// Checks if an actor may list an owner's applications.
    ///
    /// Caseworkers and administrators may list any owner. Citizens may only
    /// list their own.
    ///
    /// # Errors
    ///
    /// Returns an error if a citizen asks for another owner's list.
    pub fn authorize_list_by_owner(
        actor: &AuthenticatedActor,
        persona_id: Option<i64>,
        propietario_id: i64,
    ) -> Result<(), AuthError> {
        match actor.role {
            Role::Empleado | Role::Administrador => Ok(()),
            Role::Ciudadano if persona_id == Some(propietario_id) => Ok(()),
            Role::Ciudadano => Err(AuthError::Unauthorized {
                action: String::from("list_by_owner"),
                required_role: String::from("owner, Empleado, or Administrador"),
            }),
        }
    }

    /// Checks if an actor may list a caseworker's applications.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is an administrator or the
    /// caseworker themself.
    pub fn authorize_list_by_employee(
        actor: &AuthenticatedActor,
        persona_id: Option<i64>,
        empleado_id: i64,
    ) -> Result<(), AuthError> {
        match actor.role {
            Role::Administrador => Ok(()),
            Role::Empleado if persona_id == Some(empleado_id) => Ok(()),
            Role::Empleado | Role::Ciudadano => Err(AuthError::Unauthorized {
                action: String::from("list_by_employee"),
                required_role: String::from("the assigned Empleado or Administrador"),
            }),
        }
    }

    /// Checks if an actor may approve or reject an application.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is an administrator or the
    /// caseworker the application is assigned to.
    pub fn authorize_process_solicitud(
        actor: &AuthenticatedActor,
        persona_id: Option<i64>,
        solicitud: &Solicitud,
    ) -> Result<(), AuthError> {
        match actor.role {
            Role::Administrador => Ok(()),
            Role::Empleado if persona_id == Some(solicitud.empleado_id) => Ok(()),
            Role::Empleado | Role::Ciudadano => Err(AuthError::Unauthorized {
                action: String::from("process_solicitud"),
                required_role: String::from("the assigned Empleado or Administrador"),
            }),
        }
    }

    /// Checks if an actor may reassign an application.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not an administrator.
    pub fn authorize_assign_solicitud(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "assign_to_employee")
    }

    /// Checks if an actor may view caseworker loads.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not an administrator.
    pub fn authorize_list_empleado_loads(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "list_empleado_loads")
    }

    /// Checks if an actor may disable a persona.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not an administrator.
    pub fn authorize_disable_persona(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "disable_persona")
    }
}
