// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Workflow steps shared by the handlers.
//!
//! Every function here runs inside a write transaction opened by the
//! calling handler and takes the transaction's `Persistence` handle.
//! Identity resolution, capacity checks, caseworker selection, plate
//! issuance, and effect execution all live here so the handlers only
//! sequence them.

use matricula::{Effect, IdentityPlan, NotificationKind, Recipient, plan_identity};
use matricula_domain::{
    Assignment, DomainError, IdentityFields, IssuedCode, PersonaEstado, PersonaRol, Solicitud,
    WorkflowLimits, capacity_transition, check_vehicle_capacity, issue_plate_code,
    select_empleado,
};
use matricula_persistence::{NewPersona, Persistence, PersistenceError};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info, warn};

use crate::auth::AuthenticatedActor;
use crate::error::{ApiError, translate_domain_error};
use crate::notifications::NotificationEnvelope;

/// Times a plate issuance may lose a race for its code before giving up.
const MAX_ISSUE_CONFLICTS: u32 = 3;

/// Returns the current UTC time as RFC 3339 text.
pub(crate) fn now_rfc3339() -> Result<String, ApiError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to format timestamp: {e}"),
        })
}

/// Returns the non-disabled persona linked to the actor's account, if any.
pub(crate) fn actor_persona_id(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<Option<i64>, ApiError> {
    Ok(persistence
        .find_persona_by_cuenta(actor.cuenta_id)?
        .map(|p| p.persona_id))
}

pub(crate) fn solicitud_not_found(solicitud_id: i64) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from("Solicitud"),
        message: format!("Solicitud {solicitud_id} does not exist"),
    }
}

pub(crate) fn persona_not_found(persona_id: i64) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from("Persona"),
        message: format!("Persona {persona_id} does not exist"),
    }
}

/// The persona an identity resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResolvedIdentity {
    pub persona_id: i64,
    pub created: bool,
}

/// Resolves submitted identity fields to exactly one persona.
///
/// Leaves the account link consistent: after this returns, `cuenta_id`
/// (when present) is linked to the returned persona and to no other
/// non-disabled persona.
pub(crate) fn resolve_identity(
    persistence: &mut Persistence,
    fields: &IdentityFields,
    cuenta_id: Option<i64>,
    rol: PersonaRol,
) -> Result<ResolvedIdentity, ApiError> {
    let linked = match cuenta_id {
        Some(cuenta_id) => persistence.find_persona_by_cuenta(cuenta_id)?,
        None => None,
    };
    let by_cedula = persistence.find_persona_by_cedula(fields.cedula.value())?;

    let ids: Vec<i64> = linked
        .iter()
        .chain(by_cedula.iter())
        .map(|p| p.persona_id)
        .collect();
    persistence.lock_personas(&ids)?;

    let plan: IdentityPlan = plan_identity(linked.as_ref(), by_cedula.as_ref(), fields, cuenta_id)
        .map_err(translate_domain_error)?;

    let resolved = match plan {
        IdentityPlan::UseLinked { persona_id, update } => {
            persistence.update_persona(persona_id, &update)?;
            info!(persona_id, ?cuenta_id, "Identity resolved to linked persona");
            ResolvedIdentity {
                persona_id,
                created: false,
            }
        }
        IdentityPlan::Relink {
            from_persona_id,
            to_persona_id,
            displaced_cuenta_id,
            update,
        } => {
            if let Some(displaced) = displaced_cuenta_id {
                warn!(
                    persona_id = to_persona_id,
                    displaced_cuenta_id = displaced,
                    ?cuenta_id,
                    "Persona was linked to another account; re-linking"
                );
            }
            persistence.set_cuenta_link(from_persona_id, None)?;
            persistence.set_cuenta_link(to_persona_id, cuenta_id)?;
            persistence.update_persona(to_persona_id, &update)?;
            warn!(
                from_persona_id,
                to_persona_id,
                ?cuenta_id,
                "Cedula belongs to another persona; account re-linked to its owner"
            );
            ResolvedIdentity {
                persona_id: to_persona_id,
                created: false,
            }
        }
        IdentityPlan::LinkExisting {
            persona_id,
            displaced_cuenta_id,
            update,
        } => {
            if cuenta_id.is_some() {
                if let Some(displaced) = displaced_cuenta_id {
                    warn!(
                        persona_id,
                        displaced_cuenta_id = displaced,
                        ?cuenta_id,
                        "Persona was linked to another account; re-linking"
                    );
                }
                persistence.set_cuenta_link(persona_id, cuenta_id)?;
            }
            persistence.update_persona(persona_id, &update)?;
            info!(persona_id, ?cuenta_id, "Identity resolved by cedula");
            ResolvedIdentity {
                persona_id,
                created: false,
            }
        }
        IdentityPlan::Create => {
            let persona_id = persistence.insert_persona(&NewPersona::from_identity(
                fields, rol, cuenta_id,
            ))?;
            info!(persona_id, ?cuenta_id, "Identity resolved to new persona");
            ResolvedIdentity {
                persona_id,
                created: true,
            }
        }
    };

    // The account mirrors the state of the persona it is now linked to.
    if let Some(cuenta_id) = cuenta_id {
        let persona = persistence
            .get_persona(resolved.persona_id)?
            .ok_or_else(|| persona_not_found(resolved.persona_id))?;
        persistence.set_cuenta_estado(cuenta_id, persona.estado)?;
    }

    Ok(resolved)
}

/// Rejects the owner if they already hold the maximum of active, plated
/// vehicles.
pub(crate) fn enforce_vehicle_capacity(
    persistence: &mut Persistence,
    propietario_id: i64,
    limits: &WorkflowLimits,
) -> Result<(), ApiError> {
    persistence.lock_personas(&[propietario_id])?;
    let count = persistence.count_active_vehicles(propietario_id)?;

    check_vehicle_capacity(count, limits).map_err(|e| {
        info!(
            propietario_id,
            count,
            max = limits.max_active_vehicles,
            "Vehicle cap reached; application rejected"
        );
        translate_domain_error(e)
    })
}

/// Picks the caseworker for a new application.
pub(crate) fn assign_new(
    persistence: &mut Persistence,
    limits: &WorkflowLimits,
) -> Result<Assignment, ApiError> {
    persistence.lock_empleados()?;
    let loads = persistence.list_empleado_loads()?;
    let assignment = select_empleado(&loads, limits).map_err(translate_domain_error)?;

    if assignment.en_cola {
        warn!(
            empleado_id = assignment.empleado_id,
            "No caseworker under capacity; application queued"
        );
    } else {
        debug!(empleado_id = assignment.empleado_id, "Caseworker selected");
    }

    Ok(assignment)
}

/// Flips a caseworker between `activo` and `inactivo` as their pending
/// count crosses the cap.
pub(crate) fn reconcile_empleado(
    persistence: &mut Persistence,
    empleado_id: i64,
    limits: &WorkflowLimits,
) -> Result<(), ApiError> {
    let persona = persistence
        .get_persona(empleado_id)?
        .ok_or_else(|| persona_not_found(empleado_id))?;
    let pendientes = persistence.count_pending_for_empleado(empleado_id)?;

    match capacity_transition(persona.estado, pendientes, limits) {
        Some(PersonaEstado::Inactivo) => {
            persistence.set_persona_estado(empleado_id, PersonaEstado::Inactivo)?;
            info!(empleado_id, pendientes, "Caseworker at capacity; deactivated");
        }
        Some(next) => {
            persistence.set_persona_estado(empleado_id, next)?;
            info!(empleado_id, pendientes, "Caseworker under capacity; reactivated");
        }
        None => debug!(empleado_id, pendientes, "Caseworker state unchanged"),
    }

    Ok(())
}

/// Issues a final code for a pending plate and returns it.
///
/// `draw` supplies the random numbers and `fallback_seed` the value used
/// once every draw has collided. Draws are checked against issued codes
/// first. A code that still loses to a concurrent issuer is caught by the
/// unique column and the whole round is repeated.
pub(crate) fn issue_plate(
    persistence: &mut Persistence,
    matricula_id: i64,
    fecha_emision: &str,
    limits: &WorkflowLimits,
    mut draw: impl FnMut() -> u32,
    mut fallback_seed: impl FnMut() -> i64,
) -> Result<String, ApiError> {
    for conflict in 0..=MAX_ISSUE_CONFLICTS {
        let issued: IssuedCode = issue_plate_code(
            limits.plate_draw_attempts,
            &mut draw,
            |code| {
                let taken = persistence.plate_code_taken(code)?;
                if taken {
                    debug!(matricula_id, code, "Plate code collision");
                }
                Ok::<bool, PersistenceError>(taken)
            },
            fallback_seed(),
        )?;

        if issued.fallback {
            warn!(
                matricula_id,
                code = %issued.code,
                attempts = issued.attempts,
                "Plate draws exhausted; using timestamp fallback"
            );
        }

        match persistence.issue_matricula(matricula_id, &issued.code, fecha_emision) {
            Ok(()) => return Ok(issued.code),
            Err(PersistenceError::UniqueViolation(msg)) => {
                debug!(
                    matricula_id,
                    code = %issued.code,
                    conflict,
                    error = %msg,
                    "Plate code claimed concurrently; redrawing"
                );
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(ApiError::Internal {
        message: format!("Could not issue a unique plate code for matricula {matricula_id}"),
    })
}

/// A notification collected while applying effects, sent after commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingNotice {
    pub kind: NotificationKind,
    pub recipient: Recipient,
}

/// Applies transition effects in order.
///
/// Returns the notifications the effects asked for; they are not sent here.
pub(crate) fn apply_effects(
    persistence: &mut Persistence,
    effects: Vec<Effect>,
    limits: &WorkflowLimits,
) -> Result<Vec<PendingNotice>, ApiError> {
    let mut notices: Vec<PendingNotice> = Vec::new();

    for effect in effects {
        match effect {
            Effect::IssuePlate {
                matricula_id,
                fecha_emision,
            } => {
                issue_plate(
                    persistence,
                    matricula_id,
                    &fecha_emision,
                    limits,
                    rand::random::<u32>,
                    || OffsetDateTime::now_utc().unix_timestamp(),
                )?;
            }
            Effect::CancelPlate { matricula_id } => persistence.cancel_matricula(matricula_id)?,
            Effect::ActivateVehiculo {
                vehiculo_id,
                propietario_id,
            } => persistence.activate_vehiculo(vehiculo_id, propietario_id)?,
            Effect::ReconcileEmpleado { empleado_id } => {
                reconcile_empleado(persistence, empleado_id, limits)?;
            }
            Effect::Notify { kind, recipient } => notices.push(PendingNotice { kind, recipient }),
        }
    }

    Ok(notices)
}

/// Resolves notification recipients to accounts.
///
/// Personas without a linked account cannot be notified and are skipped.
pub(crate) fn build_envelopes(
    persistence: &mut Persistence,
    notices: &[PendingNotice],
    solicitud: &Solicitud,
) -> Result<Vec<NotificationEnvelope>, ApiError> {
    let mut envelopes: Vec<NotificationEnvelope> = Vec::with_capacity(notices.len());

    for notice in notices {
        let persona_id = match notice.recipient {
            Recipient::Propietario(id) | Recipient::Empleado(id) => id,
        };

        match persistence.get_persona(persona_id)?.and_then(|p| p.cuenta_id) {
            Some(cuenta_id) => envelopes.push(NotificationEnvelope {
                kind: notice.kind,
                cuenta_id,
                solicitud: solicitud.clone(),
            }),
            None => debug!(
                persona_id,
                kind = notice.kind.as_str(),
                "Recipient has no account; notification skipped"
            ),
        }
    }

    Ok(envelopes)
}

/// Fails with `DuplicateChasis` if a live vehicle already uses `chasis`.
pub(crate) fn ensure_chasis_free(
    persistence: &mut Persistence,
    chasis: &str,
) -> Result<(), ApiError> {
    if persistence.chasis_in_use(chasis)? {
        return Err(translate_domain_error(DomainError::DuplicateChasis(
            chasis.to_string(),
        )));
    }
    Ok(())
}

/// Fails with `DuplicatePolicyNumber` if an active insurance uses `numero_poliza`.
pub(crate) fn ensure_policy_free(
    persistence: &mut Persistence,
    numero_poliza: &str,
) -> Result<(), ApiError> {
    if persistence.policy_in_use(numero_poliza)? {
        return Err(translate_domain_error(DomainError::DuplicatePolicyNumber(
            numero_poliza.to_string(),
        )));
    }
    Ok(())
}
