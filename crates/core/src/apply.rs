// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{Effect, NotificationKind, Recipient, TransitionResult};
use matricula_domain::{DomainError, Solicitud, SolicitudStatus};

/// Returns the effects that follow the creation of a new `Solicitud`.
///
/// The caller has already persisted the vehicle, the pending plate and the
/// application row. What remains is the assignee's capacity check and the
/// two creation notifications.
#[must_use]
pub fn open(solicitud: &Solicitud) -> Vec<Effect> {
    vec![
        Effect::ReconcileEmpleado {
            empleado_id: solicitud.empleado_id,
        },
        Effect::Notify {
            kind: NotificationKind::Created,
            recipient: Recipient::Propietario(solicitud.propietario_id),
        },
        Effect::Notify {
            kind: NotificationKind::Assigned,
            recipient: Recipient::Empleado(solicitud.empleado_id),
        },
    ]
}

/// Applies a command to a `Solicitud`, producing the new state and its effects.
///
/// # Arguments
///
/// * `solicitud` - The current application (immutable)
/// * `command` - The command to apply
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new state and ordered effects
/// * `Err(CoreError)` if the transition is not allowed
///
/// # Errors
///
/// Returns an error if:
/// - The application is no longer `Pendiente`
/// - A decision is missing its note, reason, or detail
pub fn apply(solicitud: &Solicitud, command: Command) -> Result<TransitionResult, CoreError> {
    if solicitud.status.is_terminal() {
        return Err(CoreError::DomainViolation(
            DomainError::SolicitudNotPending {
                solicitud_id: solicitud.solicitud_id,
                estado: solicitud.status.estado(),
            },
        ));
    }

    let mut new_state: Solicitud = solicitud.clone();

    let effects: Vec<Effect> = match command {
        Command::Aprobar {
            nota_revision,
            procesada_en,
        } => {
            if nota_revision.trim().is_empty() {
                return Err(DomainError::InvalidDecision(String::from(
                    "Approval requires a review note",
                ))
                .into());
            }

            let effects = vec![
                Effect::IssuePlate {
                    matricula_id: solicitud.matricula_id,
                    fecha_emision: procesada_en.clone(),
                },
                Effect::ActivateVehiculo {
                    vehiculo_id: solicitud.vehiculo_id,
                    propietario_id: solicitud.propietario_id,
                },
                Effect::ReconcileEmpleado {
                    empleado_id: solicitud.empleado_id,
                },
                processed_notification(solicitud),
            ];
            new_state.status = SolicitudStatus::Aprobada {
                nota_revision,
                procesada_en,
            };
            effects
        }
        Command::Rechazar {
            motivo,
            detalle,
            procesada_en,
        } => {
            if motivo.trim().is_empty() || detalle.trim().is_empty() {
                return Err(DomainError::InvalidDecision(String::from(
                    "Rejection requires a reason and a detail",
                ))
                .into());
            }

            // The vehicle stays inactivo and is never reachable from this application again.
            let effects = vec![
                Effect::CancelPlate {
                    matricula_id: solicitud.matricula_id,
                },
                Effect::ReconcileEmpleado {
                    empleado_id: solicitud.empleado_id,
                },
                processed_notification(solicitud),
            ];
            new_state.status = SolicitudStatus::Rechazada {
                motivo,
                detalle,
                procesada_en,
            };
            effects
        }
        Command::Reasignar { assignment } => {
            let previous: i64 = solicitud.empleado_id;
            new_state.empleado_id = assignment.empleado_id;
            new_state.en_cola = assignment.en_cola;

            let mut effects = Vec::with_capacity(3);
            if previous != assignment.empleado_id {
                effects.push(Effect::ReconcileEmpleado {
                    empleado_id: previous,
                });
            }
            effects.push(Effect::ReconcileEmpleado {
                empleado_id: assignment.empleado_id,
            });
            effects.push(Effect::Notify {
                kind: NotificationKind::Assigned,
                recipient: Recipient::Empleado(assignment.empleado_id),
            });
            effects
        }
    };

    Ok(TransitionResult { new_state, effects })
}

const fn processed_notification(solicitud: &Solicitud) -> Effect {
    Effect::Notify {
        kind: NotificationKind::Processed,
        recipient: Recipient::Propietario(solicitud.propietario_id),
    }
}
