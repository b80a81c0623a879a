// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use matricula_domain::Solicitud;
use serde::{Deserialize, Serialize};

/// Which notification hook an effect triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Created,
    Assigned,
    Processed,
}

impl NotificationKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Assigned => "assigned",
            Self::Processed => "processed",
        }
    }
}

/// Who a notification is addressed to.
///
/// Resolved to an account id by the effect executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// The owning persona.
    Propietario(i64),
    /// A caseworker persona.
    Empleado(i64),
}

/// A side effect produced by a transition.
///
/// Effects are applied in order, inside the same write transaction that
/// persists the new `Solicitud` state. `Notify` effects are deferred until
/// after commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue a final plate code and mark the plate `Generada`.
    IssuePlate {
        matricula_id: i64,
        fecha_emision: String,
    },
    /// Mark the plate `Cancelada`.
    CancelPlate { matricula_id: i64 },
    /// Hand the vehicle to its owner and mark it `activo`.
    ActivateVehiculo {
        vehiculo_id: i64,
        propietario_id: i64,
    },
    /// Recompute a caseworker's pending count and flip their state if needed.
    ReconcileEmpleado { empleado_id: i64 },
    /// Fire a notification hook.
    Notify {
        kind: NotificationKind,
        recipient: Recipient,
    },
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The `Solicitud` after the transition.
    pub new_state: Solicitud,
    /// Side effects to apply, in order.
    pub effects: Vec<Effect>,
}
