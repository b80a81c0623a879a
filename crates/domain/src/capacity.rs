// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capacity rules: the per-owner vehicle cap and caseworker load balancing.
//!
//! Everything here is pure. Callers are responsible for reading the counts
//! inside the same write transaction that acts on the result.

use crate::error::DomainError;
use crate::limits::WorkflowLimits;
use crate::types::PersonaEstado;
use serde::{Deserialize, Serialize};

/// Rejects a new application if the owner is already at the vehicle cap.
///
/// `active_count` is the number of vehicles where the application is
/// approved, the plate is issued and the vehicle is active.
///
/// # Errors
///
/// Returns `DomainError::VehicleLimitExceeded` carrying the observed count.
pub const fn check_vehicle_capacity(
    active_count: i64,
    limits: &WorkflowLimits,
) -> Result<(), DomainError> {
    if active_count >= limits.max_active_vehicles {
        return Err(DomainError::VehicleLimitExceeded {
            count: active_count,
            max: limits.max_active_vehicles,
        });
    }
    Ok(())
}

/// A caseworker's current state and number of pending assignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmpleadoLoad {
    pub empleado_id: i64,
    pub estado: PersonaEstado,
    pub pendientes: i64,
}

impl EmpleadoLoad {
    /// Returns true if the caseworker is active and under `max_pending`.
    #[must_use]
    pub const fn accepts_new_work(&self, max_pending: i64) -> bool {
        matches!(self.estado, PersonaEstado::Activo) && self.pendientes < max_pending
    }

    /// Returns true unless the caseworker has been disabled.
    #[must_use]
    pub const fn is_assignable(&self) -> bool {
        !matches!(self.estado, PersonaEstado::Deshabilitado)
    }
}

/// The outcome of choosing a caseworker for an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub empleado_id: i64,
    /// True when the caseworker was chosen despite being over capacity or inactive.
    pub en_cola: bool,
}

/// Picks the caseworker for a new application.
///
/// Prefers active caseworkers under the pending cap, fewest pending first.
/// When none qualify, falls back to any non-disabled caseworker (again
/// fewest pending first) and marks the assignment as queued. Ties are
/// broken by lowest id.
///
/// # Errors
///
/// Returns `DomainError::NoCaseworkerAvailable` if `loads` contains no
/// non-disabled caseworker.
pub fn select_empleado(
    loads: &[EmpleadoLoad],
    limits: &WorkflowLimits,
) -> Result<Assignment, DomainError> {
    let eligible = loads
        .iter()
        .filter(|l| l.accepts_new_work(limits.max_pending_per_empleado))
        .min_by_key(|l| (l.pendientes, l.empleado_id));

    if let Some(load) = eligible {
        return Ok(Assignment {
            empleado_id: load.empleado_id,
            en_cola: false,
        });
    }

    loads
        .iter()
        .filter(|l| l.is_assignable())
        .min_by_key(|l| (l.pendientes, l.empleado_id))
        .map(|load| Assignment {
            empleado_id: load.empleado_id,
            en_cola: true,
        })
        .ok_or(DomainError::NoCaseworkerAvailable)
}

/// Evaluates an administrator reassignment to `target`.
///
/// The pending cap does not block an administrator, it only decides the
/// queued flag. When `target` already holds the application its current
/// pending count includes it, so it is not counted twice.
///
/// # Errors
///
/// Returns `DomainError::CaseworkerUnavailable` if the target is disabled.
pub const fn evaluate_reassignment(
    target: &EmpleadoLoad,
    current_empleado_id: i64,
    limits: &WorkflowLimits,
) -> Result<Assignment, DomainError> {
    if !target.is_assignable() {
        return Err(DomainError::CaseworkerUnavailable(target.empleado_id));
    }

    let same = target.empleado_id == current_empleado_id;
    let pendientes = if same {
        target.pendientes - 1
    } else {
        target.pendientes
    };
    let inactive = matches!(target.estado, PersonaEstado::Inactivo);

    Ok(Assignment {
        empleado_id: target.empleado_id,
        en_cola: pendientes >= limits.max_pending_per_empleado || (inactive && !same),
    })
}

/// Returns the state a caseworker should move to given their pending count.
///
/// `None` means no change. Disabled caseworkers are never touched.
#[must_use]
pub const fn capacity_transition(
    estado: PersonaEstado,
    pendientes: i64,
    limits: &WorkflowLimits,
) -> Option<PersonaEstado> {
    match estado {
        PersonaEstado::Activo if pendientes >= limits.max_pending_per_empleado => {
            Some(PersonaEstado::Inactivo)
        }
        PersonaEstado::Inactivo if pendientes < limits.max_pending_per_empleado => {
            Some(PersonaEstado::Activo)
        }
        _ => None,
    }
}
