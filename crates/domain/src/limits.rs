// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;

/// Tunable thresholds for the registration workflow.
///
/// Passed explicitly to every operation that enforces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowLimits {
    /// Pending applications at which a caseworker stops receiving new work.
    pub max_pending_per_empleado: i64,
    /// Active, plated vehicles a single owner may hold.
    pub max_active_vehicles: i64,
    /// Random plate draws attempted before the timestamp fallback.
    pub plate_draw_attempts: u32,
}

impl Default for WorkflowLimits {
    fn default() -> Self {
        Self {
            max_pending_per_empleado: 5,
            max_active_vehicles: 2,
            plate_draw_attempts: 10,
        }
    }
}

impl WorkflowLimits {
    /// Creates a validated set of limits.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidLimit` if any limit is zero or negative.
    pub fn new(
        max_pending_per_empleado: i64,
        max_active_vehicles: i64,
        plate_draw_attempts: u32,
    ) -> Result<Self, DomainError> {
        if max_pending_per_empleado < 1 {
            return Err(DomainError::InvalidLimit(format!(
                "max pending per caseworker must be at least 1, got {max_pending_per_empleado}"
            )));
        }
        if max_active_vehicles < 1 {
            return Err(DomainError::InvalidLimit(format!(
                "max active vehicles must be at least 1, got {max_active_vehicles}"
            )));
        }
        if plate_draw_attempts == 0 {
            return Err(DomainError::InvalidLimit(String::from(
                "plate draw attempts must be at least 1",
            )));
        }

        Ok(Self {
            max_pending_per_empleado,
            max_active_vehicles,
            plate_draw_attempts,
        })
    }
}
