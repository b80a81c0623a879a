// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use matricula_domain::{Assignment, Decision};

/// A command represents intent against a `Solicitud` as data only.
///
/// Commands are the only way to request a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Approve the application and issue its plate.
    Aprobar {
        /// The reviewer's note.
        nota_revision: String,
        /// RFC 3339 processing timestamp.
        procesada_en: String,
    },
    /// Reject the application and cancel its plate.
    Rechazar {
        /// The rejection reason.
        motivo: String,
        /// Free-text detail.
        detalle: String,
        /// RFC 3339 processing timestamp.
        procesada_en: String,
    },
    /// Move the application to another caseworker.
    Reasignar {
        /// The evaluated target assignment.
        assignment: Assignment,
    },
}

impl Command {
    /// Builds the processing command for a caseworker decision.
    #[must_use]
    pub fn from_decision(decision: Decision, procesada_en: String) -> Self {
        match decision {
            Decision::Aprobar { nota_revision } => Self::Aprobar {
                nota_revision,
                procesada_en,
            },
            Decision::Rechazar { motivo, detalle } => Self::Rechazar {
                motivo,
                detalle,
                procesada_en,
            },
        }
    }

    /// Returns the command name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Aprobar { .. } => "Aprobar",
            Self::Rechazar { .. } => "Rechazar",
            Self::Reasignar { .. } => "Reasignar",
        }
    }
}
