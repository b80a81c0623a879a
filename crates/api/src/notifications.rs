// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification hooks.
//!
//! The workflow announces three events: an application was created, an
//! application was assigned to a caseworker, and an application was
//! processed. Delivery and formatting belong to whoever implements
//! [`Notifier`]. Handlers dispatch only after the write transaction has
//! committed, and a delivery failure never changes a handler's result.

use matricula::NotificationKind;
use matricula_domain::Solicitud;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Notification delivery errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotificationError {
    /// The delivery channel is not accepting notifications.
    #[error("Notification channel unavailable: {reason}")]
    Unavailable { reason: String },

    /// The collaborator refused a notification.
    #[error("Notification '{kind}' for account {cuenta_id} was rejected: {reason}")]
    Rejected {
        kind: String,
        cuenta_id: i64,
        reason: String,
    },
}

/// A single notification addressed to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEnvelope {
    /// Which hook fired.
    pub kind: NotificationKind,
    /// The target account.
    pub cuenta_id: i64,
    /// The application as committed.
    pub solicitud: Solicitud,
}

/// The delivery collaborator.
pub trait Notifier: Send + Sync {
    /// Delivers one notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification could not be handed off.
    fn notify(&self, envelope: &NotificationEnvelope) -> Result<(), NotificationError>;
}

/// A notifier that drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, envelope: &NotificationEnvelope) -> Result<(), NotificationError> {
        debug!(
            kind = envelope.kind.as_str(),
            cuenta_id = envelope.cuenta_id,
            solicitud_id = envelope.solicitud.solicitud_id,
            "Notification dropped"
        );
        Ok(())
    }
}

/// Hands every envelope to `notifier`, logging failures.
pub(crate) fn dispatch(notifier: &dyn Notifier, envelopes: &[NotificationEnvelope]) {
    for envelope in envelopes {
        if let Err(e) = notifier.notify(envelope) {
            warn!(
                kind = envelope.kind.as_str(),
                cuenta_id = envelope.cuenta_id,
                solicitud_id = envelope.solicitud.solicitud_id,
                error = %e,
                "Notification delivery failed"
            );
        }
    }
}
