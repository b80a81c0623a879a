// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fire-and-forget notification hub.
//!
//! Handlers hand committed notifications to the hub, which fans them out
//! to any WebSocket client connected for the addressed account. Nothing is
//! persisted or replayed: a client that is not connected when a
//! notification is sent never sees it, and a slow client drops the oldest
//! buffered notifications.

use axum::{
    extract::{
        State as AxumState, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, stream::StreamExt};
use matricula_api::{NotificationEnvelope, NotificationError, Notifier};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::AppState;
use crate::session::SessionActor;

/// Notifications buffered per subscriber before the oldest are dropped.
const NOTIFICATION_BUFFER_SIZE: usize = 256;

/// Frames sent to a connected client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HubFrame {
    /// Sent once after the upgrade completes.
    Connected {
        /// The account the stream is filtered to.
        cuenta_id: i64,
        /// Server time (RFC 3339).
        timestamp: String,
    },
    /// A workflow notification for this account.
    Notification(NotificationEnvelope),
    /// The client fell behind and `skipped` notifications were dropped.
    Lagged { skipped: u64 },
}

/// Broadcast hub implementing [`Notifier`].
#[derive(Clone)]
pub struct NotificationHub {
    tx: broadcast::Sender<NotificationEnvelope>,
}

impl NotificationHub {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(NOTIFICATION_BUFFER_SIZE);
        Self { tx }
    }

    /// Subscribes to every future notification.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEnvelope> {
        self.tx.subscribe()
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotificationHub {
    fn notify(&self, envelope: &NotificationEnvelope) -> Result<(), NotificationError> {
        match self.tx.send(envelope.clone()) {
            Ok(receivers) => {
                debug!(
                    kind = envelope.kind.as_str(),
                    cuenta_id = envelope.cuenta_id,
                    receivers,
                    "Notification broadcast"
                );
            }
            Err(_) => {
                // Nobody listening is not a delivery failure.
                debug!(
                    kind = envelope.kind.as_str(),
                    cuenta_id = envelope.cuenta_id,
                    "No subscribers for notification"
                );
            }
        }
        Ok(())
    }
}

/// Upgrades to a WebSocket that streams the caller's notifications.
pub async fn notifications_handler(
    ws: WebSocketUpgrade,
    SessionActor(actor): SessionActor,
    AxumState(app_state): AxumState<AppState>,
) -> Response {
    let rx = app_state.hub.subscribe();
    ws.on_upgrade(move |socket| stream_notifications(socket, actor.cuenta_id, rx))
}

async fn stream_notifications(
    socket: WebSocket,
    cuenta_id: i64,
    mut rx: broadcast::Receiver<NotificationEnvelope>,
) {
    info!(cuenta_id, "Client subscribed to notifications");

    let (mut sender, mut receiver) = socket.split();

    let connected = HubFrame::Connected {
        cuenta_id,
        timestamp: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| String::from("unknown")),
    };
    if let Ok(json) = serde_json::to_string(&connected)
        && sender.send(Message::Text(json.into())).await.is_err()
    {
        warn!(cuenta_id, "Failed to send connection confirmation");
        return;
    }

    let mut send_task = tokio::spawn(async move {
        loop {
            let frame = match rx.recv().await {
                Ok(envelope) if envelope.cuenta_id == cuenta_id => {
                    HubFrame::Notification(envelope)
                }
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(cuenta_id, skipped, "Subscriber lagged; notifications dropped");
                    HubFrame::Lagged { skipped }
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };

            match serde_json::to_string(&frame) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => error!(?e, "Failed to serialize notification frame"),
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(_) | Message::Binary(_)) => {
                    warn!("Ignoring message from notification subscriber");
                }
                Ok(Message::Close(_)) => break,
                Ok(Message::Ping(_) | Message::Pong(_)) => {}
                Err(e) => {
                    error!(?e, "WebSocket receive error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    info!(cuenta_id, "Client unsubscribed from notifications");
}
