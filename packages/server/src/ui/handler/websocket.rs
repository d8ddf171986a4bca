//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, ConnectionIdFactory, MessageText, Username},
    infrastructure::dto::websocket::{
        ChatMessage, EventEnvelope, IdentityClaimMessage, MembershipChangedMessage, MessageType,
        RegistrationConfirmedMessage,
    },
    ui::state::AppState,
    usecase::{DisconnectOutcome, RegisterError, RegistrationOutcome, RelayError},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    // The connection id is assigned here, never taken from the client
    let connection_id = ConnectionIdFactory::generate();

    tracing::info!("Accepting connection '{}'", connection_id.as_str());

    ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id))
}

/// Spawns a task that receives events from the rx channel and pushes them to
/// the WebSocket sender.
///
/// This function handles the outbound flow: events addressed to this
/// connection (via the rx channel) are written to its socket.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the event to this client
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, connection_id: ConnectionId) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive pushed events.
    // The connection is known to the pusher from here on, but stays
    // invisible to presence until its identity claim is accepted.
    let (tx, rx) = mpsc::unbounded_channel();
    state
        .connect_session_usecase
        .execute(connection_id.clone(), tx)
        .await;

    // Spawn a task to push events from other connections to this client
    let mut send_task = pusher_loop(rx, sender);

    let connection_id_recv = connection_id.clone();
    let state_recv = state.clone();

    // Spawn a task to receive events from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_inbound_event(&state_recv, &connection_id_recv, &text).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!(
                        "Connection '{}' requested close",
                        connection_id_recv.as_str()
                    );
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Disconnect processing runs before this handler returns, so a presence
    // query issued after teardown cannot observe the stale entry.
    match state
        .disconnect_session_usecase
        .execute(connection_id.clone())
        .await
    {
        DisconnectOutcome::WasRegistered { notify_targets } => {
            tracing::info!(
                "Connection '{}' disconnected and removed from registry",
                connection_id.as_str()
            );

            let changed_json = serde_json::to_string(&MembershipChangedMessage {
                r#type: MessageType::MembershipChanged,
            })
            .unwrap();
            if let Err(e) = state
                .disconnect_session_usecase
                .broadcast_membership_changed(notify_targets, &changed_json)
                .await
            {
                tracing::warn!("Failed to broadcast membership-changed: {}", e);
            } else {
                tracing::info!(
                    "Broadcasted membership-changed for '{}' leaving",
                    connection_id.as_str()
                );
            }
        }
        DisconnectOutcome::NotRegistered => {
            tracing::info!(
                "Connection '{}' closed before identifying",
                connection_id.as_str()
            );
        }
    }
}

/// Single dispatch point for events arriving on one connection
async fn handle_inbound_event(state: &Arc<AppState>, connection_id: &ConnectionId, text: &str) {
    tracing::debug!("Received text from '{}': {}", connection_id.as_str(), text);

    let envelope = match serde_json::from_str::<EventEnvelope>(text) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!(
                "Failed to parse event from '{}': {}",
                connection_id.as_str(),
                e
            );
            return;
        }
    };

    match envelope.r#type {
        MessageType::IdentityClaim => handle_identity_claim(state, connection_id, text).await,
        MessageType::Chat => handle_chat(state, connection_id, text).await,
        other => {
            tracing::warn!(
                "Ignoring client-bound event type {:?} from '{}'",
                other,
                connection_id.as_str()
            );
        }
    }
}

async fn handle_identity_claim(state: &Arc<AppState>, connection_id: &ConnectionId, text: &str) {
    let claim = match serde_json::from_str::<IdentityClaimMessage>(text) {
        Ok(claim) => claim,
        Err(e) => {
            tracing::warn!(
                "Failed to parse identity claim from '{}': {}",
                connection_id.as_str(),
                e
            );
            return;
        }
    };

    // Malformed claims (empty / whitespace-only username) are a no-op: no
    // event goes back, the client may simply claim again
    let username = match Username::try_from(claim.username) {
        Ok(username) => username,
        Err(e) => {
            tracing::warn!(
                "Rejected identity claim from '{}': {}",
                connection_id.as_str(),
                e
            );
            return;
        }
    };

    let confirmed_json = serde_json::to_string(&RegistrationConfirmedMessage {
        r#type: MessageType::RegistrationConfirmed,
    })
    .unwrap();

    match state
        .register_identity_usecase
        .execute(connection_id.clone(), username.clone())
        .await
    {
        Ok(RegistrationOutcome::Registered { notify_targets }) => {
            tracing::info!(
                "Connection '{}' registered as '{}'",
                connection_id.as_str(),
                username.as_str()
            );

            // Confirmation goes to the claimant only
            if let Err(e) = state
                .register_identity_usecase
                .confirm_registration(connection_id, &confirmed_json)
                .await
            {
                tracing::warn!(
                    "Failed to confirm registration for '{}': {}",
                    connection_id.as_str(),
                    e
                );
            }

            // Everyone else gets a hint to refresh their presence panel
            let changed_json = serde_json::to_string(&MembershipChangedMessage {
                r#type: MessageType::MembershipChanged,
            })
            .unwrap();
            if let Err(e) = state
                .register_identity_usecase
                .broadcast_membership_changed(notify_targets, &changed_json)
                .await
            {
                tracing::warn!("Failed to broadcast membership-changed: {}", e);
            } else {
                tracing::info!(
                    "Broadcasted membership-changed for '{}' joining",
                    username.as_str()
                );
            }
        }
        Ok(RegistrationOutcome::AlreadyRegistered) => {
            // Idempotent re-claim: acknowledge again, announce nothing
            tracing::debug!(
                "Connection '{}' re-sent an identity claim; registry unchanged",
                connection_id.as_str()
            );
            if let Err(e) = state
                .register_identity_usecase
                .confirm_registration(connection_id, &confirmed_json)
                .await
            {
                tracing::warn!(
                    "Failed to re-confirm registration for '{}': {}",
                    connection_id.as_str(),
                    e
                );
            }
        }
        Err(RegisterError::RegistryFull) => {
            tracing::warn!(
                "Dropped identity claim from '{}': registry is full",
                connection_id.as_str()
            );
        }
    }
}

async fn handle_chat(state: &Arc<AppState>, connection_id: &ConnectionId, text: &str) {
    let chat = match serde_json::from_str::<ChatMessage>(text) {
        Ok(chat) => chat,
        Err(e) => {
            tracing::warn!(
                "Failed to parse chat message from '{}': {}",
                connection_id.as_str(),
                e
            );
            return;
        }
    };

    // Validate the body; the payload itself is relayed without modification
    if let Err(e) = MessageText::try_from(chat.text.clone()) {
        tracing::warn!(
            "Dropped chat message from '{}': {}",
            connection_id.as_str(),
            e
        );
        return;
    }

    let relay_json = serde_json::to_string(&chat).unwrap();
    match state
        .relay_message_usecase
        .execute(connection_id.clone(), relay_json)
        .await
    {
        Ok(targets) => {
            tracing::info!(
                "Relayed message '{}' from '{}' to {} connection(s)",
                chat.id,
                chat.sender,
                targets.len()
            );
        }
        Err(RelayError::UnidentifiedSender(_)) => {
            // Dropped without a rejection event back to the sender
            tracing::warn!(
                "Dropped chat message from unidentified connection '{}'",
                connection_id.as_str()
            );
        }
        Err(RelayError::BroadcastFailed(e)) => {
            tracing::warn!("Failed to relay chat message: {}", e);
        }
    }
}
