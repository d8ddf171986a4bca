//! WebSocket client session management.
//!
//! One session owns its socket and HTTP handle; both live exactly as long
//! as `run_client_session`. Inbound frames and local input lines feed the
//! session controller from a single sequential loop, so the session state
//! is never mutated concurrently.

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};
use uuid::Uuid;

use irori_server::infrastructure::dto::websocket::{
    ChatMessage, EventEnvelope, IdentityClaimMessage, MessageType,
};
use irori_shared::time::now_epoch_millis;

use super::{
    domain::{InboundEvent, LogEntry, SessionController, SessionEffect, SubmitError},
    error::ClientError,
    formatter::MessageFormatter,
    presence::fetch_online_users,
    ui::redisplay_prompt,
};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Run one WebSocket client session until the connection ends
pub async fn run_client_session(
    url: &str,
    api_url: &str,
    username: &str,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to chat server");

    let (mut write, mut read) = ws_stream.split();

    let http_client = reqwest::Client::new();
    let mut controller = SessionController::new(username.to_string());

    // Spawn a blocking thread for rustyline (synchronous readline)
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    let prompt_username = username.to_string();
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", prompt_username);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // The transport-level connect acknowledgment: the controller leaves
    // Disconnected and asks for the identity claim to be sent
    for effect in controller.apply_inbound(InboundEvent::TransportConnected) {
        run_effect(effect, &mut controller, &mut write, &http_client, api_url).await?;
    }

    // Single sequential event loop driving the state machine
    loop {
        tokio::select! {
            frame = read.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(event) = decode_inbound(&text) {
                            for effect in controller.apply_inbound(event) {
                                run_effect(effect, &mut controller, &mut write, &http_client, api_url)
                                    .await?;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::info!("Server closed the connection");
                        render_transport_lost(&mut controller);
                        return Err(ClientError::ConnectionError(
                            "connection closed by server".to_string(),
                        ));
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket read error: {}", e);
                        render_transport_lost(&mut controller);
                        return Err(ClientError::ConnectionError(e.to_string()));
                    }
                }
            }
            line = input_rx.recv() => {
                match line {
                    Some(line) => {
                        handle_input_line(line, &mut controller, &mut write).await?;
                    }
                    None => {
                        // Readline thread ended (Ctrl+C / Ctrl+D): normal exit
                        tracing::info!("Input closed; leaving the chat");
                        return Ok(());
                    }
                }
            }
        }
    }
}

fn render_transport_lost(controller: &mut SessionController) {
    for effect in controller.apply_inbound(InboundEvent::TransportLost) {
        if effect == SessionEffect::RenderDisconnected {
            print!("{}", MessageFormatter::format_disconnected());
        }
    }
}

/// Decode one inbound frame into a controller event.
///
/// Unknown or malformed frames are logged and dropped.
fn decode_inbound(text: &str) -> Option<InboundEvent> {
    let envelope = match serde_json::from_str::<EventEnvelope>(text) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!("Failed to parse server event: {}", e);
            return None;
        }
    };

    match envelope.r#type {
        MessageType::RegistrationConfirmed => Some(InboundEvent::RegistrationConfirmed),
        MessageType::MembershipChanged => Some(InboundEvent::MembershipChanged),
        MessageType::Chat => match serde_json::from_str::<ChatMessage>(text) {
            Ok(chat) => Some(InboundEvent::Chat(LogEntry::from(chat))),
            Err(e) => {
                tracing::warn!("Failed to parse chat message: {}", e);
                None
            }
        },
        MessageType::IdentityClaim => {
            tracing::warn!("Ignoring server-bound event type on the client");
            None
        }
    }
}

/// Execute one controller effect
async fn run_effect(
    effect: SessionEffect,
    controller: &mut SessionController,
    write: &mut WsSink,
    http_client: &reqwest::Client,
    api_url: &str,
) -> Result<(), ClientError> {
    match effect {
        SessionEffect::SendIdentityClaim => {
            let claim = IdentityClaimMessage {
                r#type: MessageType::IdentityClaim,
                username: controller.username().to_string(),
            };
            let json = serde_json::to_string(&claim)
                .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
            write
                .send(Message::Text(json.into()))
                .await
                .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
            tracing::info!("Sent identity claim for '{}'", controller.username());
        }
        SessionEffect::RenderIdentified => {
            print!(
                "{}",
                MessageFormatter::format_identified(controller.username())
            );
        }
        SessionEffect::RefreshPresence => {
            // A failed query leaves the roster at its last known contents
            match fetch_online_users(http_client, api_url).await {
                Ok(snapshot) => {
                    controller.replace_roster(snapshot.online_users);
                    print!(
                        "{}",
                        MessageFormatter::format_roster(controller.roster(), controller.username())
                    );
                    redisplay_prompt(controller.username());
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                }
            }
        }
        SessionEffect::RenderMessage(entry) => {
            print!(
                "{}",
                MessageFormatter::format_chat_message(&entry.sender, &entry.text, entry.timestamp)
            );
            redisplay_prompt(controller.username());
        }
        SessionEffect::RenderDisconnected => {
            print!("{}", MessageFormatter::format_disconnected());
        }
    }
    Ok(())
}

/// Handle one line typed at the prompt
async fn handle_input_line(
    line: String,
    controller: &mut SessionController,
    write: &mut WsSink,
) -> Result<(), ClientError> {
    match controller.submit_message(&line, Uuid::new_v4().to_string(), now_epoch_millis()) {
        Ok(entry) => {
            let msg = ChatMessage {
                r#type: MessageType::Chat,
                id: entry.id.clone(),
                sender: entry.sender.clone(),
                text: entry.text.clone(),
                timestamp: entry.timestamp,
            };
            let json = serde_json::to_string(&msg)
                .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

            // The optimistic append already happened; a failed send ends the
            // session but the local log keeps the entry
            write
                .send(Message::Text(json.into()))
                .await
                .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

            print!(
                "\n{}",
                MessageFormatter::format_sent_confirmation(entry.timestamp)
            );
            redisplay_prompt(controller.username());
        }
        Err(SubmitError::NotIdentified) => {
            println!("(your identity claim has not been confirmed yet)");
            redisplay_prompt(controller.username());
        }
        Err(SubmitError::EmptyText) => {
            // Nothing to send
        }
    }
    Ok(())
}
