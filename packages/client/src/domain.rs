//! Domain logic for client-side operations.
//!
//! The session controller is a pure state machine: every inbound protocol
//! event goes through the single [`SessionController::apply_inbound`]
//! dispatch point and produces effects for the runner to execute. No IO
//! happens here, which keeps the transition rules easy to test.

#![allow(dead_code)]

use thiserror::Error;

use irori_server::infrastructure::dto::http::OnlineUserDto;
use irori_server::infrastructure::dto::websocket::ChatMessage;

/// One entry of the local chat log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub id: String,
    pub sender: String,
    pub text: String,
    pub timestamp: i64,
}

impl From<ChatMessage> for LogEntry {
    fn from(chat: ChatMessage) -> Self {
        Self {
            id: chat.id,
            sender: chat.sender,
            text: chat.text,
            timestamp: chat.timestamp,
        }
    }
}

/// Append-only message log, merged from two sources: locally-sent messages
/// (optimistic append) and messages relayed from other participants.
///
/// [`ChatLog::append`] is the single authoritative mutation; order is local
/// arrival order. The server never echoes a sender's own message back, so
/// no deduplication is needed.
#[derive(Debug, Default)]
pub struct ChatLog {
    entries: Vec<LogEntry>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn append(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Disconnected,
    Connected,
    Identified,
}

/// Inbound events: one variant per protocol event, plus the two
/// transport-level events supplied by the channel itself
#[derive(Debug, Clone)]
pub enum InboundEvent {
    TransportConnected,
    RegistrationConfirmed,
    MembershipChanged,
    Chat(LogEntry),
    TransportLost,
}

/// Effects the runner executes on behalf of the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    /// Send the identity claim for the local username
    SendIdentityClaim,
    /// Show that registration succeeded and message sending is unlocked
    RenderIdentified,
    /// Re-query the online-users snapshot and replace the roster
    RefreshPresence,
    /// Render a newly appended chat log entry
    RenderMessage(LogEntry),
    /// Render the disconnected notice
    RenderDisconnected,
}

/// Errors from local message submission
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("cannot send before registration is confirmed")]
    NotIdentified,

    #[error("message text must not be empty")]
    EmptyText,
}

/// Client session state machine.
///
/// `Disconnected → Connected → Identified`, with `Disconnected` reachable
/// from any phase on transport loss. Events that do not apply to the
/// current phase are ignored rather than acted on, so a duplicate
/// registration confirmation or an early chat message cannot corrupt the
/// session.
pub struct SessionController {
    phase: SessionPhase,
    username: String,
    chat_log: ChatLog,
    roster: Vec<OnlineUserDto>,
}

impl SessionController {
    pub fn new(username: String) -> Self {
        Self {
            phase: SessionPhase::Disconnected,
            username,
            chat_log: ChatLog::new(),
            roster: Vec::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn chat_log(&self) -> &ChatLog {
        &self.chat_log
    }

    pub fn roster(&self) -> &[OnlineUserDto] {
        &self.roster
    }

    /// Single dispatch point for inbound events
    pub fn apply_inbound(&mut self, event: InboundEvent) -> Vec<SessionEffect> {
        match (self.phase, event) {
            (SessionPhase::Disconnected, InboundEvent::TransportConnected) => {
                self.phase = SessionPhase::Connected;
                vec![SessionEffect::SendIdentityClaim]
            }
            (SessionPhase::Connected, InboundEvent::RegistrationConfirmed) => {
                self.phase = SessionPhase::Identified;
                vec![SessionEffect::RenderIdentified, SessionEffect::RefreshPresence]
            }
            (SessionPhase::Identified, InboundEvent::Chat(entry)) => {
                self.chat_log.append(entry.clone());
                vec![SessionEffect::RenderMessage(entry)]
            }
            (SessionPhase::Identified, InboundEvent::MembershipChanged) => {
                vec![SessionEffect::RefreshPresence]
            }
            (SessionPhase::Disconnected, InboundEvent::TransportLost) => vec![],
            (_, InboundEvent::TransportLost) => {
                // The chat log and roster are kept as-is: visible history
                // outlives the connection, at the cost of a stale panel.
                self.phase = SessionPhase::Disconnected;
                vec![SessionEffect::RenderDisconnected]
            }
            // Everything else does not apply to the current phase
            (_, _) => vec![],
        }
    }

    /// Local message submission, allowed only once identified.
    ///
    /// Appends to the chat log immediately (optimistic, before the network
    /// send) and returns the entry for the runner to emit. The append is
    /// not rolled back if the emit later fails.
    pub fn submit_message(
        &mut self,
        text: &str,
        id: String,
        timestamp: i64,
    ) -> Result<LogEntry, SubmitError> {
        if self.phase != SessionPhase::Identified {
            return Err(SubmitError::NotIdentified);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(SubmitError::EmptyText);
        }

        let entry = LogEntry {
            id,
            sender: self.username.clone(),
            text: text.to_string(),
            timestamp,
        };
        self.chat_log.append(entry.clone());
        Ok(entry)
    }

    /// Replace the roster with a fresh snapshot
    pub fn replace_roster(&mut self, users: Vec<OnlineUserDto>) {
        self.roster = users;
    }
}
