//! WebSocket event DTOs.
//!
//! Every event is a flat JSON object carrying a `type` tag. The chat
//! message has the same shape on the send and relay legs; the server
//! relays it without modification.

use serde::{Deserialize, Serialize};

/// Event type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    /// client → server: bind a username to this connection
    IdentityClaim,
    /// server → claimant: the identity claim was accepted
    RegistrationConfirmed,
    /// server → others: the online-user set may have changed; re-query
    MembershipChanged,
    /// chat message, both directions
    Chat,
}

/// Minimal envelope used to dispatch on the `type` tag before decoding the
/// full payload
#[derive(Debug, Clone, Deserialize)]
pub struct EventEnvelope {
    pub r#type: MessageType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaimMessage {
    pub r#type: MessageType,
    pub username: String,
}

/// Carries no payload; receiving it is the whole signal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationConfirmedMessage {
    pub r#type: MessageType,
}

/// A hint to re-query the online-users snapshot, not a diff
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipChangedMessage {
    pub r#type: MessageType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub r#type: MessageType,
    /// Client-generated unique id, used as a rendering key only
    pub id: String,
    pub sender: String,
    pub text: String,
    /// Unix timestamp in milliseconds, assigned by the sender
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_serializes_to_kebab_case() {
        // テスト項目: type タグが kebab-case でシリアライズされる
        // given (前提条件):
        let claim = IdentityClaimMessage {
            r#type: MessageType::IdentityClaim,
            username: "alice".to_string(),
        };

        // when (操作):
        let json = serde_json::to_string(&claim).unwrap();

        // then (期待する結果):
        assert!(json.contains(r#""type":"identity-claim""#));
        assert!(json.contains(r#""username":"alice""#));
    }

    #[test]
    fn test_envelope_dispatches_on_type_tag() {
        // テスト項目: envelope で type タグだけを先に読める
        // given (前提条件):
        let json = r#"{"type":"chat","id":"m-1","sender":"alice","text":"hi","timestamp":1000}"#;

        // when (操作):
        let envelope: EventEnvelope = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(envelope.r#type, MessageType::Chat);
    }

    #[test]
    fn test_chat_message_roundtrip_preserves_fields() {
        // テスト項目: chat メッセージの全フィールドが維持される
        // given (前提条件):
        let json = r#"{"type":"chat","id":"m-1","sender":"alice","text":"hi","timestamp":1000}"#;

        // when (操作):
        let chat: ChatMessage = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(chat.id, "m-1");
        assert_eq!(chat.sender, "alice");
        assert_eq!(chat.text, "hi");
        assert_eq!(chat.timestamp, 1000);
    }

    #[test]
    fn test_unknown_type_tag_fails_to_parse() {
        // テスト項目: 未知の type タグはパースエラーになる
        // given (前提条件):
        let json = r#"{"type":"time-travel"}"#;

        // when (操作):
        let result = serde_json::from_str::<EventEnvelope>(json);

        // then (期待する結果):
        assert!(result.is_err());
    }
}
