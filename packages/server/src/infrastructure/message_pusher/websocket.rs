//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - コネクションごとの `UnboundedSender` を管理
//! - クライアントへのイベント送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、イベント送信に使用します。
//! 送信はチャンネルへの書き込みのみで、受信側の応答を待つことはありません。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 生きているコネクションの送信チャンネル
    ///
    /// Key: ConnectionId
    /// Value: PusherChannel
    channels: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    pub fn new(channels: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>) -> Self {
        Self { channels }
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_channel(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut channels = self.channels.lock().await;
        channels.insert(connection_id.clone(), sender);
        tracing::debug!(
            "Channel for connection '{}' registered to MessagePusher",
            connection_id.as_str()
        );
    }

    async fn unregister_channel(&self, connection_id: &ConnectionId) {
        let mut channels = self.channels.lock().await;
        channels.remove(connection_id);
        tracing::debug!(
            "Channel for connection '{}' unregistered from MessagePusher",
            connection_id.as_str()
        );
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let channels = self.channels.lock().await;

        if let Some(sender) = channels.get(connection_id) {
            sender
                .send(content.to_string())
                .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed event to connection '{}'", connection_id.as_str());
            Ok(())
        } else {
            Err(MessagePushError::ChannelNotFound(
                connection_id.as_str().to_string(),
            ))
        }
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let channels = self.channels.lock().await;

        for target in targets {
            if let Some(sender) = channels.get(&target) {
                // ブロードキャストでは一部の送信失敗を許容
                if let Err(e) = sender.send(content.to_string()) {
                    tracing::warn!(
                        "Failed to push event to connection '{}': {}",
                        target.as_str(),
                        e
                    );
                } else {
                    tracing::debug!("Broadcasted event to connection '{}'", target.as_str());
                }
            } else {
                tracing::warn!(
                    "Connection '{}' not found during broadcast, skipping",
                    target.as_str()
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn create_test_pusher() -> (
        WebSocketMessagePusher,
        Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
    ) {
        let channels = Arc::new(Mutex::new(HashMap::new()));
        let pusher = WebSocketMessagePusher::new(channels.clone());
        (pusher, channels)
    }

    fn connection_id(value: &str) -> ConnectionId {
        ConnectionId::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定のコネクションへイベントを送信できる
        // given (前提条件):
        let (pusher, _channels) = create_test_pusher();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let conn = connection_id("conn-1");
        pusher.register_channel(conn.clone(), tx).await;

        // when (操作):
        let result = pusher.push_to(&conn, "Hello").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_channel_not_found() {
        // テスト項目: チャンネル未登録のコネクションへの送信はエラーを返す
        // given (前提条件):
        let (pusher, _channels) = create_test_pusher();
        let conn = connection_id("conn-x");

        // when (操作):
        let result = pusher.push_to(&conn, "Hello").await;

        // then (期待する結果):
        assert!(matches!(
            result.unwrap_err(),
            MessagePushError::ChannelNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_broadcast_success() {
        // テスト項目: 複数のコネクションへイベントをブロードキャストできる
        // given (前提条件):
        let (pusher, _channels) = create_test_pusher();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let conn1 = connection_id("conn-1");
        let conn2 = connection_id("conn-2");
        pusher.register_channel(conn1.clone(), tx1).await;
        pusher.register_channel(conn2.clone(), tx2).await;

        // when (操作):
        let result = pusher.broadcast(vec![conn1, conn2], "Broadcast event").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx1.recv().await, Some("Broadcast event".to_string()));
        assert_eq!(rx2.recv().await, Some("Broadcast event".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_tolerates_missing_channel() {
        // テスト項目: 一部のコネクションが存在しなくてもブロードキャストは成功する
        // given (前提条件):
        let (pusher, _channels) = create_test_pusher();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let conn1 = connection_id("conn-1");
        pusher.register_channel(conn1.clone(), tx1).await;

        // when (操作):
        let result = pusher
            .broadcast(vec![conn1, connection_id("conn-x")], "Broadcast event")
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx1.recv().await, Some("Broadcast event".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_empty_targets() {
        // テスト項目: 空のターゲットリストでもエラーにならない
        // given (前提条件):
        let (pusher, _channels) = create_test_pusher();

        // when (操作):
        let result = pusher.broadcast(vec![], "Event").await;

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unregister_channel() {
        // テスト項目: 登録解除後のコネクションへは送信できない
        // given (前提条件):
        let (pusher, _channels) = create_test_pusher();
        let (tx, _rx) = mpsc::unbounded_channel();
        let conn = connection_id("conn-1");
        pusher.register_channel(conn.clone(), tx).await;

        // when (操作):
        pusher.unregister_channel(&conn).await;
        let result = pusher.push_to(&conn, "Hello").await;

        // then (期待する結果):
        assert!(matches!(
            result.unwrap_err(),
            MessagePushError::ChannelNotFound(_)
        ));
    }
}
