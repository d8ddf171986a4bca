//! Outbound event delivery seam.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::value_object::ConnectionId;

/// Channel used to push serialized events to one connection's socket task
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[derive(Debug, Error)]
pub enum MessagePushError {
    #[error("no channel registered for connection '{0}'")]
    ChannelNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}

/// Delivery of serialized events to connected clients.
///
/// Implementations own the map of live outbound channels. A channel is
/// registered when the connection is accepted, before any identity claim,
/// so that a registration confirmation can reach a connection that is not
/// yet in the registry.
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// コネクション受付時に送信チャンネルを登録
    async fn register_channel(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 切断時に送信チャンネルを登録解除
    async fn unregister_channel(&self, connection_id: &ConnectionId);

    /// 単一のコネクションへ送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// 複数のコネクションへファンアウト（個別の送信失敗は許容される）
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), MessagePushError>;
}
