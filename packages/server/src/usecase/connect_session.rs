//! UseCase: コネクション受付処理

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel};

/// コネクション受付のユースケース
///
/// 受け付けたコネクションの送信チャンネルを MessagePusher に登録します。
/// この時点ではレジストリには何も追加されません。identity claim が成立する
/// までコネクションはプレゼンスに現れず、他のクライアントからは見えません。
pub struct ConnectSessionUseCase {
    /// MessagePusher（イベント通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectSessionUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// コネクション受付を実行（常に成功する）
    pub async fn execute(&self, connection_id: ConnectionId, sender: PusherChannel) {
        self.message_pusher
            .register_channel(connection_id, sender)
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::message_pusher::WebSocketMessagePusher;
    use std::collections::HashMap;
    use tokio::sync::{Mutex, mpsc};

    #[tokio::test]
    async fn test_connect_session_registers_channel() {
        // テスト項目: 受付後、そのコネクションへ push できるようになる
        // given (前提条件):
        let channels = Arc::new(Mutex::new(HashMap::new()));
        let message_pusher = Arc::new(WebSocketMessagePusher::new(channels));
        let usecase = ConnectSessionUseCase::new(message_pusher.clone());

        let connection_id = ConnectionId::new("conn-1".to_string()).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        usecase.execute(connection_id.clone(), tx).await;

        // then (期待する結果):
        message_pusher
            .push_to(&connection_id, "hello")
            .await
            .unwrap();
        assert_eq!(rx.recv().await, Some("hello".to_string()));
    }
}
