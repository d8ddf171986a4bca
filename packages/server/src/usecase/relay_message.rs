//! UseCase: メッセージ中継処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayMessageUseCase::execute() メソッド
//! - メッセージの中継（送信者チェック、ブロードキャスト対象選定）
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：identity claim 前のコネクションは中継できない
//! - 送信者自身にメッセージが返送されないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：登録済みコネクションからの送信
//! - 異常系：未登録コネクションからの送信（破棄される）
//! - エッジケース：送信者のみが登録されている場合（ブロードキャスト対象なし）

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RegistryRepository};

use super::error::RelayError;

/// メッセージ中継のユースケース
pub struct RelayMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RegistryRepository>,
    /// MessagePusher（イベント通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelayMessageUseCase {
    pub fn new(
        repository: Arc<dyn RegistryRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// メッセージ中継を実行
    ///
    /// 送信者が identity claim 済みであることが前提。未登録のコネクション
    /// から届いたメッセージは誰にも中継されない。
    ///
    /// # Arguments
    ///
    /// * `sender_connection_id` - 送信者のコネクション ID（Domain Model）
    /// * `json_message` - 中継する JSON メッセージ（内容は変更しない）
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ConnectionId>)` - ブロードキャスト対象のコネクション ID リスト
    /// * `Err(RelayError)` - 中継失敗
    pub async fn execute(
        &self,
        sender_connection_id: ConnectionId,
        json_message: String,
    ) -> Result<Vec<ConnectionId>, RelayError> {
        // 1. 送信者が登録済みかチェック
        if !self.repository.is_registered(&sender_connection_id).await {
            return Err(RelayError::UnidentifiedSender(
                sender_connection_id.into_string(),
            ));
        }

        // 2. ブロードキャスト対象を取得（送信者以外の全ての登録済みコネクション）
        let broadcast_targets = self.broadcast_targets(&sender_connection_id).await;

        // 3. MessagePusher を使ってブロードキャスト
        self.message_pusher
            .broadcast(broadcast_targets.clone(), &json_message)
            .await
            .map_err(|e| RelayError::BroadcastFailed(e.to_string()))?;

        Ok(broadcast_targets)
    }

    /// 送信者以外の全ての登録済みコネクション ID を取得
    async fn broadcast_targets(&self, exclude_connection_id: &ConnectionId) -> Vec<ConnectionId> {
        let all_connection_ids = self.repository.registered_connection_ids().await;
        all_connection_ids
            .into_iter()
            .filter(|id| id != exclude_connection_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Member, MessagePushError, PusherChannel, RegisterOutcome, RepositoryError,
    };
    use async_trait::async_trait;
    use mockall::mock;
    use tokio::sync::Mutex;

    mock! {
        Repo {}

        #[async_trait]
        impl RegistryRepository for Repo {
            async fn register_member(
                &self,
                member: Member,
            ) -> Result<RegisterOutcome, RepositoryError>;
            async fn remove_member(&self, connection_id: &ConnectionId) -> Option<Member>;
            async fn registered_connection_ids(&self) -> Vec<ConnectionId>;
            async fn is_registered(&self, connection_id: &ConnectionId) -> bool;
            async fn members(&self) -> Vec<Member>;
            async fn member_count(&self) -> usize;
        }
    }

    /// Records every broadcast instead of delivering it
    struct RecordingPusher {
        broadcasts: Mutex<Vec<(Vec<ConnectionId>, String)>>,
    }

    impl RecordingPusher {
        fn new() -> Self {
            Self {
                broadcasts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl MessagePusher for RecordingPusher {
        async fn register_channel(&self, _connection_id: ConnectionId, _sender: PusherChannel) {}

        async fn unregister_channel(&self, _connection_id: &ConnectionId) {}

        async fn push_to(
            &self,
            _connection_id: &ConnectionId,
            _content: &str,
        ) -> Result<(), MessagePushError> {
            Ok(())
        }

        async fn broadcast(
            &self,
            targets: Vec<ConnectionId>,
            content: &str,
        ) -> Result<(), MessagePushError> {
            let mut broadcasts = self.broadcasts.lock().await;
            broadcasts.push((targets, content.to_string()));
            Ok(())
        }
    }

    fn connection_id(value: &str) -> ConnectionId {
        ConnectionId::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_relay_message_reaches_everyone_but_the_sender() {
        // テスト項目: 送信者以外の全ての登録済みコネクションへ中継される
        // given (前提条件):
        let mut repository = MockRepo::new();
        repository.expect_is_registered().returning(|_| true);
        repository.expect_registered_connection_ids().returning(|| {
            vec![
                connection_id("conn-alice"),
                connection_id("conn-bob"),
                connection_id("conn-charlie"),
            ]
        });
        let pusher = Arc::new(RecordingPusher::new());
        let usecase = RelayMessageUseCase::new(Arc::new(repository), pusher.clone());

        // when (操作): alice がメッセージを送信
        let result = usecase
            .execute(
                connection_id("conn-alice"),
                r#"{"type":"chat","id":"m-1","sender":"alice","text":"hi","timestamp":1000}"#
                    .to_string(),
            )
            .await;

        // then (期待する結果):
        let targets = result.unwrap();
        assert_eq!(targets.len(), 2);
        assert!(targets.contains(&connection_id("conn-bob")));
        assert!(targets.contains(&connection_id("conn-charlie")));
        assert!(!targets.contains(&connection_id("conn-alice")));

        // ブロードキャストが 1 回、内容そのままで行われている
        let broadcasts = pusher.broadcasts.lock().await;
        assert_eq!(broadcasts.len(), 1);
        assert!(broadcasts[0].1.contains(r#""text":"hi""#));
    }

    #[tokio::test]
    async fn test_relay_message_from_unidentified_sender_is_dropped() {
        // テスト項目: 未登録コネクションからの送信は誰にも中継されない
        // given (前提条件):
        let mut repository = MockRepo::new();
        repository.expect_is_registered().returning(|_| false);
        let pusher = Arc::new(RecordingPusher::new());
        let usecase = RelayMessageUseCase::new(Arc::new(repository), pusher.clone());

        // when (操作):
        let result = usecase
            .execute(
                connection_id("conn-ghost"),
                r#"{"type":"chat","id":"m-1","sender":"ghost","text":"boo","timestamp":1000}"#
                    .to_string(),
            )
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(RelayError::UnidentifiedSender("conn-ghost".to_string()))
        );

        // ブロードキャストは一度も行われていない
        let broadcasts = pusher.broadcasts.lock().await;
        assert!(broadcasts.is_empty());
    }

    #[tokio::test]
    async fn test_relay_message_with_no_other_members() {
        // テスト項目: 送信者のみが登録されている場合、ブロードキャスト対象は空
        // given (前提条件):
        let mut repository = MockRepo::new();
        repository.expect_is_registered().returning(|_| true);
        repository
            .expect_registered_connection_ids()
            .returning(|| vec![connection_id("conn-alice")]);
        let pusher = Arc::new(RecordingPusher::new());
        let usecase = RelayMessageUseCase::new(Arc::new(repository), pusher.clone());

        // when (操作):
        let result = usecase
            .execute(
                connection_id("conn-alice"),
                r#"{"type":"chat","id":"m-1","sender":"alice","text":"hi","timestamp":1000}"#
                    .to_string(),
            )
            .await;

        // then (期待する結果):
        assert_eq!(result, Ok(vec![]));
    }
}
