//! UseCase: コネクション切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectSessionUseCase::execute() メソッド
//! - 切断処理（レジストリからの削除、チャンネルの登録解除、通知対象選定）
//!
//! ### なぜこのテストが必要か
//! - レジストリの不変条件の検証：切断処理の後にスナップショットを取っても
//!   切断済みのエントリが見えないこと
//! - identity claim 前に切断したコネクションについて通知が出ないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：登録済みメンバーの切断と通知
//! - エッジケース：最後のメンバーの切断（通知対象なし）
//! - 正常系：未登録コネクションの切断（通知なし）

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, RegistryRepository};

/// Outcome of disconnect processing
#[derive(Debug, PartialEq, Eq)]
pub enum DisconnectOutcome {
    /// The connection held an identity; these remaining registered
    /// connections should receive a membership-changed hint
    WasRegistered { notify_targets: Vec<ConnectionId> },
    /// The connection never completed an identity claim; nothing to announce
    NotRegistered,
}

/// コネクション切断のユースケース
pub struct DisconnectSessionUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RegistryRepository>,
    /// MessagePusher（イベント通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectSessionUseCase {
    pub fn new(
        repository: Arc<dyn RegistryRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// コネクション切断を実行
    ///
    /// レジストリからの削除が先、通知対象の算出はその後。削除済みの状態から
    /// 対象を取るため、通知対象に切断したコネクション自身は決して含まれない。
    pub async fn execute(&self, connection_id: ConnectionId) -> DisconnectOutcome {
        let removed = self.repository.remove_member(&connection_id).await;
        self.message_pusher
            .unregister_channel(&connection_id)
            .await;

        match removed {
            Some(_) => {
                let notify_targets = self.repository.registered_connection_ids().await;
                DisconnectOutcome::WasRegistered { notify_targets }
            }
            None => DisconnectOutcome::NotRegistered,
        }
    }

    /// membership-changed を残りのメンバーへブロードキャスト
    pub async fn broadcast_membership_changed(
        &self,
        target_ids: Vec<ConnectionId>,
        message: &str,
    ) -> Result<(), String> {
        self.message_pusher
            .broadcast(target_ids, message)
            .await
            .map_err(|e| e.to_string())
    }
}
