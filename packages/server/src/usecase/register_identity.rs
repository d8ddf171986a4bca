//! UseCase: identity claim 処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RegisterIdentityUseCase::execute() メソッド
//! - identity claim の受理（レジストリへの登録、通知対象の算出）
//!
//! ### なぜこのテストが必要か
//! - ビジネスロジックの検証：claim が成立して初めてプレゼンスに現れる
//! - 再 claim が冪等に処理され、レジストリが重複しないことを保証
//! - membership-changed の通知対象に本人が含まれないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規コネクションの claim
//! - 冪等系：登録済みコネクションからの再 claim
//! - エッジケース：レジストリの容量超過

use std::sync::Arc;

use irori_shared::time::now_epoch_millis;

use crate::domain::{
    ConnectionId, Member, MessagePusher, RegisterOutcome, RegistryRepository, Timestamp, Username,
};

use super::error::RegisterError;

/// Outcome of an identity claim, as seen by the connection handler
#[derive(Debug, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// New registry entry; `notify_targets` are the other registered
    /// connections that should receive a membership-changed hint
    Registered { notify_targets: Vec<ConnectionId> },
    /// The connection already held an identity; the registry is unchanged
    /// and nobody else needs to hear about it
    AlreadyRegistered,
}

/// identity claim のユースケース
pub struct RegisterIdentityUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RegistryRepository>,
    /// MessagePusher（イベント通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl RegisterIdentityUseCase {
    pub fn new(
        repository: Arc<dyn RegistryRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// identity claim を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - claim を送ったコネクションの ID（Domain Model）
    /// * `username` - 検証済みの username（Domain Model）
    ///
    /// # Returns
    ///
    /// * `Ok(RegistrationOutcome)` - 登録成功、または冪等な再登録
    /// * `Err(RegisterError)` - レジストリの容量超過
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        username: Username,
    ) -> Result<RegistrationOutcome, RegisterError> {
        let joined_at = Timestamp::new(now_epoch_millis());
        let member = Member::new(connection_id.clone(), username, joined_at);

        match self.repository.register_member(member).await {
            Ok(RegisterOutcome::Registered) => {
                let notify_targets = self.notify_targets(&connection_id).await;
                Ok(RegistrationOutcome::Registered { notify_targets })
            }
            Ok(RegisterOutcome::AlreadyRegistered) => Ok(RegistrationOutcome::AlreadyRegistered),
            Err(_) => Err(RegisterError::RegistryFull),
        }
    }

    /// 本人以外の全ての登録済みコネクションを取得
    async fn notify_targets(&self, exclude_connection_id: &ConnectionId) -> Vec<ConnectionId> {
        let all_connection_ids = self.repository.registered_connection_ids().await;
        all_connection_ids
            .into_iter()
            .filter(|id| id != exclude_connection_id)
            .collect()
    }

    /// registration-confirmed を claim した本人にのみ送信
    pub async fn confirm_registration(
        &self,
        connection_id: &ConnectionId,
        message: &str,
    ) -> Result<(), String> {
        self.message_pusher
            .push_to(connection_id, message)
            .await
            .map_err(|e| e.to_string())
    }

    /// membership-changed を他の登録済みコネクションへブロードキャスト
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
