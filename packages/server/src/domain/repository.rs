//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::entity::{Member, RegisterOutcome};
use super::error::RepositoryError;
use super::value_object::ConnectionId;

/// Registry Repository trait
///
/// ドメイン層が必要とするオンラインレジストリへのインターフェース。
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[async_trait]
pub trait RegistryRepository: Send + Sync {
    /// メンバーを登録（同一コネクションの再登録は冪等）
    async fn register_member(&self, member: Member) -> Result<RegisterOutcome, RepositoryError>;

    /// メンバーを削除（存在しない場合は None）
    async fn remove_member(&self, connection_id: &ConnectionId) -> Option<Member>;

    /// 登録済みの全てのコネクション ID を取得
    async fn registered_connection_ids(&self) -> Vec<ConnectionId>;

    /// コネクションが登録済みかどうか
    async fn is_registered(&self, connection_id: &ConnectionId) -> bool;

    /// メンバーリストを取得
    async fn members(&self) -> Vec<Member>;

    /// 登録済みメンバー数を取得
    async fn member_count(&self) -> usize;
}
