//! InMemory Registry Repository 実装
//!
//! ドメイン層が定義する RegistryRepository trait の具体的な実装。
//! OnlineRegistry エンティティをそのままインメモリのストアとして使用します。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, Member, OnlineRegistry, RegisterOutcome, RegistryRepository, RepositoryError,
};

/// インメモリ Registry Repository 実装
///
/// OnlineRegistry を単一の Mutex で保護します。登録・削除と通知対象の算出は
/// この排他区間の中で行われるため、切断とブロードキャストの競合は起きません。
pub struct InMemoryRegistryRepository {
    registry: Arc<Mutex<OnlineRegistry>>,
}

impl InMemoryRegistryRepository {
    pub fn new(registry: Arc<Mutex<OnlineRegistry>>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl RegistryRepository for InMemoryRegistryRepository {
    async fn register_member(&self, member: Member) -> Result<RegisterOutcome, RepositoryError> {
        let mut registry = self.registry.lock().await;
        registry
            .register(member)
            .map_err(|_| RepositoryError::CapacityExceeded)
    }

    async fn remove_member(&self, connection_id: &ConnectionId) -> Option<Member> {
        let mut registry = self.registry.lock().await;
        registry.remove(connection_id)
    }

    async fn registered_connection_ids(&self) -> Vec<ConnectionId> {
        let registry = self.registry.lock().await;
        registry
            .members()
            .iter()
            .map(|m| m.connection_id.clone())
            .collect()
    }

    async fn is_registered(&self, connection_id: &ConnectionId) -> bool {
        let registry = self.registry.lock().await;
        registry.contains(connection_id)
    }

    async fn members(&self) -> Vec<Member> {
        let registry = self.registry.lock().await;
        registry.members().to_vec()
    }

    async fn member_count(&self) -> usize {
        let registry = self.registry.lock().await;
        registry.member_count()
    }
}
