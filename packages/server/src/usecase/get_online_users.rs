//! UseCase: プレゼンスのスナップショット取得

use std::sync::Arc;

use crate::domain::{Member, RegistryRepository};

/// オンラインユーザーのスナップショットを返すユースケース
///
/// レジストリの値集合をそのまま返す純粋な読み取り。並行する参加・退出とは
/// 競合しうるが、それは許容される（通知を受けた側が再クエリする）。
pub struct GetOnlineUsersUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RegistryRepository>,
}

impl GetOnlineUsersUseCase {
    pub fn new(repository: Arc<dyn RegistryRepository>) -> Self {
        Self { repository }
    }

    /// 現在の登録済みメンバーを取得
    ///
    /// # Returns
    ///
    /// メンバーのリスト（username でソート、同名はコネクション ID で安定化）
    pub async fn execute(&self) -> Vec<Member> {
        let mut members = self.repository.members().await;

        // Sort for consistent ordering
        members.sort_by(|a, b| {
            a.username
                .as_str()
                .cmp(b.username.as_str())
                .then_with(|| a.connection_id.as_str().cmp(b.connection_id.as_str()))
        });

        members
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, Member, OnlineRegistry, Timestamp, Username};
    use crate::infrastructure::repository::InMemoryRegistryRepository;
    use tokio::sync::Mutex;

    fn create_test_repository() -> Arc<InMemoryRegistryRepository> {
        let registry = Arc::new(Mutex::new(OnlineRegistry::new(Timestamp::new(0))));
        Arc::new(InMemoryRegistryRepository::new(registry))
    }

    async fn register(repository: &InMemoryRegistryRepository, conn: &str, name: &str) {
        repository
            .register_member(Member::new(
                ConnectionId::new(conn.to_string()).unwrap(),
                Username::new(name.to_string()).unwrap(),
                Timestamp::new(1000),
            ))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_snapshot_is_empty_without_members() {
        // テスト項目: メンバーがいない場合、空のスナップショットが返される
        // given (前提条件):
        let repository = create_test_repository();
        let usecase = GetOnlineUsersUseCase::new(repository);

        // when (操作):
        let members = usecase.execute().await;

        // then (期待する結果):
        assert!(members.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_is_sorted_by_username() {
        // テスト項目: スナップショットが username でソートされている
        // given (前提条件):
        let repository = create_test_repository();
        let usecase = GetOnlineUsersUseCase::new(repository.clone());
        register(&repository, "conn-3", "charlie").await;
        register(&repository, "conn-1", "alice").await;
        register(&repository, "conn-2", "bob").await;

        // when (操作):
        let members = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(members.len(), 3);
        assert_eq!(members[0].username.as_str(), "alice");
        assert_eq!(members[1].username.as_str(), "bob");
        assert_eq!(members[2].username.as_str(), "charlie");
    }

    #[tokio::test]
    async fn test_snapshot_keeps_duplicate_usernames() {
        // テスト項目: 同名の username が別エントリとして両方現れる
        // given (前提条件):
        let repository = create_test_repository();
        let usecase = GetOnlineUsersUseCase::new(repository.clone());
        register(&repository, "conn-2", "alice").await;
        register(&repository, "conn-1", "alice").await;

        // when (操作):
        let members = usecase.execute().await;

        // then (期待する結果): コネクション ID で順序が安定している
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].connection_id.as_str(), "conn-1");
        assert_eq!(members[1].connection_id.as_str(), "conn-2");
    }
}
