//! Conversion logic between DTOs and domain entities.

use crate::domain::entity::Member;
use crate::infrastructure::dto::http::OnlineUserDto;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<Member> for OnlineUserDto {
    fn from(member: Member) -> Self {
        Self {
            id: member.connection_id.into_string(),
            username: member.username.into_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, Timestamp, Username};

    #[test]
    fn test_member_to_online_user_dto() {
        // テスト項目: ドメインエンティティの Member が DTO に変換される
        // given (前提条件):
        let member = Member::new(
            ConnectionId::new("conn-1".to_string()).unwrap(),
            Username::new("alice".to_string()).unwrap(),
            Timestamp::new(1000),
        );

        // when (操作):
        let dto: OnlineUserDto = member.into();

        // then (期待する結果):
        assert_eq!(dto.id, "conn-1");
        assert_eq!(dto.username, "alice");
    }

    #[test]
    fn test_online_users_dto_uses_camel_case_key() {
        // テスト項目: スナップショットのキーが camelCase でシリアライズされる
        // given (前提条件):
        let snapshot = crate::infrastructure::dto::http::OnlineUsersDto {
            online_users: vec![OnlineUserDto {
                id: "conn-1".to_string(),
                username: "alice".to_string(),
            }],
        };

        // when (操作):
        let json = serde_json::to_string(&snapshot).unwrap();

        // then (期待する結果):
        assert!(json.contains(r#""onlineUsers""#));
    }
}
