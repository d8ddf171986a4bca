//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// One entry of the online-users snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnlineUserDto {
    /// Server-assigned connection id
    pub id: String,
    pub username: String,
}

/// Response body for `GET /online-users`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineUsersDto {
    pub online_users: Vec<OnlineUserDto>,
}
