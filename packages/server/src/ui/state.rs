//! Server state shared across connection handlers.

use std::sync::Arc;

use crate::usecase::{
    ConnectSessionUseCase, DisconnectSessionUseCase, GetOnlineUsersUseCase,
    RegisterIdentityUseCase, RelayMessageUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectSessionUseCase（コネクション受付のユースケース）
    pub connect_session_usecase: Arc<ConnectSessionUseCase>,
    /// RegisterIdentityUseCase（identity claim のユースケース）
    pub register_identity_usecase: Arc<RegisterIdentityUseCase>,
    /// RelayMessageUseCase（メッセージ中継のユースケース）
    pub relay_message_usecase: Arc<RelayMessageUseCase>,
    /// DisconnectSessionUseCase（コネクション切断のユースケース）
    pub disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
    /// GetOnlineUsersUseCase（プレゼンス取得のユースケース）
    pub get_online_users_usecase: Arc<GetOnlineUsersUseCase>,
}
