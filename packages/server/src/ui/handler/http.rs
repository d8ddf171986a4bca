//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::http::{OnlineUserDto, OnlineUsersDto},
    ui::state::AppState,
};

/// Point-in-time snapshot of the currently registered users
pub async fn get_online_users(State(state): State<Arc<AppState>>) -> Json<OnlineUsersDto> {
    let members = state.get_online_users_usecase.execute().await;

    // Domain Model から DTO への変換
    let online_users: Vec<OnlineUserDto> = members.into_iter().map(OnlineUserDto::from).collect();

    Json(OnlineUsersDto { online_users })
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}
