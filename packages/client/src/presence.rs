//! Presence snapshot fetching.
//!
//! The membership-changed event carries no payload; it is a hint to call
//! this endpoint and replace the panel with the authoritative snapshot.

use irori_server::infrastructure::dto::http::OnlineUsersDto;

use super::error::ClientError;

/// Fetch the online-users snapshot from the read endpoint.
///
/// A failure is reported to the caller, which leaves the roster at its last
/// known state; there is no retry.
pub async fn fetch_online_users(
    client: &reqwest::Client,
    api_url: &str,
) -> Result<OnlineUsersDto, ClientError> {
    let url = format!("{}/online-users", api_url.trim_end_matches('/'));

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| ClientError::PresenceQueryFailed(e.to_string()))?;

    response
        .json::<OnlineUsersDto>()
        .await
        .map_err(|e| ClientError::PresenceQueryFailed(e.to_string()))
}
