use reqwest::{Client, StatusCode};

use crate::{config, spotify::ApiError, types::Profile};

/// Fetches the authenticated user's profile.
///
/// Fetched once per session by the orchestrator. Any failure here is
/// treated as session-invalidating by the caller, since a profile that
/// cannot be loaded most commonly means the token is no longer valid.
pub async fn get_user_profile(client: &Client, token: &str) -> Result<Profile, ApiError> {
    let api_url = format!("{uri}/me", uri = &config::spotify_apiurl());

    let res = client.get(&api_url).bearer_auth(token).send().await?;

    match res.status() {
        StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
        status if !status.is_success() => Err(ApiError::Status(status)),
        _ => Ok(res.json::<Profile>().await?),
    }
}
