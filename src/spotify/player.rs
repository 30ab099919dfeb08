use reqwest::{Client, StatusCode};

use crate::{
    config,
    spotify::ApiError,
    types::{CurrentlyPlayingResponse, PlaybackSnapshot},
};

/// Fetches the user's currently-playing track.
///
/// Returns `Ok(None)` both for HTTP 204 (the player exists but nothing is
/// playing) and for a success body whose `item` is null (e.g. an ad or a
/// private session); neither is an error. HTTP 401 is reported as
/// [`ApiError::Unauthorized`] so the caller can invalidate the session;
/// every other non-success status is a transient [`ApiError::Status`].
pub async fn get_currently_playing(
    client: &Client,
    token: &str,
) -> Result<Option<PlaybackSnapshot>, ApiError> {
    let api_url = format!(
        "{uri}/me/player/currently-playing",
        uri = &config::spotify_apiurl()
    );

    let res = client.get(&api_url).bearer_auth(token).send().await?;

    match res.status() {
        StatusCode::NO_CONTENT => Ok(None),
        StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
        status if !status.is_success() => Err(ApiError::Status(status)),
        _ => {
            let body: CurrentlyPlayingResponse = res.json().await?;
            Ok(PlaybackSnapshot::from_response(body))
        }
    }
}
