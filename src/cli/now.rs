use crate::{
    error, info,
    spotify::{self, ApiError},
};

pub async fn now() {
    let mut app = super::session_app().await;
    let token = match app.token() {
        Some(token) => token.to_string(),
        None => error!("Not authenticated. Please run sponowcli auth first."),
    };

    let pb = super::spinner("Fetching current playback...");
    let result = spotify::player::get_currently_playing(app.client(), &token).await;
    pb.finish_and_clear();

    match result {
        Ok(Some(snapshot)) => {
            let palette = match &snapshot.album_image {
                Some(url) => app.palette_for(&snapshot.track_id, url).await,
                None => None,
            };
            super::print_snapshot(&snapshot, palette.as_deref());
        }
        Ok(None) => info!("Nothing is playing right now."),
        Err(ApiError::Unauthorized) => {
            app.playback_unauthorized().await;
            error!("Session expired. Please run sponowcli auth again.");
        }
        Err(e) => error!("Failed to fetch current playback: {}", e),
    }
}
