use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;

use crate::{
    config, error, info,
    poller::{PlaybackPoller, SharedSnapshot},
    success,
};

/// Continuous visualizer loop: polls playback on an interval and
/// re-renders the track line and palette whenever the track changes.
///
/// The poller owns the only network loop; this function just reads the
/// shared snapshot twice a second. Ctrl-C (and any session-invalidating
/// 401) tears the poller down before the loop exits, so no in-flight
/// response can touch state afterwards.
pub async fn watch(interval_ms: Option<u64>) {
    let mut app = super::session_app().await;
    let token = match app.token() {
        Some(token) => token.to_string(),
        None => error!("Not authenticated. Please run sponowcli auth first."),
    };

    let snapshot: SharedSnapshot = Arc::new(Mutex::new(None));
    let interval = interval_ms
        .map(Duration::from_millis)
        .unwrap_or_else(config::poll_interval);
    let poller = PlaybackPoller::spawn(
        app.client().clone(),
        token,
        Arc::clone(&snapshot),
        interval,
    );

    // Profile load runs after the poller is up; the two are independent,
    // but a profile failure invalidates the whole session.
    if let Err(e) = app.load_profile().await {
        poller.stop();
        error!(
            "Could not load profile ({}). Please run sponowcli auth again.",
            e
        );
    }
    if let Some(profile) = app.profile() {
        let name = profile
            .display_name
            .clone()
            .unwrap_or_else(|| profile.id.clone());
        info!("Listening as {}. Press Ctrl-C to stop.", name);
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut last_track: Option<String> = None;
    let mut render = tokio::time::interval(Duration::from_millis(500));
    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            _ = render.tick() => {
                if poller.is_unauthorized() {
                    poller.stop();
                    app.playback_unauthorized().await;
                    error!("Session expired. Please run sponowcli auth again.");
                }

                let current = snapshot.lock().await.clone();
                match current {
                    Some(snap) => {
                        if last_track.as_deref() != Some(snap.track_id.as_str()) {
                            last_track = Some(snap.track_id.clone());
                            let palette = match &snap.album_image {
                                Some(url) => app.palette_for(&snap.track_id, url).await,
                                None => None,
                            };
                            super::print_snapshot(&snap, palette.as_deref());
                        }
                    }
                    None => {
                        // Only report the transition to idle, not the
                        // not-yet-polled startup state.
                        if last_track.take().is_some() {
                            info!("Nothing is playing.");
                        }
                    }
                }
            }
        }
    }

    poller.stop();
    success!("Stopped watching.");
}
