use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::types::AuthCallback;

/// Receives the OAuth redirect from Spotify.
///
/// The authorization code appears in the query exactly once; it is parked
/// in the shared slot for the waiting auth flow and never echoed back to
/// the browser. A second redirect (reload, back-navigation) finds the slot
/// occupied and is refused, so a stale code cannot be replayed.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<Option<AuthCallback>>>>,
) -> Html<&'static str> {
    if let Some(code) = params.get("code") {
        let mut slot = shared_state.lock().await;
        if slot.is_some() {
            return Html("<h4>Authorization already received. Close this window.</h4>");
        }
        *slot = Some(AuthCallback::Code(code.clone()));
        Html("<h2>Authentication successful.</h2><p>Close this browser window.</p>")
    } else if let Some(error) = params.get("error") {
        let mut slot = shared_state.lock().await;
        if slot.is_none() {
            *slot = Some(AuthCallback::Denied(error.clone()));
        }
        Html("<h4>Login failed or was denied.</h4>")
    } else {
        Html("<h4>Missing authorization code.</h4>")
    }
}
