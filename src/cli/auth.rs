use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;

use crate::{
    app::AuthState, error, info, server::start_api_server, success, types::AuthCallback, warning,
};

/// Runs the complete OAuth 2.0 PKCE authentication flow.
///
/// 1. Generates a fresh PKCE verifier and persists it for this attempt
/// 2. Starts the local callback server
/// 3. Opens the authorization URL in the user's browser
/// 4. Waits for the redirect to deliver the single-use code
/// 5. Exchanges the code for an access token and persists it
///
/// Exchange failures end the attempt; the verifier has already been
/// discarded by the state machine and the user must restart the flow.
pub async fn auth() {
    let mut app = super::session_app().await;

    if matches!(app.state(), AuthState::Authenticated { .. }) {
        info!("Existing session found; starting a fresh login.");
        app.logout().await;
    }

    let login_url = match app.begin_login().await {
        Ok(url) => url,
        Err(e) => error!("Failed to start login: {}", e),
    };

    let shared_state: Arc<Mutex<Option<AuthCallback>>> = Arc::new(Mutex::new(None));
    let server_state = Arc::clone(&shared_state);
    tokio::spawn(async move {
        start_api_server(server_state).await;
    });

    // Open the authorization URL in the default browser
    if webbrowser::open(&login_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            login_url
        )
    }

    let pb = super::spinner("Waiting for Spotify authorization...");
    let callback = wait_for_callback(shared_state).await;
    pb.finish_and_clear();

    match callback {
        Some(AuthCallback::Code(code)) => {
            app.receive_code(code);
            match app.complete_login().await {
                Ok(()) => success!("Authentication successful!"),
                Err(e) => error!(
                    "Authentication failed: {}. Restart the login flow to try again.",
                    e
                ),
            }
        }
        Some(AuthCallback::Denied(reason)) => error!("Authorization was denied: {}", reason),
        None => error!("Authentication failed or timed out."),
    }
}

/// Polls the shared slot until the callback server parks a result or the
/// timeout passes. Runs concurrently with the HTTP server that fills the
/// slot.
async fn wait_for_callback(
    shared_state: Arc<Mutex<Option<AuthCallback>>>,
) -> Option<AuthCallback> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(120);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let mut lock = shared_state.lock().await;
        if let Some(callback) = lock.take() {
            return Some(callback);
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}
