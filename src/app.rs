//! Top-level application state machine.
//!
//! Composes the PKCE generator, token exchanger, session store, profile
//! fetcher, and palette cache behind a small set of transitions:
//!
//! ```text
//! LoggedOut -> Authenticating(code) -> Authenticated(token) -> LoggedOut
//! ```
//!
//! A persisted token short-circuits straight to `Authenticated` on resume.
//! Profile loading and the playback poller run independently once a token
//! exists; the poller's lifecycle is owned by the caller (see
//! [`crate::poller`]) so it can be torn down before the token it holds is
//! cleared.

use reqwest::Client;

use crate::{
    management::{KEY_ACCESS_TOKEN, KEY_CODE_VERIFIER, SessionStore},
    palette::{self, DEFAULT_SWATCHES, PaletteCache},
    spotify::{self, ApiError, auth::AuthError},
    types::Profile,
    utils, warning,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    LoggedOut,
    Authenticating { code: String },
    Authenticated { token: String },
}

pub struct App<S: SessionStore> {
    store: S,
    client: Client,
    state: AuthState,
    profile: Option<Profile>,
    palettes: PaletteCache,
    last_error: Option<String>,
}

impl<S: SessionStore> App<S> {
    /// Builds the app from a session store. A persisted access token
    /// resumes the session directly in `Authenticated`, skipping the
    /// authorization flow entirely.
    pub async fn resume(store: S) -> Self {
        let state = match store.get(KEY_ACCESS_TOKEN).await {
            Some(token) => AuthState::Authenticated { token },
            None => AuthState::LoggedOut,
        };

        Self {
            store,
            client: spotify::http_client(),
            state,
            profile: None,
            palettes: PaletteCache::new(),
            last_error: None,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Last user-facing error message surfaced by a failed transition.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn token(&self) -> Option<&str> {
        match &self.state {
            AuthState::Authenticated { token } => Some(token),
            _ => None,
        }
    }

    /// Starts a login attempt: generates a fresh verifier (never reused
    /// across attempts), persists it, and returns the authorization URL to
    /// send the user to. The state stays `LoggedOut` until the redirect
    /// comes back with a code.
    pub async fn begin_login(&mut self) -> Result<String, AuthError> {
        let verifier = utils::generate_code_verifier(utils::MAX_VERIFIER_LENGTH)
            .map_err(AuthError::Verifier)?;
        let challenge = utils::generate_code_challenge(&verifier);

        self.store.set(KEY_CODE_VERIFIER, &verifier).await?;

        spotify::auth::build_login_url(&challenge).map_err(AuthError::LoginUrl)
    }

    /// Accepts the single-use authorization code delivered by the redirect.
    /// Ignored unless the app is `LoggedOut`; an already-authenticated
    /// session cannot be clobbered by a stray callback.
    pub fn receive_code(&mut self, code: String) {
        if matches!(self.state, AuthState::LoggedOut) {
            self.state = AuthState::Authenticating { code };
        }
    }

    /// Exchanges the pending authorization code for an access token.
    ///
    /// The code is consumed up front, so it can never be exchanged twice.
    /// On success the token is persisted, the verifier removed, and the
    /// state becomes `Authenticated`. On failure the verifier is removed
    /// as well (it is bound to this attempt), the state falls back to
    /// `LoggedOut`, and a user-facing message is surfaced; the caller must
    /// restart the login flow rather than retry.
    pub async fn complete_login(&mut self) -> Result<(), AuthError> {
        let code = match std::mem::replace(&mut self.state, AuthState::LoggedOut) {
            AuthState::Authenticating { code } => code,
            other => {
                self.state = other;
                return Err(AuthError::MissingCode);
            }
        };

        let verifier = match self.store.get(KEY_CODE_VERIFIER).await {
            Some(verifier) => verifier,
            None => {
                self.last_error = Some("Could not complete Spotify login. Try again.".to_string());
                return Err(AuthError::MissingVerifier);
            }
        };

        match spotify::auth::exchange_code_pkce(&self.client, &code, &verifier).await {
            Ok(token) => {
                self.store.set(KEY_ACCESS_TOKEN, &token).await?;
                self.store.remove(KEY_CODE_VERIFIER).await?;
                self.state = AuthState::Authenticated { token };
                self.last_error = None;
                Ok(())
            }
            Err(err) => {
                let _ = self.store.remove(KEY_CODE_VERIFIER).await;
                self.state = AuthState::LoggedOut;
                self.last_error = Some("Could not complete Spotify login. Try again.".to_string());
                Err(err)
            }
        }
    }

    /// Fetches the user profile once a token exists. Any failure is
    /// treated as session-invalidating: the most common cause is a token
    /// the provider no longer accepts, and without a profile the app
    /// cannot render its header anyway.
    pub async fn load_profile(&mut self) -> Result<(), ApiError> {
        let token = match self.token() {
            Some(token) => token.to_string(),
            None => return Err(ApiError::Unauthorized),
        };

        match spotify::profile::get_user_profile(&self.client, &token).await {
            Ok(profile) => {
                self.profile = Some(profile);
                Ok(())
            }
            Err(err) => {
                warning!("Failed to fetch profile: {}", err);
                self.last_error = Some("Could not load profile. Please log in again.".to_string());
                self.logout().await;
                Err(err)
            }
        }
    }

    /// Invalidates the session after the playback endpoint answered 401.
    /// Playback and profile failures share one rule: a 401 anywhere means
    /// the token is dead and the session ends.
    pub async fn playback_unauthorized(&mut self) {
        self.last_error = Some("Session expired. Please log in again.".to_string());
        self.logout().await;
    }

    /// Clears every piece of session state: both persisted keys, the
    /// in-memory token/code (via the state reset), and the profile.
    pub async fn logout(&mut self) {
        let _ = self.store.remove(KEY_ACCESS_TOKEN).await;
        let _ = self.store.remove(KEY_CODE_VERIFIER).await;
        self.state = AuthState::LoggedOut;
        self.profile = None;
    }

    /// Returns the palette for a track, extracting it from the album art
    /// on first encounter and serving the cached copy afterwards. Palette
    /// failures are cosmetic and collapse to `None`.
    pub async fn palette_for(&mut self, track_id: &str, image_url: &str) -> Option<Vec<String>> {
        let client = self.client.clone();
        let url = image_url.to_string();

        match self
            .palettes
            .get_or_extract(track_id, DEFAULT_SWATCHES, move || async move {
                palette::fetch_artwork(&client, &url).await
            })
            .await
        {
            Ok(palette) => Some(palette),
            Err(err) => {
                warning!("Palette extraction failed: {}", err);
                None
            }
        }
    }
}
