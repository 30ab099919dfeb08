use std::fmt;

use reqwest::{Client, StatusCode, Url};

use crate::{config, management::SessionError, types::TokenResponse};

/// Errors raised while establishing a session.
///
/// An `Exchange` or `Request` failure is fatal for the current login
/// attempt: authorization codes are single-use at the provider, so the
/// caller must discard the stored verifier and restart the flow from a
/// fresh login rather than retry.
#[derive(Debug)]
pub enum AuthError {
    /// The token endpoint answered with a non-success status.
    Exchange(StatusCode),
    /// Network failure or a token response that did not decode.
    Request(reqwest::Error),
    /// No authorization code is pending; nothing to exchange.
    MissingCode,
    /// The stored code verifier is gone, so the code cannot be proven.
    MissingVerifier,
    /// Verifier generation was asked for an out-of-range length.
    Verifier(String),
    /// The authorize URL could not be assembled.
    LoginUrl(String),
    /// The session store failed while persisting or clearing keys.
    Session(SessionError),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Exchange(status) => {
                write!(f, "token exchange rejected with status {}", status)
            }
            AuthError::Request(err) => write!(f, "token exchange request failed: {}", err),
            AuthError::MissingCode => write!(f, "no authorization code pending"),
            AuthError::MissingVerifier => write!(f, "no code verifier stored for this attempt"),
            AuthError::Verifier(msg) => write!(f, "{}", msg),
            AuthError::LoginUrl(msg) => write!(f, "could not build login URL: {}", msg),
            AuthError::Session(err) => write!(f, "session store failure: {}", err),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Request(err)
    }
}

impl From<SessionError> for AuthError {
    fn from(err: SessionError) -> Self {
        AuthError::Session(err)
    }
}

/// Constructs the Spotify authorization redirect URL for a PKCE login.
///
/// Pure string construction over the configured authorize endpoint: client
/// id, redirect URI, `response_type=code`, the S256 code challenge, the
/// space-joined scope list, and `show_dialog=true` so the consent dialog is
/// always shown even for a previously-approved app. Percent-encoding of the
/// query (notably the redirect URI) is delegated to the URL type.
pub fn build_login_url(challenge: &str) -> Result<String, String> {
    login_url_for(
        &config::spotify_apiauth_url(),
        &config::spotify_client_id(),
        &config::spotify_redirect_uri(),
        &config::spotify_scope(),
        challenge,
    )
}

pub fn login_url_for(
    auth_url: &str,
    client_id: &str,
    redirect_uri: &str,
    scope: &str,
    challenge: &str,
) -> Result<String, String> {
    let url = Url::parse_with_params(
        auth_url,
        &[
            ("client_id", client_id),
            ("response_type", "code"),
            ("redirect_uri", redirect_uri),
            ("code_challenge_method", "S256"),
            ("code_challenge", challenge),
            ("scope", scope),
            ("show_dialog", "true"),
        ],
    )
    .map_err(|e| e.to_string())?;

    Ok(url.to_string())
}

/// Exchanges an authorization code for an access token using PKCE.
///
/// Completes the OAuth 2.0 PKCE flow by POSTing the authorization code
/// received from the callback to the token endpoint, together with the code
/// verifier generated at the start of the flow. The verifier proves that
/// the same client that initiated the auth flow is completing it, which is
/// what makes the flow safe without a client secret.
///
/// # Arguments
///
/// * `client` - Shared HTTP client (carries the request timeout)
/// * `code` - Authorization code received from the OAuth callback
/// * `verifier` - PKCE code verifier generated at the start of the flow
///
/// # Returns
///
/// The bearer access token on success. Any non-success status becomes
/// [`AuthError::Exchange`]; network errors and undecodable bodies become
/// [`AuthError::Request`].
///
/// # Security Note
///
/// The authorization code is single-use and expires quickly (typically
/// 10 minutes). The exchange should happen immediately after receiving the
/// code, and must never be retried with the same code.
pub async fn exchange_code_pkce(
    client: &Client,
    code: &str,
    verifier: &str,
) -> Result<String, AuthError> {
    let client_id = config::spotify_client_id();
    let redirect_uri = config::spotify_redirect_uri();

    let res = client
        .post(config::spotify_apitoken_url())
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", redirect_uri.as_str()),
        ])
        .send()
        .await?;

    if !res.status().is_success() {
        return Err(AuthError::Exchange(res.status()));
    }

    let token: TokenResponse = res.json().await?;
    Ok(token.access_token)
}
