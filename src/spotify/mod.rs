//! # Spotify Integration Module
//!
//! This module provides the interface to the Spotify Web API surface the
//! visualizer needs: the OAuth 2.0 PKCE authentication flow, the current
//! user's profile, and the currently-playing playback state. It handles all
//! HTTP communication, typed response decoding, and error classification.
//!
//! ## Core Modules
//!
//! - [`auth`] - Login URL construction and authorization-code-for-token
//!   exchange (OAuth 2.0 PKCE, no client secret involved)
//! - [`player`] - Currently-playing endpoint and its normalization into
//!   [`crate::types::PlaybackSnapshot`]
//! - [`profile`] - The authenticated user's profile
//!
//! ## Error Classification
//!
//! Authenticated GET requests share [`ApiError`]:
//!
//! - `Unauthorized` - HTTP 401; the access token is no longer valid and the
//!   session must be re-established via a fresh login. There is no refresh
//!   token in this design, so re-login is the only recovery.
//! - `Status` - any other non-success status; treated as transient by the
//!   playback poller and as fatal by the profile path.
//! - `Request` - network failure, timeout, or a body that does not decode
//!   into the expected shape.
//!
//! All response decoding goes through serde structs in [`crate::types`];
//! malformed provider JSON surfaces as a `Request` error rather than as
//! defaulted fields.

pub mod auth;
pub mod player;
pub mod profile;

use std::{fmt, time::Duration};

use reqwest::{Client, StatusCode};

/// Per-request timeout applied to every API call, including the token
/// exchange and artwork downloads.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the HTTP client shared across the application.
///
/// # Panics
///
/// Panics if the TLS backend cannot be initialized, same as
/// `reqwest::Client::new()`.
pub fn http_client() -> Client {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("failed to build HTTP client")
}

#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    Status(StatusCode),
    Request(reqwest::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized => write!(f, "access token rejected (HTTP 401)"),
            ApiError::Status(status) => write!(f, "unexpected API status {}", status),
            ApiError::Request(err) => write!(f, "request failed: {}", err),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Request(err)
    }
}
