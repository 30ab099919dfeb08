//! # API Module
//!
//! HTTP endpoints for the temporary local server that backs the OAuth
//! flow. Spotify redirects the user's browser here after the consent
//! dialog; the [`callback`] handler captures the single-use authorization
//! code (or the denial) and parks it for the waiting CLI flow, which
//! performs the actual token exchange. [`health`] exists for a quick
//! liveness probe of the server.
//!
//! The handlers are plain [Axum](https://docs.rs/axum) async functions and
//! carry no state beyond the shared callback slot injected as an
//! extension layer.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
