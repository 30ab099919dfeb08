//! # CLI Module
//!
//! User-facing commands for the now-playing visualizer. Each command wires
//! the session store, the [`crate::app::App`] state machine, and the
//! Spotify API layer together and takes care of terminal presentation:
//! spinners for network waits, colored status lines, and palette swatches
//! rendered as truecolor blocks.
//!
//! - [`auth`] - OAuth 2.0 PKCE login via browser + local callback server
//! - [`now`] - One-shot "what is playing right now" with its palette
//! - [`watch`] - Continuous polling loop re-rendering on track change
//! - [`whoami`] - The authenticated user's profile
//! - [`logout`] - Clears the persisted session
//!
//! The presentation here is a passive consumer of derived state; all
//! protocol and state-machine logic lives in the library modules.

mod auth;
mod logout;
mod now;
mod watch;
mod whoami;

pub use auth::auth;
pub use logout::logout;
pub use now::now;
pub use watch::watch;
pub use whoami::whoami;

use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    app::App, error, management::FileSessionStore, palette, types::PlaybackSnapshot,
};

pub(crate) async fn session_app() -> App<FileSessionStore> {
    let store = match FileSessionStore::open().await {
        Ok(store) => store,
        Err(e) => error!("Failed to open session store: {}", e),
    };
    App::resume(store).await
}

pub(crate) fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

pub(crate) fn format_ms(ms: u64) -> String {
    let total_secs = ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

pub(crate) fn print_snapshot(snapshot: &PlaybackSnapshot, palette: Option<&[String]>) {
    let state = if snapshot.is_playing { "▶" } else { "⏸" };
    println!(
        "[{}] {} {} — {}",
        "♪".green().bold(),
        state,
        snapshot.track_name.bold(),
        snapshot.artist_names
    );
    println!(
        "    {} [{} / {}]",
        snapshot.album_name.dimmed(),
        format_ms(snapshot.progress_ms),
        format_ms(snapshot.duration_ms)
    );

    let Some(palette) = palette else { return };
    if palette.is_empty() {
        return;
    }

    print!("    ");
    for hex in palette {
        if let Some((r, g, b)) = palette::hex_to_rgb(hex) {
            print!("{} ", "  ".on_truecolor(r, g, b));
        }
    }
    println!();
}
