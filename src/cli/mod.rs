//! # CLI Module
//!
//! Command-line entry points for Monthlify. The binary in `main.rs` parses
//! arguments with clap and calls exactly one function from this module.
//!
//! ## Commands
//!
//! ### Service
//!
//! - [`serve`] - Runs the HTTP API for the web front-end
//! - [`login`] - Prints the Spotify authorization URL and opens it in a browser
//!
//! ### Monthly playlists
//!
//! - [`preview`] - Shows how a source would be split into monthly playlists
//! - [`sync`] - Creates or tops up every monthly playlist of a source
//!
//! ### Artwork
//!
//! - [`cover`] - Renders a cover image to a PNG file
//!
//! ## Credentials
//!
//! `preview` and `sync` act on behalf of a user and need an access token,
//! taken from `--access-token` or `SPOTIFY_ACCESS_TOKEN`. They do not need
//! the client credentials, so they work against any token obtained through
//! the web flow (`GET /api/auth/callback` stores it in the
//! `spotify_access_token` cookie).
//!
//! ## Error Handling
//!
//! Every command is terminal: a failure is printed with `error!` and the
//! process exits with status 1. Progress and per-month results are printed
//! with `info!` and `success!`.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

mod cover;
mod login;
mod preview;
mod serve;
mod sync;

pub use cover::cover;
pub use login::login;
pub use preview::preview;
pub use serve::serve;
pub use sync::sync;

/// Credentials and endpoint for commands that call the Web API directly.
#[derive(Debug, Clone)]
pub struct ApiAccess {
    pub access_token: String,
    pub api_url: String,
}

pub(crate) fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
