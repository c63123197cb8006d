//! # API Module
//!
//! HTTP handlers for the Monthlify web front-end. Every handler is a thin
//! adapter: it pulls the caller's access token and the request parameters
//! out of the request, calls into [`crate::monthly`], [`crate::spotify`] or
//! [`crate::cover`], and turns the result into JSON (or an image).
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`login`] - Returns the Spotify authorization URL the browser should open
//! - [`callback`] - Exchanges the authorization code and stores both tokens
//!   as HttpOnly cookies
//! - [`refresh`] - Mints a new access token cookie from the refresh cookie
//! - [`logout`] - Clears both cookies
//!
//! ### Library
//!
//! - [`playlists`] - The user's playlists, with a synthetic Liked Songs entry
//!   first
//! - [`user`] - The user's Spotify profile
//!
//! ### Monthly playlists
//!
//! - [`preview`] - Month buckets of a source, read-only
//! - [`create_monthly_playlists`] - Creates or tops up one playlist per month
//! - [`cover`] - Renders a cover image for a month code and year
//!
//! ### Monitoring
//!
//! - [`welcome`] and [`health`] - Liveness and version information
//!
//! ## Credentials
//!
//! Handlers that talk to Spotify take an [`AccessToken`] extractor. It reads
//! the `spotify_access_token` cookie set by [`callback`] and falls back to an
//! `Authorization: Bearer` header, so the CLI and scripts can call the API
//! without a browser. A request with neither is rejected with `401` before
//! the handler runs.
//!
//! ## Errors
//!
//! Every handler returns [`crate::Res`]; failures are rendered as
//! `{"error": "<message>"}` with the status described on [`crate::Error`].

mod auth;
mod cover;
mod health;
mod playlists;
mod preview;
mod session;
mod spotify;

pub use auth::{callback, login, logout, refresh};
pub use cover::cover;
pub use health::{health, welcome};
pub use playlists::{CreateMonthlyPlaylistsRequest, create_monthly_playlists};
pub use preview::{PreviewQuery, preview};
pub use session::{ACCESS_TOKEN_COOKIE, AccessToken, REFRESH_TOKEN_COOKIE};
pub use spotify::{playlists, user};
