//! Monthlify Library
//!
//! Backend for sorting a Spotify library into monthly playlists. The service
//! reads the user's Liked Songs or any playlist, buckets the tracks by the
//! month they were added and creates (or tops up) one playlist per month,
//! optionally with a generated cover image.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the web front-end
//! - `cli` - Command-line entry points (serve, preview, sync, cover)
//! - `config` - Startup configuration loaded from `.env` and the environment
//! - `cover` - Gradient cover image rendering
//! - `error` - Error taxonomy and its HTTP representation
//! - `monthly` - Month partitioning, previews and the playlist sync engine
//! - `server` - Router construction and the HTTP listener
//! - `spotify` - Spotify Web API client and OAuth helpers
//! - `types` - Wire and response data structures
//! - `utils` - Month naming helpers
//!
//! # Example
//!
//! ```no_run
//! use monthlify::{Error, config::{self, Config}, server};
//!
//! #[tokio::main]
//! async fn main() -> monthlify::Res<()> {
//!     config::load_env().await.map_err(Error::Unexpected)?;
//!     server::start_api_server(Config::from_env()?).await
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod cover;
pub mod error;
pub mod monthly;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::Error;

/// A convenient Result type alias for operations that may fail.
///
/// Every fallible operation in the crate reports one of the [`Error`]
/// variants, which the HTTP layer turns into a JSON error body and the CLI
/// prints before exiting.
///
/// # Example
///
/// ```
/// use monthlify::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Error>;

/// Prints an informational message with a blue bullet point.
///
/// Used for progress and status lines, such as which month the sync engine
/// is currently processing.
///
/// # Example
///
/// ```ignore
/// info!("Listening on {}", addr);
/// info!("Found {} saved tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```ignore
/// success!("Created playlist {}", name);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for unrecoverable startup failures (missing configuration, a
/// socket that cannot be bound). Request handling never calls it; request
/// errors travel back to the caller as [`Error`] values.
///
/// # Example
///
/// ```ignore
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for upstream failures surfaced to a client and for recoverable
/// oddities such as duplicate destination playlist names.
///
/// # Example
///
/// ```ignore
/// warning!("Two playlists are named {}, using the first", name);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
