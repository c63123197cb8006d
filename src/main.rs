use std::path::PathBuf;

use clap::{
    Args, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use monthlify::{
    cli::{self, ApiAccess},
    config, error,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP API for the web front-end
    Serve,

    /// Print and open the Spotify authorization URL
    Login,

    /// Show how a source would be split into monthly playlists
    Preview(SourceOptions),

    #[clap(about = "Create or update one playlist per month of a source")]
    Sync(SyncOptions),

    /// Render a cover image for a month
    Cover(CoverOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Args, Debug, Clone)]
pub struct AccessOptions {
    /// Spotify access token of the user to act for
    #[clap(long, env = "SPOTIFY_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: String,

    /// Base URL of the Spotify Web API
    #[clap(long, env = "SPOTIFY_API_URL", default_value = config::DEFAULT_API_URL)]
    pub api_url: String,
}

impl From<AccessOptions> for ApiAccess {
    fn from(opts: AccessOptions) -> Self {
        ApiAccess {
            access_token: opts.access_token,
            api_url: opts.api_url,
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct SourceOptions {
    /// `liked-songs`, a playlist id, URL or `spotify:playlist:` URI
    #[clap(long, default_value = "liked-songs")]
    pub source: String,

    #[command(flatten)]
    pub access: AccessOptions,
}

#[derive(Parser, Debug, Clone)]
pub struct SyncOptions {
    #[command(flatten)]
    pub source: SourceOptions,

    /// Do not upload generated covers to newly created playlists
    #[clap(long)]
    pub no_covers: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CoverOptions {
    /// Three-letter month code, e.g. FEB
    pub month: String,

    /// Four-digit year
    pub year: String,

    /// Output file (defaults to <MON>-<YEAR>.png)
    #[clap(long)]
    pub out: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve().await,
        Command::Login => cli::login().await,
        Command::Preview(opt) => cli::preview(opt.source, opt.access.into()).await,
        Command::Sync(opt) => {
            cli::sync(opt.source.source, opt.source.access.into(), !opt.no_covers).await
        }
        Command::Cover(opt) => cli::cover(opt.month, opt.year, opt.out).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
