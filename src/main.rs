use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spyt::{
    cli::{self, DownloadSettings, RunOutcome},
    config, error,
    spotify::auth::Credentials,
    warning,
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
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
  args_conflicts_with_subcommands = true,
  subcommand_negates_reqs = true,
)]
struct Cli {
    /// Spotify API client ID
    #[clap(long, env = "SPOTIFY_CLIENT_ID", hide_env_values = true)]
    client_id: Option<String>,

    /// Spotify API client secret
    #[clap(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,

    /// Directory to save downloaded tracks to [default: ~/Music/SpotifyDownloads]
    #[clap(long, env = "SPYT_DOWNLOAD_DIR")]
    download_dir: Option<PathBuf>,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    // Must run before parsing so `.env` values can fill in the options.
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    if let Some(Command::Completions(opt)) = cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    let Some(client_id) = cli.client_id.filter(|v| !v.trim().is_empty()) else {
        error!("Missing Spotify client ID. Pass --client-id or set SPOTIFY_CLIENT_ID.");
    };
    let Some(client_secret) = cli.client_secret.filter(|v| !v.trim().is_empty()) else {
        error!("Missing Spotify client secret. Pass --client-secret or set SPOTIFY_CLIENT_SECRET.");
    };

    let download_dir = cli
        .download_dir
        .map(|d| config::expand_home(&d))
        .unwrap_or_else(config::default_download_dir);

    let settings = DownloadSettings {
        credentials: Credentials {
            client_id,
            client_secret,
            redirect_uri: config::spotify_redirect_uri(),
        },
        download_dir,
    };

    match cli::download(settings).await {
        Ok(RunOutcome::Aborted) => std::process::exit(1),
        Ok(_) => {}
        Err(e) => error!("Error: {}", e),
    }
}
