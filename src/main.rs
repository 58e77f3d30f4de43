// tunedeck - terminal remote for the desktop Spotify client
// Search the catalog, replay recent artists, drive play/pause/next/previous

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tunedeck::{
    spotify::{PlayerctlPlayer, SpotifyCatalog},
    ui::{App, Navigator},
    CatalogSearch, Config, RecentArtists,
};

#[derive(Parser)]
#[command(name = "tunedeck")]
#[command(about = "Terminal dashboard for searching and controlling a Spotify session")]
struct Args {
    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Recently played artists file (overrides the config)
    #[arg(long)]
    recent_file: Option<PathBuf>,

    /// Enable developer logging (debug level everywhere)
    #[arg(long)]
    dev: bool,
}

fn init_logging(log_dir: &Path, dev: bool) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    // Daily rotating file appender - the terminal itself belongs to the TUI
    let file_appender = tracing_appender::rolling::daily(log_dir, "tunedeck.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let default_filter = if dev { "debug" } else { "info,tunedeck=debug" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    if dev {
        eprintln!("Dev mode: debug logs in {}", log_dir.display());
    }

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(path) = args.recent_file {
        config.recent_file = path;
    }

    // Hold the guard so buffered log lines are flushed on exit
    let _log_guard = init_logging(&config.log_dir, args.dev)?;
    info!("tunedeck starting up");

    let recent = RecentArtists::load(&config.recent_file)?;
    let catalog: Arc<dyn CatalogSearch> = Arc::new(SpotifyCatalog::new(&config.spotify)?);
    let playback = Arc::new(PlayerctlPlayer::new(&config.player, catalog.clone()));

    let navigator = Navigator::new(recent, playback, catalog);
    let mut app = App::new(&config, navigator).await?;
    app.run().await?;

    info!("tunedeck shutting down");
    Ok(())
}
