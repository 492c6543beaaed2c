use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use version_check::check::{Activation, CheckState, StalenessController};
use version_check::config::{self, CheckConfig, DisplayMode, REFRESH_MARKER_KEY, Side};
use version_check::platform::cache_storage::DirCacheStorage;
use version_check::platform::reload::{CommandReloader, Reloader, SignalReloader};
use version_check::storage::marker::RefreshMarker;
use version_check::storage::sqlite::SqliteStore;
use version_check::version::compare::greater_than;
use version_check::version::http::HttpManifestSource;

/// Exit code telling the host that caches were cleared and it should reload
const EXIT_RELOAD: u8 = 10;

#[derive(Parser)]
#[command(name = "version-check")]
#[command(version, about = "Force a cache-clear-and-reload when the server runs a newer version")]
struct Cli {
    /// Also write logs to <data dir>/version-check.log
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compare the current version against the server manifest
    Check(CheckArgs),
    /// Print whether LATEST is newer than CURRENT
    Compare { latest: String, current: String },
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Base URL of the server hosting the manifest
    #[arg(long, value_name = "URL")]
    base_url: String,

    /// JSON file with check options (camelCase keys)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Version the client was built with
    #[arg(long, value_name = "VERSION")]
    current_version: Option<String>,

    /// Manifest path on the server
    #[arg(long, value_name = "PATH")]
    server_file_path: Option<String>,

    /// Directory whose subdirectories are the cache buckets
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,

    /// SQLite file holding the refresh marker
    #[arg(long, value_name = "PATH")]
    store: Option<PathBuf>,

    #[arg(long, value_name = "KEY", default_value = REFRESH_MARKER_KEY)]
    marker_key: String,

    #[arg(long, value_enum)]
    display: Option<DisplayArg>,

    #[arg(long, value_enum)]
    side: Option<SideArg>,

    #[arg(long, value_name = "CLASS")]
    class_name: Option<String>,

    /// Do not emit controller diagnostics
    #[arg(long)]
    no_logs: bool,

    /// Program (and arguments) run to reload instead of exiting with code 10
    #[arg(long, num_args = 1.., value_name = "CMD")]
    reload_command: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum DisplayArg {
    Default,
    None,
}

#[derive(Clone, Copy, ValueEnum)]
enum SideArg {
    Left,
    Right,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_file)?;

    match cli.command {
        Command::Compare { latest, current } => {
            println!("{}", greater_than(&latest, &current));
            Ok(ExitCode::SUCCESS)
        }
        Command::Check(args) => tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?
            .block_on(run_check(args)),
    }
}

/// Install the stderr subscriber and, if requested, a non-blocking file writer
fn init_tracing(log_file: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_env("VERSION_CHECK_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    if !log_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
        return Ok(None);
    }

    let log_path = config::log_path();
    let log_dir = log_path
        .parent()
        .context("log path has no parent directory")?;
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create {:?}", log_dir))?;

    let appender = tracing_appender::rolling::never(log_dir, "version-check.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .init();

    Ok(Some(guard))
}

fn load_config(args: &CheckArgs) -> anyhow::Result<CheckConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {:?}", path))?;
            serde_json::from_str::<CheckConfig>(&content)
                .with_context(|| format!("invalid config {:?}", path))?
        }
        None => {
            let Some(current_version) = &args.current_version else {
                bail!("--current-version is required when no --config is given");
            };
            CheckConfig::new(current_version.as_str())
        }
    };

    if let Some(current_version) = &args.current_version {
        config.current_version = current_version.clone();
    }
    if let Some(path) = &args.server_file_path {
        config.server_file_path = path.clone();
    }
    if let Some(display) = args.display {
        config.display = match display {
            DisplayArg::Default => DisplayMode::Default,
            DisplayArg::None => DisplayMode::Hidden,
        };
    }
    if let Some(side) = args.side {
        config.side = match side {
            SideArg::Left => Side::Left,
            SideArg::Right => Side::Right,
        };
    }
    if let Some(class_name) = &args.class_name {
        config.class_name = class_name.clone();
    }
    if args.no_logs {
        config.logs = false;
    }

    if config.current_version.is_empty() {
        bail!("current version must not be empty");
    }

    Ok(config)
}

async fn run_check(args: CheckArgs) -> anyhow::Result<ExitCode> {
    let config = load_config(&args)?;

    let source = HttpManifestSource::new(&args.base_url, &config.server_file_path)?
        .with_logs(config.logs);

    let store_path = args.store.clone().unwrap_or_else(config::store_path);
    if let Some(parent) = store_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {:?}", parent))?;
    }
    let store = SqliteStore::new(&store_path)?;
    let marker = RefreshMarker::with_key(store, args.marker_key.clone());

    let caches = DirCacheStorage::new(args.cache_dir.clone().unwrap_or_else(config::cache_dir));

    let reloader: Box<dyn Reloader> = match args.reload_command.split_first() {
        Some((program, rest)) => Box::new(CommandReloader::new(program.as_str(), rest.to_vec())),
        None => Box::new(SignalReloader::new()),
    };

    if config.logs {
        info!("Checking {} against {}", config.current_version, source.url());
    }

    let controller = StalenessController::new(config, source, marker, caches, reloader);
    let activation = controller.start().await;

    if let Some(overlay) = controller.overlay() {
        println!("{}", overlay.to_html());
    }

    let code = match activation {
        Activation::Completed(CheckState::Stale) => EXIT_RELOAD,
        Activation::Completed(CheckState::Error) => 1,
        _ => 0,
    };

    Ok(ExitCode::from(code))
}
