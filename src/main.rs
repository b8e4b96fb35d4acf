use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use badaga_music_server::config::{
    self, DEFAULT_DB_PATH, DEFAULT_MAX_UPLOAD_SIZE_MB, DEFAULT_PORT, DEFAULT_UPLOAD_DIR,
};
use badaga_music_server::server::{run_server, state::GuardedTrackStore, RequestsLoggingLevel};
use badaga_music_server::track_store::{SqliteTrackStore, UnavailableTrackStore};
use badaga_music_server::uploads::AudioUploads;
use badaga_music_server::ServerConfig;

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    if path_buf.is_absolute() {
        return Ok(path_buf);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(path_buf))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Path to the SQLite track database file.
    #[clap(long, value_parser = parse_path, default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    /// Directory uploaded audio files are stored in and served from.
    #[clap(long, value_parser = parse_path, default_value = DEFAULT_UPLOAD_DIR)]
    pub upload_dir: PathBuf,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Largest accepted upload, in megabytes.
    #[clap(long, default_value_t = DEFAULT_MAX_UPLOAD_SIZE_MB)]
    pub max_upload_size_mb: u64,
}

impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            port: args.port,
            db_path: args.db_path.clone(),
            upload_dir: args.upload_dir.clone(),
            logging_level: args.logging_level.clone(),
            max_upload_size_mb: args.max_upload_size_mb,
        }
    }
}

fn open_track_store(db_path: &Path) -> GuardedTrackStore {
    info!("Opening SQLite track database at {:?}...", db_path);
    match SqliteTrackStore::new(db_path) {
        Ok(store) => Arc::new(store),
        Err(err) => {
            // Every track request answers 500 until restarted with a working database
            error!("Could not open track database {:?}: {:#}", db_path, err);
            Arc::new(UnavailableTrackStore::new(format!("{:#}", err)))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = config::AppConfig::resolve(&cli_config, file_config)?;

    info!("Configuration loaded:");
    info!("  db_path: {:?}", app_config.db_path);
    info!("  upload_dir: {:?}", app_config.upload_dir);
    info!("  port: {}", app_config.port);
    info!("  max_upload_size_mb: {}", app_config.max_upload_size_mb);

    let track_store = open_track_store(&app_config.db_path);

    let uploads = AudioUploads::new(&app_config.upload_dir, app_config.max_upload_size_bytes());
    if let Err(err) = uploads.init().await {
        error!(
            "Could not create upload directory {:?}: {}",
            app_config.upload_dir, err
        );
    }

    run_server(ServerConfig::from(&app_config), track_store, uploads).await
}
