mod file_config;

pub use file_config::FileConfig;

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_PATH: &str = "badaga_music.db";
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_MAX_UPLOAD_SIZE_MB: u64 = 100;

/// Values coming from the command line (and the `PORT` env var).
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub port: u16,
    pub db_path: PathBuf,
    pub upload_dir: PathBuf,
    pub logging_level: RequestsLoggingLevel,
    pub max_upload_size_mb: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            logging_level: RequestsLoggingLevel::default(),
            max_upload_size_mb: DEFAULT_MAX_UPLOAD_SIZE_MB,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub db_path: PathBuf,
    pub upload_dir: PathBuf,
    pub logging_level: RequestsLoggingLevel,
    pub max_upload_size_mb: u64,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);
        let db_path = file
            .db_path
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.db_path.clone());
        let upload_dir = file
            .upload_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.upload_dir.clone());

        let logging_level = match file.logging_level {
            Some(level) => parse_logging_level(&level)?,
            None => cli.logging_level.clone(),
        };

        let max_upload_size_mb = file.max_upload_size_mb.unwrap_or(cli.max_upload_size_mb);
        if max_upload_size_mb == 0 {
            bail!("max_upload_size_mb must be greater than zero");
        }

        if upload_dir.is_file() {
            bail!("upload_dir is not a directory: {:?}", upload_dir);
        }

        Ok(Self {
            port,
            db_path,
            upload_dir,
            logging_level,
            max_upload_size_mb,
        })
    }

    pub fn max_upload_size_bytes(&self) -> u64 {
        self.max_upload_size_mb * 1024 * 1024
    }
}

fn parse_logging_level(s: &str) -> Result<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true)
        .map_err(|_| anyhow::anyhow!("Unknown logging_level {:?}", s))
}
