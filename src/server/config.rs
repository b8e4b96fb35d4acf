use super::RequestsLoggingLevel;
use crate::config::{AppConfig, DEFAULT_MAX_UPLOAD_SIZE_MB, DEFAULT_PORT};

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    /// Upper bound for a whole request body, enforced by the router.
    pub max_upload_size_bytes: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: DEFAULT_PORT,
            max_upload_size_bytes: DEFAULT_MAX_UPLOAD_SIZE_MB * 1024 * 1024,
        }
    }
}

impl From<&AppConfig> for ServerConfig {
    fn from(config: &AppConfig) -> Self {
        ServerConfig {
            requests_logging_level: config.logging_level.clone(),
            port: config.port,
            max_upload_size_bytes: config.max_upload_size_bytes(),
        }
    }
}
