use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::source::PayloadSource;

const DEFAULT_SOURCE: &str = "analytics.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub source: PayloadSource,
    pub upload_tick: Duration,
    pub export_dir: PathBuf,
    pub http_timeout: Duration,
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Reads `.env.local`, `.env` and the process environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");

        let source = env::var("MATCHLENS_SOURCE")
            .ok()
            .filter(|val| !val.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SOURCE.to_string());
        let upload_tick = env::var("MATCHLENS_UPLOAD_TICK_MS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(60)
            .clamp(10, 1000);
        let export_dir = env::var("MATCHLENS_EXPORT_DIR")
            .ok()
            .filter(|val| !val.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let http_timeout = env::var("MATCHLENS_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(10)
            .max(1);
        let log_file = env::var("MATCHLENS_LOG_FILE")
            .ok()
            .filter(|val| !val.trim().is_empty())
            .map(PathBuf::from);

        Self {
            source: PayloadSource::parse(&source),
            upload_tick: Duration::from_millis(upload_tick),
            export_dir,
            http_timeout: Duration::from_secs(http_timeout),
            log_file,
        }
    }
}
