//! Client configuration

use std::path::PathBuf;
use std::time::Duration;

use shared::request::DEFAULT_LIMIT;

/// Configuration for connecting to the LPPM API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., "http://localhost:5000"); request paths carry `/api/...`
    pub base_url: String,

    /// Request timeout in seconds; `None` leaves the HTTP client default
    pub timeout: Option<u64>,

    /// Local storage file (tokens and session snapshot)
    pub storage_path: PathBuf,

    /// Page size used by freshly created collection stores
    pub page_size: u32,

    /// Log level for the console logger
    pub log_level: String,

    /// JSON log output
    pub log_json: bool,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
            storage_path: default_storage_path(),
            page_size: DEFAULT_LIMIT,
            log_level: "info".to_string(),
            log_json: false,
        }
    }

    /// Load from environment variables (and `.env`, when present)
    ///
    /// - `LPPM_API_URL`
    /// - `LPPM_STORAGE_PATH`
    /// - `LPPM_PAGE_SIZE`
    /// - `LPPM_TIMEOUT_SECS`
    /// - `LPPM_LOG_LEVEL`
    /// - `LPPM_LOG_JSON`
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv()
            && !e.not_found()
        {
            tracing::warn!(error = %e, "Failed to read .env file");
        }

        let mut config = Self::new(
            std::env::var("LPPM_API_URL").unwrap_or_else(|_| {
                tracing::debug!("LPPM_API_URL not set, using development default");
                "http://localhost:5000".to_string()
            }),
        );

        if let Ok(path) = std::env::var("LPPM_STORAGE_PATH")
            && !path.is_empty()
        {
            config.storage_path = PathBuf::from(path);
        }
        if let Some(size) = env_parse::<u32>("LPPM_PAGE_SIZE").filter(|s| *s > 0) {
            config.page_size = size;
        }
        config.timeout = env_parse("LPPM_TIMEOUT_SECS");
        if let Ok(level) = std::env::var("LPPM_LOG_LEVEL") {
            config.log_level = level;
        }
        config.log_json = env_parse("LPPM_LOG_JSON").unwrap_or(false);

        config
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = Some(seconds);
        self
    }

    /// Set the storage file
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self
    }

    /// Set the default page size
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size.max(1);
        self
    }

    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:5000")
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn default_storage_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".lppm")
        .join("storage.json")
}
