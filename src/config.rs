use log::LevelFilter;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
/// Requests wait for the service indefinitely unless a timeout is set.
pub const DEFAULT_TIMEOUT_SECS: u64 = 0;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Per-request timeout in seconds; 0 disables it.
    pub timeout_secs: u64,
    pub log_level: LevelFilter,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_level: LevelFilter::Info,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_log_level(mut self, log_level: LevelFilter) -> Self {
        self.log_level = log_level;
        self
    }

    /// Joins `api_path` onto the base URL, tolerating slashes on either side.
    pub fn api_path(&self, api_path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if api_path.starts_with('/') {
            format!("{}{}", base, api_path)
        } else {
            format!("{}/{}", base, api_path)
        }
    }
}
