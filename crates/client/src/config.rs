/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API server, without the `/api` suffix.
    pub api_url: String,
    /// Per-request timeout in seconds (default: `30`).
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `CAMPUS_API_URL`          | `http://localhost:3000` |
    /// | `CAMPUS_API_TIMEOUT_SECS` | `30`                    |
    pub fn from_env() -> Self {
        let api_url =
            std::env::var("CAMPUS_API_URL").unwrap_or_else(|_| "http://localhost:3000".into());

        let timeout_secs: u64 = std::env::var("CAMPUS_API_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("CAMPUS_API_TIMEOUT_SECS must be a valid u64");

        Self::new(api_url).with_timeout(timeout_secs)
    }

    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            timeout_secs: 30,
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}
