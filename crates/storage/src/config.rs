use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:4000/api";
pub const API_URL_ENV: &str = "FOLIO_API_URL";
pub const API_TIMEOUT_ENV: &str = "FOLIO_API_TIMEOUT_SECS";

/// Where the content API lives and how to talk to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Base URL, e.g. `http://localhost:4000/api`
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Ask for hidden projects and experience too (admin views)
    pub include_hidden: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(30),
            include_hidden: true,
        }
    }
}

impl StoreConfig {
    pub fn new(base_url: &str) -> Self {
        Self::default().base_url(base_url)
    }

    /// Reads `FOLIO_API_URL` and `FOLIO_API_TIMEOUT_SECS`, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config = config.base_url(&url);
            }
        }
        if let Some(secs) = std::env::var(API_TIMEOUT_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            config = config.timeout(Duration::from_secs(secs));
        }
        config
    }

    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn include_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = StoreConfig::new("https://api.site.dev/api/");
        assert_eq!(config.url("/hero"), "https://api.site.dev/api/hero");
    }

    #[test]
    fn defaults_match_local_backend() {
        let config = StoreConfig::default();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert!(config.include_hidden);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
