use std::time::Duration;

use crate::errors::StorefrontError;

const DEFAULT_USER_AGENT: &str = "Showroom/0.1 (headless storefront engine)";

/// How long free-text input must stay unchanged before it commits to a fetch.
const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// Main engine configuration. Shared by the engine, its searchers and the stores.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// User agent string for HTTP requests
    pub user_agent: String,
    /// Settle window applied to free-text search input
    pub debounce_window: Duration,
    /// How many recently-viewed entries a surface displays
    pub recent_display_limit: usize,
    /// Per-request timeout for catalog calls
    pub request_timeout: Duration,
    /// Maximum number of concurrently open searchers
    pub max_searchers: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
            recent_display_limit: 4,
            request_timeout: Duration::from_secs(10),
            max_searchers: 8,
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }
}

/// Builder over [`EngineConfig`] that validates the result.
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn debounce_window(mut self, window: Duration) -> Self {
        self.config.debounce_window = window;
        self
    }

    pub fn recent_display_limit(mut self, limit: usize) -> Self {
        self.config.recent_display_limit = limit;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn max_searchers(mut self, max: usize) -> Self {
        self.config.max_searchers = max;
        self
    }

    pub fn build(self) -> Result<EngineConfig, StorefrontError> {
        if self.config.user_agent.trim().is_empty() {
            return Err(StorefrontError::InvalidConfig(
                "user agent must not be empty".into(),
            ));
        }
        if self.config.recent_display_limit == 0 {
            return Err(StorefrontError::InvalidConfig(
                "recent display limit must be at least 1".into(),
            ));
        }
        if self.config.request_timeout.is_zero() {
            return Err(StorefrontError::InvalidConfig(
                "request timeout must be non-zero".into(),
            ));
        }
        if self.config.max_searchers == 0 {
            return Err(StorefrontError::InvalidConfig(
                "at least one searcher must be allowed".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::builder().build().unwrap();
        assert_eq!(config.debounce_window, Duration::from_millis(500));
        assert_eq!(config.recent_display_limit, 4);
    }

    #[test]
    fn builder_rejects_empty_user_agent() {
        let err = EngineConfig::builder().user_agent("  ").build();
        assert!(matches!(err, Err(StorefrontError::InvalidConfig(_))));
    }

    #[test]
    fn builder_rejects_zero_searchers() {
        let err = EngineConfig::builder().max_searchers(0).build();
        assert!(matches!(err, Err(StorefrontError::InvalidConfig(_))));
    }
}
