//! CLI configuration.

/// Default Keepsake backend URL (can be overridden at compile time via
/// KEEPSAKE_API_URL env var).
pub const DEFAULT_API_URL: &str = match option_env!("KEEPSAKE_API_URL") {
    Some(url) => url,
    None => "https://api.keepsake.app",
};

/// Default identity provider frontend API URL (can be overridden at
/// compile time via KEEPSAKE_IDENTITY_URL env var).
pub const DEFAULT_IDENTITY_URL: &str = match option_env!("KEEPSAKE_IDENTITY_URL") {
    Some(url) => url,
    None => "https://identity.keepsake.app",
};

/// Default identity publishable key (public, safe to expose; can be
/// overridden at compile time via KEEPSAKE_IDENTITY_KEY env var).
pub const DEFAULT_IDENTITY_KEY: &str = match option_env!("KEEPSAKE_IDENTITY_KEY") {
    Some(key) => key,
    None => "pk_test_placeholder",
};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Resolved CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Keepsake backend base URL.
    pub api_url: String,
    /// Identity provider frontend API URL.
    pub identity_url: String,
    /// Identity provider publishable key.
    pub identity_key: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            identity_url: DEFAULT_IDENTITY_URL.to_string(),
            identity_key: DEFAULT_IDENTITY_KEY.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Compile-time defaults overridden by the runtime environment.
    pub fn new() -> Self {
        let mut config = Self::default();
        config.load_from_env();
        config
    }

    fn load_from_env(&mut self) {
        if let Ok(url) = std::env::var("KEEPSAKE_API_URL") {
            self.api_url = url;
        }
        if let Ok(url) = std::env::var("KEEPSAKE_IDENTITY_URL") {
            self.identity_url = url;
        }
        if let Ok(key) = std::env::var("KEEPSAKE_IDENTITY_KEY") {
            self.identity_key = key;
        }
        if let Ok(level) = std::env::var("KEEPSAKE_LOG_LEVEL") {
            self.log_level = level;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_nonempty() {
        let config = Config::default();
        assert!(!config.api_url.is_empty());
        assert!(!config.identity_url.is_empty());
        assert!(!config.identity_key.is_empty());
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
    }
}
