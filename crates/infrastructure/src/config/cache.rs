//! Response cache configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Forecast response cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Lifetime of a cached forecast table in seconds (default: 10 minutes)
    #[serde(default = "default_response_ttl")]
    pub ttl_secs: u64,
}

const fn default_response_ttl() -> u64 {
    10 * 60
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_response_ttl(),
        }
    }
}

impl CacheConfig {
    /// TTL as a [`Duration`]
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ttl_is_ten_minutes() {
        assert_eq!(CacheConfig::default().ttl(), Duration::from_secs(600));
    }

    #[test]
    fn ttl_override() {
        let config: CacheConfig = serde_json::from_str(r#"{"ttl_secs": 30}"#).unwrap();
        assert_eq!(config.ttl_secs, 30);
    }
}
