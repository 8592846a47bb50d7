use core_config::{env_or_default, env_parse_or, ConfigError, FromEnv};

/// Qdrant connection configuration.
#[derive(Debug, Clone)]
pub struct QdrantConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl FromEnv for QdrantConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env_or_default("QDRANT_URL", "http://localhost:6334"),
            api_key: std::env::var("QDRANT_API_KEY").ok(),
            timeout_secs: env_parse_or("QDRANT_TIMEOUT_SECS", 10)?,
        })
    }
}

impl Default for QdrantConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6334".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_defaults() {
        temp_env::with_vars_unset(["QDRANT_URL", "QDRANT_API_KEY", "QDRANT_TIMEOUT_SECS"], || {
            let config = QdrantConfig::from_env().unwrap();
            assert_eq!(config.url, "http://localhost:6334");
            assert!(config.api_key.is_none());
            assert_eq!(config.timeout_secs, 10);
        });
    }

    #[test]
    fn from_env_overrides() {
        temp_env::with_vars(
            [
                ("QDRANT_URL", Some("http://qdrant:6334")),
                ("QDRANT_API_KEY", Some("secret")),
                ("QDRANT_TIMEOUT_SECS", Some("30")),
            ],
            || {
                let config = QdrantConfig::from_env().unwrap();
                assert_eq!(config.url, "http://qdrant:6334");
                assert_eq!(config.api_key.as_deref(), Some("secret"));
                assert_eq!(config.timeout_secs, 30);
            },
        );
    }

    #[test]
    fn from_env_rejects_bad_timeout() {
        temp_env::with_var("QDRANT_TIMEOUT_SECS", Some("soon"), || {
            assert!(QdrantConfig::from_env().is_err());
        });
    }
}
