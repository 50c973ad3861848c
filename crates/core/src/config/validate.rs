use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Indexer URL is set and its timeout is positive
/// - Result cap is positive
/// - TMDB, when configured, has an API key
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.indexer.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "indexer.url cannot be empty".to_string(),
        ));
    }

    if config.indexer.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "indexer.timeout_secs must be greater than 0".to_string(),
        ));
    }

    if config.search.result_cap == 0 {
        return Err(ConfigError::ValidationError(
            "search.result_cap must be greater than 0".to_string(),
        ));
    }

    if let Some(tmdb) = &config.tmdb {
        if tmdb.api_key.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "tmdb.api_key cannot be empty when [tmdb] is configured".to_string(),
            ));
        }
        if tmdb.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "tmdb.timeout_secs must be greater than 0".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ServerConfig, TmdbConfig};
    use std::net::IpAddr;

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = Config {
            server: ServerConfig {
                host: "0.0.0.0".parse::<IpAddr>().unwrap(),
                port: 0,
            },
            ..Config::default()
        };
        let result = validate_config(&config);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_empty_indexer_url_fails() {
        let mut config = Config::default();
        config.indexer.url = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let mut config = Config::default();
        config.indexer.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_result_cap_fails() {
        let mut config = Config::default();
        config.search.result_cap = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_tmdb_empty_key_fails() {
        let config = Config {
            tmdb: Some(TmdbConfig {
                api_key: String::new(),
                base_url: "https://api.themoviedb.org/3".to_string(),
                timeout_secs: 10,
            }),
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
