use serde::Deserialize;
use std::path::PathBuf;

use crate::recommender::{DEFAULT_TOP_N, MAX_TOP_N};

/// Server configuration loaded from `RECS_`-prefixed environment variables
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Directory holding the TMDB movies and credits CSV files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// `top_n` used when a request does not pass one
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,

    /// Vocabulary cap for the count vectorizer
    #[serde(default = "default_max_features")]
    pub max_features: usize,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data/tmdb")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_max_features() -> usize {
    pipeline::DEFAULT_MAX_FEATURES
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            host: default_host(),
            port: default_port(),
            default_top_n: default_top_n(),
            max_features: default_max_features(),
        }
    }
}

impl Config {
    /// Load configuration from the environment (and a `.env` file if present)
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from explicit key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::prefixed("RECS_")
            .from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !(1..=MAX_TOP_N).contains(&self.default_top_n) {
            anyhow::bail!(
                "Invalid config: RECS_DEFAULT_TOP_N must be between 1 and {}, got {}",
                MAX_TOP_N,
                self.default_top_n
            );
        }
        Ok(())
    }

    /// `host:port` for the TCP listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(vars(&[("PATH", "/usr/bin")])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.bind_addr(), "127.0.0.1:8000");
        assert_eq!(config.data_dir, PathBuf::from("data/tmdb"));
        assert_eq!(config.default_top_n, 5);
        assert_eq!(config.max_features, 5000);
    }

    #[test]
    fn test_prefixed_overrides() {
        let config = Config::from_vars(vars(&[
            ("RECS_DATA_DIR", "/srv/tmdb"),
            ("RECS_HOST", "0.0.0.0"),
            ("RECS_PORT", "9090"),
            ("RECS_DEFAULT_TOP_N", "10"),
            ("RECS_MAX_FEATURES", "2000"),
            ("PORT", "1"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/tmdb"));
        assert_eq!(config.bind_addr(), "0.0.0.0:9090");
        assert_eq!(config.default_top_n, 10);
        assert_eq!(config.max_features, 2000);
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_vars(vars(&[("RECS_PORT", "not-a-port")])).unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }

    #[test]
    fn test_default_top_n_out_of_range() {
        for value in ["0", "101"] {
            let err = Config::from_vars(vars(&[("RECS_DEFAULT_TOP_N", value)])).unwrap_err();
            assert!(err.to_string().contains("RECS_DEFAULT_TOP_N"), "{value}");
        }

        let config = Config::from_vars(vars(&[("RECS_DEFAULT_TOP_N", "100")])).unwrap();
        assert_eq!(config.default_top_n, MAX_TOP_N);
    }
}
