//! Server configuration from environment variables

use anyhow::{bail, Context};
use pulsedb_core::config::{DEFAULT_PARTITIONS_PATH, DEFAULT_PARTITION_SIZE_SECS};
use std::path::PathBuf;

const ENV_PARTITION_SIZE: &str = "PARTITION_SIZE_IN_SEC";
const ENV_PARTITIONS_PATH: &str = "WAL_PARTITIONS_PATH";
const ENV_PORT: &str = "PORT";

const DEFAULT_LISTEN: &str = ":9201";

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// WAL partition window length in seconds
    pub partition_size_secs: i64,
    /// Directory for WAL partition files
    pub partitions_path: PathBuf,
    /// host:port listen address; a leading colon binds all interfaces
    pub listen_addr: String,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an injected variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let partition_size_secs = match lookup(ENV_PARTITION_SIZE) {
            Some(raw) => raw
                .parse::<i64>()
                .with_context(|| format!("{ENV_PARTITION_SIZE} must be an integer, got {raw:?}"))?,
            None => DEFAULT_PARTITION_SIZE_SECS,
        };
        if partition_size_secs <= 0 {
            bail!("{ENV_PARTITION_SIZE} must be positive, got {partition_size_secs}");
        }

        let partitions_path = lookup(ENV_PARTITIONS_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PARTITIONS_PATH));

        let listen_addr = normalize_listen_addr(
            &lookup(ENV_PORT).unwrap_or_else(|| DEFAULT_LISTEN.to_string()),
        );

        Ok(Self {
            partition_size_secs,
            partitions_path,
            listen_addr,
        })
    }
}

/// A bare `:port` listen string binds all interfaces
fn normalize_listen_addr(addr: &str) -> String {
    if let Some(port) = addr.strip_prefix(':') {
        format!("0.0.0.0:{port}")
    } else {
        addr.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.partition_size_secs, 30);
        assert_eq!(config.partitions_path, PathBuf::from("waldata"));
        assert_eq!(config.listen_addr, "0.0.0.0:9201");
    }

    #[test]
    fn test_explicit_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("PARTITION_SIZE_IN_SEC", "5"),
            ("WAL_PARTITIONS_PATH", "/tmp/wal"),
            ("PORT", "127.0.0.1:9999"),
        ]))
        .unwrap();

        assert_eq!(config.partition_size_secs, 5);
        assert_eq!(config.partitions_path, PathBuf::from("/tmp/wal"));
        assert_eq!(config.listen_addr, "127.0.0.1:9999");
    }

    #[test]
    fn test_bare_port_binds_all_interfaces() {
        let config = Config::from_lookup(lookup_from(&[("PORT", ":8086")])).unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:8086");
    }

    #[test]
    fn test_invalid_partition_size_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("PARTITION_SIZE_IN_SEC", "abc")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("PARTITION_SIZE_IN_SEC", "0")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("PARTITION_SIZE_IN_SEC", "-4")])).is_err());
    }
}
