//! Service configuration read from the environment.
//! A `.env` file in the working directory is honoured by `main`.
// region:    --- Imports
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use thiserror::Error;

// endregion: --- Imports

// region:    --- Defaults
const DEFAULT_LISTEN_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 3000);
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_KAFKA_BROKERS: &str = "localhost:9092";
const DEFAULT_EVENTS_TOPIC: &str = "lot-events";
const DEFAULT_TENANT: i64 = 1;
/// R$ 1,00
const DEFAULT_BID_INCREMENT_CENTS: i64 = 100;
const DEFAULT_MAX_INSTALLMENTS: u32 = 12;

// endregion: --- Defaults

// region:    --- Errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value `{value}`")]
    Invalid { key: &'static str, value: String },
}

// endregion: --- Errors

// region:    --- Config
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    pub db_max_connections: u32,
    /// Drop and recreate every table on startup.
    pub db_reset: bool,
    pub kafka_brokers: String,
    pub events_topic: String,
    pub bidding: BiddingSettings,
}

/// Knobs consumed by the command handlers, kept apart so tests can build them
/// without a database URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BiddingSettings {
    pub default_tenant_id: i64,
    pub default_bid_increment: i64,
    pub max_installments: u32,
}

impl Default for BiddingSettings {
    fn default() -> Self {
        Self {
            default_tenant_id: DEFAULT_TENANT,
            default_bid_increment: DEFAULT_BID_INCREMENT_CENTS,
            max_installments: DEFAULT_MAX_INSTALLMENTS,
        }
    }
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let bidding = BiddingSettings {
            default_tenant_id: parse_or(&lookup, "DEFAULT_TENANT_ID", DEFAULT_TENANT)?,
            default_bid_increment: parse_or(
                &lookup,
                "DEFAULT_BID_INCREMENT",
                DEFAULT_BID_INCREMENT_CENTS,
            )?,
            max_installments: parse_or(&lookup, "MAX_INSTALLMENTS", DEFAULT_MAX_INSTALLMENTS)?,
        };
        if bidding.default_bid_increment <= 0 {
            return Err(ConfigError::Invalid {
                key: "DEFAULT_BID_INCREMENT",
                value: bidding.default_bid_increment.to_string(),
            });
        }
        if bidding.max_installments == 0 {
            return Err(ConfigError::Invalid {
                key: "MAX_INSTALLMENTS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            database_url,
            listen_addr: parse_or(&lookup, "LISTEN_ADDR", DEFAULT_LISTEN_ADDR)?,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            db_reset: parse_or(&lookup, "DB_RESET", false)?,
            kafka_brokers: lookup("KAFKA_BROKERS")
                .unwrap_or_else(|| DEFAULT_KAFKA_BROKERS.to_string()),
            events_topic: lookup("EVENTS_TOPIC")
                .unwrap_or_else(|| DEFAULT_EVENTS_TOPIC.to_string()),
            bidding,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}

// endregion: --- Config

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x")])).unwrap();
        assert_eq!(config.listen_addr.port(), 3000);
        assert_eq!(config.db_max_connections, 5);
        assert!(!config.db_reset);
        assert_eq!(config.events_topic, "lot-events");
        assert_eq!(config.bidding, BiddingSettings::default());
    }

    #[test]
    fn missing_database_url_is_reported() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("DEFAULT_BID_INCREMENT", "ten"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "DEFAULT_BID_INCREMENT",
                ..
            }
        ));

        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("DEFAULT_BID_INCREMENT", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("LISTEN_ADDR", "127.0.0.1:8088"),
            ("DB_RESET", "true"),
            ("DEFAULT_TENANT_ID", "7"),
            ("MAX_INSTALLMENTS", "6"),
        ]))
        .unwrap();
        assert_eq!(config.listen_addr.port(), 8088);
        assert!(config.db_reset);
        assert_eq!(config.bidding.default_tenant_id, 7);
        assert_eq!(config.bidding.max_installments, 6);
    }
}
