//! Process configuration, read once at startup from the environment.

use std::env;
use std::fmt;

const DEFAULT_TOKEN_TTL_HOURS: i64 = 12;
/// 366 days.
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 366;

/// The HMAC key used to sign bearer tokens.
///
/// `Debug` and `Display` are redacted so the key can sit inside `Config`
/// without ever reaching a log line.
#[derive(Clone)]
pub struct SigningSecret(String);

impl SigningSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("SigningSecret([redacted])")
    }
}

impl fmt::Display for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("[redacted]")
    }
}

/// Which repository implementation backs the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    Postgres { database_url: String },
    Memory,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => {
                write!(f, "{} has an invalid value: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub storage: Storage,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: SigningSecret,
    pub token_ttl: chrono::Duration,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, so tests never
    /// have to mutate the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage = match lookup("STORAGE").as_deref() {
            None | Some("postgres") => Storage::Postgres {
                database_url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            },
            Some("memory") => Storage::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "STORAGE",
                    value: other.to_string(),
                })
            }
        };

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let server_port = parse_or(&lookup, "SERVER_PORT", 8080u16)?;
        let ttl_hours = parse_or(&lookup, "TOKEN_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS)?;
        let token_ttl = Some(ttl_hours)
            .filter(|hours| (1..=MAX_TOKEN_TTL_HOURS).contains(hours))
            .and_then(chrono::Duration::try_hours)
            .ok_or_else(|| ConfigError::Invalid {
                key: "TOKEN_TTL_HOURS",
                value: ttl_hours.to_string(),
            })?;
        let bcrypt_cost = parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?;

        Ok(Self {
            storage,
            server_port,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            jwt_secret: SigningSecret::new(jwt_secret),
            token_ttl,
            bcrypt_cost,
        })
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.server_host.clone(), self.server_port)
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
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
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://test"),
            ("JWT_SECRET", "s3cret"),
        ]))
        .unwrap();

        assert_eq!(
            config.storage,
            Storage::Postgres {
                database_url: "postgres://test".into()
            }
        );
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.token_ttl, chrono::Duration::hours(12));
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(config.server_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_config_custom_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("STORAGE", "memory"),
            ("JWT_SECRET", "s3cret"),
            ("SERVER_PORT", "3000"),
            ("SERVER_HOST", "0.0.0.0"),
            ("TOKEN_TTL_HOURS", "1"),
            ("BCRYPT_COST", "4"),
        ]))
        .unwrap();

        assert_eq!(config.storage, Storage::Memory);
        assert_eq!(config.bind_address(), ("0.0.0.0".to_string(), 3000));
        assert_eq!(config.token_ttl, chrono::Duration::hours(1));
        assert_eq!(config.bcrypt_cost, 4);
    }

    #[test]
    fn test_config_rejects_missing_and_invalid_values() {
        assert_eq!(
            Config::from_lookup(lookup_from(&[("STORAGE", "memory")])).unwrap_err(),
            ConfigError::Missing("JWT_SECRET")
        );
        assert_eq!(
            Config::from_lookup(lookup_from(&[("JWT_SECRET", "x")])).unwrap_err(),
            ConfigError::Missing("DATABASE_URL")
        );
        assert_eq!(
            Config::from_lookup(lookup_from(&[
                ("STORAGE", "memory"),
                ("JWT_SECRET", "x"),
                ("SERVER_PORT", "eighty"),
            ]))
            .unwrap_err(),
            ConfigError::Invalid {
                key: "SERVER_PORT",
                value: "eighty".into()
            }
        );
        assert!(Config::from_lookup(lookup_from(&[
            ("STORAGE", "memory"),
            ("JWT_SECRET", "x"),
            ("TOKEN_TTL_HOURS", "0"),
        ]))
        .is_err());
    }

    #[test]
    fn test_token_ttl_bounds() {
        let with_ttl = |hours: &str| {
            Config::from_lookup(lookup_from(&[
                ("STORAGE", "memory"),
                ("JWT_SECRET", "x"),
                ("TOKEN_TTL_HOURS", hours),
            ]))
        };

        assert_eq!(
            with_ttl("8784").unwrap().token_ttl,
            chrono::Duration::hours(MAX_TOKEN_TTL_HOURS)
        );
        for hours in ["-1", "8785", "10000000000", "3000000000000000"] {
            assert_eq!(
                with_ttl(hours).unwrap_err(),
                ConfigError::Invalid {
                    key: "TOKEN_TTL_HOURS",
                    value: hours.into()
                }
            );
        }
    }

    #[test]
    fn test_secret_is_redacted() {
        let config = Config::from_lookup(lookup_from(&[
            ("STORAGE", "memory"),
            ("JWT_SECRET", "very-private-key"),
        ]))
        .unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("very-private-key"));
        assert!(rendered.contains("[redacted]"));
    }
}
