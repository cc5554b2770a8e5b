use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("unknown FLAG_PROVIDER '{0}' (expected 'ofrep' or 'local')")]
    UnknownProvider(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// flagd over its HTTP evaluation API
    Ofrep,
    /// In-process rules from a flags file or the built-in set
    Local,
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ofrep" | "flagd" => Ok(ProviderKind::Ofrep),
            "local" => Ok(ProviderKind::Local),
            _ => Err(ConfigError::UnknownProvider(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlagsConfig {
    pub provider: ProviderKind,
    pub flagd_host: String,
    pub flagd_port: u16,
    pub flagd_tls: bool,
    pub timeout: Duration,
    pub flags_file: Option<PathBuf>,
}

impl FlagsConfig {
    pub fn ofrep_base_url(&self) -> String {
        let scheme = if self.flagd_tls { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.flagd_host, self.flagd_port)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub service_name: String,
    pub flags: FlagsConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv().is_ok();

        Self::from_vars(|name| env::var(name).ok())
    }

    /// Build from any variable lookup; unset or empty variables take their defaults
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let provider = match var("FLAG_PROVIDER") {
            Some(kind) => kind.parse()?,
            None => ProviderKind::Ofrep,
        };

        let flags = FlagsConfig {
            provider,
            flagd_host: var("FLAGD_HOST").unwrap_or_else(|| "localhost".to_string()),
            flagd_port: parse_or("FLAGD_PORT", var("FLAGD_PORT"), 8016, "a valid u16 number")?,
            flagd_tls: parse_or("FLAGD_TLS", var("FLAGD_TLS"), false, "true or false")?,
            timeout: Duration::from_millis(parse_or(
                "FLAGD_TIMEOUT_MS",
                var("FLAGD_TIMEOUT_MS"),
                500,
                "a number of milliseconds",
            )?),
            flags_file: var("FLAGS_FILE").map(PathBuf::from),
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or("PORT", var("PORT"), 8082, "a valid u16 number")?,
            service_name: var("SERVICE_NAME").unwrap_or_else(|| "fitflag-calories".to_string()),
            flags,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.addr(), "127.0.0.1:8082");
        assert_eq!(config.service_name, "fitflag-calories");
        assert_eq!(config.flags.provider, ProviderKind::Ofrep);
        assert_eq!(config.flags.ofrep_base_url(), "http://localhost:8016");
        assert_eq!(config.flags.timeout, Duration::from_millis(500));
        assert!(config.flags.flags_file.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "9000"),
            ("FLAG_PROVIDER", "local"),
            ("FLAGD_HOST", "flagd"),
            ("FLAGD_TLS", "true"),
            ("FLAGD_PORT", "443"),
            ("FLAGS_FILE", "flags.json"),
        ])
        .unwrap();

        assert_eq!(config.addr(), "0.0.0.0:9000");
        assert_eq!(config.flags.provider, ProviderKind::Local);
        assert_eq!(config.flags.ofrep_base_url(), "https://flagd:443");
        assert_eq!(config.flags.flags_file, Some(PathBuf::from("flags.json")));
    }

    #[test]
    fn test_empty_values_take_defaults() {
        let config = config_from(&[("PORT", ""), ("FLAG_PROVIDER", "  ")]).unwrap();
        assert_eq!(config.port, 8082);
        assert_eq!(config.flags.provider, ProviderKind::Ofrep);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            config_from(&[("PORT", "eighty")]),
            Err(ConfigError::Invalid { name: "PORT", .. })
        ));
        assert!(matches!(
            config_from(&[("FLAGD_TLS", "yes")]),
            Err(ConfigError::Invalid { name: "FLAGD_TLS", .. })
        ));
        assert!(matches!(
            config_from(&[("FLAG_PROVIDER", "launchdarkly")]),
            Err(ConfigError::UnknownProvider(_))
        ));
    }
}
