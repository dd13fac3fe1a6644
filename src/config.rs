/*
 * Responsibility
 * - 環境変数から起動設定を読み込む (PORT, DATABASE_URL, JWT secret など)
 * - 必須値が欠けていれば起動失敗
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::services::auth::access_jwt::MAX_LEEWAY_SECONDS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,
    pub database_max_connections: u32,

    // HMAC secret the access tokens are signed with. Never logged.
    pub jwt_access_secret: String,
    pub access_token_leeway_seconds: u64,

    pub request_timeout: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("database_max_connections", &self.database_max_connections)
            .field("access_token_leeway_seconds", &self.access_token_leeway_seconds)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

// Absent key -> default. Present but unparsable -> Invalid, never silently defaulted.
fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = parse_or(&lookup, "PORT", 3000)?;

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = lookup("APP_ENV")
            .map(|raw| AppEnv::parse(&raw))
            .unwrap_or(AppEnv::Development);

        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let database_max_connections: u32 =
            parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?;
        if database_max_connections == 0 {
            return Err(ConfigError::Invalid("DATABASE_MAX_CONNECTIONS"));
        }

        let jwt_access_secret =
            lookup("JWT_ACCESS_SECRET").ok_or(ConfigError::Missing("JWT_ACCESS_SECRET"))?;
        if jwt_access_secret.is_empty() {
            return Err(ConfigError::Invalid("JWT_ACCESS_SECRET"));
        }

        // no clock skew tolerance unless configured
        let access_token_leeway_seconds: u64 = parse_or(&lookup, "ACCESS_TOKEN_LEEWAY_SECONDS", 0)?;
        if access_token_leeway_seconds > MAX_LEEWAY_SECONDS {
            return Err(ConfigError::Invalid("ACCESS_TOKEN_LEEWAY_SECONDS"));
        }

        let request_timeout_seconds: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECONDS", 30)?;
        if request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"));
        }
        let request_timeout = Duration::from_secs(request_timeout_seconds);

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            jwt_access_secret,
            access_token_leeway_seconds,
            request_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_optional_keys_are_absent() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/app"),
            ("JWT_ACCESS_SECRET", "s3cret"),
        ]))
        .unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.access_token_leeway_seconds, 0);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn secret_is_required_and_non_empty() {
        let missing = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x")]));
        assert_eq!(missing.unwrap_err(), ConfigError::Missing("JWT_ACCESS_SECRET"));

        let empty = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_ACCESS_SECRET", ""),
        ]));
        assert_eq!(empty.unwrap_err(), ConfigError::Invalid("JWT_ACCESS_SECRET"));
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("PORT", "http"),
            ("DATABASE_URL", "postgres://x"),
            ("JWT_ACCESS_SECRET", "s3cret"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("PORT"));
    }

    fn with_required(extra: &[(&'static str, &'static str)]) -> Result<Config, ConfigError> {
        let mut pairs = vec![
            ("DATABASE_URL", "postgres://x"),
            ("JWT_ACCESS_SECRET", "s3cret"),
        ];
        pairs.extend_from_slice(extra);
        Config::from_lookup(lookup_from(&pairs))
    }

    #[test]
    fn leeway_is_bounded() {
        let config = with_required(&[("ACCESS_TOKEN_LEEWAY_SECONDS", "86400")]).unwrap();
        assert_eq!(config.access_token_leeway_seconds, MAX_LEEWAY_SECONDS);

        for raw in ["86401", "18446744073709551615"] {
            let err = with_required(&[("ACCESS_TOKEN_LEEWAY_SECONDS", raw)]).unwrap_err();
            assert_eq!(err, ConfigError::Invalid("ACCESS_TOKEN_LEEWAY_SECONDS"), "{raw}");
        }
    }

    #[test]
    fn mistyped_numbers_are_rejected_instead_of_defaulted() {
        let cases = [
            ("ACCESS_TOKEN_LEEWAY_SECONDS", "sixty"),
            ("ACCESS_TOKEN_LEEWAY_SECONDS", "-1"),
            ("REQUEST_TIMEOUT_SECONDS", "30s"),
            ("REQUEST_TIMEOUT_SECONDS", "0"),
            ("DATABASE_MAX_CONNECTIONS", "many"),
            ("DATABASE_MAX_CONNECTIONS", "0"),
        ];

        for (key, raw) in cases {
            let err = with_required(&[(key, raw)]).unwrap_err();
            assert_eq!(err, ConfigError::Invalid(key), "{key}={raw}");
        }
    }

    #[test]
    fn explicit_numbers_override_defaults() {
        let config = with_required(&[
            ("PORT", "8080"),
            ("ACCESS_TOKEN_LEEWAY_SECONDS", " 30 "),
            ("REQUEST_TIMEOUT_SECONDS", "5"),
            ("DATABASE_MAX_CONNECTIONS", "20"),
        ])
        .unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.access_token_leeway_seconds, 30);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.database_max_connections, 20);
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = Config::from_lookup(lookup_from(&[
            ("APP_ENV", "prod"),
            ("DATABASE_URL", "postgres://user:pw@db/app"),
            ("JWT_ACCESS_SECRET", "do-not-print"),
        ]))
        .unwrap();

        let out = format!("{config:?}");
        assert!(config.app_env.is_production());
        assert!(!out.contains("do-not-print"));
        assert!(!out.contains("user:pw"));
    }
}
