use std::fmt;

use anyhow::Context;
use serde::Deserialize;

#[derive(Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("ttl_minutes", &self.ttl_minutes)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Postgres connection string. `None` selects the in-memory user store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }

        let jwt = JwtConfig {
            secret,
            issuer: var("JWT_ISSUER").unwrap_or_else(|| "auth-api".into()),
            audience: var("JWT_AUDIENCE").unwrap_or_else(|| "auth-api-users".into()),
            ttl_minutes: parse_or(&var, "JWT_TTL_MINUTES", 60 * 24)?,
        };
        if jwt.ttl_minutes <= 0 {
            anyhow::bail!("JWT_TTL_MINUTES must be positive");
        }

        let port = match var("APP_PORT").or_else(|| var("PORT")) {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("invalid port: {raw}"))?,
            None => 8080,
        };

        Ok(Self {
            database_url: var("DATABASE_URL").filter(|v| !v.trim().is_empty()),
            db_max_connections: parse_or(&var, "DB_MAX_CONNECTIONS", 10)?,
            host: var("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            request_timeout_secs: parse_or(&var, "REQUEST_TIMEOUT_SECS", 30)?,
            jwt,
        })
    }
}

fn parse_or<F, T>(var: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {raw}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let cfg = AppConfig::from_vars(lookup(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(cfg.database_url, None);
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.db_max_connections, 10);
        assert_eq!(cfg.request_timeout_secs, 30);
        assert_eq!(cfg.jwt.ttl_minutes, 1440);
        assert_eq!(cfg.jwt.issuer, "auth-api");
    }

    #[test]
    fn missing_or_blank_secret_is_rejected() {
        assert!(AppConfig::from_vars(lookup(&[])).is_err());
        assert!(AppConfig::from_vars(lookup(&[("JWT_SECRET", "  ")])).is_err());
    }

    #[test]
    fn port_falls_back_to_plain_port_variable() {
        let cfg =
            AppConfig::from_vars(lookup(&[("JWT_SECRET", "x"), ("PORT", "5000")])).unwrap();
        assert_eq!(cfg.port, 5000);

        let cfg = AppConfig::from_vars(lookup(&[
            ("JWT_SECRET", "x"),
            ("PORT", "5000"),
            ("APP_PORT", "9000"),
        ]))
        .unwrap();
        assert_eq!(cfg.port, 9000);
    }

    #[test]
    fn invalid_numbers_are_errors() {
        let err = AppConfig::from_vars(lookup(&[
            ("JWT_SECRET", "x"),
            ("JWT_TTL_MINUTES", "soon"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("JWT_TTL_MINUTES"));

        assert!(AppConfig::from_vars(lookup(&[
            ("JWT_SECRET", "x"),
            ("JWT_TTL_MINUTES", "0"),
        ]))
        .is_err());
    }

    #[test]
    fn debug_output_hides_secret() {
        let cfg = AppConfig::from_vars(lookup(&[("JWT_SECRET", "top-secret-value")])).unwrap();
        let printed = format!("{cfg:?}");
        assert!(!printed.contains("top-secret-value"));
        assert!(printed.contains("<redacted>"));
    }
}
