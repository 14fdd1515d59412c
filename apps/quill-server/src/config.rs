//! Application configuration loaded from environment variables.

use std::env;

use quill_infra::{DatabaseConfig, JwtConfig};

/// Deployment environment. Controls how much error detail reaches clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// `APP_ENV`, falling back to `RUST_ENV`. Anything other than a
    /// development value means production.
    pub fn from_env() -> Self {
        let value = env::var("APP_ENV").or_else(|_| env::var("RUST_ENV"));
        Self::parse(value.as_deref().unwrap_or(""))
    }

    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Environment::Development,
            _ => Environment::Production,
        }
    }

    pub fn is_development(&self) -> bool {
        *self == Environment::Development
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    /// Mark the auth cookie `Secure`.
    pub cookie_secure: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        let defaults = DatabaseConfig::default();

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL").unwrap_or(defaults.url),
            max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(defaults.max_connections),
            min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(defaults.min_connections),
            auto_migrate: parse_flag("DB_AUTO_MIGRATE").unwrap_or(defaults.auto_migrate),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            environment,
            database,
            jwt: JwtConfig::from_env(environment == Environment::Production),
            cookie_secure: parse_flag("AUTH_COOKIE_SECURE").unwrap_or(false),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

fn parse_flag(key: &str) -> Option<bool> {
    env::var(key)
        .ok()
        .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "false" | "0" | "no" | "off"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("development"), Environment::Development);
        assert_eq!(Environment::parse("Dev"), Environment::Development);
        assert_eq!(Environment::parse("production"), Environment::Production);
        assert_eq!(Environment::parse("staging"), Environment::Production);
        assert_eq!(Environment::parse(""), Environment::Production);
    }
}
