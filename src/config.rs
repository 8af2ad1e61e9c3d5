use std::env;

use anyhow::{Context, Result};

use crate::engine::DayBoundary;
use crate::model::catalog::Catalog;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,
    pub log_dir: String,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    // Credentials: argon2 PHC strings, never plain passwords
    pub operator_username: String,
    pub operator_password_hash: String,
    pub admin_username: String,
    pub admin_password_hash: String,

    pub day_boundary: DayBoundary,
    pub catalog: Catalog,
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed<T>(key: &str, default: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    or_default(key, default)
        .parse()
        .with_context(|| format!("{key} is not valid"))
}

/// Comma-separated list; blank entries dropped, entries upper-cased.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Catalog::default();
        let catalog = Catalog::new(
            env::var("PERSONAL_ITEMS")
                .map(|raw| parse_list(&raw))
                .unwrap_or(defaults.personal_items),
            env::var("TASKS")
                .map(|raw| parse_list(&raw))
                .unwrap_or(defaults.tasks),
        );

        let day_boundary = DayBoundary::parse(
            &or_default("DAY_UTC_OFFSET", "-05:00"),
            &or_default("DAY_ROLLOVER", "00:00"),
        )?;

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            access_token_ttl: parsed("ACCESS_TOKEN_TTL", "43200")?, // one shift, 12h
            log_dir: or_default("LOG_DIR", "logs"),

            rate_login_per_min: parsed("RATE_LOGIN_PER_MIN", "60")?,
            rate_protected_per_min: parsed("RATE_PROTECTED_PER_MIN", "1000")?,

            api_prefix: or_default("API_PREFIX", "/api"),

            operator_username: required("OPERATOR_USERNAME")?,
            operator_password_hash: required("OPERATOR_PASSWORD_HASH")?,
            admin_username: required("ADMIN_USERNAME")?,
            admin_password_hash: required("ADMIN_PASSWORD_HASH")?,

            day_boundary,
            catalog,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_parsing_trims_and_uppercases() {
        assert_eq!(
            parse_list(" inventario, ,Cajeros ,"),
            vec!["INVENTARIO".to_string(), "CAJEROS".to_string()]
        );
        assert!(parse_list("").is_empty());
    }
}
