//! Database configuration loaded from the environment.
//!
//! | Variable         | Meaning                                          | Default            |
//! |------------------|--------------------------------------------------|--------------------|
//! | `DB_VENDOR`      | `memory` or `postgres`                           | `memory`           |
//! | `DB_HOST`        | Postgres connection URL (required for postgres)  | none               |
//! | `DB_LOGGING`     | `true` logs every SQL statement at `debug`       | `false`            |
//! | `DB_FILTER_MODE` | `case_insensitive` or `case_sensitive`           | `case_insensitive` |

use std::str::FromStr;

use anyhow::{Context, bail};

use catalog_category::FilterMode;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DbVendor {
    InMemory,
    Postgres,
}

impl FromStr for DbVendor {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> anyhow::Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "memory" | "in_memory" => Ok(DbVendor::InMemory),
            "postgres" | "postgresql" => Ok(DbVendor::Postgres),
            other => bail!("unsupported DB_VENDOR `{other}` (expected `memory` or `postgres`)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub vendor: DbVendor,
    pub host: Option<String>,
    pub logging: bool,
    pub filter_mode: FilterMode,
}

impl DbConfig {
    /// In-memory backend, no logging.
    pub fn in_memory() -> Self {
        Self {
            vendor: DbVendor::InMemory,
            host: None,
            logging: false,
            filter_mode: FilterMode::default(),
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`DbConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let vendor = match lookup("DB_VENDOR") {
            Some(raw) => raw.parse::<DbVendor>().context("invalid DB_VENDOR")?,
            None => DbVendor::InMemory,
        };

        let host = lookup("DB_HOST").filter(|h| !h.trim().is_empty());
        if vendor == DbVendor::Postgres && host.is_none() {
            bail!("DB_HOST must be set when DB_VENDOR=postgres");
        }

        let logging = lookup("DB_LOGGING").is_some_and(|v| v == "true");

        let filter_mode = match lookup("DB_FILTER_MODE").as_deref().map(str::trim) {
            None | Some("") | Some("case_insensitive") => FilterMode::CaseInsensitive,
            Some("case_sensitive") => FilterMode::CaseSensitive,
            Some(other) => bail!("unsupported DB_FILTER_MODE `{other}`"),
        };

        Ok(Self {
            vendor,
            host,
            logging,
            filter_mode,
        })
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}
