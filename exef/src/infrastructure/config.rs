// /////////////////////////////////////////////////////////////////////////////
// exef
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Settings
//!
//! `EXEF_`-prefixed environment configuration, loaded through the `config`
//! crate. `JWT_*` and SMTP fields are kept as opaque passthrough strings:
//! auth and email delivery are out of scope here, but a hypothetical HTTP
//! layer would still need these values threaded through from the
//! environment.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Mirrors `StorageMode` but as a plain bool since it comes straight off
    /// the environment (spec.md §4.2 "Two modes").
    #[serde(default)]
    pub use_entity_db: bool,

    #[serde(default = "default_entity_db_dir")]
    pub entity_db_dir: PathBuf,

    /// `{nip}`-templated file name, e.g. `"{nip}.db"`.
    #[serde(default = "default_entity_db_path_template")]
    pub entity_db_path_template: String,
}

fn default_database_url() -> String {
    "sqlite://exef.db".to_string()
}

fn default_entity_db_dir() -> PathBuf {
    PathBuf::from("./entity_databases")
}

fn default_entity_db_path_template() -> String {
    "{nip}.db".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncSettings {
    pub remote_sync_url: Option<String>,
    #[serde(default)]
    pub sync_enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// Opaque passthrough — auth/session issuance is out of scope.
    pub jwt_secret: Option<String>,
    #[serde(default = "default_jwt_algorithm")]
    pub jwt_algorithm: String,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_jwt_algorithm() -> String {
    "HS256".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(flatten)]
    pub storage: StorageSettings,
    #[serde(flatten)]
    pub sync: SyncSettings,
    #[serde(flatten)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub smtp: SmtpSettings,

    /// Adapter-fetch concurrency; overridable from the CLI's `--io-threads`.
    #[serde(default = "default_adapter_concurrency")]
    pub adapter_concurrency: usize,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: None,
            port: None,
            username: None,
            password: None,
            from_address: None,
        }
    }
}

fn default_adapter_concurrency() -> usize {
    4
}

impl Settings {
    /// Loads configuration from `EXEF_`-prefixed environment variables,
    /// optionally overlaid with a config file (the CLI's `--config` flag).
    /// Nested fields use `__` as the env-var separator, e.g.
    /// `EXEF_SMTP__HOST`.
    pub fn load(config_file: Option<&std::path::Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = config_file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(Environment::with_prefix("EXEF").separator("__").try_parsing(true));

        builder.build()?.try_deserialize()
    }

    /// Resolves the per-entity SQLite file path for a given tax id, per the
    /// `{nip}` substitution spec.md §6 describes.
    pub fn entity_db_path(&self, tax_id: &str) -> PathBuf {
        let filename = self.storage.entity_db_path_template.replace("{nip}", tax_id);
        self.storage.entity_db_dir.join(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_storage_settings_are_shared_mode() {
        std::env::remove_var("EXEF_USE_ENTITY_DB");
        let settings = Settings::load(None).expect("defaults should load without any env vars set");
        assert!(!settings.storage.use_entity_db);
        assert_eq!(settings.storage.database_url, "sqlite://exef.db");
    }

    #[test]
    fn entity_db_path_substitutes_nip() {
        let settings = Settings::load(None).unwrap();
        let path = settings.entity_db_path("5213003700");
        assert_eq!(path.file_name().unwrap().to_str().unwrap(), "5213003700.db");
    }
}
