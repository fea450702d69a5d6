// /////////////////////////////////////////////////////////////////////////////
// exef
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Concrete import/export adapters and the tag→constructor registry
//! (spec.md §4.3), grounded on
//! `original_source/exef3/backend/app/adapters/registry.py`'s
//! `IMPORT_ADAPTERS`/`EXPORT_ADAPTERS` dictionaries.

mod bank;
mod csv_columns;
mod csv_import;
mod email;
mod export_comarch;
mod export_csv;
mod export_enova;
mod export_jpk;
mod export_symfonia;
mod export_wfirma;
mod export_xml;
mod ksef;
#[cfg(feature = "mock-fallback")]
mod mock_fallback;
mod passive;

pub use bank::BankColumnAliases;
pub use csv_import::parse_csv_text;
pub use email::{MailAttachment, MailMessage, MailboxClient, UnimplementedMailboxClient};
#[cfg(feature = "mock-fallback")]
pub use mock_fallback::MockFallbackImportAdapter;

use bank::BankStatementAdapter;
use csv_import::CsvImportAdapter;
use email::EmailImportAdapter;
use exef_domain::services::adapter_contract::{AdapterConfig, ExportAdapter, ImportAdapter};
use exef_domain::FlowError;
use export_comarch::ComarchExportAdapter;
use export_csv::CsvExportAdapter;
use export_enova::EnovaExportAdapter;
use export_jpk::JpkPkpirExportAdapter;
use export_symfonia::SymfoniaExportAdapter;
use export_wfirma::WfirmaExportAdapter;
use ksef::KsefImportAdapter;
use passive::PassiveImportAdapter;
use std::sync::Arc;

/// Every registered import tag (spec.md §4.3).
pub const IMPORT_TAGS: &[&str] = &["email", "ksef", "csv", "manual", "upload", "webhook", "bank", "bank_ing", "bank_mbank", "bank_pko", "bank_santander", "bank_pekao"];

/// Every registered export tag (spec.md §4.3).
pub const EXPORT_TAGS: &[&str] = &["wfirma", "jpk_pkpir", "comarch", "symfonia", "enova", "csv"];

/// Builds the import adapter registered for `tag`, or `None` for an
/// unrecognised tag. The mailbox client behind `email` is always the
/// production stand-in here; tests inject a fake directly through
/// [`email::EmailImportAdapter::new`].
pub fn build_import_adapter(tag: &str, config: &AdapterConfig) -> Result<Box<dyn ImportAdapter>, FlowError> {
    match tag {
        "email" => {
            email::require_email_config(config)?;
            Ok(Box::new(EmailImportAdapter::new(Arc::new(email::UnimplementedMailboxClient), config)))
        }
        "ksef" => Ok(Box::new(KsefImportAdapter::new(config))),
        "csv" => Ok(Box::new(CsvImportAdapter::new(config))),
        "manual" => Ok(Box::new(PassiveImportAdapter::new("manual", config))),
        "upload" => Ok(Box::new(PassiveImportAdapter::new("upload", config))),
        "webhook" => Ok(Box::new(PassiveImportAdapter::new("webhook", config))),
        "bank" => Ok(Box::new(BankStatementAdapter::new(BankColumnAliases::generic(), config))),
        "bank_ing" => Ok(Box::new(BankStatementAdapter::new(BankColumnAliases::ing(), config))),
        "bank_mbank" => Ok(Box::new(BankStatementAdapter::new(BankColumnAliases::mbank(), config))),
        "bank_pko" => Ok(Box::new(BankStatementAdapter::new(BankColumnAliases::pko(), config))),
        "bank_santander" => Ok(Box::new(BankStatementAdapter::new(BankColumnAliases::santander(), config))),
        "bank_pekao" => Ok(Box::new(BankStatementAdapter::new(BankColumnAliases::pekao(), config))),
        other => Err(FlowError::Configuration(format!("unknown import adapter tag '{other}'"))),
    }
}

/// Builds the export adapter registered for `tag`, or an error for an
/// unrecognised tag.
pub fn build_export_adapter(tag: &str, config: &AdapterConfig) -> Result<Box<dyn ExportAdapter>, FlowError> {
    match tag {
        "wfirma" => Ok(Box::new(WfirmaExportAdapter)),
        "jpk_pkpir" => Ok(Box::new(JpkPkpirExportAdapter::new(config))),
        "comarch" => Ok(Box::new(ComarchExportAdapter)),
        "symfonia" => Ok(Box::new(SymfoniaExportAdapter)),
        "enova" => Ok(Box::new(EnovaExportAdapter)),
        "csv" => Ok(Box::new(CsvExportAdapter)),
        other => Err(FlowError::Configuration(format!("unknown export adapter tag '{other}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_import_tag_builds_successfully() {
        let mut config = AdapterConfig::new();
        config.insert("host".to_string(), serde_json::json!("imap.example.com"));
        config.insert("username".to_string(), serde_json::json!("user"));
        for tag in IMPORT_TAGS {
            assert!(build_import_adapter(tag, &config).is_ok(), "tag {tag} failed to build");
        }
    }

    #[test]
    fn every_export_tag_builds_successfully() {
        let config = AdapterConfig::new();
        for tag in EXPORT_TAGS {
            assert!(build_export_adapter(tag, &config).is_ok(), "tag {tag} failed to build");
        }
    }

    #[test]
    fn unknown_tags_are_rejected() {
        assert!(build_import_adapter("nonexistent", &AdapterConfig::new()).is_err());
        assert!(build_export_adapter("nonexistent", &AdapterConfig::new()).is_err());
    }

    /// spec.md §4.3: `test_connection` never mutates external state and
    /// always returns a non-empty message, for every registered adapter.
    #[tokio::test]
    async fn every_adapter_test_connection_returns_a_non_empty_message() {
        let mut import_config = AdapterConfig::new();
        import_config.insert("host".to_string(), serde_json::json!("imap.example.com"));
        import_config.insert("username".to_string(), serde_json::json!("user"));
        for tag in IMPORT_TAGS {
            let adapter = build_import_adapter(tag, &import_config).unwrap();
            let result = adapter.test_connection().await;
            assert!(!result.message.is_empty(), "tag {tag} returned an empty test_connection message");
        }

        let export_config = AdapterConfig::new();
        for tag in EXPORT_TAGS {
            let adapter = build_export_adapter(tag, &export_config).unwrap();
            let result = adapter.test_connection().await;
            assert!(!result.message.is_empty(), "tag {tag} returned an empty test_connection message");
        }
    }
}
