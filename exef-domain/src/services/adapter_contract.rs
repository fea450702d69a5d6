//! # Adapter Contract
//!
//! The single interface every import or export adapter implements (spec.md
//! §4.3), grounded on the async `PipelineRepository`-style port shape used
//! throughout this domain's `repositories/` — adapters are ports too, just
//! ports to external systems (IMAP, KSeF, accounting-software file formats)
//! rather than to the database. Concrete adapters and the tag→constructor
//! registry live in `exef::infrastructure::adapters`, which is the only
//! place allowed to know about IMAP, HTTP, or CSV crates; this module only
//! describes the shape they all share.

use crate::error::FlowError;
use crate::value_objects::enums::{DocumentKind, OutputFormat};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One record an import adapter extracted from its external source. Fields
/// are deliberately optional — "missing fields are allowed; the caller
/// fills defaults" (spec.md §4.3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportResult {
    pub source_id: String,
    pub kind: Option<DocumentKind>,
    pub number: Option<String>,
    pub contractor_name: Option<String>,
    pub contractor_tax_id: Option<String>,
    pub amount_net: Option<Decimal>,
    pub amount_vat: Option<Decimal>,
    pub amount_gross: Option<Decimal>,
    pub currency: Option<String>,
    pub document_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub original_filename: Option<String>,
}

impl ImportResult {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            ..Default::default()
        }
    }
}

/// The outcome of a single export adapter invocation (spec.md §4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResult {
    pub content: String,
    pub filename: String,
    pub format: OutputFormat,
    pub docs_exported: u32,
    pub encoding: String,
}

impl ExportResult {
    /// UTF-8 with BOM is the default encoding for every exporter except
    /// `symfonia`, which overrides to CP1250 (spec.md §4.3).
    pub fn utf8_bom(content: String, filename: impl Into<String>, format: OutputFormat, docs_exported: u32) -> Self {
        Self {
            content,
            filename: filename.into(),
            format,
            docs_exported,
            encoding: "UTF-8-BOM".to_string(),
        }
    }
}

/// `test_connection`'s uniform result shape (spec.md §4.3): never mutates
/// external state, always returns a non-empty message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestConnectionResult {
    pub ok: bool,
    pub message: String,
}

impl TestConnectionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// A document as already stored, handed to an export adapter. Kept
/// independent of the `Document`/`DocumentMetadata` entity pair so adapters
/// don't need to know about metadata versioning or status transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportableDocument {
    pub doc_id: Option<String>,
    pub kind: DocumentKind,
    pub number: Option<String>,
    pub contractor_name: Option<String>,
    pub contractor_tax_id: Option<String>,
    pub amount_net: Option<Decimal>,
    pub amount_vat: Option<Decimal>,
    pub amount_gross: Option<Decimal>,
    pub currency: String,
    pub document_date: Option<NaiveDate>,
    pub category: Option<String>,
    pub description: Option<String>,
}

/// An import adapter: `(config, source_name) -> fetch/test_connection`
/// (spec.md §4.3). `fetch`'s period bounds are both optional — "if omitted
/// the adapter chooses its own window".
#[async_trait]
pub trait ImportAdapter: Send + Sync {
    async fn fetch(&self, period_start: Option<NaiveDate>, period_end: Option<NaiveDate>) -> Result<Vec<ImportResult>, FlowError>;

    async fn test_connection(&self) -> TestConnectionResult;

    /// The registry tag this instance was constructed for, used for
    /// logging and `DataSource.last_run_*` bookkeeping.
    fn tag(&self) -> &'static str;
}

/// An export adapter: serialises a task's documents into one artifact
/// (spec.md §4.3).
#[async_trait]
pub trait ExportAdapter: Send + Sync {
    async fn export(&self, documents: &[ExportableDocument], task_name: &str) -> Result<ExportResult, FlowError>;

    async fn test_connection(&self) -> TestConnectionResult;

    fn tag(&self) -> &'static str;
}

/// Type-dependent configuration map every adapter is instantiated with —
/// `(config_map, source_name)` per spec.md §4.3.
pub type AdapterConfig = HashMap<String, serde_json::Value>;

pub fn config_str<'a>(config: &'a AdapterConfig, key: &str) -> Option<&'a str> {
    config.get(key).and_then(|v| v.as_str())
}

pub fn config_u32(config: &AdapterConfig, key: &str) -> Option<u32> {
    config.get(key).and_then(|v| v.as_u64()).map(|v| v as u32)
}

pub fn config_bool(config: &AdapterConfig, key: &str) -> Option<bool> {
    config.get(key).and_then(|v| v.as_bool())
}

pub fn config_str_list(config: &AdapterConfig, key: &str) -> Vec<String> {
    config
        .get(key)
        .and_then(|v| v.as_array())
        .map(|items| items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}
