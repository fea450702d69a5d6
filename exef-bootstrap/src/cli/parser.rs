// /////////////////////////////////////////////////////////////////////////////
// exef
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CLI Parser
//!
//! Command-line interface parsing using clap. The HTTP surface (spec.md
//! §6) is out of scope for this workspace; this CLI is the batch-tool
//! driver for the flow engine instead (SPEC_FULL.md §6 "CLI / bootstrap").
//! Each subcommand maps onto one flow-engine or storage-router operation —
//! `import`/`export`/`upload-csv` drive the flow engine (spec.md §4.4),
//! `migrate` drives the shared→per-entity storage-router walk (spec.md
//! §4.2), and `project from-template` drives template expansion (spec.md
//! §4.5).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure
#[derive(Parser, Debug, Clone)]
#[command(name = "exef")]
#[command(about = concat!("exef document-flow engine v", env!("CARGO_PKG_VERSION")))]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path (overrides `EXEF_`-prefixed env vars)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override CPU worker thread count for the tokio runtime
    #[arg(long)]
    pub cpu_threads: Option<usize>,

    /// Override I/O worker thread count (adapter fetch concurrency)
    #[arg(long)]
    pub io_threads: Option<usize>,

    /// Storage mode override: "shared" or "per_entity" (see EXEF_USE_ENTITY_DB)
    #[arg(long, value_parser = parse_storage_mode)]
    pub storage_type: Option<String>,

    /// Channel depth for the adapter-fetch pipeline (backpressure)
    #[arg(long, default_value = "4")]
    pub channel_depth: usize,
}

/// CLI subcommands — one per flow-engine, storage-router, or
/// template-lifecycle operation (SPEC_FULL.md §4 and §6).
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run an import on a task using one of its project's import sources
    /// (spec.md §4.4 "Import run").
    Import {
        /// Data source id to fetch from
        #[arg(long)]
        source: String,

        /// Task id the imported documents are counted against
        #[arg(long)]
        task: String,

        /// Identity id triggering the run (for ImportRun.triggered_by)
        #[arg(long)]
        triggered_by: String,
    },

    /// Run an export on a task using one of its project's export sources
    /// (spec.md §4.4 "Export run").
    Export {
        /// Data source id to export through
        #[arg(long)]
        source: String,

        /// Task id to export documents from
        #[arg(long)]
        task: String,

        /// Identity id triggering the run
        #[arg(long)]
        triggered_by: String,

        /// Explicit document ids to export (repeatable); if omitted, every
        /// document in `{described, approved}` status is selected
        #[arg(long = "document")]
        documents: Vec<String>,

        /// Where to write the exported artifact; prints to stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import documents from a CSV file directly into a task, bypassing the
    /// `csv` adapter's DataSource/ImportRun bookkeeping (spec.md §4.4 "CSV
    /// upload path").
    UploadCsv {
        /// Task id to create documents in
        #[arg(long)]
        task: String,

        /// Path to the CSV file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Test an adapter's connectivity without mutating external state
    /// (spec.md §4.3 `test_connection`).
    TestConnection {
        /// Data source id to test
        #[arg(long)]
        source: String,
    },

    /// Create a project from a template for a given year (spec.md §4.5
    /// "Template-driven project creation").
    ProjectFromTemplate {
        /// Owning entity id
        #[arg(long)]
        entity: String,

        /// Template id
        #[arg(long)]
        template: String,

        /// Calendar year the project covers
        #[arg(long)]
        year: i32,

        /// Period start override (ISO date); defaults to Jan 1 of `year`
        #[arg(long)]
        period_start: Option<String>,

        /// Period end override (ISO date); defaults to Dec 31 of `year`
        #[arg(long)]
        period_end: Option<String>,

        /// Project name override
        #[arg(long)]
        name: Option<String>,
    },

    /// Walk every entity and copy its rows into a per-entity SQLite file,
    /// writing routing rows as it goes (spec.md §4.2 "Migration from
    /// shared to per-entity mode").
    Migrate,

    /// Patch a document's metadata, advancing `new -> described`
    /// (spec.md §6 `PATCH /documents/{id}/metadata`).
    DescribeDocument {
        #[arg(long)]
        document: String,

        #[arg(long)]
        editor: String,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Comma-separated tag list
        #[arg(long)]
        tags: Option<String>,
    },

    /// Approve a described document, advancing `described -> approved`
    /// (spec.md §6 `POST /documents/{id}/approve`).
    ApproveDocument {
        #[arg(long)]
        document: String,

        #[arg(long)]
        approver: String,
    },

    /// List duplicate groups within a task (spec.md §6
    /// `GET /tasks/{id}/duplicates`).
    Duplicates {
        #[arg(long)]
        task: String,
    },
}

/// Validates `--storage-type`, mirroring the `EXEF_USE_ENTITY_DB` toggle's
/// two legal values (spec.md §4.2 "Two modes").
fn parse_storage_mode(s: &str) -> Result<String, String> {
    match s.to_lowercase().as_str() {
        "shared" | "per_entity" => Ok(s.to_lowercase()),
        _ => Err(format!("Invalid storage mode '{}'. Valid options: shared, per_entity", s)),
    }
}

/// Parse CLI arguments.
///
/// # Panics
///
/// Clap exits the process with a usage message if parsing fails.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_storage_mode_valid() {
        assert_eq!(parse_storage_mode("shared").unwrap(), "shared");
        assert_eq!(parse_storage_mode("PER_ENTITY").unwrap(), "per_entity");
    }

    #[test]
    fn rejects_invalid_storage_mode() {
        assert!(parse_storage_mode("galactic").is_err());
    }
}
