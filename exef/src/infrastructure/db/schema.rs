// /////////////////////////////////////////////////////////////////////////////
// exef
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Embedded Schema
//!
//! The schema is applied with `sqlx::raw_sql` rather than `sqlx::migrate!`:
//! there is exactly one shape per database (shared or per-entity), created
//! lazily the first time a pool for that file is opened (spec.md §4.2), so a
//! versioned migration directory buys nothing here. Every table mirrors one
//! entity's `from_database` hydration constructor column-for-column.

use exef_domain::FlowError;
use sqlx::SqlitePool;

pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS identities (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    tax_id TEXT,
    personal_id TEXT,
    verified INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS entities (
    id TEXT PRIMARY KEY,
    kind TEXT NOT NULL,
    legal_name TEXT NOT NULL,
    tax_id TEXT UNIQUE,
    owner TEXT NOT NULL,
    archived INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS entity_members (
    id TEXT PRIMARY KEY,
    entity TEXT NOT NULL,
    identity TEXT NOT NULL,
    role TEXT NOT NULL,
    can_manage_projects INTEGER NOT NULL DEFAULT 0,
    can_invite_members INTEGER NOT NULL DEFAULT 0,
    can_export INTEGER NOT NULL DEFAULT 0,
    UNIQUE(entity, identity)
);

CREATE TABLE IF NOT EXISTS entity_databases (
    id TEXT PRIMARY KEY,
    entity TEXT NOT NULL UNIQUE,
    local_url TEXT NOT NULL,
    local_path TEXT NOT NULL,
    remote_sync_url TEXT,
    sync_enabled INTEGER NOT NULL DEFAULT 0,
    sync_direction TEXT NOT NULL,
    sync_interval_minutes INTEGER NOT NULL DEFAULT 60,
    last_sync_at TEXT,
    last_sync_status TEXT
);

CREATE TABLE IF NOT EXISTS projects (
    id TEXT PRIMARY KEY,
    entity TEXT NOT NULL,
    template TEXT,
    name TEXT NOT NULL,
    kind TEXT NOT NULL,
    year INTEGER NOT NULL,
    period_start TEXT NOT NULL,
    period_end TEXT NOT NULL,
    categories TEXT NOT NULL DEFAULT '[]',
    tags TEXT NOT NULL DEFAULT '[]',
    active INTEGER NOT NULL DEFAULT 1,
    archived INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS project_templates (
    id TEXT PRIMARY KEY,
    owner TEXT,
    kind TEXT NOT NULL,
    recurrence TEXT NOT NULL,
    task_name_template TEXT NOT NULL,
    deadline_day INTEGER NOT NULL,
    default_categories TEXT NOT NULL DEFAULT '[]'
);

CREATE TABLE IF NOT EXISTS project_authorizations (
    id TEXT PRIMARY KEY,
    project TEXT NOT NULL,
    identity TEXT NOT NULL,
    can_view INTEGER NOT NULL DEFAULT 0,
    can_describe INTEGER NOT NULL DEFAULT 0,
    can_approve INTEGER NOT NULL DEFAULT 0,
    can_export INTEGER NOT NULL DEFAULT 0,
    valid_from TEXT NOT NULL,
    valid_until TEXT,
    granted_by TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tasks (
    id TEXT PRIMARY KEY,
    project TEXT NOT NULL,
    name TEXT NOT NULL,
    period_start TEXT NOT NULL,
    period_end TEXT NOT NULL,
    deadline TEXT NOT NULL,
    assignee TEXT,
    status TEXT NOT NULL,
    import_status TEXT NOT NULL,
    describe_status TEXT NOT NULL,
    export_status TEXT NOT NULL,
    docs_total INTEGER NOT NULL DEFAULT 0,
    docs_described INTEGER NOT NULL DEFAULT 0,
    docs_approved INTEGER NOT NULL DEFAULT 0,
    docs_exported INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS documents (
    id TEXT PRIMARY KEY,
    task TEXT NOT NULL,
    kind TEXT NOT NULL,
    number TEXT,
    contractor_name TEXT,
    contractor_tax_id TEXT,
    amount_net TEXT,
    amount_vat TEXT,
    amount_gross TEXT,
    currency TEXT NOT NULL DEFAULT 'PLN',
    document_date TEXT,
    source_kind TEXT NOT NULL,
    source_record_id TEXT NOT NULL,
    original_filename TEXT,
    file_path TEXT,
    doc_id TEXT,
    status TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_documents_task ON documents(task);
CREATE INDEX IF NOT EXISTS idx_documents_doc_id ON documents(doc_id);

CREATE TABLE IF NOT EXISTS document_metadata (
    document TEXT PRIMARY KEY,
    category TEXT,
    description TEXT,
    tags TEXT NOT NULL DEFAULT '[]',
    custom_fields TEXT NOT NULL DEFAULT '{}',
    last_editor TEXT,
    last_edited_at TEXT,
    version INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS document_relations (
    id TEXT PRIMARY KEY,
    parent TEXT NOT NULL,
    child TEXT NOT NULL,
    relation_type TEXT NOT NULL,
    UNIQUE(parent, child, relation_type)
);
CREATE INDEX IF NOT EXISTS idx_document_relations_document ON document_relations(parent, child);

CREATE TABLE IF NOT EXISTS data_sources (
    id TEXT PRIMARY KEY,
    project TEXT NOT NULL,
    direction TEXT NOT NULL,
    source_type TEXT NOT NULL,
    display_name TEXT NOT NULL,
    config TEXT NOT NULL DEFAULT '{}',
    active INTEGER NOT NULL DEFAULT 1,
    auto_pull INTEGER NOT NULL DEFAULT 0,
    pull_interval_minutes INTEGER NOT NULL DEFAULT 60,
    last_run_at TEXT,
    last_run_status TEXT,
    last_run_count INTEGER NOT NULL DEFAULT 0,
    last_run_error TEXT
);

CREATE TABLE IF NOT EXISTS import_runs (
    id TEXT PRIMARY KEY,
    source TEXT NOT NULL,
    task TEXT NOT NULL,
    status TEXT NOT NULL,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    triggered_by TEXT NOT NULL,
    errors TEXT NOT NULL DEFAULT '[]',
    docs_found INTEGER NOT NULL DEFAULT 0,
    docs_imported INTEGER NOT NULL DEFAULT 0,
    docs_skipped INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_import_runs_task ON import_runs(task);

CREATE TABLE IF NOT EXISTS export_runs (
    id TEXT PRIMARY KEY,
    source TEXT NOT NULL,
    task TEXT NOT NULL,
    status TEXT NOT NULL,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    triggered_by TEXT NOT NULL,
    errors TEXT NOT NULL DEFAULT '[]',
    docs_exported INTEGER NOT NULL DEFAULT 0,
    docs_failed INTEGER NOT NULL DEFAULT 0,
    output_format TEXT,
    output_filename TEXT,
    output_content TEXT
);
CREATE INDEX IF NOT EXISTS idx_export_runs_task ON export_runs(task);

CREATE TABLE IF NOT EXISTS resource_routing (
    resource_id TEXT PRIMARY KEY,
    entity_tax_id TEXT NOT NULL,
    resource_kind TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_resource_routing_entity ON resource_routing(entity_tax_id);
"#;

/// Applies [`SCHEMA_SQL`] to `pool`. Idempotent — every statement is
/// `CREATE ... IF NOT EXISTS`.
pub async fn apply_schema(pool: &SqlitePool) -> Result<(), FlowError> {
    sqlx::raw_sql(SCHEMA_SQL)
        .execute(pool)
        .await
        .map_err(|e| FlowError::Database(e.to_string()))?;
    Ok(())
}
