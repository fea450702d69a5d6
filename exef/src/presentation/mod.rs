// /////////////////////////////////////////////////////////////////////////////
// exef
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Boundary DTOs for the HTTP surface described in spec.md §6. The HTTP
//! transport itself is out of scope (spec.md §1) — this module is the
//! "outer contract, not outer transport" layer the application use cases
//! are driven through.

use chrono::{DateTime, NaiveDate, Utc};
use exef_domain::entities::{Document, ExportRun, ImportRun};
use exef_domain::value_objects::enums::{DocumentStatus, OutputFormat, RelationType, RunStatus};
use exef_domain::value_objects::ids::{DataSourceId, DocumentId, EntityId, ProjectId, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRequest {
    pub source_id: DataSourceId,
    pub task_id: TaskId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRequest {
    pub source_id: DataSourceId,
    pub task_id: TaskId,
    pub document_ids: Option<Vec<DocumentId>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportRunView {
    pub id: String,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub docs_found: u32,
    pub docs_imported: u32,
    pub docs_skipped: u32,
    pub errors: Vec<String>,
}

impl From<&ImportRun> for ImportRunView {
    fn from(run: &ImportRun) -> Self {
        Self {
            id: run.id().to_string(),
            status: run.status(),
            started_at: run.started_at(),
            finished_at: run.finished_at(),
            docs_found: run.docs_found(),
            docs_imported: run.docs_imported(),
            docs_skipped: run.docs_skipped(),
            errors: run.errors().to_vec(),
        }
    }
}

/// `POST /flow/export`'s response: either the completed run, or
/// `{ok: false, message, docs_exported: 0}` when nothing matched the
/// selection (spec.md §4.4, §6).
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ExportRunResult {
    Completed {
        ok: bool,
        id: String,
        status: RunStatus,
        docs_exported: u32,
        output_format: Option<OutputFormat>,
        output_filename: Option<String>,
    },
    NothingToExport {
        ok: bool,
        message: String,
        docs_exported: u32,
    },
}

impl From<&ExportRun> for ExportRunResult {
    fn from(run: &ExportRun) -> Self {
        ExportRunResult::Completed {
            ok: matches!(run.status(), RunStatus::Success),
            id: run.id().to_string(),
            status: run.status(),
            docs_exported: run.docs_exported(),
            output_format: run.output_format(),
            output_filename: run.output_filename().map(str::to_string),
        }
    }
}

impl ExportRunResult {
    pub fn nothing_to_export(message: impl Into<String>) -> Self {
        ExportRunResult::NothingToExport {
            ok: false,
            message: message.into(),
            docs_exported: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadCsvResponse {
    pub ok: bool,
    pub imported: u32,
    pub errors: Vec<String>,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentMetadataPatch {
    pub category: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub custom_fields: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkMetadataPatch {
    pub document_ids: Vec<DocumentId>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DuplicateGroup {
    pub doc_id: String,
    pub document_ids: Vec<DocumentId>,
}

/// `GET /match/documents/{id}` response row: the domain's bare
/// `(document_id, score)` suggestion enriched with the fields a reviewer
/// needs to tell candidates apart without a second round-trip.
#[derive(Debug, Clone, Serialize)]
pub struct MatchSuggestionView {
    pub document_id: DocumentId,
    pub score: f64,
    pub number: Option<String>,
    pub contractor_name: Option<String>,
    pub document_date: Option<NaiveDate>,
}

impl MatchSuggestionView {
    pub fn new(document_id: DocumentId, score: f64, candidate: &Document) -> Self {
        Self {
            document_id,
            score,
            number: candidate.number().map(str::to_string),
            contractor_name: candidate.contractor_name().map(str::to_string),
            document_date: candidate.document_date(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelationRequest {
    pub parent_id: DocumentId,
    pub child_id: DocumentId,
    pub relation_type: RelationType,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub entity_id: Option<EntityId>,
    pub exclude_project_id: Option<ProjectId>,
    pub exclude_document_id: Option<DocumentId>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentListQuery {
    pub status: Option<DocumentStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceTypeInfo {
    pub tag: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub config_fields: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
pub struct TestConnectionResponse {
    pub ok: bool,
    pub message: String,
}
