//! # Import/Export Run Entities
//!
//! History records for flow-engine executions (spec.md §4.4). `ImportRun`
//! and `ExportRun` share the common run fields; each adds the counters
//! specific to its direction rather than overloading one struct with
//! fields that are meaningless on the other side.

use crate::value_objects::enums::{OutputFormat, RunStatus};
use crate::value_objects::ids::{DataSourceId, ExportRunId, IdentityId, ImportRunId, TaskId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRun {
    id: ImportRunId,
    source: DataSourceId,
    task: TaskId,
    status: RunStatus,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    triggered_by: IdentityId,
    errors: Vec<String>,
    docs_found: u32,
    docs_imported: u32,
    docs_skipped: u32,
}

impl ImportRun {
    pub fn start(source: DataSourceId, task: TaskId, triggered_by: IdentityId, started_at: DateTime<Utc>) -> Self {
        Self {
            id: ImportRunId::new(),
            source,
            task,
            status: RunStatus::Running,
            started_at,
            finished_at: None,
            triggered_by,
            errors: Vec::new(),
            docs_found: 0,
            docs_imported: 0,
            docs_skipped: 0,
        }
    }

    pub fn id(&self) -> &ImportRunId {
        &self.id
    }

    pub fn task(&self) -> &TaskId {
        &self.task
    }

    pub fn source(&self) -> &DataSourceId {
        &self.source
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Spec.md §4.4 step 6: records the fetch outcome and marks the run
    /// successful.
    pub fn complete(&mut self, docs_found: u32, docs_imported: u32, docs_skipped: u32, finished_at: DateTime<Utc>) {
        self.docs_found = docs_found;
        self.docs_imported = docs_imported;
        self.docs_skipped = docs_skipped;
        self.status = RunStatus::Success;
        self.finished_at = Some(finished_at);
    }

    /// Spec.md §4.4: "Errors during adapter fetch set the run status to
    /// error... and do not mutate task counters."
    pub fn fail(&mut self, message: impl Into<String>, finished_at: DateTime<Utc>) {
        self.errors = vec![message.into()];
        self.status = RunStatus::Error;
        self.finished_at = Some(finished_at);
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn docs_found(&self) -> u32 {
        self.docs_found
    }

    pub fn docs_imported(&self) -> u32 {
        self.docs_imported
    }

    pub fn docs_skipped(&self) -> u32 {
        self.docs_skipped
    }

    pub fn triggered_by(&self) -> &IdentityId {
        &self.triggered_by
    }

    /// Appends one parse-failure message without aborting the run (spec.md
    /// §7 "Adapter parse failure").
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_database(
        id: ImportRunId,
        source: DataSourceId,
        task: TaskId,
        status: RunStatus,
        started_at: DateTime<Utc>,
        finished_at: Option<DateTime<Utc>>,
        triggered_by: IdentityId,
        errors: Vec<String>,
        docs_found: u32,
        docs_imported: u32,
        docs_skipped: u32,
    ) -> Self {
        Self {
            id,
            source,
            task,
            status,
            started_at,
            finished_at,
            triggered_by,
            errors,
            docs_found,
            docs_imported,
            docs_skipped,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRun {
    id: ExportRunId,
    source: DataSourceId,
    task: TaskId,
    status: RunStatus,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    triggered_by: IdentityId,
    errors: Vec<String>,
    docs_exported: u32,
    docs_failed: u32,
    output_format: Option<OutputFormat>,
    output_filename: Option<String>,
    output_content: Option<String>,
}

impl ExportRun {
    pub fn start(source: DataSourceId, task: TaskId, triggered_by: IdentityId, started_at: DateTime<Utc>) -> Self {
        Self {
            id: ExportRunId::new(),
            source,
            task,
            status: RunStatus::Running,
            started_at,
            finished_at: None,
            triggered_by,
            errors: Vec::new(),
            docs_exported: 0,
            docs_failed: 0,
            output_format: None,
            output_filename: None,
            output_content: None,
        }
    }

    pub fn id(&self) -> &ExportRunId {
        &self.id
    }

    pub fn task(&self) -> &TaskId {
        &self.task
    }

    pub fn source(&self) -> &DataSourceId {
        &self.source
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn output_content(&self) -> Option<&str> {
        self.output_content.as_deref()
    }

    pub fn output_filename(&self) -> Option<&str> {
        self.output_filename.as_deref()
    }

    /// Spec.md §4.4 export algorithm step 4.
    pub fn complete(
        &mut self,
        docs_exported: u32,
        format: OutputFormat,
        filename: impl Into<String>,
        content: impl Into<String>,
        finished_at: DateTime<Utc>,
    ) {
        self.docs_exported = docs_exported;
        self.output_format = Some(format);
        self.output_filename = Some(filename.into());
        self.output_content = Some(content.into());
        self.status = RunStatus::Success;
        self.finished_at = Some(finished_at);
    }

    pub fn fail(&mut self, message: impl Into<String>, finished_at: DateTime<Utc>) {
        self.errors = vec![message.into()];
        self.status = RunStatus::Error;
        self.finished_at = Some(finished_at);
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn docs_exported(&self) -> u32 {
        self.docs_exported
    }

    pub fn docs_failed(&self) -> u32 {
        self.docs_failed
    }

    pub fn output_format(&self) -> Option<OutputFormat> {
        self.output_format
    }

    pub fn triggered_by(&self) -> &IdentityId {
        &self.triggered_by
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_database(
        id: ExportRunId,
        source: DataSourceId,
        task: TaskId,
        status: RunStatus,
        started_at: DateTime<Utc>,
        finished_at: Option<DateTime<Utc>>,
        triggered_by: IdentityId,
        errors: Vec<String>,
        docs_exported: u32,
        docs_failed: u32,
        output_format: Option<OutputFormat>,
        output_filename: Option<String>,
        output_content: Option<String>,
    ) -> Self {
        Self {
            id,
            source,
            task,
            status,
            started_at,
            finished_at,
            triggered_by,
            errors,
            docs_exported,
            docs_failed,
            output_format,
            output_filename,
            output_content,
        }
    }
}
