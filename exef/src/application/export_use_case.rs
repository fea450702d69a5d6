// /////////////////////////////////////////////////////////////////////////////
// exef
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Executes one export run (spec.md §4.4 "Export run" algorithm).

use crate::infrastructure::adapters::build_export_adapter;
use crate::infrastructure::repositories::{
    db_err, SqliteDataSourceRepository, SqliteDocumentMetadataRepository, SqliteDocumentRepository, SqliteExportRunRepository, SqliteRoutingRepository, SqliteTaskRepository,
};
use crate::infrastructure::storage_router::StorageRouter;
use chrono::Utc;
use exef_domain::entities::{Document, ExportRun};
use exef_domain::repositories::{DataSourceRepository, DocumentMetadataRepository, DocumentRepository, ExportRunRepository, TaskRepository};
use exef_domain::services::access_resolver::{AccessResolver, EffectiveAccess};
use exef_domain::services::adapter_contract::ExportableDocument;
use exef_domain::value_objects::enums::{DocumentStatus, SourceDirection};
use exef_domain::value_objects::ids::{DataSourceId, DocumentId, IdentityId, TaskId};
use exef_domain::FlowError;
use std::sync::Arc;

/// Outcome of an export attempt, including the "nothing to export" path
/// (spec.md §4.4: an empty document selection is not a failure, no run is
/// recorded and no document or task state changes).
pub enum ExportOutcome {
    Completed(ExportRun),
    NothingToExport { message: &'static str },
}

pub struct ExportUseCase {
    router: Arc<StorageRouter>,
}

impl ExportUseCase {
    pub fn new(router: Arc<StorageRouter>) -> Self {
        Self { router }
    }

    /// `document_ids`: an explicit selection, or `None` to export every
    /// `described`/`approved` document currently on the task.
    pub async fn execute(
        &self,
        task_id: &TaskId,
        source_id: &DataSourceId,
        triggered_by: IdentityId,
        document_ids: Option<&[DocumentId]>,
        access: &EffectiveAccess,
    ) -> Result<ExportOutcome, FlowError> {
        AccessResolver::new().require_export(access)?;

        let routing = SqliteRoutingRepository::new(self.router.shared_pool().clone());
        let pool = self.router.pool_for_resource(&routing, &task_id.to_string()).await?;

        let task_repo = SqliteTaskRepository::new(pool.clone());
        let source_repo = SqliteDataSourceRepository::new(pool.clone());
        let document_repo = SqliteDocumentRepository::new(pool.clone());
        let metadata_repo = SqliteDocumentMetadataRepository::new(pool.clone());

        let mut task = task_repo
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| FlowError::not_found(format!("task {task_id} not found")))?;
        let mut source = source_repo
            .find_by_id(source_id)
            .await?
            .ok_or_else(|| FlowError::not_found(format!("source {source_id} not found")))?;
        if source.direction() != SourceDirection::Export {
            return Err(FlowError::validation(format!("source {source_id} is not an export source")));
        }

        let candidates = document_repo.list_for_task(task_id).await?;
        let mut selected: Vec<Document> = match document_ids {
            Some(ids) => candidates.into_iter().filter(|d| ids.contains(d.id())).collect(),
            None => candidates
                .into_iter()
                .filter(|d| matches!(d.status(), DocumentStatus::Described | DocumentStatus::Approved))
                .collect(),
        };
        selected.sort_by(|a, b| a.id().to_string().cmp(&b.id().to_string()));

        if selected.is_empty() {
            return Ok(ExportOutcome::NothingToExport {
                message: "Brak opisanych dokumentów do eksportu. Najpierw opisz dokumenty.",
            });
        }

        let mut exportable = Vec::with_capacity(selected.len());
        for document in &selected {
            let metadata = metadata_repo.find_for_document(document.id()).await?;
            exportable.push(ExportableDocument {
                doc_id: document.doc_id().map(str::to_string),
                kind: document.kind(),
                number: document.number().map(str::to_string),
                contractor_name: document.contractor_name().map(str::to_string),
                contractor_tax_id: document.contractor_tax_id().map(str::to_string),
                amount_net: document.amount_net(),
                amount_vat: document.amount_vat(),
                amount_gross: document.amount_gross(),
                currency: document.currency().to_string(),
                document_date: document.document_date(),
                category: metadata.as_ref().and_then(|m| m.category().map(str::to_string)),
                description: metadata.as_ref().and_then(|m| m.description().map(str::to_string)),
            });
        }

        let now = Utc::now();
        let mut run = ExportRun::start(source_id.clone(), task_id.clone(), triggered_by, now);

        let adapter = build_export_adapter(source.source_type(), source.config())?;
        let exported = adapter.export(&exportable, task.name()).await;

        // spec.md §4.4 "Concurrency": every write belonging to this run
        // commits or rolls back together, on the entity database that owns
        // the task — whether the run ends in success or a recorded error.
        let mut tx = pool.begin().await.map_err(db_err)?;
        SqliteExportRunRepository::save_tx(&mut tx, &run).await?;

        let result = match exported {
            Ok(result) => result,
            Err(e) => {
                run.fail(e.to_string(), Utc::now());
                SqliteExportRunRepository::update_tx(&mut tx, &run).await?;
                source.record_run("error", 0, Some(e.to_string()), Utc::now());
                SqliteDataSourceRepository::update_tx(&mut tx, &source).await?;
                tx.commit().await.map_err(db_err)?;
                return Err(e);
            }
        };

        for document in &mut selected {
            document.advance_status(DocumentStatus::Exported)?;
            SqliteDocumentRepository::update_tx(&mut tx, document).await?;
        }

        task.apply_export_delta(selected.len() as u32)?;
        SqliteTaskRepository::update_tx(&mut tx, &task).await?;

        source.record_run("success", selected.len() as u32, None, Utc::now());
        SqliteDataSourceRepository::update_tx(&mut tx, &source).await?;

        run.complete(result.docs_exported, result.format, result.filename, result.content, Utc::now());
        SqliteExportRunRepository::update_tx(&mut tx, &run).await?;

        tx.commit().await.map_err(db_err)?;
        Ok(ExportOutcome::Completed(run))
    }
}
