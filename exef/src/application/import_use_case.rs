// /////////////////////////////////////////////////////////////////////////////
// exef
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Executes one import run (spec.md §4.4 "Import run" algorithm).

use crate::infrastructure::adapters::{build_import_adapter, IMPORT_TAGS};
use crate::infrastructure::repositories::{
    db_err, SqliteDataSourceRepository, SqliteDocumentMetadataRepository, SqliteDocumentRepository, SqliteImportRunRepository, SqliteRoutingRepository, SqliteTaskRepository,
};
use crate::infrastructure::storage_router::StorageRouter;
use chrono::Utc;
use exef_domain::entities::{Document, DocumentMetadata, ImportRun, ResourceRouting};
use exef_domain::repositories::{DataSourceRepository, DocumentMetadataRepository, DocumentRepository, ImportRunRepository, RoutingRepository, TaskRepository};
use exef_domain::services::access_resolver::{AccessResolver, EffectiveAccess};
use exef_domain::services::adapter_contract::ImportResult;
use exef_domain::services::document_identity_service::{DocumentIdentityInput, DocumentIdentityService, Sha256DocumentIdentity};
use exef_domain::value_objects::enums::{ResourceKind, SourceDirection};
use exef_domain::value_objects::ids::{DataSourceId, IdentityId, TaskId};
use exef_domain::FlowError;
use std::sync::Arc;

pub struct ImportUseCase {
    router: Arc<StorageRouter>,
    identity: Sha256DocumentIdentity,
}

impl ImportUseCase {
    pub fn new(router: Arc<StorageRouter>) -> Self {
        Self {
            router,
            identity: Sha256DocumentIdentity::new(),
        }
    }

    /// `access` is the caller's already-resolved [`EffectiveAccess`] on the
    /// task's owning project — the HTTP/CLI boundary looks up membership
    /// and delegation, this use case only enforces the result (spec.md
    /// §4.4 precondition: "the caller has describe-permission").
    pub async fn execute(&self, task_id: &TaskId, source_id: &DataSourceId, triggered_by: IdentityId, access: &EffectiveAccess) -> Result<ImportRun, FlowError> {
        AccessResolver::new().require_describe(access)?;

        let routing = SqliteRoutingRepository::new(self.router.shared_pool().clone());
        let pool = self.router.pool_for_resource(&routing, &task_id.to_string()).await?;

        let task_repo = SqliteTaskRepository::new(pool.clone());
        let source_repo = SqliteDataSourceRepository::new(pool.clone());

        let mut task = task_repo
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| FlowError::not_found(format!("task {task_id} not found")))?;
        let mut source = source_repo
            .find_by_id(source_id)
            .await?
            .ok_or_else(|| FlowError::not_found(format!("source {source_id} not found")))?;
        if source.direction() != SourceDirection::Import {
            return Err(FlowError::validation(format!("source {source_id} is not an import source")));
        }

        let now = Utc::now();
        let mut run = ImportRun::start(source_id.clone(), task_id.clone(), triggered_by, now);

        let adapter = self.resolve_adapter(source.source_type(), source.config())?;
        let (period_start, period_end) = task.period();
        let fetched = adapter.fetch(Some(period_start), Some(period_end)).await;

        // spec.md §4.4 "Concurrency": every write belonging to this run
        // commits or rolls back together, on the entity database that owns
        // the task — whether the run ends in success or a recorded error.
        let mut tx = pool.begin().await.map_err(db_err)?;
        SqliteImportRunRepository::save_tx(&mut tx, &run).await?;

        let records = match fetched {
            Ok(records) => records,
            Err(e) => {
                run.fail(e.to_string(), Utc::now());
                SqliteImportRunRepository::update_tx(&mut tx, &run).await?;
                source.record_run("error", 0, Some(e.to_string()), Utc::now());
                SqliteDataSourceRepository::update_tx(&mut tx, &source).await?;
                tx.commit().await.map_err(db_err)?;
                return Ok(run);
            }
        };

        // Carried alongside each created document so a later document-id-only
        // lookup (CLI describe/approve) can resolve its pool without first
        // knowing the task — the template/migration algorithms only route
        // project/task/source rows, so import is where a document's own
        // routing row is born. Routing rows live on the shared database
        // (spec.md §4.2), never inside this entity-scoped transaction.
        let entity_tax_id = routing.find_entity_tax_id(&task_id.to_string()).await?;

        let mut created = 0u32;
        for record in &records {
            let document = self.build_document(task_id, source.source_type(), record);
            SqliteDocumentRepository::save_tx(&mut tx, &document).await?;
            SqliteDocumentMetadataRepository::save_tx(&mut tx, &DocumentMetadata::empty(document.id().clone())).await?;
            if let Some(tax_id) = &entity_tax_id {
                routing.save(&ResourceRouting::new(document.id().to_string(), tax_id.clone(), ResourceKind::Document)).await?;
            }
            created += 1;
        }

        task.apply_import_delta(created);
        SqliteTaskRepository::update_tx(&mut tx, &task).await?;

        source.record_run("success", created, None, Utc::now());
        SqliteDataSourceRepository::update_tx(&mut tx, &source).await?;

        run.complete(records.len() as u32, created, 0, Utc::now());
        SqliteImportRunRepository::update_tx(&mut tx, &run).await?;

        tx.commit().await.map_err(db_err)?;
        Ok(run)
    }

    /// Looks the tag up in the adapter registry; for a tag with no
    /// registered adapter, falls back to the development-only mock
    /// generator (spec.md §4.3 "Fallback", §4.4 import step 2) when the
    /// `mock-fallback` feature is compiled in, logging the fallback at
    /// warning level. A known tag that fails to build (bad config) still
    /// propagates its own error — only an unrecognised tag falls back.
    fn resolve_adapter(
        &self,
        source_type: &str,
        config: &exef_domain::services::adapter_contract::AdapterConfig,
    ) -> Result<Box<dyn exef_domain::services::adapter_contract::ImportAdapter>, FlowError> {
        match build_import_adapter(source_type, config) {
            Ok(adapter) => return Ok(adapter),
            Err(e) if IMPORT_TAGS.contains(&source_type) => return Err(e),
            Err(_) => {}
        }

        #[cfg(feature = "mock-fallback")]
        {
            tracing::warn!(tag = source_type, "no adapter registered for this source type, using the mock fallback generator");
            Ok(Box::new(crate::infrastructure::adapters::MockFallbackImportAdapter::new(source_type)))
        }
        #[cfg(not(feature = "mock-fallback"))]
        {
            Err(FlowError::Configuration(format!("unknown import adapter tag '{source_type}'")))
        }
    }

    fn build_document(&self, task_id: &TaskId, source_type: &str, record: &ImportResult) -> Document {
        let mut document = Document::new(task_id.clone(), source_type, record.source_id.clone());
        document.apply_import_fields(
            record.kind,
            record.number.clone(),
            record.contractor_name.clone(),
            record.contractor_tax_id.clone(),
            record.amount_net,
            record.amount_vat,
            record.amount_gross,
            record.currency.clone(),
            record.document_date,
        );
        document.set_original_filename(record.original_filename.clone());

        let date_str = document.document_date().map(|d| d.to_string());
        let amount_str = document.amount_gross().map(|a| a.to_string());
        let input = DocumentIdentityInput {
            contractor_nip: document.contractor_tax_id(),
            number: document.number(),
            document_date: date_str.as_deref(),
            amount_gross: amount_str.as_deref(),
        };
        document.set_doc_id(self.identity.compute(&input, document.kind()));
        document
    }
}
