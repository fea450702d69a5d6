// /////////////////////////////////////////////////////////////////////////////
// exef
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `POST /flow/upload-csv` (spec.md §4.4 "CSV upload path"): decodes the
//! multipart body, reuses the `csv` adapter's parsing, creates documents
//! directly on the task without opening a `DataSource` or `ImportRun`.

use crate::infrastructure::adapters::parse_csv_text;
use crate::infrastructure::repositories::{db_err, SqliteDocumentMetadataRepository, SqliteDocumentRepository, SqliteRoutingRepository, SqliteTaskRepository};
use crate::infrastructure::storage_router::StorageRouter;
use encoding_rs::WINDOWS_1250;
use exef_domain::entities::{Document, DocumentMetadata, ResourceRouting};
use exef_domain::repositories::{RoutingRepository, TaskRepository};
use exef_domain::services::access_resolver::{AccessResolver, EffectiveAccess};
use exef_domain::services::document_identity_service::{DocumentIdentityInput, DocumentIdentityService, Sha256DocumentIdentity};
use exef_domain::value_objects::enums::ResourceKind;
use exef_domain::value_objects::ids::TaskId;
use exef_domain::FlowError;
use std::sync::Arc;

pub struct UploadCsvResult {
    pub imported: u32,
    pub errors: Vec<String>,
}

pub struct UploadCsvUseCase {
    router: Arc<StorageRouter>,
    identity: Sha256DocumentIdentity,
}

impl UploadCsvUseCase {
    pub fn new(router: Arc<StorageRouter>) -> Self {
        Self {
            router,
            identity: Sha256DocumentIdentity::new(),
        }
    }

    pub async fn execute(&self, task_id: &TaskId, body: &[u8], access: &EffectiveAccess) -> Result<UploadCsvResult, FlowError> {
        AccessResolver::new().require_describe(access)?;

        let routing = SqliteRoutingRepository::new(self.router.shared_pool().clone());
        let pool = self.router.pool_for_resource(&routing, &task_id.to_string()).await?;

        let task_repo = SqliteTaskRepository::new(pool.clone());

        let mut task = task_repo
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| FlowError::not_found(format!("task {task_id} not found")))?;

        let text = decode_csv_body(body);
        let records = parse_csv_text(&text, "upload")?;
        let entity_tax_id = routing.find_entity_tax_id(&task_id.to_string()).await?;

        // spec.md §4.4 "Concurrency": every write belonging to this upload
        // commits or rolls back together, on the entity database that owns
        // the task. `ResourceRouting` rows stay outside, on the shared
        // database (spec.md §4.2).
        let mut tx = pool.begin().await.map_err(db_err)?;

        let mut imported = 0u32;
        let errors = Vec::new();
        for record in &records {
            let mut document = Document::new(task_id.clone(), "upload", record.source_id.clone());
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
            let date_str = document.document_date().map(|d| d.to_string());
            let amount_str = document.amount_gross().map(|a| a.to_string());
            let input = DocumentIdentityInput {
                contractor_nip: document.contractor_tax_id(),
                number: document.number(),
                document_date: date_str.as_deref(),
                amount_gross: amount_str.as_deref(),
            };
            document.set_doc_id(self.identity.compute(&input, document.kind()));

            SqliteDocumentRepository::save_tx(&mut tx, &document).await?;
            SqliteDocumentMetadataRepository::save_tx(&mut tx, &DocumentMetadata::empty(document.id().clone())).await?;
            if let Some(tax_id) = &entity_tax_id {
                routing.save(&ResourceRouting::new(document.id().to_string(), tax_id.clone(), ResourceKind::Document)).await?;
            }
            imported += 1;
        }

        task.apply_import_delta(imported);
        SqliteTaskRepository::update_tx(&mut tx, &task).await?;
        tx.commit().await.map_err(db_err)?;

        Ok(UploadCsvResult { imported, errors })
    }
}

/// UTF-8 (with or without a BOM) first, CP1250 as the legacy-Excel fallback.
fn decode_csv_body(body: &[u8]) -> String {
    let trimmed = body.strip_prefix(b"\xef\xbb\xbf").unwrap_or(body);
    match std::str::from_utf8(trimmed) {
        Ok(text) => text.to_string(),
        Err(_) => WINDOWS_1250.decode(trimmed).0.into_owned(),
    }
}
