// /////////////////////////////////////////////////////////////////////////////
// exef
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Document review workflow: `PATCH /documents/{id}/metadata`,
//! `POST /documents/{id}/approve`, and the duplicate-listing reads
//! (spec.md §6).

use crate::infrastructure::repositories::{db_err, SqliteDocumentMetadataRepository, SqliteDocumentRepository, SqliteRoutingRepository, SqliteTaskRepository};
use crate::infrastructure::storage_router::StorageRouter;
use crate::presentation::DuplicateGroup;
use chrono::Utc;
use exef_domain::repositories::{DocumentMetadataRepository, DocumentRepository, TaskRepository};
use exef_domain::services::access_resolver::{AccessResolver, EffectiveAccess};
use exef_domain::value_objects::enums::DocumentStatus;
use exef_domain::value_objects::ids::{DocumentId, IdentityId, TaskId};
use exef_domain::FlowError;
use std::sync::Arc;

pub struct DescribeDocumentUseCase {
    router: Arc<StorageRouter>,
}

impl DescribeDocumentUseCase {
    pub fn new(router: Arc<StorageRouter>) -> Self {
        Self { router }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn execute(
        &self,
        document_id: &DocumentId,
        editor: IdentityId,
        category: Option<String>,
        description: Option<String>,
        tags: Option<Vec<String>>,
        access: &EffectiveAccess,
    ) -> Result<(), FlowError> {
        AccessResolver::new().require_describe(access)?;

        let routing = SqliteRoutingRepository::new(self.router.shared_pool().clone());
        let pool = self.router.pool_for_resource(&routing, &document_id.to_string()).await?;

        let document_repo = SqliteDocumentRepository::new(pool.clone());
        let metadata_repo = SqliteDocumentMetadataRepository::new(pool.clone());
        let task_repo = SqliteTaskRepository::new(pool.clone());

        let mut document = document_repo
            .find_by_id(document_id)
            .await?
            .ok_or_else(|| FlowError::not_found(format!("document {document_id} not found")))?;
        let mut metadata = metadata_repo
            .find_for_document(document_id)
            .await?
            .ok_or_else(|| FlowError::not_found(format!("metadata for document {document_id} not found")))?;

        let was_new = matches!(document.status(), DocumentStatus::New);
        metadata.apply_patch(category, description, tags, editor, Utc::now());

        let mut tx = pool.begin().await.map_err(db_err)?;
        SqliteDocumentMetadataRepository::update_tx(&mut tx, &metadata).await?;

        if was_new {
            document.advance_status(DocumentStatus::Described)?;
            SqliteDocumentRepository::update_tx(&mut tx, &document).await?;

            let mut task = task_repo
                .find_by_id(document.task())
                .await?
                .ok_or_else(|| FlowError::not_found(format!("task {} not found", document.task())))?;
            task.apply_describe_delta(1)?;
            SqliteTaskRepository::update_tx(&mut tx, &task).await?;
        }

        tx.commit().await.map_err(db_err)?;
        Ok(())
    }
}

pub struct ApproveDocumentUseCase {
    router: Arc<StorageRouter>,
}

impl ApproveDocumentUseCase {
    pub fn new(router: Arc<StorageRouter>) -> Self {
        Self { router }
    }

    pub async fn execute(&self, document_id: &DocumentId, _approver: IdentityId, access: &EffectiveAccess) -> Result<(), FlowError> {
        AccessResolver::new().require_approve(access)?;

        let routing = SqliteRoutingRepository::new(self.router.shared_pool().clone());
        let pool = self.router.pool_for_resource(&routing, &document_id.to_string()).await?;

        let document_repo = SqliteDocumentRepository::new(pool.clone());
        let task_repo = SqliteTaskRepository::new(pool.clone());

        let mut document = document_repo
            .find_by_id(document_id)
            .await?
            .ok_or_else(|| FlowError::not_found(format!("document {document_id} not found")))?;

        if document.status() != DocumentStatus::Described {
            return Err(FlowError::validation(format!("document {document_id} must be described before it can be approved")));
        }
        document.advance_status(DocumentStatus::Approved)?;

        let mut task = task_repo
            .find_by_id(document.task())
            .await?
            .ok_or_else(|| FlowError::not_found(format!("task {} not found", document.task())))?;
        task.apply_approve_delta(1)?;

        let mut tx = pool.begin().await.map_err(db_err)?;
        SqliteDocumentRepository::update_tx(&mut tx, &document).await?;
        SqliteTaskRepository::update_tx(&mut tx, &task).await?;
        tx.commit().await.map_err(db_err)?;

        Ok(())
    }
}

pub struct DuplicatesUseCase {
    router: Arc<StorageRouter>,
}

impl DuplicatesUseCase {
    pub fn new(router: Arc<StorageRouter>) -> Self {
        Self { router }
    }

    pub async fn execute(&self, task_id: &TaskId, access: &EffectiveAccess) -> Result<Vec<DuplicateGroup>, FlowError> {
        AccessResolver::new().require_view(access)?;

        let routing = SqliteRoutingRepository::new(self.router.shared_pool().clone());
        let pool = self.router.pool_for_resource(&routing, &task_id.to_string()).await?;
        let document_repo = SqliteDocumentRepository::new(pool);

        let groups = document_repo.find_duplicates_in_task(task_id).await?;
        Ok(groups
            .into_iter()
            .map(|(doc_id, documents)| DuplicateGroup {
                doc_id,
                document_ids: documents.iter().map(|d| d.id().clone()).collect(),
            })
            .collect())
    }
}
