// /////////////////////////////////////////////////////////////////////////////
// exef
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Shared -> Per-Entity Migration Walker
//!
//! The storage router's migration operation (spec.md §4.2): walks every
//! entity that has a tax id in the shared database, copies its rows into
//! its own per-entity file in dependency order (identity/entity stubs ->
//! projects -> sources -> tasks -> runs -> documents -> metadata ->
//! relations), and records a routing row for every project, task,
//! document, and source it copies. Routing rows always live in the shared
//! database (spec.md §4.2: "a routing row exists if and only if per-entity
//! storage is enabled"), regardless of where the copied rows end up.
//!
//! Runs one entity at a time. A failure partway through one entity is
//! recorded and does not stop the walk over the remaining entities.

use crate::infrastructure::repositories::{
    db_err, SqliteDataSourceRepository, SqliteDocumentMetadataRepository, SqliteDocumentRelationRepository,
    SqliteDocumentRepository, SqliteEntityMemberRepository, SqliteEntityRepository, SqliteExportRunRepository,
    SqliteIdentityRepository, SqliteImportRunRepository, SqliteProjectAuthorizationRepository,
    SqliteProjectRepository, SqliteRoutingRepository, SqliteTaskRepository,
};
use crate::infrastructure::storage_router::StorageRouter;
use exef_domain::entities::ResourceRouting;
use exef_domain::repositories::{
    DataSourceRepository, DocumentMetadataRepository, DocumentRelationRepository, DocumentRepository,
    EntityMemberRepository, EntityRepository, ExportRunRepository, IdentityRepository, ImportRunRepository,
    ProjectAuthorizationRepository, ProjectRepository, RoutingRepository, TaskRepository,
};
use exef_domain::value_objects::enums::ResourceKind;
use exef_domain::value_objects::ids::EntityId;
use exef_domain::FlowError;
use sqlx::{Row, SqlitePool};
use std::collections::HashSet;
use tracing::{info, warn};

/// Outcome of one [`migrate_shared_to_per_entity`] run.
#[derive(Debug, Default)]
pub struct MigrationReport {
    pub entities_migrated: Vec<String>,
    pub entities_failed: Vec<(String, String)>,
    pub resources_routed: u64,
}

/// Walks every entity with a tax id assigned, copying its rows into its
/// own per-entity database. Only meaningful when the router is configured
/// for [`exef_domain::value_objects::enums::StorageMode::PerEntity`]; the
/// shared database stays untouched (it is read-only source material here).
pub async fn migrate_shared_to_per_entity(router: &StorageRouter) -> Result<MigrationReport, FlowError> {
    let shared = router.shared_pool().clone();
    let mut report = MigrationReport::default();

    let entity_rows = sqlx::query("SELECT id, tax_id FROM entities WHERE tax_id IS NOT NULL AND archived = 0")
        .fetch_all(&shared)
        .await
        .map_err(|e| FlowError::Database(e.to_string()))?;

    for row in entity_rows {
        let entity_id: String = row.try_get("id").map_err(|e| FlowError::Database(e.to_string()))?;
        let tax_id: String = row.try_get("tax_id").map_err(|e| FlowError::Database(e.to_string()))?;

        match migrate_one_entity(router, &shared, &entity_id, &tax_id).await {
            Ok(routed) => {
                report.resources_routed += routed;
                report.entities_migrated.push(tax_id.clone());
                info!(tax_id = %tax_id, routed, "migrated entity to per-entity storage");
            }
            Err(e) => {
                warn!(tax_id = %tax_id, error = %e, "entity migration failed, continuing with next entity");
                report.entities_failed.push((tax_id, e.to_string()));
            }
        }
    }

    Ok(report)
}

async fn migrate_one_entity(router: &StorageRouter, shared: &SqlitePool, entity_id: &str, tax_id: &str) -> Result<u64, FlowError> {
    let entity_id = EntityId::from_string(entity_id)?;

    let entity_repo = SqliteEntityRepository::new(shared.clone());
    let entity = entity_repo
        .find_by_id(&entity_id)
        .await?
        .ok_or_else(|| FlowError::not_found(format!("entity {entity_id} vanished mid-migration")))?;

    let identity_repo = SqliteIdentityRepository::new(shared.clone());
    let owner = identity_repo
        .find_by_id(entity.owner())
        .await?
        .ok_or_else(|| FlowError::not_found(format!("owner identity {} missing", entity.owner())))?;

    let target = router.entity_pool(tax_id).await?;

    let routing = SqliteRoutingRepository::new(shared.clone());
    let mut routed = 0u64;

    let member_src = SqliteEntityMemberRepository::new(shared.clone());
    let project_src = SqliteProjectRepository::new(shared.clone());
    let auth_src = SqliteProjectAuthorizationRepository::new(shared.clone());
    let source_src = SqliteDataSourceRepository::new(shared.clone());
    let task_src = SqliteTaskRepository::new(shared.clone());
    let doc_src = SqliteDocumentRepository::new(shared.clone());
    let meta_src = SqliteDocumentMetadataRepository::new(shared.clone());
    let relation_src = SqliteDocumentRelationRepository::new(shared.clone());
    let import_run_src = SqliteImportRunRepository::new(shared.clone());
    let export_run_src = SqliteExportRunRepository::new(shared.clone());

    let mut seen_relations = HashSet::new();

    // spec.md §4.4 "Concurrency" / §5 "Recovery": the copy of one entity's
    // rows into its own database commits or rolls back as a single
    // transaction. `ResourceRouting` rows stay on the shared database
    // (spec.md §4.2) and are written through `routing`, outside `tx`.
    let mut tx = target.begin().await.map_err(db_err)?;

    StorageRouter::sync_identity_stub_tx(&mut tx, &owner).await?;
    StorageRouter::sync_entity_stub_tx(&mut tx, &entity).await?;

    for member in member_src.list_for_entity(&entity_id).await? {
        SqliteEntityMemberRepository::save_tx(&mut tx, &member).await?;
    }

    for project in project_src.list_for_entity(&entity_id).await? {
        SqliteProjectRepository::save_tx(&mut tx, &project).await?;
        routing
            .save(&ResourceRouting::new(project.id().to_string(), tax_id, ResourceKind::Project))
            .await?;
        routed += 1;

        for auth in auth_src.list_for_project(project.id()).await? {
            SqliteProjectAuthorizationRepository::save_tx(&mut tx, &auth).await?;
        }

        for source in source_src.list_for_project(project.id()).await? {
            SqliteDataSourceRepository::save_tx(&mut tx, &source).await?;
            routing
                .save(&ResourceRouting::new(source.id().to_string(), tax_id, ResourceKind::Source))
                .await?;
            routed += 1;
        }

        for task in task_src.list_for_project(project.id()).await? {
            SqliteTaskRepository::save_tx(&mut tx, &task).await?;
            routing
                .save(&ResourceRouting::new(task.id().to_string(), tax_id, ResourceKind::Task))
                .await?;
            routed += 1;

            for run in import_run_src.list_for_task(task.id()).await? {
                SqliteImportRunRepository::save_tx(&mut tx, &run).await?;
            }
            for run in export_run_src.list_for_task(task.id()).await? {
                SqliteExportRunRepository::save_tx(&mut tx, &run).await?;
            }

            for document in doc_src.list_for_task(task.id()).await? {
                SqliteDocumentRepository::save_tx(&mut tx, &document).await?;
                routing
                    .save(&ResourceRouting::new(document.id().to_string(), tax_id, ResourceKind::Document))
                    .await?;
                routed += 1;

                if let Some(metadata) = meta_src.find_for_document(document.id()).await? {
                    SqliteDocumentMetadataRepository::save_tx(&mut tx, &metadata).await?;
                }

                for relation in relation_src.list_for_document(document.id()).await? {
                    if seen_relations.insert(relation.id().to_string()) {
                        SqliteDocumentRelationRepository::save_tx(&mut tx, &relation).await?;
                    }
                }
            }
        }
    }

    tx.commit().await.map_err(db_err)?;
    Ok(routed)
}
