// /////////////////////////////////////////////////////////////////////////////
// exef
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! End-to-end flow engine tests driving the application use cases against
//! a real (in-memory or tempfile) SQLite pool, exercising spec.md §8's
//! testable properties beyond the pure-domain unit tests in `exef-domain`.

use exef::application::{ApproveDocumentUseCase, DescribeDocumentUseCase, DuplicatesUseCase, ExportOutcome, ExportUseCase, ImportUseCase, ProjectFromTemplateUseCase, UploadCsvUseCase};
use exef::infrastructure::adapters::parse_csv_text;
use exef::infrastructure::config::{AuthSettings, Settings, StorageSettings, SyncSettings};
use exef::infrastructure::db;
use exef::infrastructure::repositories::{
    SqliteDataSourceRepository, SqliteDocumentRepository, SqliteEntityRepository, SqliteProjectTemplateRepository, SqliteTaskRepository,
};
use exef::infrastructure::storage_router::StorageRouter;
use exef_domain::entities::{DataSource, Entity, ProjectTemplate, Task};
use exef_domain::repositories::{DataSourceRepository, DocumentRepository, EntityRepository, ProjectTemplateRepository, TaskRepository};
use exef_domain::services::access_resolver::EffectiveAccess;
use exef_domain::value_objects::enums::{EntityKind, ProjectKind, SourceDirection, StorageMode, TaskRecurrence};
use exef_domain::value_objects::ids::{IdentityId, ProjectId};
use sqlx::Row;
use std::sync::Arc;

fn full_access() -> EffectiveAccess {
    EffectiveAccess {
        can_view: true,
        can_describe: true,
        can_approve: true,
        can_export: true,
        can_manage_projects: true,
    }
}

fn shared_settings() -> Settings {
    Settings {
        storage: StorageSettings {
            database_url: "sqlite::memory:".to_string(),
            use_entity_db: false,
            entity_db_dir: std::env::temp_dir(),
            entity_db_path_template: "{nip}.db".to_string(),
        },
        sync: SyncSettings {
            remote_sync_url: None,
            sync_enabled: false,
        },
        auth: AuthSettings {
            jwt_secret: None,
            jwt_algorithm: "HS256".to_string(),
            cors_origins: Vec::new(),
        },
        smtp: Default::default(),
        adapter_concurrency: 4,
    }
}

/// A task with one `csv` import source and one `csv` export source, wired
/// against a shared in-memory pool. Returns `(router, task, import_source,
/// export_source)`. Backed by a tempfile database rather than
/// `sqlite::memory:` — the connection pool hands out more than one
/// connection, and each `:memory:` connection is its own private database,
/// so a save on one connection can be invisible to a find on another.
async fn seed_task_with_sources(db_path: &std::path::Path, csv_data: &str) -> (Arc<StorageRouter>, Task, DataSource, DataSource) {
    let url = db::file_url(db_path).unwrap();
    let pool = db::open_pool(&url).await.unwrap();
    let router = Arc::new(StorageRouter::new(StorageMode::Shared, pool.clone(), shared_settings()));

    let task_repo = SqliteTaskRepository::new(pool.clone());
    let source_repo = SqliteDataSourceRepository::new(pool.clone());

    let period_start = chrono::NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    let period_end = chrono::NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
    let deadline = chrono::NaiveDate::from_ymd_opt(2026, 4, 20).unwrap();
    let task = Task::new(ProjectId::new(), "Marzec 2026", period_start, period_end, deadline);
    task_repo.save(&task).await.unwrap();

    let mut import_source = DataSource::new(task.project().clone(), SourceDirection::Import, "csv", "Import CSV");
    let mut config = std::collections::HashMap::new();
    config.insert("csv_data".to_string(), serde_json::json!(csv_data));
    import_source.set_config(config);
    source_repo.save(&import_source).await.unwrap();

    let export_source = DataSource::new(task.project().clone(), SourceDirection::Export, "csv", "Export CSV");
    source_repo.save(&export_source).await.unwrap();

    (router, task, import_source, export_source)
}

#[tokio::test]
async fn import_counter_update_scenario() {
    let csv_data = "number;brutto;kontrahent;nip;data\n\
                     FV/001/2026;100,00;ACME;5213003700;2026-03-01\n\
                     FV/002/2026;200,00;Beta;5213003700;2026-03-05\n\
                     FV/003/2026;300,00;Gamma;5213003700;2026-03-10\n\
                     FV/004/2026;400,00;Delta;5213003700;2026-03-15\n\
                     FV/005/2026;500,00;Epsilon;5213003700;2026-03-20\n";
    let tmp = tempfile::tempdir().unwrap();
    let (router, task, import_source, _export_source) = seed_task_with_sources(&tmp.path().join("flow.db"), csv_data).await;
    let access = full_access();
    let triggered_by = IdentityId::new();

    let run = ImportUseCase::new(router.clone())
        .execute(task.id(), import_source.id(), triggered_by, &access)
        .await
        .unwrap();

    assert_eq!(run.docs_imported(), 5);

    let task_repo = SqliteTaskRepository::new(router.shared_pool().clone());
    let reloaded = task_repo.find_by_id(task.id()).await.unwrap().unwrap();
    assert_eq!(reloaded.counters().docs_total, 5);
    assert_eq!(reloaded.counters().docs_described, 0);
    assert!(reloaded.counters().is_consistent());
}

#[tokio::test]
async fn export_with_nothing_described_returns_polish_message_and_no_run() {
    let csv_data = "number;brutto;kontrahent\nFV/1;100,00;ACME\n";
    let tmp = tempfile::tempdir().unwrap();
    let (router, task, import_source, export_source) = seed_task_with_sources(&tmp.path().join("flow.db"), csv_data).await;
    let access = full_access();
    let triggered_by = IdentityId::new();

    ImportUseCase::new(router.clone()).execute(task.id(), import_source.id(), triggered_by.clone(), &access).await.unwrap();

    let outcome = ExportUseCase::new(router.clone())
        .execute(task.id(), export_source.id(), triggered_by, None, &access)
        .await
        .unwrap();

    match outcome {
        ExportOutcome::NothingToExport { message } => assert_eq!(message, "Brak opisanych dokumentów do eksportu. Najpierw opisz dokumenty."),
        ExportOutcome::Completed(_) => panic!("expected NothingToExport when no document has been described"),
    }

    let task_repo = SqliteTaskRepository::new(router.shared_pool().clone());
    let reloaded = task_repo.find_by_id(task.id()).await.unwrap().unwrap();
    assert_eq!(reloaded.counters().docs_exported, 0);
}

#[tokio::test]
async fn describe_then_approve_then_export_round_trips_through_csv() {
    let csv_data = "number;brutto;kontrahent;nip;data\nFV/001/2026;1500,00;ACME;5213003700;2026-03-05\n";
    let tmp = tempfile::tempdir().unwrap();
    let (router, task, import_source, export_source) = seed_task_with_sources(&tmp.path().join("flow.db"), csv_data).await;
    let access = full_access();
    let identity = IdentityId::new();

    ImportUseCase::new(router.clone()).execute(task.id(), import_source.id(), identity.clone(), &access).await.unwrap();

    let document_repo = SqliteDocumentRepository::new(router.shared_pool().clone());
    let documents = document_repo.list_for_task(task.id()).await.unwrap();
    assert_eq!(documents.len(), 1);
    let document_id = documents[0].id().clone();

    DescribeDocumentUseCase::new(router.clone())
        .execute(&document_id, identity.clone(), Some("Usługi IT".to_string()), None, None, &access)
        .await
        .unwrap();
    ApproveDocumentUseCase::new(router.clone()).execute(&document_id, identity.clone(), &access).await.unwrap();

    let outcome = ExportUseCase::new(router.clone())
        .execute(task.id(), export_source.id(), identity, None, &access)
        .await
        .unwrap();

    let run = match outcome {
        ExportOutcome::Completed(run) => run,
        ExportOutcome::NothingToExport { message } => panic!("expected a completed export, got: {message}"),
    };
    assert_eq!(run.docs_exported(), 1);

    let content = run.output_content().expect("export run should carry the rendered CSV content");
    let reimported = parse_csv_text(content, "reimport").unwrap();
    assert_eq!(reimported.len(), 1);
    assert_eq!(reimported[0].number.as_deref(), Some("FV/001/2026"));
    assert_eq!(reimported[0].contractor_name.as_deref(), Some("ACME"));
    assert_eq!(reimported[0].contractor_tax_id.as_deref(), Some("5213003700"));
    assert_eq!(reimported[0].amount_gross.unwrap().to_string(), "1500.00");
    assert_eq!(reimported[0].document_date, chrono::NaiveDate::from_ymd_opt(2026, 3, 5));

    let task_repo = SqliteTaskRepository::new(router.shared_pool().clone());
    let reloaded = task_repo.find_by_id(task.id()).await.unwrap().unwrap();
    assert!(reloaded.counters().is_consistent());
    assert_eq!(reloaded.counters().docs_exported, 1);
}

#[tokio::test]
async fn per_entity_storage_isolation() {
    let tmp = tempfile::tempdir().unwrap();
    let settings = Settings {
        storage: StorageSettings {
            database_url: "sqlite::memory:".to_string(),
            use_entity_db: true,
            entity_db_dir: tmp.path().to_path_buf(),
            entity_db_path_template: "{nip}.db".to_string(),
        },
        ..shared_settings()
    };
    let shared_pool = db::open_pool("sqlite::memory:").await.unwrap();
    let router = StorageRouter::new(StorageMode::PerEntity, shared_pool.clone(), settings);

    let e1_pool = router.entity_pool("1111111119").await.unwrap();
    let e2_pool = router.entity_pool("9876543210").await.unwrap();

    sqlx::query("INSERT INTO projects (id, entity, name, kind, year, period_start, period_end) VALUES ('p1', 'e1', 'Rok 2026', 'bookkeeping', 2026, '2026-01-01', '2026-12-31')")
        .execute(&e1_pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO projects (id, entity, name, kind, year, period_start, period_end) VALUES ('p2', 'e2', 'Rok 2026', 'bookkeeping', 2026, '2026-01-01', '2026-12-31')")
        .execute(&e2_pool)
        .await
        .unwrap();

    let count = |pool: sqlx::SqlitePool| async move {
        sqlx::query("SELECT count(*) AS c FROM projects").fetch_one(&pool).await.unwrap().get::<i64, _>("c")
    };

    assert_eq!(count(e1_pool).await, 1);
    assert_eq!(count(e2_pool).await, 1);
    assert_eq!(count(shared_pool).await, 0);

    assert!(tmp.path().join("1111111119.db").exists());
    assert!(tmp.path().join("9876543210.db").exists());
}

/// spec.md's end-to-end scenario 1: the same invoice reaching a task
/// through two different creation paths (the `csv` import adapter and the
/// `/flow/upload-csv` path) lands on the same deterministic identifier and
/// is surfaced as a duplicate pair.
#[tokio::test]
async fn same_invoice_from_two_creation_paths_is_flagged_as_a_duplicate() {
    let csv_data = "number;brutto;kontrahent;nip;data\nFV/777/2026;250,00;ACME;5213003700;2026-03-12\n";
    let tmp = tempfile::tempdir().unwrap();
    let (router, task, import_source, _export_source) = seed_task_with_sources(&tmp.path().join("flow.db"), csv_data).await;
    let access = full_access();

    ImportUseCase::new(router.clone())
        .execute(task.id(), import_source.id(), IdentityId::new(), &access)
        .await
        .unwrap();

    let upload_body = csv_data.as_bytes();
    let upload_result = UploadCsvUseCase::new(router.clone()).execute(task.id(), upload_body, &access).await.unwrap();
    assert_eq!(upload_result.imported, 1);
    assert!(upload_result.errors.is_empty());

    let document_repo = SqliteDocumentRepository::new(router.shared_pool().clone());
    let documents = document_repo.list_for_task(task.id()).await.unwrap();
    assert_eq!(documents.len(), 2);

    let groups = DuplicatesUseCase::new(router.clone()).execute(task.id(), &access).await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].document_ids.len(), 2);
}

/// spec.md's end-to-end scenario 2: a monthly template expands into twelve
/// tasks with January's deadline on 2026-02-20 and December's rolling into
/// the next year, once it has actually gone through project creation.
#[tokio::test]
async fn project_from_monthly_template_creates_twelve_tasks_and_default_sources() {
    let tmp = tempfile::tempdir().unwrap();
    let url = db::file_url(&tmp.path().join("flow.db")).unwrap();
    let pool = db::open_pool(&url).await.unwrap();
    let router = Arc::new(StorageRouter::new(StorageMode::Shared, pool.clone(), shared_settings()));
    let access = full_access();

    let entity_repo = SqliteEntityRepository::new(pool.clone());
    let mut entity = Entity::new(EntityKind::SoleProprietorship, "ACME Kowalski", IdentityId::new());
    entity.set_tax_id(Some("5213003700".to_string()));
    entity_repo.save(&entity).await.unwrap();

    let template_repo = SqliteProjectTemplateRepository::new(pool.clone());
    let template = ProjectTemplate::new(ProjectKind::Bookkeeping, TaskRecurrence::Monthly, "Rozliczenie za {month_name} {year}", 20);
    template_repo.save(&template).await.unwrap();

    let project = ProjectFromTemplateUseCase::new(router.clone())
        .execute(entity.id(), template.id(), 2026, None, None, &access)
        .await
        .unwrap();

    let task_repo = SqliteTaskRepository::new(pool.clone());
    let tasks = sqlx::query("SELECT count(*) AS c FROM tasks WHERE project = ?")
        .bind(project.id().to_string())
        .fetch_one(&pool)
        .await
        .unwrap()
        .get::<i64, _>("c");
    assert_eq!(tasks, 12);

    let january = sqlx::query("SELECT deadline FROM tasks WHERE project = ? ORDER BY period_start ASC LIMIT 1")
        .bind(project.id().to_string())
        .fetch_one(&pool)
        .await
        .unwrap()
        .get::<String, _>("deadline");
    assert_eq!(january, "2026-02-20");

    let december = sqlx::query("SELECT deadline FROM tasks WHERE project = ? ORDER BY period_start DESC LIMIT 1")
        .bind(project.id().to_string())
        .fetch_one(&pool)
        .await
        .unwrap()
        .get::<String, _>("deadline");
    assert_eq!(december, "2027-01-20");

    let source_count = sqlx::query("SELECT count(*) AS c FROM data_sources WHERE project = ?")
        .bind(project.id().to_string())
        .fetch_one(&pool)
        .await
        .unwrap()
        .get::<i64, _>("c");
    assert_eq!(source_count, 4);
    let _ = task_repo;
}

/// spec.md §4.3 "Fallback": an import source whose `source_type` has no
/// registered adapter still produces a run, via the mock fallback
/// generator, when the crate is built with the `mock-fallback` feature.
#[cfg(feature = "mock-fallback")]
#[tokio::test]
async fn unregistered_source_type_falls_back_to_mock_generator() {
    let tmp = tempfile::tempdir().unwrap();
    let (router, task, _import_source, _export_source) = seed_task_with_sources(&tmp.path().join("flow.db"), "number;brutto;kontrahent\n").await;
    let access = full_access();

    let source_repo = SqliteDataSourceRepository::new(router.shared_pool().clone());
    let unknown_source = DataSource::new(task.project().clone(), SourceDirection::Import, "custom_erp", "Nierozpoznany system");
    source_repo.save(&unknown_source).await.unwrap();

    let run = ImportUseCase::new(router.clone())
        .execute(task.id(), unknown_source.id(), IdentityId::new(), &access)
        .await
        .unwrap();

    assert_eq!(run.docs_imported(), 1);

    let document_repo = SqliteDocumentRepository::new(router.shared_pool().clone());
    let documents = document_repo.list_for_task(task.id()).await.unwrap();
    assert!(documents.iter().any(|d| d.source_kind() == "custom_erp"));
}
