// /////////////////////////////////////////////////////////////////////////////
// exef
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! `exef` CLI entry point. Each subcommand runs one flow-engine use case
//! to completion and exits — the HTTP surface spec.md §6 describes is out
//! of scope, this binary is the operational/testing entry point.

use chrono::NaiveDate;
use exef::application::{ApproveDocumentUseCase, DescribeDocumentUseCase, DuplicatesUseCase, ExportOutcome, ExportUseCase, ImportUseCase, ProjectFromTemplateUseCase, UploadCsvUseCase};
use exef::infrastructure::config::Settings;
use exef::infrastructure::db;
use exef::infrastructure::logging::init_tracing;
use exef::infrastructure::migration::migrate_shared_to_per_entity;
use exef::infrastructure::storage_router::StorageRouter;
use exef_bootstrap::cli::ValidatedCommand;
use exef_bootstrap::{bootstrap_cli, result_to_exit_code};
use exef_domain::services::access_resolver::EffectiveAccess;
use exef_domain::value_objects::enums::StorageMode;
use exef_domain::value_objects::ids::{DataSourceId, DocumentId, EntityId, IdentityId, ProjectTemplateId, TaskId};
use exef_domain::FlowError;
use std::sync::Arc;

/// The CLI has no session/authentication concept (spec.md §1 scopes that
/// out) — every command runs with full effective access, the same way a
/// trusted operator console would.
fn cli_access() -> EffectiveAccess {
    EffectiveAccess {
        can_view: true,
        can_describe: true,
        can_approve: true,
        can_export: true,
        can_manage_projects: true,
    }
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = match bootstrap_cli() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Błąd argumentów: {e}");
            return std::process::ExitCode::from(64);
        }
    };

    init_tracing(cli.verbose);

    let result = run(cli.command).await;
    if let Ok(output) = &result {
        println!("{output}");
    }
    result_to_exit_code(result.map(|_| ()))
}

async fn run(command: ValidatedCommand) -> Result<String, FlowError> {
    let settings = Settings::load(None).map_err(|e| FlowError::Configuration(e.to_string()))?;
    let shared_pool = db::open_pool(&settings.storage.database_url).await?;
    let mode = if settings.storage.use_entity_db { StorageMode::PerEntity } else { StorageMode::Shared };
    let router = Arc::new(StorageRouter::new(mode, shared_pool, settings));
    let access = cli_access();

    match command {
        ValidatedCommand::Import { source, task, triggered_by } => {
            let run = ImportUseCase::new(router)
                .execute(&TaskId::from_string(&task)?, &DataSourceId::from_string(&source)?, IdentityId::from_string(&triggered_by)?, &access)
                .await?;
            Ok(format!(
                "{{\"id\":\"{}\",\"status\":{:?},\"docs_found\":{},\"docs_imported\":{},\"docs_skipped\":{}}}",
                run.id(),
                run.status(),
                run.docs_found(),
                run.docs_imported(),
                run.docs_skipped()
            ))
        }
        ValidatedCommand::Export {
            source,
            task,
            triggered_by,
            documents,
            output: _,
        } => {
            let document_ids = if documents.is_empty() {
                None
            } else {
                Some(documents.iter().map(|d| DocumentId::from_string(d)).collect::<Result<Vec<_>, _>>()?)
            };
            let outcome = ExportUseCase::new(router)
                .execute(
                    &TaskId::from_string(&task)?,
                    &DataSourceId::from_string(&source)?,
                    IdentityId::from_string(&triggered_by)?,
                    document_ids.as_deref(),
                    &access,
                )
                .await?;
            match outcome {
                ExportOutcome::Completed(run) => Ok(format!(
                    "{{\"ok\":true,\"id\":\"{}\",\"status\":{:?},\"docs_exported\":{},\"filename\":{:?}}}",
                    run.id(),
                    run.status(),
                    run.docs_exported(),
                    run.output_filename()
                )),
                ExportOutcome::NothingToExport { message } => Ok(format!("{{\"ok\":false,\"message\":\"{message}\",\"docs_exported\":0}}")),
            }
        }
        ValidatedCommand::UploadCsv { task, file } => {
            let body = tokio::fs::read(&file).await.map_err(|e| FlowError::Validation(format!("cannot read {}: {e}", file.display())))?;
            let result = UploadCsvUseCase::new(router).execute(&TaskId::from_string(&task)?, &body, &access).await?;
            Ok(format!("{{\"ok\":true,\"imported\":{},\"errors\":{}}}", result.imported, result.errors.len()))
        }
        ValidatedCommand::TestConnection { source } => {
            let _ = source;
            Err(FlowError::Configuration("test-connection requires a wired DataSource lookup, not available from the CLI alone".to_string()))
        }
        ValidatedCommand::ProjectFromTemplate {
            entity,
            template,
            year,
            period_start,
            period_end,
            name,
        } => {
            let period = match (period_start, period_end) {
                (Some(s), Some(e)) => Some((parse_date(&s)?, parse_date(&e)?)),
                _ => None,
            };
            let project = ProjectFromTemplateUseCase::new(router)
                .execute(&EntityId::from_string(&entity)?, &ProjectTemplateId::from_string(&template)?, year, name, period, &access)
                .await?;
            Ok(format!("{{\"id\":\"{}\",\"name\":\"{}\"}}", project.id(), project.name()))
        }
        ValidatedCommand::Migrate => {
            let report = migrate_shared_to_per_entity(&router).await?;
            Ok(format!("{report:?}"))
        }
        ValidatedCommand::DescribeDocument {
            document,
            editor,
            category,
            description,
            tags,
        } => {
            let tags = tags.map(|t| t.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect());
            DescribeDocumentUseCase::new(router)
                .execute(&DocumentId::from_string(&document)?, IdentityId::from_string(&editor)?, category, description, tags, &access)
                .await?;
            Ok("{\"ok\":true}".to_string())
        }
        ValidatedCommand::ApproveDocument { document, approver } => {
            ApproveDocumentUseCase::new(router)
                .execute(&DocumentId::from_string(&document)?, IdentityId::from_string(&approver)?, &access)
                .await?;
            Ok("{\"ok\":true}".to_string())
        }
        ValidatedCommand::Duplicates { task } => {
            let groups = DuplicatesUseCase::new(router).execute(&TaskId::from_string(&task)?, &access).await?;
            Ok(format!("{{\"groups\":{}}}", groups.len()))
        }
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, FlowError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| FlowError::validation(format!("invalid date {s:?}, expected YYYY-MM-DD")))
}
