//! sqlx-backed [`ImportRunRepository`] and [`ExportRunRepository`].

use super::{db_err, enum_to_text, json_to_text, text_to_enum, text_to_json};
use async_trait::async_trait;
use exef_domain::entities::{ExportRun, ImportRun};
use exef_domain::repositories::{ExportRunRepository, ImportRunRepository};
use exef_domain::value_objects::enums::{OutputFormat, RunStatus};
use exef_domain::value_objects::ids::{DataSourceId, ExportRunId, IdentityId, ImportRunId, TaskId};
use exef_domain::FlowError;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};

pub struct SqliteImportRunRepository {
    pool: SqlitePool,
}

impl SqliteImportRunRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn save_via<'e, E>(executor: E, run: &ImportRun) -> Result<(), FlowError>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            "INSERT INTO import_runs (id, source, task, status, started_at, finished_at, triggered_by, errors, \
             docs_found, docs_imported, docs_skipped) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(run.id().to_string())
        .bind(run.source().to_string())
        .bind(run.task().to_string())
        .bind(enum_to_text(&run.status())?)
        .bind(run.started_at())
        .bind(run.finished_at())
        .bind(run.triggered_by().to_string())
        .bind(json_to_text(&run.errors())?)
        .bind(run.docs_found() as i64)
        .bind(run.docs_imported() as i64)
        .bind(run.docs_skipped() as i64)
        .execute(executor)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn update_via<'e, E>(executor: E, run: &ImportRun) -> Result<(), FlowError>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            "UPDATE import_runs SET status = ?, finished_at = ?, errors = ?, docs_found = ?, docs_imported = ?, \
             docs_skipped = ? WHERE id = ?",
        )
        .bind(enum_to_text(&run.status())?)
        .bind(run.finished_at())
        .bind(json_to_text(&run.errors())?)
        .bind(run.docs_found() as i64)
        .bind(run.docs_imported() as i64)
        .bind(run.docs_skipped() as i64)
        .bind(run.id().to_string())
        .execute(executor)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    /// Transaction-scoped counterpart of [`ImportRunRepository::save`].
    pub(crate) async fn save_tx(tx: &mut Transaction<'_, Sqlite>, run: &ImportRun) -> Result<(), FlowError> {
        Self::save_via(&mut **tx, run).await
    }

    /// Transaction-scoped counterpart of [`ImportRunRepository::update`].
    pub(crate) async fn update_tx(tx: &mut Transaction<'_, Sqlite>, run: &ImportRun) -> Result<(), FlowError> {
        Self::update_via(&mut **tx, run).await
    }

    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ImportRun, FlowError> {
        Ok(ImportRun::from_database(
            ImportRunId::from_string(&row.try_get::<String, _>("id").map_err(db_err)?)?,
            DataSourceId::from_string(&row.try_get::<String, _>("source").map_err(db_err)?)?,
            TaskId::from_string(&row.try_get::<String, _>("task").map_err(db_err)?)?,
            text_to_enum::<RunStatus>(&row.try_get::<String, _>("status").map_err(db_err)?)?,
            row.try_get("started_at").map_err(db_err)?,
            row.try_get("finished_at").map_err(db_err)?,
            IdentityId::from_string(&row.try_get::<String, _>("triggered_by").map_err(db_err)?)?,
            text_to_json(&row.try_get::<String, _>("errors").map_err(db_err)?)?,
            row.try_get::<i64, _>("docs_found").map_err(db_err)? as u32,
            row.try_get::<i64, _>("docs_imported").map_err(db_err)? as u32,
            row.try_get::<i64, _>("docs_skipped").map_err(db_err)? as u32,
        ))
    }
}

#[async_trait]
impl ImportRunRepository for SqliteImportRunRepository {
    async fn save(&self, run: &ImportRun) -> Result<(), FlowError> {
        Self::save_via(&self.pool, run).await
    }

    async fn find_by_id(&self, id: &ImportRunId) -> Result<Option<ImportRun>, FlowError> {
        let row = sqlx::query("SELECT * FROM import_runs WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn update(&self, run: &ImportRun) -> Result<(), FlowError> {
        Self::update_via(&self.pool, run).await
    }

    async fn list_for_task(&self, task: &TaskId) -> Result<Vec<ImportRun>, FlowError> {
        let rows = sqlx::query("SELECT * FROM import_runs WHERE task = ? ORDER BY started_at DESC")
            .bind(task.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(Self::from_row).collect()
    }
}

pub struct SqliteExportRunRepository {
    pool: SqlitePool,
}

impl SqliteExportRunRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn save_via<'e, E>(executor: E, run: &ExportRun) -> Result<(), FlowError>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let output_format = run.output_format().map(|f| enum_to_text(&f)).transpose()?;
        sqlx::query(
            "INSERT INTO export_runs (id, source, task, status, started_at, finished_at, triggered_by, errors, \
             docs_exported, docs_failed, output_format, output_filename, output_content) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(run.id().to_string())
        .bind(run.source().to_string())
        .bind(run.task().to_string())
        .bind(enum_to_text(&run.status())?)
        .bind(run.started_at())
        .bind(run.finished_at())
        .bind(run.triggered_by().to_string())
        .bind(json_to_text(&run.errors())?)
        .bind(run.docs_exported() as i64)
        .bind(run.docs_failed() as i64)
        .bind(output_format)
        .bind(run.output_filename())
        .bind(run.output_content())
        .execute(executor)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn update_via<'e, E>(executor: E, run: &ExportRun) -> Result<(), FlowError>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let output_format = run.output_format().map(|f| enum_to_text(&f)).transpose()?;
        sqlx::query(
            "UPDATE export_runs SET status = ?, finished_at = ?, errors = ?, docs_exported = ?, docs_failed = ?, \
             output_format = ?, output_filename = ?, output_content = ? WHERE id = ?",
        )
        .bind(enum_to_text(&run.status())?)
        .bind(run.finished_at())
        .bind(json_to_text(&run.errors())?)
        .bind(run.docs_exported() as i64)
        .bind(run.docs_failed() as i64)
        .bind(output_format)
        .bind(run.output_filename())
        .bind(run.output_content())
        .bind(run.id().to_string())
        .execute(executor)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    /// Transaction-scoped counterpart of [`ExportRunRepository::save`].
    pub(crate) async fn save_tx(tx: &mut Transaction<'_, Sqlite>, run: &ExportRun) -> Result<(), FlowError> {
        Self::save_via(&mut **tx, run).await
    }

    /// Transaction-scoped counterpart of [`ExportRunRepository::update`].
    pub(crate) async fn update_tx(tx: &mut Transaction<'_, Sqlite>, run: &ExportRun) -> Result<(), FlowError> {
        Self::update_via(&mut **tx, run).await
    }

    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ExportRun, FlowError> {
        let output_format: Option<String> = row.try_get("output_format").map_err(db_err)?;
        Ok(ExportRun::from_database(
            ExportRunId::from_string(&row.try_get::<String, _>("id").map_err(db_err)?)?,
            DataSourceId::from_string(&row.try_get::<String, _>("source").map_err(db_err)?)?,
            TaskId::from_string(&row.try_get::<String, _>("task").map_err(db_err)?)?,
            text_to_enum::<RunStatus>(&row.try_get::<String, _>("status").map_err(db_err)?)?,
            row.try_get("started_at").map_err(db_err)?,
            row.try_get("finished_at").map_err(db_err)?,
            IdentityId::from_string(&row.try_get::<String, _>("triggered_by").map_err(db_err)?)?,
            text_to_json(&row.try_get::<String, _>("errors").map_err(db_err)?)?,
            row.try_get::<i64, _>("docs_exported").map_err(db_err)? as u32,
            row.try_get::<i64, _>("docs_failed").map_err(db_err)? as u32,
            output_format.map(|f| text_to_enum::<OutputFormat>(&f)).transpose()?,
            row.try_get("output_filename").map_err(db_err)?,
            row.try_get("output_content").map_err(db_err)?,
        ))
    }
}

#[async_trait]
impl ExportRunRepository for SqliteExportRunRepository {
    async fn save(&self, run: &ExportRun) -> Result<(), FlowError> {
        Self::save_via(&self.pool, run).await
    }

    async fn find_by_id(&self, id: &ExportRunId) -> Result<Option<ExportRun>, FlowError> {
        let row = sqlx::query("SELECT * FROM export_runs WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn update(&self, run: &ExportRun) -> Result<(), FlowError> {
        Self::update_via(&self.pool, run).await
    }

    async fn list_for_task(&self, task: &TaskId) -> Result<Vec<ExportRun>, FlowError> {
        let rows = sqlx::query("SELECT * FROM export_runs WHERE task = ? ORDER BY started_at DESC")
            .bind(task.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(Self::from_row).collect()
    }
}
