//! sqlx-backed [`DataSourceRepository`].

use super::{db_err, enum_to_text, text_to_enum, text_to_json};
use async_trait::async_trait;
use exef_domain::entities::DataSource;
use exef_domain::repositories::DataSourceRepository;
use exef_domain::value_objects::enums::SourceDirection;
use exef_domain::value_objects::ids::{DataSourceId, ProjectId};
use exef_domain::FlowError;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};

pub struct SqliteDataSourceRepository {
    pool: SqlitePool,
}

impl SqliteDataSourceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn save_via<'e, E>(executor: E, source: &DataSource) -> Result<(), FlowError>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            "INSERT INTO data_sources (id, project, direction, source_type, display_name, config, active, \
             auto_pull, pull_interval_minutes, last_run_at, last_run_status, last_run_count, last_run_error) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(source.id().to_string())
        .bind(source.project().to_string())
        .bind(enum_to_text(&source.direction())?)
        .bind(source.source_type())
        .bind(source.display_name())
        .bind(serde_json::to_string(source.config())?)
        .bind(source.is_active())
        .bind(source.auto_pull())
        .bind(source.pull_interval_minutes() as i64)
        .bind(source.last_run_at())
        .bind(source.last_run_status())
        .bind(source.last_run_count() as i64)
        .bind(source.last_run_error())
        .execute(executor)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn update_via<'e, E>(executor: E, source: &DataSource) -> Result<(), FlowError>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            "UPDATE data_sources SET display_name = ?, config = ?, active = ?, auto_pull = ?, \
             pull_interval_minutes = ?, last_run_at = ?, last_run_status = ?, last_run_count = ?, last_run_error = ? \
             WHERE id = ?",
        )
        .bind(source.display_name())
        .bind(serde_json::to_string(source.config())?)
        .bind(source.is_active())
        .bind(source.auto_pull())
        .bind(source.pull_interval_minutes() as i64)
        .bind(source.last_run_at())
        .bind(source.last_run_status())
        .bind(source.last_run_count() as i64)
        .bind(source.last_run_error())
        .bind(source.id().to_string())
        .execute(executor)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    /// Transaction-scoped counterpart of [`DataSourceRepository::save`].
    pub(crate) async fn save_tx(tx: &mut Transaction<'_, Sqlite>, source: &DataSource) -> Result<(), FlowError> {
        Self::save_via(&mut **tx, source).await
    }

    /// Transaction-scoped counterpart of [`DataSourceRepository::update`].
    pub(crate) async fn update_tx(tx: &mut Transaction<'_, Sqlite>, source: &DataSource) -> Result<(), FlowError> {
        Self::update_via(&mut **tx, source).await
    }

    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<DataSource, FlowError> {
        Ok(DataSource::from_database(
            DataSourceId::from_string(&row.try_get::<String, _>("id").map_err(db_err)?)?,
            ProjectId::from_string(&row.try_get::<String, _>("project").map_err(db_err)?)?,
            text_to_enum::<SourceDirection>(&row.try_get::<String, _>("direction").map_err(db_err)?)?,
            row.try_get("source_type").map_err(db_err)?,
            row.try_get("display_name").map_err(db_err)?,
            text_to_json(&row.try_get::<String, _>("config").map_err(db_err)?)?,
            row.try_get::<i64, _>("active").map_err(db_err)? != 0,
            row.try_get::<i64, _>("auto_pull").map_err(db_err)? != 0,
            row.try_get::<i64, _>("pull_interval_minutes").map_err(db_err)? as u32,
            row.try_get("last_run_at").map_err(db_err)?,
            row.try_get("last_run_status").map_err(db_err)?,
            row.try_get::<i64, _>("last_run_count").map_err(db_err)? as u32,
            row.try_get("last_run_error").map_err(db_err)?,
        ))
    }
}

#[async_trait]
impl DataSourceRepository for SqliteDataSourceRepository {
    async fn save(&self, source: &DataSource) -> Result<(), FlowError> {
        Self::save_via(&self.pool, source).await
    }

    async fn find_by_id(&self, id: &DataSourceId) -> Result<Option<DataSource>, FlowError> {
        let row = sqlx::query("SELECT * FROM data_sources WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list_for_project(&self, project: &ProjectId) -> Result<Vec<DataSource>, FlowError> {
        let rows = sqlx::query("SELECT * FROM data_sources WHERE project = ?")
            .bind(project.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(Self::from_row).collect()
    }

    async fn update(&self, source: &DataSource) -> Result<(), FlowError> {
        Self::update_via(&self.pool, source).await
    }
}
