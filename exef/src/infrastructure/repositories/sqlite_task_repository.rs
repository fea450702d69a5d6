//! sqlx-backed [`TaskRepository`].

use super::{db_err, enum_to_text, text_to_enum};
use async_trait::async_trait;
use chrono::NaiveDate;
use exef_domain::entities::{Task, TaskCounters};
use exef_domain::repositories::TaskRepository;
use exef_domain::value_objects::enums::{PhaseStatus, TaskStatus};
use exef_domain::value_objects::ids::{IdentityId, ProjectId, TaskId};
use exef_domain::FlowError;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};

pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn save_via<'e, E>(executor: E, task: &Task) -> Result<(), FlowError>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let (start, end) = task.period();
        let counters = task.counters();
        sqlx::query(
            "INSERT INTO tasks (id, project, name, period_start, period_end, deadline, assignee, status, \
             import_status, describe_status, export_status, docs_total, docs_described, docs_approved, docs_exported) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(task.id().to_string())
        .bind(task.project().to_string())
        .bind(task.name())
        .bind(start)
        .bind(end)
        .bind(task.deadline())
        .bind(task.assignee().map(|a| a.to_string()))
        .bind(enum_to_text(&task.status())?)
        .bind(enum_to_text(&task.import_status())?)
        .bind(enum_to_text(&task.describe_status())?)
        .bind(enum_to_text(&task.export_status())?)
        .bind(counters.docs_total as i64)
        .bind(counters.docs_described as i64)
        .bind(counters.docs_approved as i64)
        .bind(counters.docs_exported as i64)
        .execute(executor)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn update_via<'e, E>(executor: E, task: &Task) -> Result<(), FlowError>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let counters = task.counters();
        sqlx::query(
            "UPDATE tasks SET name = ?, assignee = ?, status = ?, import_status = ?, describe_status = ?, \
             export_status = ?, docs_total = ?, docs_described = ?, docs_approved = ?, docs_exported = ? WHERE id = ?",
        )
        .bind(task.name())
        .bind(task.assignee().map(|a| a.to_string()))
        .bind(enum_to_text(&task.status())?)
        .bind(enum_to_text(&task.import_status())?)
        .bind(enum_to_text(&task.describe_status())?)
        .bind(enum_to_text(&task.export_status())?)
        .bind(counters.docs_total as i64)
        .bind(counters.docs_described as i64)
        .bind(counters.docs_approved as i64)
        .bind(counters.docs_exported as i64)
        .bind(task.id().to_string())
        .execute(executor)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    /// Runs [`Self::save_via`] against an open transaction, for callers that
    /// must commit a task alongside sibling rows atomically (spec.md §5
    /// "every mutation that spans multiple rows is wrapped in a
    /// transaction").
    pub(crate) async fn save_tx(tx: &mut Transaction<'_, Sqlite>, task: &Task) -> Result<(), FlowError> {
        Self::save_via(&mut **tx, task).await
    }

    /// Transaction-scoped counterpart of [`TaskRepository::update`].
    pub(crate) async fn update_tx(tx: &mut Transaction<'_, Sqlite>, task: &Task) -> Result<(), FlowError> {
        Self::update_via(&mut **tx, task).await
    }

    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Task, FlowError> {
        let assignee: Option<String> = row.try_get("assignee").map_err(db_err)?;
        Ok(Task::from_database(
            TaskId::from_string(&row.try_get::<String, _>("id").map_err(db_err)?)?,
            ProjectId::from_string(&row.try_get::<String, _>("project").map_err(db_err)?)?,
            row.try_get("name").map_err(db_err)?,
            row.try_get::<NaiveDate, _>("period_start").map_err(db_err)?,
            row.try_get::<NaiveDate, _>("period_end").map_err(db_err)?,
            row.try_get::<NaiveDate, _>("deadline").map_err(db_err)?,
            assignee.map(|s| IdentityId::from_string(&s)).transpose()?,
            text_to_enum::<TaskStatus>(&row.try_get::<String, _>("status").map_err(db_err)?)?,
            text_to_enum::<PhaseStatus>(&row.try_get::<String, _>("import_status").map_err(db_err)?)?,
            text_to_enum::<PhaseStatus>(&row.try_get::<String, _>("describe_status").map_err(db_err)?)?,
            text_to_enum::<PhaseStatus>(&row.try_get::<String, _>("export_status").map_err(db_err)?)?,
            TaskCounters {
                docs_total: row.try_get::<i64, _>("docs_total").map_err(db_err)? as u32,
                docs_described: row.try_get::<i64, _>("docs_described").map_err(db_err)? as u32,
                docs_approved: row.try_get::<i64, _>("docs_approved").map_err(db_err)? as u32,
                docs_exported: row.try_get::<i64, _>("docs_exported").map_err(db_err)? as u32,
            },
        ))
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn save(&self, task: &Task) -> Result<(), FlowError> {
        Self::save_via(&self.pool, task).await
    }

    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, FlowError> {
        let row = sqlx::query("SELECT * FROM tasks WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list_for_project(&self, project: &ProjectId) -> Result<Vec<Task>, FlowError> {
        let rows = sqlx::query("SELECT * FROM tasks WHERE project = ? ORDER BY period_start")
            .bind(project.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(Self::from_row).collect()
    }

    async fn update(&self, task: &Task) -> Result<(), FlowError> {
        Self::update_via(&self.pool, task).await
    }
}
