//! sqlx-backed [`ProjectRepository`], [`ProjectTemplateRepository`], and
//! [`ProjectAuthorizationRepository`].

use super::{db_err, enum_to_text, text_to_enum, text_to_json};
use async_trait::async_trait;
use exef_domain::entities::{AuthorizationCapabilities, Project, ProjectAuthorization, ProjectTemplate};
use exef_domain::repositories::{ProjectAuthorizationRepository, ProjectRepository, ProjectTemplateRepository};
use exef_domain::value_objects::enums::{ProjectKind, TaskRecurrence};
use exef_domain::value_objects::ids::{EntityId, IdentityId, ProjectAuthorizationId, ProjectId, ProjectTemplateId};
use exef_domain::FlowError;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};

pub struct SqliteProjectRepository {
    pool: SqlitePool,
}

impl SqliteProjectRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn save_via<'e, E>(executor: E, project: &Project) -> Result<(), FlowError>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let (start, end) = project.period();
        sqlx::query(
            "INSERT INTO projects (id, entity, template, name, kind, year, period_start, period_end, categories, \
             tags, active, archived) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(project.id().to_string())
        .bind(project.entity().to_string())
        .bind(project.template().map(|t| t.to_string()))
        .bind(project.name())
        .bind(enum_to_text(&project.kind())?)
        .bind(project.year() as i64)
        .bind(start)
        .bind(end)
        .bind(serde_json::to_string(project.categories())?)
        .bind(serde_json::to_string(project.tags())?)
        .bind(project.is_active())
        .bind(project.is_archived())
        .execute(executor)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    /// Transaction-scoped counterpart of [`ProjectRepository::save`].
    pub(crate) async fn save_tx(tx: &mut Transaction<'_, Sqlite>, project: &Project) -> Result<(), FlowError> {
        Self::save_via(&mut **tx, project).await
    }

    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Project, FlowError> {
        let template: Option<String> = row.try_get("template").map_err(db_err)?;
        Ok(Project::from_database(
            ProjectId::from_string(&row.try_get::<String, _>("id").map_err(db_err)?)?,
            EntityId::from_string(&row.try_get::<String, _>("entity").map_err(db_err)?)?,
            template.map(|t| ProjectTemplateId::from_string(&t)).transpose()?,
            row.try_get("name").map_err(db_err)?,
            text_to_enum::<ProjectKind>(&row.try_get::<String, _>("kind").map_err(db_err)?)?,
            row.try_get::<i64, _>("year").map_err(db_err)? as i32,
            row.try_get("period_start").map_err(db_err)?,
            row.try_get("period_end").map_err(db_err)?,
            text_to_json(&row.try_get::<String, _>("categories").map_err(db_err)?)?,
            text_to_json(&row.try_get::<String, _>("tags").map_err(db_err)?)?,
            row.try_get::<i64, _>("active").map_err(db_err)? != 0,
            row.try_get::<i64, _>("archived").map_err(db_err)? != 0,
        ))
    }
}

#[async_trait]
impl ProjectRepository for SqliteProjectRepository {
    async fn save(&self, project: &Project) -> Result<(), FlowError> {
        Self::save_via(&self.pool, project).await
    }

    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, FlowError> {
        let row = sqlx::query("SELECT * FROM projects WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list_for_entity(&self, entity: &EntityId) -> Result<Vec<Project>, FlowError> {
        let rows = sqlx::query("SELECT * FROM projects WHERE entity = ?")
            .bind(entity.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(Self::from_row).collect()
    }

    async fn update(&self, project: &Project) -> Result<(), FlowError> {
        sqlx::query(
            "UPDATE projects SET template = ?, name = ?, categories = ?, tags = ?, active = ?, archived = ? \
             WHERE id = ?",
        )
        .bind(project.template().map(|t| t.to_string()))
        .bind(project.name())
        .bind(serde_json::to_string(project.categories())?)
        .bind(serde_json::to_string(project.tags())?)
        .bind(project.is_active())
        .bind(project.is_archived())
        .bind(project.id().to_string())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, id: &ProjectId) -> Result<bool, FlowError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct SqliteProjectTemplateRepository {
    pool: SqlitePool,
}

impl SqliteProjectTemplateRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ProjectTemplate, FlowError> {
        let owner: Option<String> = row.try_get("owner").map_err(db_err)?;
        Ok(ProjectTemplate::from_database(
            ProjectTemplateId::from_string(&row.try_get::<String, _>("id").map_err(db_err)?)?,
            owner.map(|o| IdentityId::from_string(&o)).transpose()?,
            text_to_enum::<ProjectKind>(&row.try_get::<String, _>("kind").map_err(db_err)?)?,
            text_to_enum::<TaskRecurrence>(&row.try_get::<String, _>("recurrence").map_err(db_err)?)?,
            row.try_get("task_name_template").map_err(db_err)?,
            row.try_get::<i64, _>("deadline_day").map_err(db_err)? as u8,
            text_to_json(&row.try_get::<String, _>("default_categories").map_err(db_err)?)?,
        ))
    }
}

#[async_trait]
impl ProjectTemplateRepository for SqliteProjectTemplateRepository {
    async fn save(&self, template: &ProjectTemplate) -> Result<(), FlowError> {
        sqlx::query(
            "INSERT INTO project_templates (id, owner, kind, recurrence, task_name_template, deadline_day, \
             default_categories) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(template.id().to_string())
        .bind(template.owner().map(|o| o.to_string()))
        .bind(enum_to_text(&template.kind())?)
        .bind(enum_to_text(&template.recurrence())?)
        .bind(template.task_name_template())
        .bind(template.deadline_day() as i64)
        .bind(serde_json::to_string(template.default_categories())?)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &ProjectTemplateId) -> Result<Option<ProjectTemplate>, FlowError> {
        let row = sqlx::query("SELECT * FROM project_templates WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list_system_templates(&self) -> Result<Vec<ProjectTemplate>, FlowError> {
        let rows = sqlx::query("SELECT * FROM project_templates WHERE owner IS NULL")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(Self::from_row).collect()
    }

    async fn list_for_owner(&self, owner: &IdentityId) -> Result<Vec<ProjectTemplate>, FlowError> {
        let rows = sqlx::query("SELECT * FROM project_templates WHERE owner = ?")
            .bind(owner.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(Self::from_row).collect()
    }
}

pub struct SqliteProjectAuthorizationRepository {
    pool: SqlitePool,
}

impl SqliteProjectAuthorizationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn save_via<'e, E>(executor: E, auth: &ProjectAuthorization) -> Result<(), FlowError>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let caps = auth.capabilities();
        sqlx::query(
            "INSERT INTO project_authorizations (id, project, identity, can_view, can_describe, can_approve, \
             can_export, valid_from, valid_until, granted_by) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(auth.id().to_string())
        .bind(auth.project().to_string())
        .bind(auth.identity().to_string())
        .bind(caps.can_view)
        .bind(caps.can_describe)
        .bind(caps.can_approve)
        .bind(caps.can_export)
        .bind(auth.valid_from())
        .bind(auth.valid_until())
        .bind(auth.granted_by().to_string())
        .execute(executor)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    /// Transaction-scoped counterpart of [`ProjectAuthorizationRepository::save`].
    pub(crate) async fn save_tx(tx: &mut Transaction<'_, Sqlite>, auth: &ProjectAuthorization) -> Result<(), FlowError> {
        Self::save_via(&mut **tx, auth).await
    }

    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ProjectAuthorization, FlowError> {
        Ok(ProjectAuthorization::from_database(
            ProjectAuthorizationId::from_string(&row.try_get::<String, _>("id").map_err(db_err)?)?,
            ProjectId::from_string(&row.try_get::<String, _>("project").map_err(db_err)?)?,
            IdentityId::from_string(&row.try_get::<String, _>("identity").map_err(db_err)?)?,
            AuthorizationCapabilities {
                can_view: row.try_get::<i64, _>("can_view").map_err(db_err)? != 0,
                can_describe: row.try_get::<i64, _>("can_describe").map_err(db_err)? != 0,
                can_approve: row.try_get::<i64, _>("can_approve").map_err(db_err)? != 0,
                can_export: row.try_get::<i64, _>("can_export").map_err(db_err)? != 0,
            },
            row.try_get("valid_from").map_err(db_err)?,
            row.try_get("valid_until").map_err(db_err)?,
            IdentityId::from_string(&row.try_get::<String, _>("granted_by").map_err(db_err)?)?,
        ))
    }
}

#[async_trait]
impl ProjectAuthorizationRepository for SqliteProjectAuthorizationRepository {
    async fn save(&self, auth: &ProjectAuthorization) -> Result<(), FlowError> {
        Self::save_via(&self.pool, auth).await
    }

    async fn find_by_id(&self, id: &ProjectAuthorizationId) -> Result<Option<ProjectAuthorization>, FlowError> {
        let row = sqlx::query("SELECT * FROM project_authorizations WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn find(&self, project: &ProjectId, identity: &IdentityId) -> Result<Option<ProjectAuthorization>, FlowError> {
        let row = sqlx::query("SELECT * FROM project_authorizations WHERE project = ? AND identity = ?")
            .bind(project.to_string())
            .bind(identity.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list_for_project(&self, project: &ProjectId) -> Result<Vec<ProjectAuthorization>, FlowError> {
        let rows = sqlx::query("SELECT * FROM project_authorizations WHERE project = ?")
            .bind(project.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(Self::from_row).collect()
    }
}
