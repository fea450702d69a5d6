//! sqlx-backed [`EntityRepository`], [`EntityMemberRepository`], and
//! [`EntityDatabaseRepository`].

use super::{db_err, enum_to_text, text_to_enum};
use async_trait::async_trait;
use exef_domain::entities::{Entity, EntityDatabase, EntityMember};
use exef_domain::repositories::{EntityDatabaseRepository, EntityMemberRepository, EntityRepository};
use exef_domain::value_objects::enums::{EntityKind, MemberRole, SyncDirection};
use exef_domain::value_objects::ids::{EntityDatabaseId, EntityId, EntityMemberId, IdentityId};
use exef_domain::FlowError;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};

pub struct SqliteEntityRepository {
    pool: SqlitePool,
}

impl SqliteEntityRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Entity, FlowError> {
        Ok(Entity::from_database(
            EntityId::from_string(&row.try_get::<String, _>("id").map_err(db_err)?)?,
            text_to_enum::<EntityKind>(&row.try_get::<String, _>("kind").map_err(db_err)?)?,
            row.try_get("legal_name").map_err(db_err)?,
            row.try_get("tax_id").map_err(db_err)?,
            IdentityId::from_string(&row.try_get::<String, _>("owner").map_err(db_err)?)?,
            row.try_get::<i64, _>("archived").map_err(db_err)? != 0,
        ))
    }
}

#[async_trait]
impl EntityRepository for SqliteEntityRepository {
    async fn save(&self, entity: &Entity) -> Result<(), FlowError> {
        sqlx::query("INSERT INTO entities (id, kind, legal_name, tax_id, owner, archived) VALUES (?, ?, ?, ?, ?, ?)")
            .bind(entity.id().to_string())
            .bind(enum_to_text(&entity.kind())?)
            .bind(entity.legal_name())
            .bind(entity.tax_id())
            .bind(entity.owner().to_string())
            .bind(entity.is_archived())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &EntityId) -> Result<Option<Entity>, FlowError> {
        let row = sqlx::query("SELECT * FROM entities WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<Entity>, FlowError> {
        let row = sqlx::query("SELECT * FROM entities WHERE tax_id = ?")
            .bind(tax_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn update(&self, entity: &Entity) -> Result<(), FlowError> {
        sqlx::query("UPDATE entities SET legal_name = ?, tax_id = ?, archived = ? WHERE id = ?")
            .bind(entity.legal_name())
            .bind(entity.tax_id())
            .bind(entity.is_archived())
            .bind(entity.id().to_string())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn list_for_owner(&self, owner: &IdentityId) -> Result<Vec<Entity>, FlowError> {
        let rows = sqlx::query("SELECT * FROM entities WHERE owner = ?")
            .bind(owner.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(Self::from_row).collect()
    }
}

pub struct SqliteEntityMemberRepository {
    pool: SqlitePool,
}

impl SqliteEntityMemberRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn save_via<'e, E>(executor: E, member: &EntityMember) -> Result<(), FlowError>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            "INSERT INTO entity_members (id, entity, identity, role, can_manage_projects, can_invite_members, \
             can_export) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(member.id().to_string())
        .bind(member.entity().to_string())
        .bind(member.identity().to_string())
        .bind(enum_to_text(&member.role())?)
        .bind(member.can_manage_projects())
        .bind(member.can_invite_members())
        .bind(member.can_export())
        .execute(executor)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    /// Transaction-scoped counterpart of [`EntityMemberRepository::save`].
    pub(crate) async fn save_tx(tx: &mut Transaction<'_, Sqlite>, member: &EntityMember) -> Result<(), FlowError> {
        Self::save_via(&mut **tx, member).await
    }

    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<EntityMember, FlowError> {
        Ok(EntityMember::from_database(
            EntityMemberId::from_string(&row.try_get::<String, _>("id").map_err(db_err)?)?,
            EntityId::from_string(&row.try_get::<String, _>("entity").map_err(db_err)?)?,
            IdentityId::from_string(&row.try_get::<String, _>("identity").map_err(db_err)?)?,
            text_to_enum::<MemberRole>(&row.try_get::<String, _>("role").map_err(db_err)?)?,
            row.try_get::<i64, _>("can_manage_projects").map_err(db_err)? != 0,
            row.try_get::<i64, _>("can_invite_members").map_err(db_err)? != 0,
            row.try_get::<i64, _>("can_export").map_err(db_err)? != 0,
        ))
    }
}

#[async_trait]
impl EntityMemberRepository for SqliteEntityMemberRepository {
    async fn save(&self, member: &EntityMember) -> Result<(), FlowError> {
        Self::save_via(&self.pool, member).await
    }

    async fn find(&self, entity: &EntityId, identity: &IdentityId) -> Result<Option<EntityMember>, FlowError> {
        let row = sqlx::query("SELECT * FROM entity_members WHERE entity = ? AND identity = ?")
            .bind(entity.to_string())
            .bind(identity.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list_for_entity(&self, entity: &EntityId) -> Result<Vec<EntityMember>, FlowError> {
        let rows = sqlx::query("SELECT * FROM entity_members WHERE entity = ?")
            .bind(entity.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(Self::from_row).collect()
    }

    async fn list_for_identity(&self, identity: &IdentityId) -> Result<Vec<EntityMember>, FlowError> {
        let rows = sqlx::query("SELECT * FROM entity_members WHERE identity = ?")
            .bind(identity.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(Self::from_row).collect()
    }
}

pub struct SqliteEntityDatabaseRepository {
    pool: SqlitePool,
}

impl SqliteEntityDatabaseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<EntityDatabase, FlowError> {
        Ok(EntityDatabase::from_database(
            EntityDatabaseId::from_string(&row.try_get::<String, _>("id").map_err(db_err)?)?,
            EntityId::from_string(&row.try_get::<String, _>("entity").map_err(db_err)?)?,
            row.try_get("local_url").map_err(db_err)?,
            row.try_get("local_path").map_err(db_err)?,
            row.try_get("remote_sync_url").map_err(db_err)?,
            row.try_get::<i64, _>("sync_enabled").map_err(db_err)? != 0,
            text_to_enum::<SyncDirection>(&row.try_get::<String, _>("sync_direction").map_err(db_err)?)?,
            row.try_get::<i64, _>("sync_interval_minutes").map_err(db_err)? as u32,
            row.try_get("last_sync_at").map_err(db_err)?,
            row.try_get("last_sync_status").map_err(db_err)?,
        ))
    }
}

#[async_trait]
impl EntityDatabaseRepository for SqliteEntityDatabaseRepository {
    async fn save(&self, db: &EntityDatabase) -> Result<(), FlowError> {
        sqlx::query(
            "INSERT INTO entity_databases (id, entity, local_url, local_path, remote_sync_url, sync_enabled, \
             sync_direction, sync_interval_minutes, last_sync_at, last_sync_status) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(db.id().to_string())
        .bind(db.entity().to_string())
        .bind(db.local_url())
        .bind(db.local_path())
        .bind(db.remote_sync_url())
        .bind(db.sync_enabled())
        .bind(enum_to_text(&db.sync_direction())?)
        .bind(db.sync_interval_minutes() as i64)
        .bind(db.last_sync_at())
        .bind(db.last_sync_status())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &EntityDatabaseId) -> Result<Option<EntityDatabase>, FlowError> {
        let row = sqlx::query("SELECT * FROM entity_databases WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn find_for_entity(&self, entity: &EntityId) -> Result<Option<EntityDatabase>, FlowError> {
        let row = sqlx::query("SELECT * FROM entity_databases WHERE entity = ?")
            .bind(entity.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn update(&self, db: &EntityDatabase) -> Result<(), FlowError> {
        sqlx::query(
            "UPDATE entity_databases SET remote_sync_url = ?, sync_enabled = ?, sync_direction = ?, \
             sync_interval_minutes = ?, last_sync_at = ?, last_sync_status = ? WHERE id = ?",
        )
        .bind(db.remote_sync_url())
        .bind(db.sync_enabled())
        .bind(enum_to_text(&db.sync_direction())?)
        .bind(db.sync_interval_minutes() as i64)
        .bind(db.last_sync_at())
        .bind(db.last_sync_status())
        .bind(db.id().to_string())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }
}
