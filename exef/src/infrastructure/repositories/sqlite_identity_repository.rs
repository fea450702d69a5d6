//! sqlx-backed [`IdentityRepository`].

use super::db_err;
use async_trait::async_trait;
use exef_domain::entities::Identity;
use exef_domain::repositories::IdentityRepository;
use exef_domain::value_objects::ids::IdentityId;
use exef_domain::FlowError;
use sqlx::{Row, SqlitePool};

pub struct SqliteIdentityRepository {
    pool: SqlitePool,
}

impl SqliteIdentityRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Identity, FlowError> {
        Ok(Identity::from_database(
            IdentityId::from_string(row.try_get::<String, _>("id").map_err(db_err)?.as_str())?,
            row.try_get("email").map_err(db_err)?,
            row.try_get("first_name").map_err(db_err)?,
            row.try_get("last_name").map_err(db_err)?,
            row.try_get("tax_id").map_err(db_err)?,
            row.try_get("personal_id").map_err(db_err)?,
            row.try_get::<i64, _>("verified").map_err(db_err)? != 0,
        ))
    }
}

#[async_trait]
impl IdentityRepository for SqliteIdentityRepository {
    async fn save(&self, identity: &Identity) -> Result<(), FlowError> {
        sqlx::query(
            "INSERT INTO identities (id, email, first_name, last_name, tax_id, personal_id, verified) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(identity.id().to_string())
        .bind(identity.email())
        .bind(identity.first_name())
        .bind(identity.last_name())
        .bind(identity.tax_id())
        .bind(identity.personal_id())
        .bind(identity.is_verified())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, FlowError> {
        let row = sqlx::query("SELECT * FROM identities WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>, FlowError> {
        let row = sqlx::query("SELECT * FROM identities WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn update(&self, identity: &Identity) -> Result<(), FlowError> {
        sqlx::query(
            "UPDATE identities SET email = ?, first_name = ?, last_name = ?, tax_id = ?, personal_id = ?, verified = ? \
             WHERE id = ?",
        )
        .bind(identity.email())
        .bind(identity.first_name())
        .bind(identity.last_name())
        .bind(identity.tax_id())
        .bind(identity.personal_id())
        .bind(identity.is_verified())
        .bind(identity.id().to_string())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }
}
