//! sqlx-backed [`RoutingRepository`], always run against the shared/main
//! database — `ResourceRouting` rows only exist there (spec.md §4.2).

use super::{db_err, enum_to_text};
use async_trait::async_trait;
use exef_domain::entities::ResourceRouting;
use exef_domain::repositories::RoutingRepository;
use exef_domain::FlowError;
use sqlx::{Row, SqlitePool};

pub struct SqliteRoutingRepository {
    pool: SqlitePool,
}

impl SqliteRoutingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoutingRepository for SqliteRoutingRepository {
    async fn save(&self, routing: &ResourceRouting) -> Result<(), FlowError> {
        sqlx::query("INSERT OR REPLACE INTO resource_routing (resource_id, entity_tax_id, resource_kind) VALUES (?, ?, ?)")
            .bind(routing.resource_id())
            .bind(routing.entity_tax_id())
            .bind(enum_to_text(&routing.resource_kind())?)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_entity_tax_id(&self, resource_id: &str) -> Result<Option<String>, FlowError> {
        let row = sqlx::query("SELECT entity_tax_id FROM resource_routing WHERE resource_id = ?")
            .bind(resource_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        row.map(|r| r.try_get::<String, _>("entity_tax_id").map_err(db_err)).transpose()
    }

    async fn is_empty(&self) -> Result<bool, FlowError> {
        let row = sqlx::query("SELECT COUNT(*) as c FROM resource_routing")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.try_get::<i64, _>("c").map_err(db_err)? == 0)
    }
}
