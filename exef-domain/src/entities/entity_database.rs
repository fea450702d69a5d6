//! # Entity Database Entity
//!
//! Per-entity storage configuration consumed by the storage router
//! (spec.md §4.2): the local file an entity's business rows live in once
//! per-entity mode is enabled, plus optional remote-sync settings.

use crate::value_objects::enums::SyncDirection;
use crate::value_objects::ids::{EntityDatabaseId, EntityId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDatabase {
    id: EntityDatabaseId,
    entity: EntityId,
    local_url: String,
    local_path: String,
    remote_sync_url: Option<String>,
    sync_enabled: bool,
    sync_direction: SyncDirection,
    sync_interval_minutes: u32,
    last_sync_at: Option<DateTime<Utc>>,
    last_sync_status: Option<String>,
}

impl EntityDatabase {
    pub fn new(entity: EntityId, local_url: impl Into<String>, local_path: impl Into<String>) -> Self {
        Self {
            id: EntityDatabaseId::new(),
            entity,
            local_url: local_url.into(),
            local_path: local_path.into(),
            remote_sync_url: None,
            sync_enabled: false,
            sync_direction: SyncDirection::Bidirectional,
            sync_interval_minutes: 60,
            last_sync_at: None,
            last_sync_status: None,
        }
    }

    pub fn id(&self) -> &EntityDatabaseId {
        &self.id
    }

    pub fn entity(&self) -> &EntityId {
        &self.entity
    }

    pub fn local_path(&self) -> &str {
        &self.local_path
    }

    pub fn local_url(&self) -> &str {
        &self.local_url
    }

    pub fn sync_enabled(&self) -> bool {
        self.sync_enabled
    }

    pub fn record_sync(&mut self, status: impl Into<String>, at: DateTime<Utc>) {
        self.last_sync_status = Some(status.into());
        self.last_sync_at = Some(at);
    }

    pub fn remote_sync_url(&self) -> Option<&str> {
        self.remote_sync_url.as_deref()
    }

    pub fn sync_direction(&self) -> SyncDirection {
        self.sync_direction
    }

    pub fn sync_interval_minutes(&self) -> u32 {
        self.sync_interval_minutes
    }

    pub fn last_sync_at(&self) -> Option<DateTime<Utc>> {
        self.last_sync_at
    }

    pub fn last_sync_status(&self) -> Option<&str> {
        self.last_sync_status.as_deref()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_database(
        id: EntityDatabaseId,
        entity: EntityId,
        local_url: String,
        local_path: String,
        remote_sync_url: Option<String>,
        sync_enabled: bool,
        sync_direction: SyncDirection,
        sync_interval_minutes: u32,
        last_sync_at: Option<DateTime<Utc>>,
        last_sync_status: Option<String>,
    ) -> Self {
        Self {
            id,
            entity,
            local_url,
            local_path,
            remote_sync_url,
            sync_enabled,
            sync_direction,
            sync_interval_minutes,
            last_sync_at,
            last_sync_status,
        }
    }
}
