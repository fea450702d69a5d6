//! # Data Source Entity
//!
//! Per-project adapter configuration (spec.md §4.3): which adapter tag to
//! instantiate, its type-dependent config map, and bookkeeping for the
//! last run.

use crate::value_objects::enums::SourceDirection;
use crate::value_objects::ids::{DataSourceId, ProjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSource {
    id: DataSourceId,
    project: ProjectId,
    direction: SourceDirection,
    source_type: String,
    display_name: String,
    config: HashMap<String, Value>,
    active: bool,
    auto_pull: bool,
    pull_interval_minutes: u32,
    last_run_at: Option<DateTime<Utc>>,
    last_run_status: Option<String>,
    last_run_count: u32,
    last_run_error: Option<String>,
}

impl DataSource {
    pub fn new(project: ProjectId, direction: SourceDirection, source_type: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: DataSourceId::new(),
            project,
            direction,
            source_type: source_type.into(),
            display_name: display_name.into(),
            config: HashMap::new(),
            active: true,
            auto_pull: false,
            pull_interval_minutes: 60,
            last_run_at: None,
            last_run_status: None,
            last_run_count: 0,
            last_run_error: None,
        }
    }

    pub fn id(&self) -> &DataSourceId {
        &self.id
    }

    pub fn project(&self) -> &ProjectId {
        &self.project
    }

    pub fn direction(&self) -> SourceDirection {
        self.direction
    }

    pub fn source_type(&self) -> &str {
        &self.source_type
    }

    pub fn config(&self) -> &HashMap<String, Value> {
        &self.config
    }

    pub fn set_config(&mut self, config: HashMap<String, Value>) {
        self.config = config;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Records the outcome of an import or export run (spec.md §4.4 steps
    /// "Update DataSource.last_run_*").
    pub fn record_run(&mut self, status: impl Into<String>, count: u32, error: Option<String>, at: DateTime<Utc>) {
        self.last_run_status = Some(status.into());
        self.last_run_count = count;
        self.last_run_error = error;
        self.last_run_at = Some(at);
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn auto_pull(&self) -> bool {
        self.auto_pull
    }

    pub fn pull_interval_minutes(&self) -> u32 {
        self.pull_interval_minutes
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn last_run_at(&self) -> Option<DateTime<Utc>> {
        self.last_run_at
    }

    pub fn last_run_status(&self) -> Option<&str> {
        self.last_run_status.as_deref()
    }

    pub fn last_run_count(&self) -> u32 {
        self.last_run_count
    }

    pub fn last_run_error(&self) -> Option<&str> {
        self.last_run_error.as_deref()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_database(
        id: DataSourceId,
        project: ProjectId,
        direction: SourceDirection,
        source_type: String,
        display_name: String,
        config: HashMap<String, Value>,
        active: bool,
        auto_pull: bool,
        pull_interval_minutes: u32,
        last_run_at: Option<DateTime<Utc>>,
        last_run_status: Option<String>,
        last_run_count: u32,
        last_run_error: Option<String>,
    ) -> Self {
        Self {
            id,
            project,
            direction,
            source_type,
            display_name,
            config,
            active,
            auto_pull,
            pull_interval_minutes,
            last_run_at,
            last_run_status,
            last_run_count,
            last_run_error,
        }
    }
}
