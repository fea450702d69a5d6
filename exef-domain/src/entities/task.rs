//! # Task Entity
//!
//! A unit of periodic work inside a project — "January 2026 invoices",
//! "Q1 JPK submission". Carries the four cached document counters the flow
//! engine maintains as additive deltas (spec.md §4.4 "Concurrency") and the
//! three independent phase statuses.

use crate::error::FlowError;
use crate::value_objects::enums::{PhaseStatus, TaskStatus};
use crate::value_objects::ids::{IdentityId, ProjectId, TaskId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TaskCounters {
    pub docs_total: u32,
    pub docs_described: u32,
    pub docs_approved: u32,
    pub docs_exported: u32,
}

impl TaskCounters {
    /// `docs_total >= docs_described >= docs_approved >= docs_exported >= 0`
    /// (spec.md §3 invariant). Unsigned counters already rule out negatives.
    pub fn is_consistent(&self) -> bool {
        self.docs_total >= self.docs_described
            && self.docs_described >= self.docs_approved
            && self.docs_approved >= self.docs_exported
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project: ProjectId,
    name: String,
    period_start: NaiveDate,
    period_end: NaiveDate,
    deadline: NaiveDate,
    assignee: Option<IdentityId>,
    status: TaskStatus,
    import_status: PhaseStatus,
    describe_status: PhaseStatus,
    export_status: PhaseStatus,
    counters: TaskCounters,
}

impl Task {
    pub fn new(
        project: ProjectId,
        name: impl Into<String>,
        period_start: NaiveDate,
        period_end: NaiveDate,
        deadline: NaiveDate,
    ) -> Self {
        Self {
            id: TaskId::new(),
            project,
            name: name.into(),
            period_start,
            period_end,
            deadline,
            assignee: None,
            status: TaskStatus::Pending,
            import_status: PhaseStatus::NotStarted,
            describe_status: PhaseStatus::NotStarted,
            export_status: PhaseStatus::NotStarted,
            counters: TaskCounters::default(),
        }
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn project(&self) -> &ProjectId {
        &self.project
    }

    pub fn period(&self) -> (NaiveDate, NaiveDate) {
        (self.period_start, self.period_end)
    }

    pub fn counters(&self) -> TaskCounters {
        self.counters
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Applies an import batch: increments `docs_total`, flips
    /// `import_status`/`status` to `in_progress` if this is the first
    /// import. Spec.md §4.4 import algorithm, steps 5.
    pub fn apply_import_delta(&mut self, created: u32) {
        self.counters.docs_total += created;
        if matches!(self.import_status, PhaseStatus::NotStarted) {
            self.import_status = PhaseStatus::InProgress;
        }
        if matches!(self.status, TaskStatus::Pending) {
            self.status = TaskStatus::InProgress;
        }
    }

    pub fn apply_describe_delta(&mut self, described: u32) -> Result<(), FlowError> {
        self.counters.docs_described += described;
        if !self.counters.is_consistent() {
            return Err(FlowError::internal("docs_described exceeded docs_total"));
        }
        if matches!(self.describe_status, PhaseStatus::NotStarted) {
            self.describe_status = PhaseStatus::InProgress;
        }
        Ok(())
    }

    pub fn apply_approve_delta(&mut self, approved: u32) -> Result<(), FlowError> {
        self.counters.docs_approved += approved;
        if !self.counters.is_consistent() {
            return Err(FlowError::internal("docs_approved exceeded docs_described"));
        }
        Ok(())
    }

    /// Applies an export batch: increments `docs_exported`; when every
    /// known document has now been exported, marks the export phase and
    /// the task itself completed (spec.md §4.4 export algorithm, step 3).
    pub fn apply_export_delta(&mut self, exported: u32) -> Result<(), FlowError> {
        self.counters.docs_exported += exported;
        if !self.counters.is_consistent() {
            return Err(FlowError::internal("docs_exported exceeded docs_approved"));
        }
        if self.counters.docs_total > 0 && self.counters.docs_exported >= self.counters.docs_total {
            self.export_status = PhaseStatus::Completed;
            self.status = TaskStatus::Exported;
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn deadline(&self) -> NaiveDate {
        self.deadline
    }

    pub fn assignee(&self) -> Option<&IdentityId> {
        self.assignee.as_ref()
    }

    pub fn set_assignee(&mut self, assignee: Option<IdentityId>) {
        self.assignee = assignee;
    }

    pub fn import_status(&self) -> PhaseStatus {
        self.import_status
    }

    pub fn describe_status(&self) -> PhaseStatus {
        self.describe_status
    }

    pub fn export_status(&self) -> PhaseStatus {
        self.export_status
    }

    #[allow(clippy::too_many_arguments)]
    pub fn from_database(
        id: TaskId,
        project: ProjectId,
        name: String,
        period_start: NaiveDate,
        period_end: NaiveDate,
        deadline: NaiveDate,
        assignee: Option<IdentityId>,
        status: TaskStatus,
        import_status: PhaseStatus,
        describe_status: PhaseStatus,
        export_status: PhaseStatus,
        counters: TaskCounters,
    ) -> Self {
        Self {
            id,
            project,
            name,
            period_start,
            period_end,
            deadline,
            assignee,
            status,
            import_status,
            describe_status,
            export_status,
            counters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::ids::ProjectId;
    use chrono::NaiveDate;

    fn sample_task() -> Task {
        let period_start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let period_end = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        let deadline = NaiveDate::from_ymd_opt(2026, 2, 25).unwrap();
        Task::new(ProjectId::new(), "Styczeń 2026", period_start, period_end, deadline)
    }

    #[test]
    fn counters_stay_consistent_across_a_full_lifecycle() {
        let mut task = sample_task();
        assert!(task.counters().is_consistent());

        task.apply_import_delta(5);
        assert_eq!(task.counters().docs_total, 5);
        assert_eq!(task.status(), TaskStatus::InProgress);

        task.apply_describe_delta(3).unwrap();
        assert_eq!(task.counters().docs_described, 3);

        task.apply_approve_delta(2).unwrap();
        assert_eq!(task.counters().docs_approved, 2);

        task.apply_export_delta(2).unwrap();
        assert_eq!(task.counters().docs_exported, 2);
        assert!(task.counters().is_consistent());
        assert_ne!(task.status(), TaskStatus::Exported);
    }

    #[test]
    fn task_completes_once_every_document_is_exported() {
        let mut task = sample_task();
        task.apply_import_delta(2);
        task.apply_describe_delta(2).unwrap();
        task.apply_approve_delta(2).unwrap();
        task.apply_export_delta(2).unwrap();
        assert_eq!(task.status(), TaskStatus::Exported);
        assert_eq!(task.export_status(), PhaseStatus::Completed);
    }

    #[test]
    fn describe_delta_beyond_total_is_rejected() {
        let mut task = sample_task();
        task.apply_import_delta(1);
        assert!(task.apply_describe_delta(2).is_err());
    }

    #[test]
    fn approve_delta_beyond_described_is_rejected() {
        let mut task = sample_task();
        task.apply_import_delta(2);
        task.apply_describe_delta(1).unwrap();
        assert!(task.apply_approve_delta(2).is_err());
    }

    #[test]
    fn export_delta_beyond_approved_is_rejected() {
        let mut task = sample_task();
        task.apply_import_delta(2);
        task.apply_describe_delta(2).unwrap();
        task.apply_approve_delta(1).unwrap();
        assert!(task.apply_export_delta(2).is_err());
    }
}
