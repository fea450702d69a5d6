//! # Project Template Service
//!
//! Expands a [`ProjectTemplate`](crate::entities::ProjectTemplate) plus a
//! target year/period into the concrete tasks spec.md §4.5 step 3
//! describes: one per month, one per quarter, one for the year, or a
//! single task for `once`. Deadlines clamp to the target month's length
//! (spec.md's end-to-end scenario 2: January's deadline is `2026-02-20`,
//! not a date that has rolled into March).
//!
//! `original_source` does not show the Polish month-name table used by
//! `{month_name}` templates; SPEC_FULL.md's Open Question decision (see
//! DESIGN.md) is to use the genitive case ("stycznia", not "styczeń"),
//! since task names read naturally only in genitive — "Rozliczenie za
//! styczeń 2026" is wrong, "Rozliczenie za grudzień 2026" is right.

use crate::entities::ProjectTemplate;
use crate::value_objects::enums::TaskRecurrence;
use chrono::NaiveDate;

/// Polish month names in genitive case, 1-indexed by `[month - 1]`.
const MONTH_NAMES_GENITIVE: [&str; 12] = [
    "stycznia",
    "lutego",
    "marca",
    "kwietnia",
    "maja",
    "czerwca",
    "lipca",
    "sierpnia",
    "września",
    "października",
    "listopada",
    "grudnia",
];

/// A generated task, not yet persisted — the application layer turns each
/// of these into a `Task` entity tied to the newly created `Project`.
#[derive(Debug, Clone)]
pub struct GeneratedTask {
    pub name: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub deadline: NaiveDate,
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1).expect("valid calendar month");
    first_of_next.pred_opt().expect("month has a predecessor day").day()
}

use chrono::Datelike;

/// Builds `deadline_day` of `(year, month)`, clamped to that month's length.
fn deadline_in(year: i32, month: u32, deadline_day: u8) -> NaiveDate {
    let clamped = (deadline_day as u32).min(days_in_month(year, month)).max(1);
    NaiveDate::from_ymd_opt(year, month, clamped).expect("clamped day is valid for its month")
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn format_task_name(template_str: &str, month: u32, year: i32, quarter: u32) -> String {
    template_str
        .replace("{month_name}", MONTH_NAMES_GENITIVE[(month - 1) as usize])
        .replace("{quarter}", &format!("Q{}", quarter))
        .replace("{year}", &year.to_string())
        .replace("{month}", &month.to_string())
}

/// Implements spec.md §4.5 step 3 for all four recurrence kinds.
pub fn generate_tasks_from_template(template: &ProjectTemplate, year: i32, period_start: NaiveDate, period_end: NaiveDate) -> Vec<GeneratedTask> {
    match template.recurrence() {
        TaskRecurrence::Monthly => generate_monthly(template, year, period_start, period_end),
        TaskRecurrence::Quarterly => generate_quarterly(template, year),
        TaskRecurrence::Yearly => generate_yearly(template, year, period_start, period_end),
        TaskRecurrence::Once => vec![GeneratedTask {
            name: format_task_name(template.task_name_template(), period_start.month(), year, quarter_of(period_start.month())),
            period_start,
            period_end,
            deadline: deadline_in(year, period_end.month(), template.deadline_day()),
        }],
    }
}

fn quarter_of(month: u32) -> u32 {
    (month - 1) / 3 + 1
}

fn generate_monthly(template: &ProjectTemplate, year: i32, period_start: NaiveDate, period_end: NaiveDate) -> Vec<GeneratedTask> {
    let mut tasks = Vec::new();
    let mut year_cursor = period_start.year();
    let mut month_cursor = period_start.month();

    loop {
        let month_start = NaiveDate::from_ymd_opt(year_cursor, month_cursor, 1).expect("valid month start");
        if month_start > period_end {
            break;
        }
        let month_end_day = days_in_month(year_cursor, month_cursor);
        let month_end = NaiveDate::from_ymd_opt(year_cursor, month_cursor, month_end_day).expect("valid month end");
        let (deadline_year, deadline_month) = next_month(year_cursor, month_cursor);

        tasks.push(GeneratedTask {
            name: format_task_name(template.task_name_template(), month_cursor, year_cursor, quarter_of(month_cursor)),
            period_start: month_start,
            period_end: month_end,
            deadline: deadline_in(deadline_year, deadline_month, template.deadline_day()),
        });

        let (ny, nm) = next_month(year_cursor, month_cursor);
        year_cursor = ny;
        month_cursor = nm;
        let _ = year;
    }

    tasks
}

fn generate_quarterly(template: &ProjectTemplate, year: i32) -> Vec<GeneratedTask> {
    (0..4)
        .map(|q: u32| {
            let first_month = q * 3 + 1;
            let last_month = first_month + 2;
            let period_start = NaiveDate::from_ymd_opt(year, first_month, 1).expect("valid quarter start");
            let last_day = days_in_month(year, last_month);
            let period_end = NaiveDate::from_ymd_opt(year, last_month, last_day).expect("valid quarter end");
            let (deadline_year, deadline_month) = next_month(year, last_month);

            GeneratedTask {
                name: format_task_name(template.task_name_template(), first_month, year, q + 1),
                period_start,
                period_end,
                deadline: deadline_in(deadline_year, deadline_month, template.deadline_day()),
            }
        })
        .collect()
}

fn generate_yearly(template: &ProjectTemplate, year: i32, period_start: NaiveDate, period_end: NaiveDate) -> Vec<GeneratedTask> {
    vec![GeneratedTask {
        name: format_task_name(template.task_name_template(), 1, year, 1),
        period_start,
        period_end,
        deadline: deadline_in(year + 1, 1, template.deadline_day()),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::enums::ProjectKind;

    #[test]
    fn monthly_template_produces_twelve_tasks_with_clamped_deadlines() {
        let template = ProjectTemplate::new(ProjectKind::Bookkeeping, TaskRecurrence::Monthly, "Rozliczenie za {month_name} {year}", 20);
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        let tasks = generate_tasks_from_template(&template, 2026, start, end);

        assert_eq!(tasks.len(), 12);
        assert_eq!(tasks[0].deadline, NaiveDate::from_ymd_opt(2026, 2, 20).unwrap());
        assert_eq!(tasks[11].deadline, NaiveDate::from_ymd_opt(2027, 1, 20).unwrap());
        assert_eq!(tasks[0].name, "Rozliczenie za stycznia 2026");
    }

    #[test]
    fn quarterly_template_produces_four_tasks() {
        let template = ProjectTemplate::new(ProjectKind::Jpk, TaskRecurrence::Quarterly, "JPK {quarter} {year}", 25);
        let tasks = generate_tasks_from_template(&template, 2026, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(), NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
        assert_eq!(tasks.len(), 4);
        assert_eq!(tasks[0].name, "JPK Q1 2026");
        assert_eq!(tasks[3].deadline, NaiveDate::from_ymd_opt(2027, 1, 25).unwrap());
    }

    #[test]
    fn yearly_template_produces_one_task() {
        let template = ProjectTemplate::new(ProjectKind::Kpir, TaskRecurrence::Yearly, "KPiR {year}", 20);
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        let tasks = generate_tasks_from_template(&template, 2026, start, end);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].deadline, NaiveDate::from_ymd_opt(2027, 1, 20).unwrap());
    }

    #[test]
    fn deadline_day_clamps_to_february() {
        let template = ProjectTemplate::new(ProjectKind::Bookkeeping, TaskRecurrence::Monthly, "{month_name}", 31);
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
        let tasks = generate_tasks_from_template(&template, 2026, start, end);
        assert_eq!(tasks[0].deadline, NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
    }
}
