//! Task priorities, orderings, and the counters shown on the dashboard.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Day, Timestamp};

/// Color token assigned to subjects created without one.
pub const DEFAULT_SUBJECT_COLOR: &str = "bg-[hsl(var(--subject-sky))]";

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Task priority. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[serde(alias = "LOW")]
    Low,
    #[default]
    #[serde(alias = "MEDIUM")]
    Medium,
    #[serde(alias = "HIGH")]
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Sort rank: high first.
    fn rank(self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }
}

impl FromStr for Priority {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(CoreError::Validation(format!(
                "Invalid priority '{other}'. Must be one of: low, medium, high"
            ))),
        }
    }
}

/// Lets row structs decode the `priority` column with `#[sqlx(try_from = "String")]`.
impl TryFrom<String> for Priority {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Anything the timeline can order.
pub trait Schedulable {
    fn due_date(&self) -> Option<Day>;
    fn priority(&self) -> Priority;
    fn created_at(&self) -> Timestamp;
}

/// Timeline sort modes (`?sort=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskSort {
    /// Newest first.
    #[default]
    Created,
    /// Earliest due date first; undated tasks last.
    DueDate,
    /// High, medium, low.
    Priority,
}

/// Sort tasks in place. Ties always fall back to newest-first so the order is
/// stable across requests.
pub fn sort_tasks<T: Schedulable>(tasks: &mut [T], sort: TaskSort) {
    let newest_first = |a: &T, b: &T| b.created_at().cmp(&a.created_at());
    match sort {
        TaskSort::Created => tasks.sort_by(newest_first),
        TaskSort::DueDate => tasks.sort_by(|a, b| {
            let by_due = match (a.due_date(), b.due_date()) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            by_due.then_with(|| newest_first(a, b))
        }),
        TaskSort::Priority => tasks.sort_by(|a, b| {
            a.priority()
                .rank()
                .cmp(&b.priority().rank())
                .then_with(|| newest_first(a, b))
        }),
    }
}

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

/// Dashboard task counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: i64,
    pub completed: i64,
    pub pending: i64,
    pub overdue: i64,
}

/// An open task is overdue once its due date is strictly before `today`.
pub fn is_overdue(done: bool, due_date: Option<Day>, today: Day) -> bool {
    !done && due_date.is_some_and(|d| d < today)
}

/// An open task belongs on the "due today" banner.
pub fn is_due_today(done: bool, due_date: Option<Day>, today: Day) -> bool {
    !done && due_date == Some(today)
}

/// Fold `(done, due_date)` pairs into [`TaskStats`].
pub fn task_stats<I>(tasks: I, today: Day) -> TaskStats
where
    I: IntoIterator<Item = (bool, Option<Day>)>,
{
    let mut stats = TaskStats::default();
    for (done, due) in tasks {
        stats.total += 1;
        if done {
            stats.completed += 1;
        }
        if is_overdue(done, due, today) {
            stats.overdue += 1;
        }
    }
    stats.pending = stats.total - stats.completed;
    stats
}
