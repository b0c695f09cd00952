//! Focus-time aggregation for the analytics view, the heatmap, and party
//! leaderboards.
//!
//! Everything here works on plain `(day, seconds)` tuples already loaded from
//! `focus_sessions`; windows are always inclusive of `today`.

use std::collections::HashMap;

use chrono::Days;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Day};

// ---------------------------------------------------------------------------
// Windows
// ---------------------------------------------------------------------------

/// Days in the "week" summary window.
pub const WEEK_DAYS: u32 = 7;
/// Days in the "month" summary window.
pub const MONTH_DAYS: u32 = 30;
/// Largest `?days=` accepted by series endpoints.
pub const MAX_SERIES_DAYS: u32 = 366;
/// Length of the rolling heatmap.
pub const HEATMAP_ROLLING_DAYS: u32 = 365;
/// Highest heatmap intensity bucket.
pub const HEATMAP_LEVELS: f64 = 4.0;

/// Validate a `?days=` parameter.
pub fn validate_days(days: u32) -> Result<(), CoreError> {
    if !(1..=MAX_SERIES_DAYS).contains(&days) {
        return Err(CoreError::Validation(format!(
            "days must be between 1 and {MAX_SERIES_DAYS}, got {days}"
        )));
    }
    Ok(())
}

/// First day of the `days`-long window ending on `today`.
pub fn window_start(today: Day, days: u32) -> Day {
    today
        .checked_sub_days(Days::new(u64::from(days.saturating_sub(1))))
        .unwrap_or(Day::MIN)
}

/// Every day from `start` through `end`, inclusive.
pub fn day_range(start: Day, end: Day) -> Vec<Day> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Whole minutes, rounded half up.
pub fn secs_to_minutes(secs: i64) -> i64 {
    (secs + 30).div_euclid(60)
}

// ---------------------------------------------------------------------------
// Personal summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotal {
    pub date: Day,
    pub minutes: i64,
}

/// Totals shown on the analytics page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FocusSummary {
    pub today_secs: i64,
    pub week_secs: i64,
    pub month_secs: i64,
    pub week_avg_secs: f64,
    pub month_avg_secs: f64,
    pub daily: Vec<DailyTotal>,
}

fn total_since(sessions: &[(Day, i64)], start: Day, today: Day) -> i64 {
    sessions
        .iter()
        .filter(|(d, _)| *d >= start && *d <= today)
        .map(|(_, secs)| secs)
        .sum()
}

/// Sum seconds per day over `labels`, converted to rounded minutes.
pub fn daily_minutes(sessions: &[(Day, i64)], labels: &[Day]) -> Vec<i64> {
    let mut by_day: HashMap<Day, i64> = HashMap::new();
    for (day, secs) in sessions {
        *by_day.entry(*day).or_default() += secs;
    }
    labels
        .iter()
        .map(|d| secs_to_minutes(by_day.get(d).copied().unwrap_or(0)))
        .collect()
}

/// Build the personal summary with a `series_days` chart ending today.
pub fn focus_summary(sessions: &[(Day, i64)], today: Day, series_days: u32) -> FocusSummary {
    let week_secs = total_since(sessions, window_start(today, WEEK_DAYS), today);
    let month_secs = total_since(sessions, window_start(today, MONTH_DAYS), today);

    let labels = day_range(window_start(today, series_days), today);
    let daily = labels
        .iter()
        .zip(daily_minutes(sessions, &labels))
        .map(|(date, minutes)| DailyTotal { date: *date, minutes })
        .collect();

    FocusSummary {
        today_secs: total_since(sessions, today, today),
        week_secs,
        month_secs,
        week_avg_secs: week_secs as f64 / f64::from(WEEK_DAYS),
        month_avg_secs: month_secs as f64 / f64::from(MONTH_DAYS),
        daily,
    }
}

// ---------------------------------------------------------------------------
// Heatmap
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub date: Day,
    pub minutes: f64,
    /// 0 (no study) through 4 (the busiest day in range).
    pub intensity: u8,
}

/// Heatmap cells for every day in `[start, end]`, scaled against the busiest
/// day in that range.
pub fn heatmap(sessions: &[(Day, i64)], start: Day, end: Day) -> Vec<HeatmapCell> {
    let mut minutes_by_day: HashMap<Day, f64> = HashMap::new();
    for (day, secs) in sessions {
        if *day >= start && *day <= end {
            *minutes_by_day.entry(*day).or_default() += *secs as f64 / 60.0;
        }
    }
    let max_minutes = minutes_by_day.values().copied().fold(1.0_f64, f64::max);

    day_range(start, end)
        .into_iter()
        .map(|date| {
            let minutes = minutes_by_day.get(&date).copied().unwrap_or(0.0);
            let intensity = if minutes > 0.0 {
                (minutes / max_minutes * HEATMAP_LEVELS).ceil().min(HEATMAP_LEVELS) as u8
            } else {
                0
            };
            HeatmapCell { date, minutes, intensity }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Party leaderboards
// ---------------------------------------------------------------------------

/// Total rounded minutes per member, highest first. Members without sessions
/// are included with zero; ties keep the input member order.
pub fn member_totals(members: &[DbId], sessions: &[(DbId, Day, i64)]) -> Vec<(DbId, i64)> {
    let mut secs: HashMap<DbId, i64> = HashMap::new();
    for (user_id, _, duration) in sessions {
        *secs.entry(*user_id).or_default() += duration;
    }
    let mut totals: Vec<(DbId, i64)> = members
        .iter()
        .map(|id| (*id, secs_to_minutes(secs.get(id).copied().unwrap_or(0))))
        .collect();
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals
}

/// Per-member rounded minutes for each label day, in member order.
pub fn member_daily_series(
    members: &[DbId],
    sessions: &[(DbId, Day, i64)],
    labels: &[Day],
) -> Vec<(DbId, Vec<i64>)> {
    members
        .iter()
        .map(|member| {
            let own: Vec<(Day, i64)> = sessions
                .iter()
                .filter(|(uid, _, _)| uid == member)
                .map(|(_, day, secs)| (*day, *secs))
                .collect();
            (*member, daily_minutes(&own, labels))
        })
        .collect()
}
