//! Activity heatmap and streak analysis.
//!
//! This module turns a sparse set of activity dates into a GitHub-style
//! calendar grid, and computes current/longest streaks, the most active day
//! and active-day counts from the same data.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::calendar::{local_date, parse_calendar_date, week_start_sunday};
use crate::error::ValidationError;

/// Sparse per-day activity counts keyed by calendar date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLog {
    counts: BTreeMap<NaiveDate, u32>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// One activity per distinct `YYYY-MM-DD` string.
    pub fn from_dates<I, S>(dates: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut log = Self::new();
        for raw in dates {
            let date = parse_calendar_date(raw.as_ref())?;
            log.counts.insert(date, 1);
        }
        Ok(log)
    }

    /// One activity per date in the set.
    pub fn from_date_set(dates: &BTreeSet<NaiveDate>) -> Self {
        Self {
            counts: dates.iter().map(|d| (*d, 1)).collect(),
        }
    }

    /// Explicit counts keyed by `YYYY-MM-DD` strings.
    pub fn from_counts(counts: &HashMap<String, u32>) -> Result<Self, ValidationError> {
        let mut log = Self::new();
        for (raw, count) in counts {
            let date = parse_calendar_date(raw)?;
            log.record(date, *count);
        }
        Ok(log)
    }

    /// Group completion instants by their local calendar date.
    pub fn from_instants(instants: &[DateTime<Utc>]) -> Self {
        let mut log = Self::new();
        for instant in instants {
            log.record(local_date(*instant), 1);
        }
        log
    }

    /// Add `count` activities on `date`.
    pub fn record(&mut self, date: NaiveDate, count: u32) {
        let entry = self.counts.entry(date).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    pub fn count_on(&self, date: NaiveDate) -> u32 {
        self.counts.get(&date).copied().unwrap_or(0)
    }

    /// Distinct days with a positive count.
    pub fn active_days(&self) -> usize {
        self.counts.values().filter(|c| **c > 0).count()
    }

    pub fn total_count(&self) -> u64 {
        self.counts.values().map(|c| u64::from(*c)).sum()
    }

    /// Day with the highest count; ties go to the earliest date.
    pub fn most_active_day(&self) -> Option<DayCount> {
        self.most_active_between(NaiveDate::MIN, NaiveDate::MAX)
    }

    fn most_active_between(&self, from: NaiveDate, to: NaiveDate) -> Option<DayCount> {
        let mut best: Option<DayCount> = None;
        for (date, count) in self.counts.range(from..=to) {
            if *count == 0 {
                continue;
            }
            if best.as_ref().map_or(true, |b| *count > b.count) {
                best = Some(DayCount {
                    date: *date,
                    count: *count,
                });
            }
        }
        best
    }

    fn first_date(&self) -> Option<NaiveDate> {
        self.counts
            .iter()
            .find(|(_, count)| **count > 0)
            .map(|(date, _)| *date)
    }

    fn last_date(&self) -> Option<NaiveDate> {
        self.counts
            .iter()
            .rev()
            .find(|(_, count)| **count > 0)
            .map(|(date, _)| *date)
    }
}

/// A date and its activity count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: u32,
}

/// GitHub-style intensity bucket (0-4) for a day's count.
///
/// 0 → 0, 1–2 → 1, 3–4 → 2, 5–6 → 3, 7+ → 4.
pub fn intensity_level(count: u32) -> u8 {
    match count {
        0 => 0,
        1..=2 => 1,
        3..=4 => 2,
        5..=6 => 3,
        _ => 4,
    }
}

/// Heatmap cell data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub count: u32,
    pub level: u8,
    /// Cells after today never count toward totals and cannot be toggled.
    pub is_future: bool,
}

impl HeatmapCell {
    /// Get the character for ASCII heatmap visualization.
    pub fn heat_char(&self) -> char {
        if self.is_future {
            return ' ';
        }
        match self.level {
            0 => '·',
            1 => '░',
            2 => '▒',
            3 => '▓',
            _ => '█',
        }
    }
}

/// One Sunday-to-Saturday column of the grid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapWeek {
    pub start: NaiveDate,
    pub days: Vec<HeatmapCell>,
}

/// Computed heatmap grid and its summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Heatmap {
    pub today: NaiveDate,
    pub weeks: Vec<HeatmapWeek>,
    pub total_active_days: usize,
    pub total_count: u64,
    pub most_active_day: Option<DayCount>,
    pub current_streak: u32,
}

impl Heatmap {
    pub fn cell(&self, date: NaiveDate) -> Option<&HeatmapCell> {
        self.weeks
            .iter()
            .flat_map(|w| w.days.iter())
            .find(|c| c.date == date)
    }

    pub fn window_start(&self) -> Option<NaiveDate> {
        self.weeks.first().map(|w| w.start)
    }

    /// Seven rows (Sun..Sat), one column per week.
    pub fn render_ascii(&self) -> String {
        const DAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
        let mut out = String::new();
        for (row, label) in DAY_LABELS.iter().enumerate() {
            out.push_str(label);
            out.push(' ');
            for week in &self.weeks {
                out.push(week.days.get(row).map_or(' ', HeatmapCell::heat_char));
            }
            out.push('\n');
        }
        out
    }
}

/// Widest heatmap window, in weeks. Larger requests are clamped.
pub const MAX_HEATMAP_WEEKS: u32 = 520;

/// Build the calendar grid for the `weeks` weeks ending with today's week.
///
/// The window starts `weeks * 7 - 1` days before `today`, snapped back to
/// Sunday, and runs through the Saturday of today's week. `weeks` is clamped
/// into `1..=MAX_HEATMAP_WEEKS`. Near the ends of the supported calendar the
/// window is cut short instead of overflowing.
pub fn build_heatmap(log: &ActivityLog, weeks: u32, today: NaiveDate) -> Heatmap {
    let weeks = i64::from(weeks.clamp(1, MAX_HEATMAP_WEEKS));
    let window_start = week_start_sunday(
        today
            .checked_sub_signed(Duration::days(weeks * 7 - 1))
            .unwrap_or(NaiveDate::MIN),
    );
    let window_end = week_start_sunday(today)
        .checked_add_signed(Duration::days(6))
        .unwrap_or(NaiveDate::MAX);

    let mut grid = Vec::new();
    let mut total_active_days = 0usize;
    let mut total_count = 0u64;
    let mut week_start = Some(window_start);

    while let Some(start) = week_start.filter(|d| *d <= window_end) {
        let days = (0..7)
            .map_while(|offset| start.checked_add_signed(Duration::days(offset)))
            .map(|date| {
                let is_future = date > today;
                let count = if is_future { 0 } else { log.count_on(date) };
                if count > 0 {
                    total_active_days += 1;
                    total_count += u64::from(count);
                }
                HeatmapCell {
                    date,
                    count,
                    level: intensity_level(count),
                    is_future,
                }
            })
            .collect();
        grid.push(HeatmapWeek { start, days });
        week_start = start.checked_add_signed(Duration::days(7));
    }

    Heatmap {
        today,
        weeks: grid,
        total_active_days,
        total_count,
        most_active_day: log.most_active_between(window_start, today),
        current_streak: current_streak(log, today),
    }
}

/// Consecutive active days ending today.
///
/// The walk stops at the first day without activity, so an empty today
/// gives 0 and a single missed day ends the streak.
pub fn current_streak(log: &ActivityLog, today: NaiveDate) -> u32 {
    let mut streak = 0u32;
    let mut day = today;
    while log.count_on(day) > 0 {
        streak += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    streak
}

/// Longest run of `true` in a chronological completed/missed sequence.
pub fn longest_streak(days: &[bool]) -> u32 {
    let mut longest = 0u32;
    let mut run = 0u32;
    for completed in days {
        if *completed {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    longest
}

/// Per-day completed flags for `from..=to`.
pub fn daily_completion_sequence(log: &ActivityLog, from: NaiveDate, to: NaiveDate) -> Vec<bool> {
    from.iter_days()
        .take_while(|d| *d <= to)
        .map(|d| log.count_on(d) > 0)
        .collect()
}

/// Longest streak anywhere in the log.
pub fn longest_streak_from_dates(log: &ActivityLog) -> u32 {
    match (log.first_date(), log.last_date()) {
        (Some(first), Some(last)) => longest_streak(&daily_completion_sequence(log, first, last)),
        _ => 0,
    }
}

/// Date with the most completions; ties go to the earliest date.
pub fn most_active_day(completions: &[DateTime<Utc>]) -> Option<DayCount> {
    ActivityLog::from_instants(completions).most_active_day()
}

/// Number of distinct local dates with at least one completion.
pub fn active_day_count(completions: &[DateTime<Utc>]) -> usize {
    ActivityLog::from_instants(completions).active_days()
}
