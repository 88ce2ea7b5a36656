//! Statistics derived from availability records.
//!
//! Nothing here is cached: every figure is recomputed from the records passed
//! in, so a stat can never drift from the grid it describes.

use chrono::{Datelike, Duration, NaiveDateTime};
use serde::Serialize;

use crate::models::{AvailabilityRecord, Slot, DAYS_PER_WEEK, HOURS_PER_DAY, TOTAL_SLOTS};

pub fn available_slot_count(record: &AvailabilityRecord) -> usize {
    record.available_slots().count()
}

/// Days with at least one available hour, 0..=7.
pub fn available_day_count(record: &AvailabilityRecord) -> u8 {
    (0..DAYS_PER_WEEK)
        .filter(|day| record.available_slots().any(|slot| slot.day() == *day))
        .count() as u8
}

/// Share of the 56 weekly slots marked available, rounded to 0..=100.
pub fn availability_percentage(record: &AvailabilityRecord) -> u8 {
    percentage_of_grid(available_slot_count(record))
}

fn percentage_of_grid(count: usize) -> u8 {
    ((count as f64 / TOTAL_SLOTS as f64) * 100.0).round() as u8
}

pub fn headcount_per_slot<'a, I>(records: I, slot: Slot) -> usize
where
    I: IntoIterator<Item = &'a AvailabilityRecord>,
{
    records.into_iter().filter(|r| r.get(slot)).count()
}

/// Fraction of the players in view available at a slot, clamped to [0, 1].
pub fn intensity(headcount: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (headcount as f64 / total as f64).clamp(0.0, 1.0)
}

/// Mean of the per-record percentages, rounded. Zero for an empty view.
pub fn average_availability<'a, I>(records: I) -> u8
where
    I: IntoIterator<Item = &'a AvailabilityRecord>,
{
    let (sum, n) = records.into_iter().fold((0.0_f64, 0_usize), |(sum, n), r| {
        let share = available_slot_count(r) as f64 / TOTAL_SLOTS as f64 * 100.0;
        (sum + share, n + 1)
    });
    if n == 0 {
        return 0;
    }
    (sum / n as f64).round() as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityTier {
    High,
    Medium,
    Low,
}

impl AvailabilityTier {
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            70.. => AvailabilityTier::High,
            40.. => AvailabilityTier::Medium,
            _ => AvailabilityTier::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AvailabilityTier::High => "Highly available",
            AvailabilityTier::Medium => "Moderately available",
            AvailabilityTier::Low => "Rarely available",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatCell {
    pub headcount: usize,
    pub intensity: f64,
}

/// Per-slot headcount across the records in view, indexed `[day][hour]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyOverview {
    pub players_in_view: usize,
    pub cells: Vec<Vec<HeatCell>>,
}

impl WeeklyOverview {
    pub fn cell(&self, slot: Slot) -> HeatCell {
        self.cells[slot.day() as usize][slot.hour() as usize]
    }
}

pub fn weekly_overview(records: &[&AvailabilityRecord]) -> WeeklyOverview {
    let total = records.len();
    let cells = (0..DAYS_PER_WEEK)
        .map(|day| {
            (0..HOURS_PER_DAY)
                .filter_map(|hour| Slot::new(day, hour).ok())
                .map(|slot| {
                    let headcount = headcount_per_slot(records.iter().copied(), slot);
                    HeatCell {
                        headcount,
                        intensity: intensity(headcount, total),
                    }
                })
                .collect()
        })
        .collect();

    WeeklyOverview {
        players_in_view: total,
        cells,
    }
}

/// Time left until the weekly planning reset at Sunday 00:00.
/// Exactly at the reset instant the next reset is a full week away.
pub fn time_until_reset(now: NaiveDateTime) -> Duration {
    let days_ahead = 7 - i64::from(now.weekday().num_days_from_sunday());
    let reset_day = now.date() + Duration::days(days_ahead);
    let reset = reset_day.and_hms_opt(0, 0, 0).unwrap_or(now);
    reset - now
}

pub fn format_countdown(remaining: Duration) -> String {
    let days = remaining.num_days();
    let hours = remaining.num_hours() % 24;
    let minutes = remaining.num_minutes() % 60;

    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}
