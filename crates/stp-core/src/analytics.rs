//! Derived study analytics.
//!
//! Difficulty decides how much of the daily budget a subject gets in the
//! distribution view; whatever is left over is shown as revision.

use chrono::Weekday;
use serde::Serialize;

use crate::schedule::StudyPlan;
use crate::types::{Difficulty, SubjectInput};

/// Label of the leftover slice.
pub const REVISION_SLICE: &str = "Revision";

/// Weekend days get this multiple of the daily budget in the weekly pattern.
const WEEKEND_FACTOR: f64 = 1.5;

/// Share of the daily budget a subject of the given difficulty receives.
pub const fn difficulty_share(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::Hard => 0.35,
        Difficulty::Medium => 0.25,
        Difficulty::Easy => 0.15,
    }
}

/// One slice of the time distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSlice {
    pub name: String,
    pub hours: f64,
    pub difficulty: Difficulty,
}

/// Count of subjects per difficulty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DifficultyMix {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
}

impl DifficultyMix {
    pub fn from_subjects(subjects: &[SubjectInput]) -> Self {
        subjects.iter().fold(Self::default(), |mut mix, subject| {
            match subject.difficulty {
                Difficulty::Easy => mix.easy += 1,
                Difficulty::Medium => mix.medium += 1,
                Difficulty::Hard => mix.hard += 1,
            }
            mix
        })
    }

    pub const fn count(&self, difficulty: Difficulty) -> usize {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }
}

/// Planned hours for one weekday.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayHours {
    pub day: String,
    pub hours: f64,
}

/// Everything the analytics view shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analytics {
    pub daily_hours: f64,
    pub plan_days: usize,
    pub subject_count: usize,
    pub total_planned_hours: f64,
    pub average_daily_hours: f64,
    pub distribution: Vec<TimeSlice>,
    pub difficulty_mix: DifficultyMix,
    pub weekly_pattern: Vec<WeekdayHours>,
}

/// Rounds to one decimal the way the chart labels do.
///
/// Rounds the exact binary value, so `0.35` (stored just below) becomes `0.3`.
/// Exact halves such as `0.25` round away from zero.
pub fn round_chart_hours(value: f64) -> f64 {
    let scaled = value * 10.0;
    let product_is_exact = value.mul_add(10.0, -scaled) == 0.0;
    if product_is_exact && scaled.fract().abs() == 0.5 {
        return scaled.round() / 10.0;
    }
    format!("{value:.1}")
        .parse()
        .unwrap_or_else(|_| scaled.round() / 10.0)
}

/// Splits `daily_hours` between subjects by difficulty, plus a revision slice
/// holding what is left (never negative).
pub fn time_distribution(subjects: &[SubjectInput], daily_hours: f64) -> Vec<TimeSlice> {
    let mut slices: Vec<TimeSlice> = subjects
        .iter()
        .map(|subject| TimeSlice {
            name: subject.name.clone(),
            hours: round_chart_hours(daily_hours * difficulty_share(subject.difficulty)),
            difficulty: subject.difficulty,
        })
        .collect();

    let assigned: f64 = slices.iter().map(|slice| slice.hours).sum();
    slices.push(TimeSlice {
        name: REVISION_SLICE.to_string(),
        hours: round_chart_hours((daily_hours - assigned).max(0.0)),
        difficulty: Difficulty::Medium,
    });
    slices
}

/// Whole-percent share of each slice, for legends. All zeros if nothing is planned.
pub fn slice_percentages(slices: &[TimeSlice]) -> Vec<u32> {
    let total: f64 = slices.iter().map(|slice| slice.hours).sum();
    slices
        .iter()
        .map(|slice| {
            if total <= 0.0 {
                0
            } else {
                percent(slice.hours / total)
            }
        })
        .collect()
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "ratio is within [0, 1], so the rounded percentage fits in u32"
)]
fn percent(ratio: f64) -> u32 {
    (ratio * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Planned hours Monday through Sunday; weekends get half again.
pub fn weekly_pattern(daily_hours: f64) -> Vec<WeekdayHours> {
    [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ]
    .into_iter()
    .map(|weekday| {
        let hours = match weekday {
            Weekday::Sat | Weekday::Sun => daily_hours * WEEKEND_FACTOR,
            _ => daily_hours,
        };
        WeekdayHours {
            day: weekday.to_string(),
            hours,
        }
    })
    .collect()
}

impl Analytics {
    /// Computes analytics for a derived plan.
    #[expect(
        clippy::cast_precision_loss,
        reason = "plans have at most a few dozen days"
    )]
    pub fn from_plan(plan: &StudyPlan) -> Self {
        let total_planned_hours = plan.total_hours();
        let average_daily_hours = if plan.is_empty() {
            0.0
        } else {
            total_planned_hours / plan.len() as f64
        };

        Self {
            daily_hours: plan.daily_hours,
            plan_days: plan.len(),
            subject_count: plan.subjects.len(),
            total_planned_hours,
            average_daily_hours,
            distribution: time_distribution(&plan.subjects, plan.daily_hours),
            difficulty_mix: DifficultyMix::from_subjects(&plan.subjects),
            weekly_pattern: weekly_pattern(plan.daily_hours),
        }
    }
}
