//! Schedule derivation.
//!
//! Turns an exam date, a subject list and a daily budget into a bounded
//! sequence of day plans. Every day rotates the primary subject, practices the
//! next one, and closes with revision.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::allocation::allocate_hours;
use crate::types::{StudyPlanInput, SubjectInput, default_subjects};

/// Longest plan ever produced, regardless of how far away the exam is.
pub const MAX_PLAN_DAYS: u32 = 30;

/// Plan length used when there is no usable exam date in the future.
pub const FALLBACK_PLAN_DAYS: u32 = 5;

/// Budget used when the daily hours input is missing or not positive.
pub const DEFAULT_DAILY_HOURS: f64 = 4.0;

/// Label of the closing task of each day.
pub const REVISION_TASK: &str = "Revision & Mock Review";

/// A single block of study within a day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub subject: String,
    pub hours: f64,
}

/// One day's ordered tasks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPlan {
    /// 1-based day number.
    pub day: u32,
    pub tasks: Vec<Task>,
}

impl DayPlan {
    /// Hours planned for the day.
    pub fn total_hours(&self) -> f64 {
        self.tasks.iter().map(|task| task.hours).sum()
    }
}

/// Builds `total_days` day plans.
///
/// The primary subject rotates through `subjects`; the practice block covers
/// the following subject. With no subjects, days are labelled
/// `Focus Block N` and practice falls back to the same label. Zero-hour tasks
/// are omitted.
pub fn derive_plan(subjects: &[SubjectInput], daily_hours: f64, total_days: u32) -> Vec<DayPlan> {
    let allocation = allocate_hours(daily_hours);

    (0..total_days)
        .map(|index| {
            let position = index as usize;
            let primary = if subjects.is_empty() {
                format!("Focus Block {}", index + 1)
            } else {
                subjects[position % subjects.len()].name.clone()
            };
            let secondary = if subjects.is_empty() {
                primary.clone()
            } else {
                subjects[(position + 1) % subjects.len()].name.clone()
            };

            let tasks = [
                (primary, allocation.focus_hours),
                (format!("{secondary} Practice"), allocation.practice_hours),
                (REVISION_TASK.to_string(), allocation.revision_hours),
            ]
            .into_iter()
            .filter(|(_, hours)| *hours > 0.0)
            .map(|(subject, hours)| Task { subject, hours })
            .collect();

            DayPlan {
                day: index + 1,
                tasks,
            }
        })
        .collect()
}

/// Number of days to plan for.
///
/// Days until the exam, capped at [`MAX_PLAN_DAYS`]. An exam today, in the
/// past, or missing gives [`FALLBACK_PLAN_DAYS`].
pub fn total_days(exam_date: Option<NaiveDate>, today: NaiveDate) -> u32 {
    let fallback = MAX_PLAN_DAYS.min(FALLBACK_PLAN_DAYS);
    let Some(exam_date) = exam_date else {
        return fallback;
    };

    let days_until_exam = (exam_date - today).num_days();
    if days_until_exam <= 0 {
        return fallback;
    }

    u32::try_from(days_until_exam).map_or(MAX_PLAN_DAYS, |days| days.min(MAX_PLAN_DAYS))
}

/// Leniently parses an exam date.
///
/// Accepts `yyyy-mm-dd`, RFC 3339 timestamps (converted to the local date),
/// and naive `yyyy-mm-ddTHH:MM:SS` timestamps. Anything else is `None`.
pub fn parse_exam_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .ok()
        .map(|dt| dt.date())
}

/// Parses the daily hours input.
///
/// Reads the leading number (`"4.5h"` is 4.5). Empty, non-numeric,
/// non-finite or non-positive input gives [`DEFAULT_DAILY_HOURS`].
pub fn parse_daily_hours(raw: &str) -> f64 {
    leading_number(raw)
        .filter(|hours| hours.is_finite() && *hours > 0.0)
        .unwrap_or(DEFAULT_DAILY_HOURS)
}

/// Longest numeric prefix of `raw` after leading whitespace.
fn leading_number(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// Trims subject names and drops blank ones, falling back to the defaults
/// when nothing is left.
pub fn sanitize_subjects(subjects: &[SubjectInput]) -> Vec<SubjectInput> {
    let sanitized: Vec<SubjectInput> = subjects
        .iter()
        .filter_map(|subject| SubjectInput::new(&subject.name, subject.difficulty).ok())
        .collect();

    if sanitized.is_empty() {
        default_subjects()
    } else {
        sanitized
    }
}

/// A derived study plan with the inputs it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyPlan {
    /// First day of the plan (today).
    pub start_date: NaiveDate,
    /// The exam date as entered, if non-blank.
    pub exam_date: Option<String>,
    pub daily_hours: f64,
    pub subjects: Vec<SubjectInput>,
    pub days: Vec<DayPlan>,
}

impl StudyPlan {
    /// Derives the plan for `input` starting on `today`.
    ///
    /// Missing input behaves like an empty form: default subjects, the
    /// default budget and the fallback length.
    pub fn derive(input: Option<&StudyPlanInput>, today: NaiveDate) -> Self {
        let subjects =
            sanitize_subjects(input.map(|i| i.subjects.as_slice()).unwrap_or_default());
        let daily_hours = parse_daily_hours(input.map_or("", |i| i.daily_hours.as_str()));
        let exam_date = input
            .map(|i| i.exam_date.trim())
            .filter(|raw| !raw.is_empty())
            .map(str::to_string);

        let parsed_exam = exam_date.as_deref().and_then(parse_exam_date);
        if exam_date.is_some() && parsed_exam.is_none() {
            tracing::debug!(exam_date = ?exam_date, "unparseable exam date, using fallback length");
        }
        let days = total_days(parsed_exam, today);

        tracing::debug!(
            days,
            daily_hours,
            subjects = subjects.len(),
            "derived study plan"
        );

        Self {
            start_date: today,
            days: derive_plan(&subjects, daily_hours, days),
            exam_date,
            daily_hours,
            subjects,
        }
    }

    /// Number of planned days.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether the plan has no days. Derived plans never are.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Hours planned across all days.
    pub fn total_hours(&self) -> f64 {
        self.days.iter().map(DayPlan::total_hours).sum()
    }
}
