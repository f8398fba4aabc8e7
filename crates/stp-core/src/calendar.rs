//! Calendar projection of a plan.
//!
//! Assigns a real date to every planned day and works out the exam banner.
//! Dates that fail to parse fall back to today instead of failing.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::schedule::{DayPlan, StudyPlan, Task, parse_exam_date};

/// One calendar cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub day: u32,
    pub date: NaiveDate,
    /// Full weekday name, e.g. "Monday".
    pub weekday: String,
    /// Short date, e.g. "Oct 19".
    pub label: String,
    pub tasks: Vec<Task>,
    pub total_hours: f64,
}

/// A plan laid out on the calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarView {
    pub start_date: NaiveDate,
    /// Exam date shown in the banner.
    pub exam_date: NaiveDate,
    pub days: Vec<CalendarDay>,
}

/// Date of 1-based `day` in a plan starting on `start`.
pub fn date_for_day(start: NaiveDate, day: u32) -> NaiveDate {
    start
        .checked_add_days(Days::new(u64::from(day.saturating_sub(1))))
        .unwrap_or(NaiveDate::MAX)
}

/// Lays out `days` from `start`.
///
/// `exam_date` is parsed leniently; when it is missing or unparseable the
/// banner shows the day after the plan ends.
pub fn build_calendar(
    start: NaiveDate,
    days: &[DayPlan],
    exam_date: Option<&str>,
    today: NaiveDate,
) -> CalendarView {
    let exam_date = match exam_date {
        Some(raw) => parse_exam_date(raw).unwrap_or(today),
        None => start
            .checked_add_days(Days::new(u64::try_from(days.len()).unwrap_or(0)))
            .unwrap_or(start),
    };

    let days = days
        .iter()
        .map(|plan| {
            let date = date_for_day(start, plan.day);
            CalendarDay {
                day: plan.day,
                date,
                weekday: date.format("%A").to_string(),
                label: date.format("%b %d").to_string(),
                tasks: plan.tasks.clone(),
                total_hours: plan.total_hours(),
            }
        })
        .collect();

    CalendarView {
        start_date: start,
        exam_date,
        days,
    }
}

impl CalendarView {
    /// Lays out a derived plan.
    pub fn from_plan(plan: &StudyPlan, today: NaiveDate) -> Self {
        build_calendar(plan.start_date, &plan.days, plan.exam_date.as_deref(), today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::schedule::derive_plan;
    use crate::types::{Difficulty, SubjectInput};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn plan(days: u32) -> Vec<DayPlan> {
        let subjects = vec![SubjectInput::new("LIC", Difficulty::Medium).unwrap()];
        derive_plan(&subjects, 4.0, days)
    }

    #[test]
    fn days_get_consecutive_dates_and_labels() {
        let view = build_calendar(today(), &plan(3), Some("2026-10-21"), today());
        let cells: Vec<(String, String)> = view
            .days
            .iter()
            .map(|d| (d.weekday.clone(), d.label.clone()))
            .collect();
        assert_eq!(
            cells,
            [
                ("Sunday".to_string(), "Oct 18".to_string()),
                ("Monday".to_string(), "Oct 19".to_string()),
                ("Tuesday".to_string(), "Oct 20".to_string()),
            ]
        );
        assert_eq!(view.exam_date, NaiveDate::from_ymd_opt(2026, 10, 21).unwrap());
    }

    #[test]
    fn day_totals_sum_task_hours() {
        let view = build_calendar(today(), &plan(1), None, today());
        assert!((view.days[0].total_hours - 4.0).abs() < 1e-9);
    }

    #[test]
    fn missing_exam_date_lands_after_last_day() {
        let view = build_calendar(today(), &plan(5), None, today());
        assert_eq!(view.exam_date, NaiveDate::from_ymd_opt(2026, 10, 23).unwrap());
    }

    #[test]
    fn unparseable_exam_date_falls_back_to_today() {
        let view = build_calendar(today(), &plan(2), Some("someday"), today());
        assert_eq!(view.exam_date, today());
    }

    #[test]
    fn date_for_day_is_one_based() {
        assert_eq!(date_for_day(today(), 1), today());
        assert_eq!(
            date_for_day(today(), 15),
            NaiveDate::from_ymd_opt(2026, 11, 1).unwrap()
        );
    }
}
