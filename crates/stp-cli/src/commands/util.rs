//! Shared utilities for CLI commands.

use anyhow::{Result, bail};
use chrono::{Local, NaiveDate};
use clap::Args;
use stp_core::form::validate_exam_date;
use stp_core::{StudyPlanInput, SubjectInput};

use crate::Config;

/// Plan inputs shared by the plan, analytics and progress commands.
#[derive(Debug, Clone, Default, Args)]
pub struct PlanArgs {
    /// Exam date, e.g. 2026-11-01. Without one the plan covers five days.
    #[arg(long)]
    pub exam_date: Option<String>,

    /// Subject to study, repeatable. Difficulty is easy, medium or hard.
    #[arg(long = "subject", value_name = "NAME[:DIFFICULTY]")]
    pub subjects: Vec<SubjectInput>,

    /// Daily study hours (defaults to the configured budget).
    #[arg(long)]
    pub hours: Option<String>,
}

impl PlanArgs {
    /// Fills the plan input from the flags, using `config` for what is unset.
    ///
    /// A given exam date must be a valid date after `today`.
    pub fn to_input(&self, config: &Config, today: NaiveDate) -> Result<StudyPlanInput> {
        if let Some(exam_date) = &self.exam_date {
            if let Err(err) = validate_exam_date(exam_date, today) {
                bail!("{err}");
            }
        }

        Ok(StudyPlanInput {
            exam_date: self.exam_date.clone().unwrap_or_default(),
            subjects: if self.subjects.is_empty() {
                config.subjects.clone()
            } else {
                self.subjects.clone()
            },
            daily_hours: self
                .hours
                .clone()
                .unwrap_or_else(|| config.daily_hours.to_string()),
        })
    }
}

/// Today's date on this machine.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Formats hours with one decimal, e.g. `2.5h`.
pub fn format_hours(hours: f64) -> String {
    format!("{hours:.1}h")
}

/// Truncates by characters, not bytes, adding `...` when cut.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let keep = width.saturating_sub(3);
        format!("{}...", text.chars().take(keep).collect::<String>())
    } else {
        text.to_string()
    }
}
