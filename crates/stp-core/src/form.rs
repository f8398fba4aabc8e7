//! Input form state.
//!
//! Holds what the user is typing before a plan exists: the exam date, the
//! editable subject list and the daily budget. Submission is blocked until
//! the exam date validates.

use chrono::{Duration, NaiveDate};
use thiserror::Error;

use crate::types::{Difficulty, StudyPlanInput, SubjectInput, default_subjects};

/// Daily hours prefilled in a new form.
pub const DEFAULT_DAILY_HOURS_INPUT: &str = "4";

/// Problems with the exam date field.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ExamDateError {
    /// Nothing entered yet. Not shown to the user, but blocks submission.
    #[error("Exam date is required.")]
    Missing,

    /// Not a `yyyy-mm-dd` date with month 1-12 and day 1-31.
    #[error("Enter a valid exam date.")]
    Invalid,

    /// Today or earlier.
    #[error("Exam date must be in the future.")]
    NotInFuture,
}

/// Reasons a form cannot be edited or submitted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error(transparent)]
    ExamDate(#[from] ExamDateError),

    #[error("add at least one subject")]
    NoSubjects,

    #[error("no subject at position {index} (have {len})")]
    NoSuchSubject { index: usize, len: usize },
}

/// Parses a form date string.
///
/// Splits on `-` into year, month and day integers. Month must be 1-12 and
/// day 1-31; days past the end of the month roll into the next one, so
/// `2026-02-31` is March 3rd.
pub fn parse_form_date(value: &str) -> Option<NaiveDate> {
    let mut parts = value.split('-');
    let year: i32 = parts.next()?.trim().parse().ok()?;
    let month: u32 = parts.next()?.trim().parse().ok()?;
    let day: u32 = parts.next()?.trim().parse().ok()?;

    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    let first_of_month = NaiveDate::from_ymd_opt(year, month, 1)?;
    first_of_month.checked_add_signed(Duration::days(i64::from(day - 1)))
}

/// Validates the exam date field against `today`.
pub fn validate_exam_date(value: &str, today: NaiveDate) -> Result<NaiveDate, ExamDateError> {
    if value.is_empty() {
        return Err(ExamDateError::Missing);
    }
    let date = parse_form_date(value).ok_or(ExamDateError::Invalid)?;
    if date <= today {
        return Err(ExamDateError::NotInFuture);
    }
    Ok(date)
}

/// Editable state of the study details form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanForm {
    exam_date: String,
    exam_date_error: Option<ExamDateError>,
    subjects: Vec<SubjectInput>,
    daily_hours: String,
}

impl Default for PlanForm {
    fn default() -> Self {
        Self {
            exam_date: String::new(),
            exam_date_error: None,
            subjects: default_subjects(),
            daily_hours: DEFAULT_DAILY_HOURS_INPUT.to_string(),
        }
    }
}

impl PlanForm {
    /// Creates a form prefilled with the starter subjects.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exam_date(&self) -> &str {
        &self.exam_date
    }

    /// The message to show under the exam date field, if any.
    ///
    /// A missing date is never shown.
    pub const fn exam_date_error(&self) -> Option<ExamDateError> {
        match self.exam_date_error {
            Some(ExamDateError::Missing) | None => None,
            other => other,
        }
    }

    pub fn subjects(&self) -> &[SubjectInput] {
        &self.subjects
    }

    pub fn daily_hours(&self) -> &str {
        &self.daily_hours
    }

    /// Sets the exam date and revalidates it immediately.
    pub fn set_exam_date(&mut self, value: impl Into<String>, today: NaiveDate) {
        self.exam_date = value.into();
        self.exam_date_error = validate_exam_date(&self.exam_date, today).err();
    }

    /// Sets the raw daily hours text. Parsing happens when the plan is derived.
    pub fn set_daily_hours(&mut self, value: impl Into<String>) {
        self.daily_hours = value.into();
    }

    /// Appends a Medium subject. Blank names are ignored.
    ///
    /// Returns whether a subject was added.
    pub fn add_subject(&mut self, name: &str) -> bool {
        match SubjectInput::new(name, Difficulty::Medium) {
            Ok(subject) => {
                self.subjects.push(subject);
                true
            }
            Err(_) => false,
        }
    }

    /// Removes the subject at `index`.
    pub fn remove_subject(&mut self, index: usize) -> Result<SubjectInput, FormError> {
        self.check_index(index)?;
        Ok(self.subjects.remove(index))
    }

    /// Changes the difficulty of the subject at `index`.
    pub fn set_difficulty(&mut self, index: usize, difficulty: Difficulty) -> Result<(), FormError> {
        self.check_index(index)?;
        self.subjects[index].difficulty = difficulty;
        Ok(())
    }

    /// Whether the generate action is enabled.
    pub fn can_generate(&self) -> bool {
        !self.exam_date.is_empty() && !self.subjects.is_empty() && self.exam_date_error().is_none()
    }

    /// Validates everything and produces the plan input.
    pub fn submit(&mut self, today: NaiveDate) -> Result<StudyPlanInput, FormError> {
        let validated = validate_exam_date(&self.exam_date, today);
        self.exam_date_error = validated.err();
        validated?;

        if self.subjects.is_empty() {
            return Err(FormError::NoSubjects);
        }

        Ok(StudyPlanInput {
            exam_date: self.exam_date.clone(),
            subjects: self.subjects.clone(),
            daily_hours: self.daily_hours.clone(),
        })
    }

    fn check_index(&self, index: usize) -> Result<(), FormError> {
        if index < self.subjects.len() {
            Ok(())
        } else {
            Err(FormError::NoSuchSubject {
                index,
                len: self.subjects.len(),
            })
        }
    }
}
