//! Core domain logic for the study planner.
//!
//! This crate contains the fundamental types and logic for:
//! - Allocation: splitting a daily budget into focus, practice and revision
//! - Schedule: deriving day-by-day plans from exam date, subjects and budget
//! - Views over a plan: calendar layout, progress checklist, analytics
//! - Screen state: the input form, navigation and the clock display

mod allocation;
pub mod analytics;
pub mod calendar;
pub mod clock;
pub mod form;
pub mod navigation;
pub mod progress;
pub mod schedule;
mod types;

pub use allocation::{HourAllocation, allocate_hours, round_to_tenths};
pub use schedule::{DayPlan, StudyPlan, Task, derive_plan, total_days};
pub use types::{Difficulty, StudyPlanInput, SubjectInput, ValidationError, default_subjects};
