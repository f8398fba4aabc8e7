//! Completion tracking for a plan.
//!
//! One checklist item per planned task. State lives only as long as the
//! tracker does.

use serde::Serialize;
use thiserror::Error;

use crate::schedule::DayPlan;

/// Progress tracking errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProgressError {
    #[error("unknown checklist item: {id}")]
    UnknownItem { id: String },
}

/// A single checkbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistItem {
    /// Stable id, `d{day}-t{n}`.
    pub id: String,
    /// Display label, `{subject} - Day {day}`.
    pub name: String,
    pub day: u32,
    pub completed: bool,
}

/// Completion state for every task in a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProgressTracker {
    items: Vec<ChecklistItem>,
}

impl ProgressTracker {
    /// Builds an unchecked list from the plan's tasks.
    pub fn from_plan(days: &[DayPlan]) -> Self {
        let items = days
            .iter()
            .flat_map(|day| {
                day.tasks
                    .iter()
                    .enumerate()
                    .map(move |(index, task)| ChecklistItem {
                        id: format!("d{}-t{}", day.day, index + 1),
                        name: format!("{} - Day {}", task.subject, day.day),
                        day: day.day,
                        completed: false,
                    })
            })
            .collect();
        Self { items }
    }

    pub fn items(&self) -> &[ChecklistItem] {
        &self.items
    }

    /// Flips the item with `id` and returns its new state.
    pub fn toggle(&mut self, id: &str) -> Result<bool, ProgressError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| ProgressError::UnknownItem { id: id.to_string() })?;
        item.completed = !item.completed;
        tracing::debug!(id, completed = item.completed, "toggled checklist item");
        Ok(item.completed)
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn completed(&self) -> usize {
        self.items.iter().filter(|item| item.completed).count()
    }

    /// Share of completed items, 0-100. An empty list is 0%.
    #[expect(
        clippy::cast_precision_loss,
        reason = "checklists are far below f64 integer precision"
    )]
    pub fn percentage(&self) -> f64 {
        if self.items.is_empty() {
            return 0.0;
        }
        self.completed() as f64 / self.total() as f64 * 100.0
    }

    /// Consecutive fully completed days counting from day 1.
    pub fn streak(&self) -> u32 {
        let mut streak = 0;
        let mut day = 1;
        loop {
            let mut items = self.items.iter().filter(|item| item.day == day).peekable();
            if items.peek().is_none() || !items.all(|item| item.completed) {
                return streak;
            }
            streak += 1;
            day += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::schedule::derive_plan;
    use crate::types::{Difficulty, SubjectInput};

    fn tracker(days: u32) -> ProgressTracker {
        let subjects = vec![
            SubjectInput::new("LIC", Difficulty::Medium).unwrap(),
            SubjectInput::new("MSP", Difficulty::Hard).unwrap(),
        ];
        ProgressTracker::from_plan(&derive_plan(&subjects, 4.0, days))
    }

    #[test]
    fn items_follow_plan_tasks() {
        let tracker = tracker(2);
        assert_eq!(tracker.total(), 6);
        let first = &tracker.items()[0];
        assert_eq!(first.id, "d1-t1");
        assert_eq!(first.name, "LIC - Day 1");
        assert_eq!(tracker.items()[4].name, "LIC Practice - Day 2");
    }

    #[test]
    fn toggle_flips_and_counts() {
        let mut tracker = tracker(2);
        assert!(tracker.toggle("d1-t2").unwrap());
        assert_eq!(tracker.completed(), 1);
        assert!(!tracker.toggle("d1-t2").unwrap());
        assert_eq!(tracker.completed(), 0);
    }

    #[test]
    fn toggle_unknown_item_fails() {
        let mut tracker = tracker(1);
        assert_eq!(
            tracker.toggle("d9-t1"),
            Err(ProgressError::UnknownItem {
                id: "d9-t1".to_string()
            })
        );
    }

    #[test]
    fn percentage_of_completed_items() {
        let mut tracker = tracker(2);
        assert!(tracker.percentage().abs() < f64::EPSILON);
        for id in ["d1-t1", "d1-t2", "d1-t3"] {
            tracker.toggle(id).unwrap();
        }
        assert!((tracker.percentage() - 50.0).abs() < 1e-9);
        assert!(ProgressTracker::default().percentage().abs() < f64::EPSILON);
    }

    #[test]
    fn streak_counts_leading_complete_days() {
        let mut tracker = tracker(3);
        assert_eq!(tracker.streak(), 0);

        for id in ["d1-t1", "d1-t2", "d1-t3", "d3-t1", "d3-t2", "d3-t3"] {
            tracker.toggle(id).unwrap();
        }
        assert_eq!(tracker.streak(), 1);

        for id in ["d2-t1", "d2-t2", "d2-t3"] {
            tracker.toggle(id).unwrap();
        }
        assert_eq!(tracker.streak(), 3);
    }
}
