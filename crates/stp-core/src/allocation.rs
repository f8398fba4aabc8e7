//! Daily hour allocation.
//!
//! Splits a day's study budget into focus, practice and revision blocks.
//!
//! # Algorithm Summary
//!
//! 1. Take 50% / 30% / 20% of the budget, each rounded to one decimal
//! 2. Push any rounding residual of at least 0.1h into revision
//! 3. If revision went negative, clamp it and take the deficit from practice
//! 4. If a residual remains and revision is empty, push it into practice
//!
//! Very small budgets can still end up 0.1h off. That drift is kept as is so
//! plans stay identical to those produced by earlier versions.

use serde::Serialize;

/// Share of the budget spent on the primary subject.
const FOCUS_SHARE: f64 = 0.5;
/// Share of the budget spent on practice for the next subject.
const PRACTICE_SHARE: f64 = 0.3;
/// Share of the budget spent on revision and mock review.
const REVISION_SHARE: f64 = 0.2;

/// One day's budget split into its three blocks, in hours.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct HourAllocation {
    pub focus_hours: f64,
    pub practice_hours: f64,
    pub revision_hours: f64,
}

impl HourAllocation {
    /// Sum of the three blocks.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.focus_hours + self.practice_hours + self.revision_hours
    }
}

/// Rounds to one decimal place, with halves going towards positive infinity.
///
/// `-0.05` rounds to `-0.0`, not `-0.1`; `f64::round` would round away from zero.
pub fn round_to_tenths(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

/// Splits `total_hours` into focus, practice and revision blocks.
///
/// All outputs are non-negative and rounded to one decimal. A zero budget
/// yields an all-zero allocation. Callers pass a positive budget; negative
/// input is not meaningful.
pub fn allocate_hours(total_hours: f64) -> HourAllocation {
    let focus = round_to_tenths(total_hours * FOCUS_SHARE);
    let mut practice = round_to_tenths(total_hours * PRACTICE_SHARE);
    let mut revision = round_to_tenths(total_hours * REVISION_SHARE);

    let mut assigned = round_to_tenths(focus + practice + revision);
    let mut residual = round_to_tenths(total_hours - assigned);

    if residual.abs() >= 0.1 {
        revision = round_to_tenths(revision + residual);
        assigned = round_to_tenths(focus + practice + revision);
        residual = round_to_tenths(total_hours - assigned);
    }

    if revision < 0.0 {
        practice = round_to_tenths((practice + revision).max(0.0));
        revision = 0.0;
    }

    if residual != 0.0 && practice > 0.0 && revision == 0.0 {
        practice = round_to_tenths(practice + residual);
    }

    HourAllocation {
        focus_hours: focus.max(0.0),
        practice_hours: practice.max(0.0),
        revision_hours: revision.max(0.0),
    }
}
