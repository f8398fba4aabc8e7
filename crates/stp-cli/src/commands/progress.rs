//! Progress command: the completion checklist for a plan.
//!
//! Progress is not stored between runs; `--done` marks items for this run only.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use stp_core::StudyPlan;
use stp_core::progress::{ChecklistItem, ProgressTracker};

use super::plan::plural;
use super::util::PlanArgs;
use crate::Config;

#[derive(Debug, Args)]
pub struct ProgressArgs {
    #[command(flatten)]
    pub input: PlanArgs,

    /// Mark a checklist item complete, e.g. d1-t2. Repeatable.
    #[arg(long = "done", value_name = "ID")]
    pub done: Vec<String>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// JSON output structure.
#[derive(Debug, Serialize)]
pub struct JsonProgress<'a> {
    pub completed: usize,
    pub total: usize,
    pub percentage: f64,
    pub streak: u32,
    pub items: &'a [ChecklistItem],
}

/// Formats the checklist grouped by day.
pub fn format_progress(tracker: &ProgressTracker) -> String {
    let mut output = String::new();

    let streak = tracker.streak();
    writeln!(output, "PROGRESS").unwrap();
    writeln!(
        output,
        "{}/{} tasks complete ({}%) | streak: {} day{}",
        tracker.completed(),
        tracker.total(),
        tracker.percentage().round(),
        streak,
        plural(streak as usize)
    )
    .unwrap();

    let mut current_day = None;
    for item in tracker.items() {
        if current_day != Some(item.day) {
            writeln!(output).unwrap();
            writeln!(output, "Day {}", item.day).unwrap();
            current_day = Some(item.day);
        }
        let mark = if item.completed { 'x' } else { ' ' };
        writeln!(output, "  [{mark}] {}  {}", item.id, item.name).unwrap();
    }

    output
}

/// Builds the tracker for `plan` with `done` items checked.
pub fn tracker_with_done(plan: &StudyPlan, done: &[String]) -> Result<ProgressTracker> {
    let mut tracker = ProgressTracker::from_plan(&plan.days);
    for id in done {
        let completed = tracker
            .toggle(id)
            .with_context(|| format!("failed to mark {id} as done"))?;
        // a repeated id toggles back off; keep it checked
        if !completed {
            tracker.toggle(id)?;
        }
    }
    Ok(tracker)
}

/// Runs the progress command.
pub fn run<W: Write>(
    writer: &mut W,
    args: &ProgressArgs,
    config: &Config,
    today: NaiveDate,
) -> Result<()> {
    let input = args.input.to_input(config, today)?;
    let plan = StudyPlan::derive(Some(&input), today);
    let tracker = tracker_with_done(&plan, &args.done)?;

    if args.json {
        let json = JsonProgress {
            completed: tracker.completed(),
            total: tracker.total(),
            percentage: tracker.percentage(),
            streak: tracker.streak(),
            items: tracker.items(),
        };
        writeln!(writer, "{}", serde_json::to_string_pretty(&json)?)?;
    } else {
        write!(writer, "{}", format_progress(&tracker))?;
    }
    Ok(())
}
