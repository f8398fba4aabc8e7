//! Plan command: the derived schedule as a list or a calendar.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use stp_core::StudyPlan;
use stp_core::calendar::CalendarView;

use super::util::{PlanArgs, format_hours, truncate};
use crate::Config;

/// Widest subject label before truncation.
const SUBJECT_WIDTH: usize = 28;

/// How to lay the plan out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum View {
    /// One block per day with its tasks.
    #[default]
    List,
    /// One line per calendar date.
    Calendar,
}

#[derive(Debug, Args)]
pub struct PlanCommandArgs {
    #[command(flatten)]
    pub input: PlanArgs,

    /// Layout of the plan.
    #[arg(long, value_enum, default_value_t = View::List)]
    pub view: View,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

pub(crate) const fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

// ========== Human-Readable Output ==========

/// Formats the plan as one block per day.
pub fn format_plan(plan: &StudyPlan) -> String {
    let mut output = String::new();

    writeln!(output, "STUDY PLAN").unwrap();
    writeln!(
        output,
        "Exam: {} | {} day{} | {} per day",
        plan.exam_date.as_deref().unwrap_or("not set"),
        plan.len(),
        plural(plan.len()),
        format_hours(plan.daily_hours)
    )
    .unwrap();

    for day in &plan.days {
        writeln!(output).unwrap();
        writeln!(output, "Day {}  {}", day.day, format_hours(day.total_hours())).unwrap();
        for task in &day.tasks {
            writeln!(
                output,
                "  {:<width$} {:>5}",
                truncate(&task.subject, SUBJECT_WIDTH),
                format_hours(task.hours),
                width = SUBJECT_WIDTH
            )
            .unwrap();
        }
    }

    output
}

/// Formats the plan as one line per date, with the exam banner on top.
pub fn format_calendar(view: &CalendarView) -> String {
    let mut output = String::new();

    let last = view.days.last().map_or(view.start_date, |day| day.date);
    writeln!(
        output,
        "CALENDAR  {} - {}",
        view.start_date.format("%b %d"),
        last.format("%b %d")
    )
    .unwrap();
    writeln!(output, "Exam: {}", view.exam_date.format("%A, %b %d")).unwrap();
    writeln!(output).unwrap();

    for day in &view.days {
        let tasks: Vec<&str> = day.tasks.iter().map(|task| task.subject.as_str()).collect();
        writeln!(
            output,
            "{} {}  Day {:<2}  {:>5}  {}",
            day.date.format("%a"),
            day.label,
            day.day,
            format_hours(day.total_hours),
            tasks.join(", ")
        )
        .unwrap();
    }

    output
}

// ========== Public Interface ==========

/// Runs the plan command.
pub fn run<W: Write>(
    writer: &mut W,
    args: &PlanCommandArgs,
    config: &Config,
    today: NaiveDate,
) -> Result<()> {
    let input = args.input.to_input(config, today)?;
    let plan = StudyPlan::derive(Some(&input), today);

    match (args.view, args.json) {
        (View::List, true) => writeln!(writer, "{}", serde_json::to_string_pretty(&plan)?)?,
        (View::List, false) => write!(writer, "{}", format_plan(&plan))?,
        (View::Calendar, json) => {
            let view = CalendarView::from_plan(&plan, today);
            if json {
                writeln!(writer, "{}", serde_json::to_string_pretty(&view)?)?;
            } else {
                write!(writer, "{}", format_calendar(&view))?;
            }
        }
    }

    Ok(())
}
