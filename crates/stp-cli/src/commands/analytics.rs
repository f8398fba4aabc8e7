//! Analytics command: how the daily budget splits across subjects.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use stp_core::StudyPlan;
use stp_core::analytics::{Analytics, slice_percentages};

use super::plan::plural;
use super::util::{PlanArgs, format_hours, truncate};
use crate::Config;

const NAME_WIDTH: usize = 28;

#[derive(Debug, Args)]
pub struct AnalyticsArgs {
    #[command(flatten)]
    pub input: PlanArgs,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Formats analytics for human-readable output.
pub fn format_analytics(analytics: &Analytics) -> String {
    let mut output = String::new();

    writeln!(output, "ANALYTICS").unwrap();
    writeln!(
        output,
        "{} day{} | {} subject{} | {} per day",
        analytics.plan_days,
        plural(analytics.plan_days),
        analytics.subject_count,
        plural(analytics.subject_count),
        format_hours(analytics.daily_hours)
    )
    .unwrap();
    writeln!(
        output,
        "Total planned: {} | Average: {} per day",
        format_hours(analytics.total_planned_hours),
        format_hours(analytics.average_daily_hours)
    )
    .unwrap();

    writeln!(output).unwrap();
    writeln!(output, "TIME DISTRIBUTION").unwrap();
    let percentages = slice_percentages(&analytics.distribution);
    let subjects = analytics.distribution.len().saturating_sub(1);
    for (index, (slice, percent)) in analytics.distribution.iter().zip(&percentages).enumerate() {
        write!(
            output,
            "  {:<width$} {:>5}  {:>3}%",
            truncate(&slice.name, NAME_WIDTH),
            format_hours(slice.hours),
            percent,
            width = NAME_WIDTH
        )
        .unwrap();
        // the trailing revision slice has no difficulty of its own
        if index < subjects {
            write!(output, "  {}", slice.difficulty).unwrap();
        }
        writeln!(output).unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "DIFFICULTY MIX").unwrap();
    for difficulty in stp_core::Difficulty::ALL {
        writeln!(
            output,
            "  {:<7} {}",
            difficulty.as_str(),
            analytics.difficulty_mix.count(difficulty)
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "WEEKLY PATTERN").unwrap();
    for weekday in &analytics.weekly_pattern {
        writeln!(output, "  {}  {}", weekday.day, format_hours(weekday.hours)).unwrap();
    }

    output
}

/// Runs the analytics command.
pub fn run<W: Write>(
    writer: &mut W,
    args: &AnalyticsArgs,
    config: &Config,
    today: NaiveDate,
) -> Result<()> {
    let input = args.input.to_input(config, today)?;
    let plan = StudyPlan::derive(Some(&input), today);
    let analytics = Analytics::from_plan(&plan);

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&analytics)?)?;
    } else {
        write!(writer, "{}", format_analytics(&analytics))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;
    use stp_core::StudyPlanInput;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_format_analytics_defaults() {
        let input = StudyPlanInput {
            exam_date: "2026-10-21".to_string(),
            subjects: stp_core::default_subjects(),
            daily_hours: "4".to_string(),
        };
        let analytics = Analytics::from_plan(&StudyPlan::derive(Some(&input), today()));
        assert_snapshot!(format_analytics(&analytics), @r"
ANALYTICS
3 days | 4 subjects | 4.0h per day
Total planned: 12.0h | Average: 4.0h per day

TIME DISTRIBUTION
  LIC                           1.0h   25%  Medium
  ADCom                         1.4h   35%  Hard
  MSP                           1.0h   25%  Medium
  Java                          0.6h   15%  Easy
  Revision                      0.0h    0%

DIFFICULTY MIX
  Easy    1
  Medium  2
  Hard    1

WEEKLY PATTERN
  Mon  4.0h
  Tue  4.0h
  Wed  4.0h
  Thu  4.0h
  Fri  4.0h
  Sat  6.0h
  Sun  6.0h
");
    }

    #[test]
    fn test_run_json() {
        let args = AnalyticsArgs {
            input: PlanArgs {
                exam_date: Some("2026-10-19".to_string()),
                subjects: vec!["Java:easy".parse().unwrap()],
                hours: Some("10".to_string()),
            },
            json: true,
        };
        let mut out = Vec::new();
        run(&mut out, &args, &Config::default(), today()).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["plan_days"], 1);
        assert_eq!(value["subject_count"], 1);
        assert_eq!(value["distribution"][0]["hours"], 1.5);
        assert_eq!(value["distribution"][1]["name"], "Revision");
        assert_eq!(value["distribution"][1]["hours"], 8.5);
        assert_eq!(value["difficulty_mix"]["easy"], 1);
    }
}
