//! Validate command: checks an exam date the way the input form does.

use std::io::Write;

use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::Args;
use stp_core::form::validate_exam_date;
use stp_core::total_days;

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Exam date as entered, e.g. 2026-11-01.
    #[arg(long)]
    pub exam_date: String,
}

/// Describes a valid exam date.
pub fn describe(exam_date: NaiveDate, today: NaiveDate) -> String {
    let days_away = (exam_date - today).num_days();
    let plan_days = total_days(Some(exam_date), today);
    format!(
        "{} is valid: {days_away} day{} away, plan covers {plan_days} day{}",
        exam_date.format("%Y-%m-%d"),
        if days_away == 1 { "" } else { "s" },
        if plan_days == 1 { "" } else { "s" },
    )
}

/// Runs the validate command. Invalid dates are an error.
pub fn run<W: Write>(writer: &mut W, args: &ValidateArgs, today: NaiveDate) -> Result<()> {
    match validate_exam_date(args.exam_date.trim(), today) {
        Ok(date) => {
            writeln!(writer, "{}", describe(date, today))?;
            Ok(())
        }
        Err(err) => bail!("{err}"),
    }
}
