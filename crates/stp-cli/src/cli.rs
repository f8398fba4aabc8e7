//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{analytics, clock, plan, progress, serve, validate};

/// Study planner.
///
/// Derives a day-by-day study schedule from an exam date, a subject list and
/// a daily hour budget.
#[derive(Debug, Parser)]
#[command(name = "stp", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the derived study plan.
    Plan(plan::PlanCommandArgs),

    /// Show how the daily budget splits across subjects.
    Analytics(analytics::AnalyticsArgs),

    /// Show the completion checklist for a plan.
    Progress(progress::ProgressArgs),

    /// Check an exam date the way the input form does.
    Validate(validate::ValidateArgs),

    /// Show the synced clock.
    Clock(clock::ClockArgs),

    /// Serve network time over HTTP.
    Serve(serve::ServeArgs),

    /// Walk through the planner screens, one command per line on stdin.
    Session,
}
