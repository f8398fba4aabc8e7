//! Session command: the planner screens driven by line commands.
//!
//! Reads one command per line, applies it to the navigator, form and progress
//! state, and prints the result. Nothing is kept after the session ends.

use std::fmt::Write as _;
use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use stp_core::analytics::Analytics;
use stp_core::form::PlanForm;
use stp_core::navigation::{Navigator, Screen};
use stp_core::progress::ProgressTracker;
use stp_core::{Difficulty, StudyPlan};

use super::analytics::format_analytics;
use super::plan::format_plan;
use super::progress::format_progress;

const HELP: &str = "\
Commands:
  show                       redraw the current screen
  go <screen>                home, input, plan, progress or analytics
  back                       go to the previous screen
  date <yyyy-mm-dd>          set the exam date
  hours <n>                  set the daily study hours
  add <name>                 add a subject
  remove <n>                 remove subject number n
  difficulty <n> <level>     set subject n to easy, medium or hard
  generate                   build the plan from the input screen
  done <id>                  toggle a checklist item, e.g. d1-t2
  quit                       end the session";

/// What to do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print this and keep reading.
    Continue(String),
    Quit,
}

/// Screen state for one session.
#[derive(Debug, Clone)]
pub struct Session {
    navigator: Navigator,
    form: PlanForm,
    progress: Option<ProgressTracker>,
    today: NaiveDate,
}

impl Session {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            navigator: Navigator::new(),
            form: PlanForm::new(),
            progress: None,
            today,
        }
    }

    pub const fn screen(&self) -> Screen {
        self.navigator.current()
    }

    /// Applies one command line.
    pub fn handle(&mut self, line: &str) -> Outcome {
        let line = line.trim();
        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let text = match command.to_ascii_lowercase().as_str() {
            "" | "show" => self.render(),
            "help" => HELP.to_string(),
            "quit" | "exit" => return Outcome::Quit,
            "go" => self.go(rest),
            "back" => self.back(),
            "date" => self.set_date(rest),
            "hours" => {
                self.form.set_daily_hours(rest);
                format!("Daily hours set to {rest:?}.")
            }
            "add" => {
                if self.form.add_subject(rest) {
                    format!("Added {rest}.")
                } else {
                    "Subject name cannot be empty.".to_string()
                }
            }
            "remove" => self.remove(rest),
            "difficulty" => self.set_difficulty(rest),
            "generate" => self.generate(),
            "done" => self.toggle(rest),
            other => format!("Unknown command: {other}. Type 'help' for commands."),
        };
        Outcome::Continue(text.trim_end().to_string())
    }

    fn go(&mut self, target: &str) -> String {
        match target.parse::<Screen>() {
            Ok(screen) => {
                self.navigator.navigate(screen, None);
                if screen == Screen::Home {
                    self.progress = None;
                }
                self.render()
            }
            Err(err) => err.to_string(),
        }
    }

    fn back(&mut self) -> String {
        if !self.navigator.go_back() {
            return "Already on the home screen.".to_string();
        }
        if self.screen() == Screen::Home {
            self.progress = None;
        }
        self.render()
    }

    fn set_date(&mut self, value: &str) -> String {
        self.form.set_exam_date(value, self.today);
        match self.form.exam_date_error() {
            Some(err) => err.to_string(),
            None if value.is_empty() => "Exam date cleared.".to_string(),
            None => format!("Exam date set to {value}."),
        }
    }

    /// Parses a 1-based subject number.
    fn subject_index(&self, raw: &str) -> Result<usize, String> {
        raw.parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .filter(|index| *index < self.form.subjects().len())
            .ok_or_else(|| {
                format!(
                    "No subject number {raw:?}; pick 1 to {}.",
                    self.form.subjects().len()
                )
            })
    }

    fn remove(&mut self, raw: &str) -> String {
        let index = match self.subject_index(raw) {
            Ok(index) => index,
            Err(message) => return message,
        };
        match self.form.remove_subject(index) {
            Ok(subject) => format!("Removed {}.", subject.name),
            Err(err) => err.to_string(),
        }
    }

    fn set_difficulty(&mut self, rest: &str) -> String {
        let (raw_index, raw_level) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        let index = match self.subject_index(raw_index) {
            Ok(index) => index,
            Err(message) => return message,
        };
        let difficulty: Difficulty = match raw_level.trim().parse() {
            Ok(difficulty) => difficulty,
            Err(err) => return err.to_string(),
        };
        match self.form.set_difficulty(index, difficulty) {
            Ok(()) => format!(
                "{} is now {difficulty}.",
                self.form.subjects()[index].name
            ),
            Err(err) => err.to_string(),
        }
    }

    fn generate(&mut self) -> String {
        if self.screen() != Screen::Input {
            return "Open the input screen first (go input).".to_string();
        }
        match self.form.submit(self.today) {
            Ok(input) => {
                self.progress = None;
                self.navigator.navigate(Screen::Plan, Some(input));
                self.render()
            }
            Err(err) => format!("Cannot generate: {err}"),
        }
    }

    fn toggle(&mut self, id: &str) -> String {
        if self.screen() != Screen::Progress {
            return "Open the progress screen first (go progress).".to_string();
        }
        let plan = self.plan();
        let tracker = self
            .progress
            .get_or_insert_with(|| ProgressTracker::from_plan(&plan.days));
        match tracker.toggle(id) {
            Ok(_) => self.render(),
            Err(err) => err.to_string(),
        }
    }

    fn plan(&self) -> StudyPlan {
        StudyPlan::derive(self.navigator.study_data(), self.today)
    }

    /// Draws the current screen.
    pub fn render(&self) -> String {
        let screen = self.screen();
        let mut output = String::new();
        if screen.shows_header() {
            writeln!(output, "== Study Planner / {screen} ==").unwrap();
        }

        match screen {
            Screen::Home => {
                writeln!(output, "STUDY PLANNER").unwrap();
                writeln!(
                    output,
                    "Turn your exam date and subjects into a daily plan. Type 'go input' to start."
                )
                .unwrap();
            }
            Screen::Input => output.push_str(&format_form(&self.form)),
            Screen::Plan => output.push_str(&format_plan(&self.plan())),
            Screen::Progress => {
                let tracker = self
                    .progress
                    .clone()
                    .unwrap_or_else(|| ProgressTracker::from_plan(&self.plan().days));
                output.push_str(&format_progress(&tracker));
            }
            Screen::Analytics => {
                output.push_str(&format_analytics(&Analytics::from_plan(&self.plan())));
            }
        }
        output
    }
}

/// Formats the input form.
pub fn format_form(form: &PlanForm) -> String {
    let mut output = String::new();

    writeln!(output, "STUDY DETAILS").unwrap();
    let exam_date = if form.exam_date().is_empty() {
        "(not set)"
    } else {
        form.exam_date()
    };
    match form.exam_date_error() {
        Some(err) => writeln!(output, "Exam date: {exam_date}  ! {err}").unwrap(),
        None => writeln!(output, "Exam date: {exam_date}").unwrap(),
    }
    writeln!(output, "Daily hours: {}", form.daily_hours()).unwrap();
    writeln!(output, "Subjects:").unwrap();
    if form.subjects().is_empty() {
        writeln!(output, "  (none)").unwrap();
    }
    for (index, subject) in form.subjects().iter().enumerate() {
        writeln!(
            output,
            "  {}. {} ({})",
            index + 1,
            subject.name,
            subject.difficulty
        )
        .unwrap();
    }
    writeln!(
        output,
        "Ready to generate: {}",
        if form.can_generate() { "yes" } else { "no" }
    )
    .unwrap();

    output
}

/// Runs a session over `reader`, writing each result to `writer`.
pub fn run_with<R: BufRead, W: Write>(reader: R, writer: &mut W, today: NaiveDate) -> Result<()> {
    let mut session = Session::new(today);
    writeln!(writer, "{}", session.render().trim_end())?;

    for line in reader.lines() {
        let line = line.context("failed to read command")?;
        match session.handle(&line) {
            Outcome::Continue(text) => writeln!(writer, "{text}")?,
            Outcome::Quit => break,
        }
    }
    writer.flush()?;
    Ok(())
}

/// Runs the session command on stdin.
pub fn run(today: NaiveDate) -> Result<()> {
    let stdin = std::io::stdin();
    run_with(stdin.lock(), &mut std::io::stdout(), today)
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn text(outcome: Outcome) -> String {
        match outcome {
            Outcome::Continue(text) => text,
            Outcome::Quit => panic!("session ended"),
        }
    }

    #[test]
    fn test_starts_home_without_header() {
        let session = Session::new(today());
        assert_eq!(session.screen(), Screen::Home);
        assert!(!session.render().contains("=="));
    }

    #[test]
    fn test_input_form_editing() {
        let mut session = Session::new(today());
        session.handle("go input");
        assert_eq!(text(session.handle("date 2026-13-01")), "Enter a valid exam date.");
        assert_eq!(text(session.handle("date 2026-10-21")), "Exam date set to 2026-10-21.");
        assert_eq!(text(session.handle("remove 2")), "Removed ADCom.");
        assert_eq!(text(session.handle("add  Networks ")), "Added Networks.");
        assert_eq!(text(session.handle("difficulty 4 hard")), "Networks is now Hard.");
        assert_eq!(
            text(session.handle("difficulty 9 hard")),
            "No subject number \"9\"; pick 1 to 4."
        );
        session.handle("hours 3");

        assert_snapshot!(text(session.handle("show")), @r"
== Study Planner / input ==
STUDY DETAILS
Exam date: 2026-10-21
Daily hours: 3
Subjects:
  1. LIC (Medium)
  2. MSP (Medium)
  3. Java (Easy)
  4. Networks (Hard)
Ready to generate: yes
");
    }

    #[test]
    fn test_generate_requires_valid_date() {
        let mut session = Session::new(today());
        session.handle("go input");
        assert_eq!(
            text(session.handle("generate")),
            "Cannot generate: Exam date is required."
        );
        session.handle("date 2026-10-18");
        assert_eq!(
            text(session.handle("generate")),
            "Cannot generate: Exam date must be in the future."
        );
        assert_eq!(session.screen(), Screen::Input);
    }

    #[test]
    fn test_generate_then_track_progress() {
        let mut session = Session::new(today());
        session.handle("go input");
        session.handle("date 2026-10-19");
        let plan = text(session.handle("generate"));
        assert_eq!(session.screen(), Screen::Plan);
        assert!(plan.contains("Exam: 2026-10-19 | 1 day | 4.0h per day"));

        session.handle("go progress");
        session.handle("done d1-t1");
        session.handle("done d1-t2");
        let progress = text(session.handle("done d1-t3"));
        assert!(progress.contains("3/3 tasks complete (100%) | streak: 1 day"));
        assert_eq!(
            text(session.handle("done d7-t1")),
            "unknown checklist item: d7-t1"
        );

        // leaving and coming back keeps progress
        session.handle("back");
        let progress = text(session.handle("go progress"));
        assert!(progress.contains("3/3 tasks complete"));

        // home discards the plan and progress
        session.handle("go home");
        session.handle("go progress");
        assert!(text(session.handle("show")).contains("0/15 tasks complete"));
    }

    #[test]
    fn test_back_walks_the_screen_table() {
        let mut session = Session::new(today());
        assert_eq!(text(session.handle("back")), "Already on the home screen.");
        session.handle("go analytics");
        session.handle("back");
        assert_eq!(session.screen(), Screen::Plan);
        session.handle("back");
        assert_eq!(session.screen(), Screen::Input);
        session.handle("back");
        assert_eq!(session.screen(), Screen::Home);
    }

    #[test]
    fn test_unknown_input() {
        let mut session = Session::new(today());
        assert_eq!(text(session.handle("go settings")), "invalid screen: settings");
        assert_eq!(
            text(session.handle("dance")),
            "Unknown command: dance. Type 'help' for commands."
        );
        assert_eq!(
            text(session.handle("done d1-t1")),
            "Open the progress screen first (go progress)."
        );
    }

    #[test]
    fn test_run_with_stops_at_quit() {
        let script = "go input\ndate 2026-10-20\ngenerate\nquit\ngo home\n";
        let mut out = Vec::new();
        run_with(script.as_bytes(), &mut out, today()).unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.starts_with("STUDY PLANNER\n"));
        assert!(output.contains("== Study Planner / plan =="));
        assert!(output.contains("Exam: 2026-10-20 | 2 days | 4.0h per day"));
        // nothing after quit is processed
        assert!(!output.trim_end().ends_with("start."));
    }
}
