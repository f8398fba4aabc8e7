//! Screen navigation state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{StudyPlanInput, ValidationError};

/// Screens of the planner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    #[default]
    Home,
    Input,
    Plan,
    Progress,
    Analytics,
}

impl Screen {
    /// Where "back" leads from this screen. Home has nowhere to go.
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Home => None,
            Self::Input => Some(Self::Home),
            Self::Plan => Some(Self::Input),
            Self::Progress | Self::Analytics => Some(Self::Plan),
        }
    }

    /// Whether the header (with notifications) is shown on this screen.
    pub const fn shows_header(self) -> bool {
        !matches!(self, Self::Home)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Input => "input",
            Self::Plan => "plan",
            Self::Progress => "progress",
            Self::Analytics => "analytics",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Screen {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" => Ok(Self::Home),
            "input" => Ok(Self::Input),
            "plan" => Ok(Self::Plan),
            "progress" => Ok(Self::Progress),
            "analytics" => Ok(Self::Analytics),
            _ => Err(ValidationError::InvalidScreen {
                value: s.to_string(),
            }),
        }
    }
}

/// Current screen plus the study data handed between screens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    current: Screen,
    study_data: Option<StudyPlanInput>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn current(&self) -> Screen {
        self.current
    }

    pub const fn study_data(&self) -> Option<&StudyPlanInput> {
        self.study_data.as_ref()
    }

    /// Moves to `screen`, replacing the study data when `data` is given.
    ///
    /// Going home discards the study data.
    pub fn navigate(&mut self, screen: Screen, data: Option<StudyPlanInput>) {
        if let Some(data) = data {
            self.study_data = Some(data);
        }
        if screen == Screen::Home {
            self.study_data = None;
        }
        tracing::debug!(from = %self.current, to = %screen, "navigate");
        self.current = screen;
    }

    /// Follows the back link. Returns false on the home screen.
    pub fn go_back(&mut self) -> bool {
        match self.current.previous() {
            Some(target) => {
                self.navigate(target, None);
                true
            }
            None => false,
        }
    }
}
