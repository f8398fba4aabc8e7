//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// Invalid difficulty value.
    #[error("invalid difficulty: {value} (expected Easy, Medium or Hard)")]
    InvalidDifficulty { value: String },

    /// Unknown screen name.
    #[error("invalid screen: {value}")]
    InvalidScreen { value: String },
}

/// How hard a subject is for the student.
///
/// Difficulty only shapes the analytics time distribution; the hour allocator
/// ignores it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// All difficulties in display order.
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// String representation used in input and output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(ValidationError::InvalidDifficulty {
                value: s.to_string(),
            }),
        }
    }
}

/// A subject the student is preparing for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectInput {
    pub name: String,
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl SubjectInput {
    /// Creates a subject, trimming the name.
    pub fn new(name: impl AsRef<str>, difficulty: Difficulty) -> Result<Self, ValidationError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(ValidationError::Empty {
                field: "subject name",
            });
        }
        Ok(Self {
            name: name.to_string(),
            difficulty,
        })
    }
}

/// Parses `NAME` or `NAME:DIFFICULTY`; difficulty defaults to Medium.
///
/// Only a recognised difficulty after the last colon is split off, so
/// `Ratio:Proportion` is a Medium subject with that whole name.
impl std::str::FromStr for SubjectInput {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let split = s.rsplit_once(':').and_then(|(name, suffix)| {
            suffix
                .parse::<Difficulty>()
                .ok()
                .map(|difficulty| (name, difficulty))
        });
        match split {
            Some((name, difficulty)) => Self::new(name, difficulty),
            None => Self::new(s, Difficulty::default()),
        }
    }
}

/// Everything the input form collects, handed to the plan screen on submit.
///
/// Fields stay as raw strings: the deriver applies its own lenient parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlanInput {
    pub exam_date: String,
    pub subjects: Vec<SubjectInput>,
    pub daily_hours: String,
}

/// Subjects offered when the user has not entered any.
pub fn default_subjects() -> Vec<SubjectInput> {
    [
        ("LIC", Difficulty::Medium),
        ("ADCom", Difficulty::Hard),
        ("MSP", Difficulty::Medium),
        ("Java", Difficulty::Easy),
    ]
    .into_iter()
    .map(|(name, difficulty)| SubjectInput {
        name: name.to_string(),
        difficulty,
    })
    .collect()
}
