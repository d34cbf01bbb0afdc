use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question subject cannot be empty")]
    EmptySubject,

    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("a question needs at least 2 options, got {count}")]
    TooFewOptions { count: usize },

    #[error("option {index} cannot be empty")]
    EmptyOption { index: usize },

    #[error("correct option {index} is out of range for {count} options")]
    CorrectOptionOutOfRange { index: usize, count: usize },

    #[error(transparent)]
    Difficulty(#[from] ParseDifficultyError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown difficulty: {raw:?}")]
pub struct ParseDifficultyError {
    raw: String,
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty tag of a question. Ordered `Easy < Medium < Hard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(ParseDifficultyError { raw: s.to_string() }),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question. Immutable once validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    subject: String,
    difficulty: Difficulty,
    prompt: String,
    options: Vec<String>,
    correct_option: usize,
}

impl Question {
    /// Validate and build a question.
    ///
    /// Subject and prompt are trimmed. Options are kept as given.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the subject or prompt is blank, fewer than two
    /// options are given, an option is blank, or `correct_option` is not a valid
    /// index into `options`.
    pub fn new(
        id: QuestionId,
        subject: impl Into<String>,
        difficulty: Difficulty,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_option: usize,
    ) -> Result<Self, QuestionError> {
        let subject = subject.into().trim().to_string();
        if subject.is_empty() {
            return Err(QuestionError::EmptySubject);
        }
        let prompt = prompt.into().trim().to_string();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                count: options.len(),
            });
        }
        if let Some(index) = options.iter().position(|o| o.trim().is_empty()) {
            return Err(QuestionError::EmptyOption { index });
        }
        if correct_option >= options.len() {
            return Err(QuestionError::CorrectOptionOutOfRange {
                index: correct_option,
                count: options.len(),
            });
        }

        Ok(Self {
            id,
            subject,
            difficulty,
            prompt,
            options,
            correct_option,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_option(&self) -> usize {
        self.correct_option
    }

    /// Returns true if `option` is a valid index into this question's options.
    #[must_use]
    pub fn has_option(&self, option: usize) -> bool {
        option < self.options.len()
    }

    #[must_use]
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_option
    }
}

//
// ─── WIRE RECORD ───────────────────────────────────────────────────────────────
//

/// Serialized shape of a question as delivered by a question source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: u64,
    pub subject: String,
    pub difficulty: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_option_index: usize,
}

impl From<&Question> for QuestionRecord {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id.value(),
            subject: question.subject.clone(),
            difficulty: question.difficulty.as_str().to_string(),
            prompt: question.prompt.clone(),
            options: question.options.clone(),
            correct_option_index: question.correct_option,
        }
    }
}

impl TryFrom<QuestionRecord> for Question {
    type Error = QuestionError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        let difficulty = record.difficulty.parse::<Difficulty>()?;
        Question::new(
            QuestionId::new(record.id),
            record.subject,
            difficulty,
            record.prompt,
            record.options,
            record.correct_option_index,
        )
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
