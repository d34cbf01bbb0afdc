use std::env;

use async_trait::async_trait;
use reqwest::Client;

use exam_core::model::{Question, QuestionRecord};

use crate::error::QuestionSourceError;

/// Environment variable holding the remote question bank URL.
pub const QUESTIONS_URL_ENV: &str = "EXAM_QUESTIONS_URL";

/// Supplies a question bank once, at selection time.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch every question the source offers, in source order.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError` on transport or decoding failures.
    async fn fetch_questions(&self) -> Result<Vec<Question>, QuestionSourceError>;
}

#[derive(Clone, Debug)]
pub struct QuestionSourceConfig {
    pub url: String,
}

impl QuestionSourceConfig {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    #[must_use]
    pub fn from_env() -> Option<Self> {
        let url = env::var(QUESTIONS_URL_ENV).ok()?;
        if url.trim().is_empty() {
            return None;
        }
        Some(Self::new(url.trim()))
    }
}

/// Fetches `QuestionRecord` JSON arrays over HTTP.
#[derive(Clone)]
pub struct HttpQuestionSource {
    client: Client,
    config: Option<QuestionSourceConfig>,
}

impl HttpQuestionSource {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(QuestionSourceConfig::from_env())
    }

    #[must_use]
    pub fn with_url(url: impl Into<String>) -> Self {
        Self::new(Some(QuestionSourceConfig::new(url)))
    }

    #[must_use]
    pub fn new(config: Option<QuestionSourceConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }
}

#[async_trait]
impl QuestionSource for HttpQuestionSource {
    async fn fetch_questions(&self) -> Result<Vec<Question>, QuestionSourceError> {
        let config = self
            .config
            .as_ref()
            .ok_or(QuestionSourceError::NotConfigured)?;

        let response = self
            .client
            .get(&config.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), url = %config.url, "question source rejected request");
            return Err(QuestionSourceError::HttpStatus(response.status()));
        }

        let body = response.text().await?;
        let questions = parse_question_bank(&body)?;
        tracing::info!(count = questions.len(), url = %config.url, "fetched question bank");
        Ok(questions)
    }
}

/// Decode a JSON array of question records.
///
/// # Errors
///
/// Returns `QuestionSourceError::Json` for malformed JSON and
/// `QuestionSourceError::InvalidRecord` for the first record that fails validation.
pub fn parse_question_bank(json: &str) -> Result<Vec<Question>, QuestionSourceError> {
    let records: Vec<QuestionRecord> = serde_json::from_str(json)?;
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            Question::try_from(record)
                .map_err(|source| QuestionSourceError::InvalidRecord { index, source })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::model::{Difficulty, QuestionError, QuestionId};

    #[test]
    fn parses_camel_case_records() {
        let json = r#"[
            {
                "id": 1,
                "subject": "Mathematics",
                "difficulty": "Easy",
                "prompt": "What is 2 + 2?",
                "options": ["3", "4", "5", "6"],
                "correctOptionIndex": 1
            },
            {
                "id": 2,
                "subject": "Science",
                "difficulty": "medium",
                "prompt": "What is the chemical symbol for water?",
                "options": ["H2O", "CO2"],
                "correctOptionIndex": 0
            }
        ]"#;

        let questions = parse_question_bank(json).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].id(), QuestionId::new(1));
        assert_eq!(questions[0].correct_option(), 1);
        assert_eq!(questions[1].difficulty(), Difficulty::Medium);
    }

    #[test]
    fn invalid_record_reports_index() {
        let json = r#"[
            {"id": 1, "subject": "History", "difficulty": "Hard", "prompt": "Q",
             "options": ["a", "b"], "correctOptionIndex": 0},
            {"id": 2, "subject": "History", "difficulty": "Hard", "prompt": "Q",
             "options": ["a", "b"], "correctOptionIndex": 4}
        ]"#;

        let err = parse_question_bank(json).unwrap_err();
        assert!(matches!(
            err,
            QuestionSourceError::InvalidRecord {
                index: 1,
                source: QuestionError::CorrectOptionOutOfRange { .. }
            }
        ));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            parse_question_bank("{not json"),
            Err(QuestionSourceError::Json(_))
        ));
    }

    #[tokio::test]
    async fn unconfigured_source_fails_fast() {
        let source = HttpQuestionSource::new(None);
        assert!(!source.enabled());
        assert!(matches!(
            source.fetch_questions().await,
            Err(QuestionSourceError::NotConfigured)
        ));
    }
}
