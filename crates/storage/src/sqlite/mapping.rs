use std::collections::BTreeMap;

use exam_core::model::{
    Difficulty, ExamResult, Question, QuestionId, SubjectScore, SubmitReason,
};
use sqlx::Row;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn question_id_to_i64(id: QuestionId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("question_id overflow".into()))
}

pub(crate) fn usize_to_i64(field: &'static str, v: usize) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn map_question_row(row: &sqlx::sqlite::SqliteRow) -> Result<Question, StorageError> {
    let id = QuestionId::new(i64_to_u64("id", row.try_get::<i64, _>("id").map_err(ser)?)?);
    let subject: String = row.try_get("subject").map_err(ser)?;
    let difficulty = row
        .try_get::<String, _>("difficulty")
        .map_err(ser)?
        .parse::<Difficulty>()
        .map_err(ser)?;
    let prompt: String = row.try_get("prompt").map_err(ser)?;
    let options: Vec<String> =
        serde_json::from_str(&row.try_get::<String, _>("options").map_err(ser)?).map_err(ser)?;
    let correct = usize::try_from(row.try_get::<i64, _>("correct_option").map_err(ser)?)
        .map_err(ser)?;

    Question::new(id, subject, difficulty, prompt, options, correct).map_err(ser)
}

pub(crate) fn map_result_row(row: &sqlx::sqlite::SqliteRow) -> Result<ExamResult, StorageError> {
    let started_at = row.try_get("started_at").map_err(ser)?;
    let completed_at = row.try_get("completed_at").map_err(ser)?;
    let reason = row
        .try_get::<String, _>("reason")
        .map_err(ser)?
        .parse::<SubmitReason>()
        .map_err(ser)?;
    let total = u32_from_i64("total", row.try_get::<i64, _>("total").map_err(ser)?)?;
    let answered = u32_from_i64("answered", row.try_get::<i64, _>("answered").map_err(ser)?)?;
    let correct = u32_from_i64("correct", row.try_get::<i64, _>("correct").map_err(ser)?)?;
    let by_subject: BTreeMap<String, SubjectScore> =
        serde_json::from_str(&row.try_get::<String, _>("by_subject").map_err(ser)?)
            .map_err(ser)?;

    ExamResult::from_persisted(
        started_at,
        completed_at,
        reason,
        total,
        answered,
        correct,
        by_subject,
    )
    .map_err(ser)
}
