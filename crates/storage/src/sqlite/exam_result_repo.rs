use exam_core::model::ExamResult;
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, map_result_row, ser};
use crate::repository::{ExamResultRepository, ExamResultRow, StorageError};

#[async_trait::async_trait]
impl ExamResultRepository for SqliteRepository {
    async fn append_result(&self, result: &ExamResult) -> Result<i64, StorageError> {
        let by_subject = serde_json::to_string(result.by_subject()).map_err(ser)?;

        let res = sqlx::query(
            r"
                INSERT INTO exam_results (
                    started_at, completed_at, reason, total, answered, correct, by_subject
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .bind(result.started_at())
        .bind(result.completed_at())
        .bind(result.reason().as_str())
        .bind(i64::from(result.total()))
        .bind(i64::from(result.answered()))
        .bind(i64::from(result.correct()))
        .bind(by_subject)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(res.last_insert_rowid())
    }

    async fn get_result(&self, id: i64) -> Result<ExamResult, StorageError> {
        let row = sqlx::query(
            r"
                SELECT started_at, completed_at, reason, total, answered, correct, by_subject
                FROM exam_results
                WHERE id = ?1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?
        .ok_or(StorageError::NotFound)?;

        map_result_row(&row)
    }

    async fn list_results(&self, limit: u32) -> Result<Vec<ExamResultRow>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, started_at, completed_at, reason, total, answered, correct, by_subject
                FROM exam_results
                ORDER BY completed_at DESC, id DESC
                LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let id: i64 = row.try_get("id").map_err(ser)?;
            out.push(ExamResultRow::new(id, map_result_row(&row)?));
        }
        Ok(out)
    }
}
