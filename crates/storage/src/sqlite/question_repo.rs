use exam_core::model::Question;
use sqlx::{Executor, Row, Sqlite};

use super::SqliteRepository;
use super::mapping::{conn, map_question_row, question_id_to_i64, ser, usize_to_i64};
use crate::repository::{QuestionBankRepository, StorageError};

const UPSERT_QUESTION: &str = r"
    INSERT INTO questions (id, subject, difficulty, prompt, options, correct_option)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    ON CONFLICT(id) DO UPDATE SET
        subject = excluded.subject,
        difficulty = excluded.difficulty,
        prompt = excluded.prompt,
        options = excluded.options,
        correct_option = excluded.correct_option
";

async fn upsert_with<'e, E>(executor: E, question: &Question) -> Result<(), StorageError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let options = serde_json::to_string(question.options()).map_err(ser)?;
    sqlx::query(UPSERT_QUESTION)
        .bind(question_id_to_i64(question.id())?)
        .bind(question.subject())
        .bind(question.difficulty().as_str())
        .bind(question.prompt())
        .bind(options)
        .bind(usize_to_i64("correct_option", question.correct_option())?)
        .execute(executor)
        .await
        .map_err(conn)?;
    Ok(())
}

#[async_trait::async_trait]
impl QuestionBankRepository for SqliteRepository {
    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError> {
        upsert_with(&self.pool, question).await
    }

    async fn upsert_questions(&self, questions: &[Question]) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;
        for question in questions {
            upsert_with(&mut *tx, question).await?;
        }
        tx.commit().await.map_err(conn)?;
        tracing::debug!(count = questions.len(), "upserted question batch");
        Ok(())
    }

    async fn list_questions(&self) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, subject, difficulty, prompt, options, correct_option
            FROM questions
            ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_question_row).collect()
    }

    async fn list_subjects(&self) -> Result<Vec<String>, StorageError> {
        let rows = sqlx::query("SELECT DISTINCT subject FROM questions ORDER BY subject ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("subject").map_err(ser))
            .collect()
    }

    async fn count_questions(&self) -> Result<u32, StorageError> {
        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM questions")
            .fetch_one(&self.pool)
            .await
            .map_err(conn)?
            .try_get("n")
            .map_err(ser)?;
        u32::try_from(count).map_err(ser)
    }
}
