use async_trait::async_trait;
use quiz_core::model::QuizSettings;
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{SettingsRecord, SettingsRepository, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn id_i64(v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("question_id overflow: {v}")))
}

fn id_u64(v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid question_id: {v}")))
}

#[async_trait]
impl SettingsRepository for SqliteRepository {
    async fn get_settings(&self) -> Result<Option<QuizSettings>, StorageError> {
        let row = sqlx::query("SELECT only_starred FROM quiz_settings WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let only_starred = row.try_get::<i64, _>("only_starred").map_err(ser)? != 0;

        let rows = sqlx::query(
            r"
            SELECT question_id
            FROM starred_questions
            ORDER BY position ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut starred = Vec::with_capacity(rows.len());
        for row in &rows {
            starred.push(id_u64(row.try_get::<i64, _>("question_id").map_err(ser)?)?);
        }

        Ok(Some(
            SettingsRecord {
                only_starred,
                starred,
            }
            .into_settings(),
        ))
    }

    async fn save_settings(&self, settings: &QuizSettings) -> Result<(), StorageError> {
        let record = SettingsRecord::from_settings(settings);
        let mut tx = self.pool.begin().await.map_err(conn)?;

        sqlx::query(
            r"
            INSERT INTO quiz_settings (id, only_starred)
            VALUES (1, ?1)
            ON CONFLICT(id) DO UPDATE SET
                only_starred = excluded.only_starred
            ",
        )
        .bind(i64::from(record.only_starred))
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        sqlx::query("DELETE FROM starred_questions")
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        for (position, id) in record.starred.iter().enumerate() {
            let position = i64::try_from(position).map_err(ser)?;
            sqlx::query(
                r"
                INSERT INTO starred_questions (question_id, position)
                VALUES (?1, ?2)
                ",
            )
            .bind(id_i64(*id)?)
            .bind(position)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;
        sqlx::query("DELETE FROM starred_questions")
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        sqlx::query("DELETE FROM quiz_settings")
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        tx.commit().await.map_err(conn)?;
        Ok(())
    }
}
