use anyhow::Context;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

/// One logged classification event.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DetectionLog {
    pub id: i64,
    pub user_id: Option<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub object_type: String,
    pub image_url: String,
}

impl DetectionLog {
    /// Insert a detection stamped with the current UTC time. `user_id` is stored as
    /// given; it is not checked against `users`.
    pub async fn create(
        db: &SqlitePool,
        user_id: Option<i64>,
        object_type: &str,
        image_url: &str,
    ) -> anyhow::Result<DetectionLog> {
        let row = sqlx::query_as::<_, DetectionLog>(
            r#"
            INSERT INTO detection_logs (user_id, timestamp, object_type, image_url)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, user_id, timestamp, object_type, image_url
            "#,
        )
        .bind(user_id)
        .bind(OffsetDateTime::now_utc())
        .bind(object_type)
        .bind(image_url)
        .fetch_one(db)
        .await
        .context("insert detection")?;
        Ok(row)
    }

    /// Every detection, oldest first.
    pub async fn list_all(db: &SqlitePool) -> anyhow::Result<Vec<DetectionLog>> {
        let rows = sqlx::query_as::<_, DetectionLog>(
            r#"
            SELECT id, user_id, timestamp, object_type, image_url
            FROM detection_logs
            ORDER BY id ASC
            "#,
        )
        .fetch_all(db)
        .await
        .context("list detections")?;
        Ok(rows)
    }
}
