use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use super::model::{Favorite, LibraryRepository, ProgressUpdate, WatchProgress};
use crate::database::{MovieType, SqliteDatabase};

#[async_trait::async_trait]
impl LibraryRepository for SqliteDatabase {
    async fn add_favorite(
        &self,
        user_id: &str,
        movie_id: i64,
        movie_type: MovieType,
        now: DateTime<Utc>,
    ) -> Result<Option<Favorite>> {
        sqlx::query_as::<_, Favorite>(
            r#"
            INSERT INTO favorites (user_id, movie_id, movie_type, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (user_id, movie_id, movie_type) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(movie_id)
        .bind(movie_type)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to add favorite")
    }

    async fn remove_favorite(
        &self,
        user_id: &str,
        movie_id: i64,
        movie_type: MovieType,
    ) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM favorites WHERE user_id = ? AND movie_id = ? AND movie_type = ?",
        )
        .bind(user_id)
        .bind(movie_id)
        .bind(movie_type)
        .execute(&self.pool)
        .await
        .context("Failed to remove favorite")?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_favorites(&self, user_id: &str) -> Result<Vec<Favorite>> {
        sqlx::query_as::<_, Favorite>(
            "SELECT * FROM favorites WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list favorites")
    }

    async fn get_watch_progress(
        &self,
        user_id: &str,
        movie_id: i64,
        movie_type: MovieType,
    ) -> Result<Option<WatchProgress>> {
        sqlx::query_as::<_, WatchProgress>(
            "SELECT * FROM watch_progress WHERE user_id = ? AND movie_id = ? AND movie_type = ?",
        )
        .bind(user_id)
        .bind(movie_id)
        .bind(movie_type)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch watch progress")
    }

    async fn upsert_watch_progress(
        &self,
        user_id: &str,
        update: ProgressUpdate,
        now: DateTime<Utc>,
    ) -> Result<WatchProgress> {
        sqlx::query_as::<_, WatchProgress>(
            r#"
            INSERT INTO watch_progress
                (user_id, movie_id, movie_type, progress_seconds, duration_seconds, completed,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (user_id, movie_id, movie_type)
            DO UPDATE SET progress_seconds = excluded.progress_seconds,
                          duration_seconds = excluded.duration_seconds,
                          completed = excluded.completed,
                          updated_at = excluded.updated_at
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(update.movie_id)
        .bind(update.movie_type)
        .bind(update.progress_seconds)
        .bind(update.duration_seconds)
        .bind(update.completed)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .context("Failed to save watch progress")
    }

    async fn list_continue_watching(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<WatchProgress>> {
        sqlx::query_as::<_, WatchProgress>(
            r#"
            SELECT * FROM watch_progress
            WHERE user_id = ? AND completed = 0
            ORDER BY updated_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list continue watching")
    }

    async fn delete_watch_progress(
        &self,
        user_id: &str,
        movie_id: i64,
        movie_type: MovieType,
    ) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM watch_progress WHERE user_id = ? AND movie_id = ? AND movie_type = ?",
        )
        .bind(user_id)
        .bind(movie_id)
        .bind(movie_type)
        .execute(&self.pool)
        .await
        .context("Failed to delete watch progress")?;

        Ok(result.rows_affected() > 0)
    }
}
