use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use super::model::{NewReview, Review, ReviewChanges, ReviewComment, ReviewRepository};
use crate::database::{MovieType, SqliteDatabase};

#[async_trait::async_trait]
impl ReviewRepository for SqliteDatabase {
    async fn insert_review(
        &self,
        user_id: &str,
        review: &NewReview,
        now: DateTime<Utc>,
    ) -> Result<Review> {
        sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews
                (user_id, movie_id, movie_type, rating, title, content, is_spoiler, is_coming_soon,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(review.movie_id)
        .bind(review.movie_type)
        .bind(review.rating)
        .bind(&review.title)
        .bind(&review.content)
        .bind(review.is_spoiler)
        .bind(review.is_coming_soon)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert review")
    }

    async fn get_review(&self, review_id: i64) -> Result<Option<Review>> {
        sqlx::query_as::<_, Review>("SELECT * FROM reviews WHERE id = ?")
            .bind(review_id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch review")
    }

    async fn list_movie_reviews(
        &self,
        movie_id: i64,
        movie_type: MovieType,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Review>> {
        sqlx::query_as::<_, Review>(
            r#"
            SELECT * FROM reviews
            WHERE movie_id = ? AND movie_type = ?
            ORDER BY helpful_count DESC, created_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(movie_id)
        .bind(movie_type)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list movie reviews")
    }

    async fn update_review(
        &self,
        review_id: i64,
        changes: &ReviewChanges,
        now: DateTime<Utc>,
    ) -> Result<Review> {
        sqlx::query_as::<_, Review>(
            r#"
            UPDATE reviews
            SET rating = COALESCE(?, rating),
                title = COALESCE(?, title),
                content = COALESCE(?, content),
                is_spoiler = COALESCE(?, is_spoiler),
                updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(changes.rating)
        .bind(&changes.title)
        .bind(&changes.content)
        .bind(changes.is_spoiler)
        .bind(now)
        .bind(review_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to update review")
    }

    async fn delete_review(&self, review_id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        // foreign keys cascade too but don't rely on the pragma being on
        sqlx::query("DELETE FROM review_comments WHERE review_id = ?")
            .bind(review_id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete review comments")?;

        sqlx::query("DELETE FROM review_helpfulness WHERE review_id = ?")
            .bind(review_id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete review votes")?;

        let result = sqlx::query("DELETE FROM reviews WHERE id = ?")
            .bind(review_id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete review")?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_comment(
        &self,
        review_id: i64,
        user_id: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<ReviewComment> {
        sqlx::query_as::<_, ReviewComment>(
            r#"
            INSERT INTO review_comments (review_id, user_id, content, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(review_id)
        .bind(user_id)
        .bind(content)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert comment")
    }

    async fn get_comment(&self, comment_id: i64) -> Result<Option<ReviewComment>> {
        sqlx::query_as::<_, ReviewComment>("SELECT * FROM review_comments WHERE id = ?")
            .bind(comment_id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch comment")
    }

    async fn list_comments(&self, review_id: i64) -> Result<Vec<ReviewComment>> {
        sqlx::query_as::<_, ReviewComment>(
            "SELECT * FROM review_comments WHERE review_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(review_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list comments")
    }

    async fn delete_comment(&self, comment_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM review_comments WHERE id = ?")
            .bind(comment_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete comment")?;

        Ok(result.rows_affected() > 0)
    }

    async fn cast_vote(
        &self,
        review_id: i64,
        user_id: &str,
        is_helpful: bool,
        now: DateTime<Utc>,
    ) -> Result<Review> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO review_helpfulness (review_id, user_id, is_helpful, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (review_id, user_id)
            DO UPDATE SET is_helpful = excluded.is_helpful, updated_at = excluded.updated_at
            "#,
        )
        .bind(review_id)
        .bind(user_id)
        .bind(is_helpful)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .context("Failed to store helpfulness vote")?;

        // recount instead of incrementing so a changed vote moves between the two columns
        let review = sqlx::query_as::<_, Review>(
            r#"
            UPDATE reviews
            SET helpful_count = (
                    SELECT COUNT(*) FROM review_helpfulness WHERE review_id = ?1 AND is_helpful = 1
                ),
                not_helpful_count = (
                    SELECT COUNT(*) FROM review_helpfulness WHERE review_id = ?1 AND is_helpful = 0
                )
            WHERE id = ?1
            RETURNING *
            "#,
        )
        .bind(review_id)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to recount review votes")?;

        tx.commit().await?;
        Ok(review)
    }
}
