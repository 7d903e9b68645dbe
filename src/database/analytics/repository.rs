use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use super::model::{
    AnalyticsCounters, AnalyticsRanking, AnalyticsRepository, DerivedScores, MovieAnalytics,
};
use crate::database::{MovieType, SqliteDatabase};

#[async_trait::async_trait]
impl AnalyticsRepository for SqliteDatabase {
    async fn get_analytics(
        &self,
        movie_id: i64,
        movie_type: MovieType,
    ) -> Result<Option<MovieAnalytics>> {
        sqlx::query_as::<_, MovieAnalytics>(
            "SELECT * FROM movie_analytics WHERE movie_id = ? AND movie_type = ?",
        )
        .bind(movie_id)
        .bind(movie_type)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Failed to fetch analytics for {} {}", movie_type, movie_id))
    }

    async fn insert_analytics(
        &self,
        movie_id: i64,
        movie_type: MovieType,
        counters: AnalyticsCounters,
        now: DateTime<Utc>,
    ) -> Result<MovieAnalytics> {
        sqlx::query_as::<_, MovieAnalytics>(
            r#"
            INSERT INTO movie_analytics
                (movie_id, movie_type, total_views, total_reviews, total_favorites, total_watch_time,
                 average_rating, popularity_score, trending_score, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, 0, 0, 0, ?, ?)
            RETURNING *
            "#,
        )
        .bind(movie_id)
        .bind(movie_type)
        .bind(counters.total_views)
        .bind(counters.total_reviews)
        .bind(counters.total_favorites)
        .bind(counters.total_watch_time)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("Failed to insert analytics for {} {}", movie_type, movie_id))
    }

    async fn update_counters(
        &self,
        id: i64,
        counters: AnalyticsCounters,
        now: DateTime<Utc>,
    ) -> Result<MovieAnalytics> {
        sqlx::query_as::<_, MovieAnalytics>(
            r#"
            UPDATE movie_analytics
            SET total_views = ?,
                total_reviews = ?,
                total_favorites = ?,
                total_watch_time = ?,
                updated_at = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(counters.total_views)
        .bind(counters.total_reviews)
        .bind(counters.total_favorites)
        .bind(counters.total_watch_time)
        .bind(now)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("Failed to update analytics counters for row {}", id))
    }

    async fn update_scores(&self, id: i64, scores: DerivedScores) -> Result<MovieAnalytics> {
        sqlx::query_as::<_, MovieAnalytics>(
            r#"
            UPDATE movie_analytics
            SET average_rating = ?,
                popularity_score = ?,
                trending_score = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(scores.average_rating)
        .bind(scores.popularity_score)
        .bind(scores.trending_score)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("Failed to update analytics scores for row {}", id))
    }

    async fn average_rating(&self, movie_id: i64, movie_type: MovieType) -> Result<Option<f64>> {
        let average: Option<f64> = sqlx::query_scalar(
            "SELECT AVG(rating) FROM reviews WHERE movie_id = ? AND movie_type = ?",
        )
        .bind(movie_id)
        .bind(movie_type)
        .fetch_one(&self.pool)
        .await
        .context("Failed to compute average rating")?;

        Ok(average)
    }

    async fn top_analytics(
        &self,
        ranking: AnalyticsRanking,
        movie_type: Option<MovieType>,
        limit: i64,
    ) -> Result<Vec<MovieAnalytics>> {
        let query = match ranking {
            AnalyticsRanking::Popular => {
                r#"
                SELECT * FROM movie_analytics
                WHERE (?1 IS NULL OR movie_type = ?1)
                ORDER BY popularity_score DESC, total_views DESC, id ASC
                LIMIT ?2
                "#
            }
            AnalyticsRanking::Trending => {
                r#"
                SELECT * FROM movie_analytics
                WHERE (?1 IS NULL OR movie_type = ?1)
                ORDER BY trending_score DESC, popularity_score DESC, id ASC
                LIMIT ?2
                "#
            }
        };

        sqlx::query_as::<_, MovieAnalytics>(query)
            .bind(movie_type)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch top movie analytics")
    }
}
