use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use super::model::{AchievementCounter, AchievementRepository, UserAchievement};
use crate::database::SqliteDatabase;

impl AchievementCounter {
    fn count_query(&self) -> &'static str {
        match self {
            Self::Reviews => "SELECT COUNT(*) FROM reviews WHERE user_id = ?",
            Self::ComingSoonReviews => {
                "SELECT COUNT(*) FROM reviews WHERE user_id = ? AND is_coming_soon = 1"
            }
            Self::Comments => "SELECT COUNT(*) FROM review_comments WHERE user_id = ?",
            Self::HelpfulVotes => {
                "SELECT COALESCE(SUM(helpful_count), 0) FROM reviews WHERE user_id = ?"
            }
            Self::HelpfullyVotedReviews => {
                r#"
                SELECT COUNT(DISTINCT r.id)
                FROM reviews r
                JOIN review_helpfulness h ON h.review_id = r.id
                WHERE r.user_id = ? AND h.is_helpful = 1
                "#
            }
        }
    }
}

#[async_trait::async_trait]
impl AchievementRepository for SqliteDatabase {
    async fn count_for(&self, counter: AchievementCounter, user_id: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(counter.count_query())
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("Failed to count {:?} for user {}", counter, user_id))?;

        Ok(count)
    }

    async fn get_user_achievement(
        &self,
        user_id: &str,
        achievement_type: &str,
    ) -> Result<Option<UserAchievement>> {
        sqlx::query_as::<_, UserAchievement>(
            "SELECT * FROM user_achievements WHERE user_id = ? AND achievement_type = ?",
        )
        .bind(user_id)
        .bind(achievement_type)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user achievement")
    }

    async fn get_user_achievements(&self, user_id: &str) -> Result<Vec<UserAchievement>> {
        sqlx::query_as::<_, UserAchievement>(
            "SELECT * FROM user_achievements WHERE user_id = ? ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch user achievements")
    }

    async fn insert_user_achievement(
        &self,
        user_id: &str,
        achievement_type: &str,
        progress: i64,
        target: i64,
        completed_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<UserAchievement> {
        sqlx::query_as::<_, UserAchievement>(
            r#"
            INSERT INTO user_achievements
                (user_id, achievement_type, progress, target, is_completed, completed_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(achievement_type)
        .bind(progress)
        .bind(target)
        .bind(completed_at.is_some())
        .bind(completed_at)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert user achievement")
    }

    async fn update_user_achievement(
        &self,
        id: i64,
        progress: i64,
        completed_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<UserAchievement> {
        // the is_completed guard keeps a finished row from ever being rewritten, even if two
        // requests raced on the same record
        sqlx::query_as::<_, UserAchievement>(
            r#"
            UPDATE user_achievements
            SET progress = ?,
                is_completed = ?,
                completed_at = ?,
                updated_at = ?
            WHERE id = ? AND is_completed = 0
            RETURNING *
            "#,
        )
        .bind(progress)
        .bind(completed_at.is_some())
        .bind(completed_at)
        .bind(now)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to update user achievement")
    }

    async fn delete_user_achievement(
        &self,
        user_id: &str,
        achievement_type: &str,
    ) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM user_achievements WHERE user_id = ? AND achievement_type = ?")
                .bind(user_id)
                .bind(achievement_type)
                .execute(&self.pool)
                .await
                .context("Failed to delete user achievement")?;

        Ok(result.rows_affected() > 0)
    }
}
