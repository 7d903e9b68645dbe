use anyhow::Result;
use chrono::{DateTime, Utc};
use mockall::automock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// source of truth counters an achievement family is measured against. each one maps to a
/// single aggregate query, they're never cached anywhere
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCounter {
    /// every review the user has written
    Reviews,
    /// reviews written while the movie was still flagged as coming soon
    ComingSoonReviews,
    /// every comment the user has posted on any review
    Comments,
    /// sum of helpful votes across all the user's reviews
    HelpfulVotes,
    /// number of the user's reviews with at least one helpful vote. not the same as
    /// HelpfulVotes, one review with 40 votes counts once here
    HelpfullyVotedReviews,
}

/// a user's stored progress towards one achievement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserAchievement {
    pub id: i64,
    pub user_id: String,
    pub achievement_type: String,
    pub progress: i64,
    /// copied from the definition when the row is created
    pub target: i64,
    pub is_completed: bool,
    /// set once on the incomplete -> complete transition and never touched again
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub type DynAchievementRepository = Arc<dyn AchievementRepository + Send + Sync>;

#[automock]
#[async_trait::async_trait]
pub trait AchievementRepository {
    /// authoritative value of a counter for a user, straight from the review tables
    async fn count_for(&self, counter: AchievementCounter, user_id: &str) -> Result<i64>;
    async fn get_user_achievement(
        &self,
        user_id: &str,
        achievement_type: &str,
    ) -> Result<Option<UserAchievement>>;
    async fn get_user_achievements(&self, user_id: &str) -> Result<Vec<UserAchievement>>;
    async fn insert_user_achievement(
        &self,
        user_id: &str,
        achievement_type: &str,
        progress: i64,
        target: i64,
        completed_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<UserAchievement>;
    /// completed_at of None leaves the row incomplete, Some completes it
    async fn update_user_achievement(
        &self,
        id: i64,
        progress: i64,
        completed_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<UserAchievement>;
    async fn delete_user_achievement(&self, user_id: &str, achievement_type: &str)
    -> Result<bool>;
}
