use anyhow::Result;
use chrono::{DateTime, Utc};
use mockall::automock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::database::MovieType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MovieAnalytics {
    pub id: i64,
    pub movie_id: i64,
    pub movie_type: MovieType,
    pub total_views: i64,
    /// manual counter driven by review/remove_review actions, not reconciled with the
    /// reviews table
    pub total_reviews: i64,
    pub total_favorites: i64,
    /// seconds
    pub total_watch_time: i64,
    pub average_rating: f64,
    pub popularity_score: f64,
    pub trending_score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MovieAnalytics {
    pub fn counters(&self) -> AnalyticsCounters {
        AnalyticsCounters {
            total_views: self.total_views,
            total_reviews: self.total_reviews,
            total_favorites: self.total_favorites,
            total_watch_time: self.total_watch_time,
        }
    }
}

/// the raw counters of an analytics row, everything else is derived from these
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyticsCounters {
    pub total_views: i64,
    pub total_reviews: i64,
    pub total_favorites: i64,
    pub total_watch_time: i64,
}

impl AnalyticsCounters {
    /// decrements never take a counter below zero, watch time saturates instead of wrapping
    pub fn apply(&mut self, action: AnalyticsAction) {
        match action {
            AnalyticsAction::View => self.total_views += 1,
            AnalyticsAction::Favorite => self.total_favorites += 1,
            AnalyticsAction::Unfavorite => {
                self.total_favorites = (self.total_favorites - 1).max(0)
            }
            AnalyticsAction::Watch(seconds) => {
                self.total_watch_time = self.total_watch_time.saturating_add(seconds.max(0))
            }
            AnalyticsAction::Review => self.total_reviews += 1,
            AnalyticsAction::RemoveReview => self.total_reviews = (self.total_reviews - 1).max(0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsAction {
    View,
    Favorite,
    Unfavorite,
    /// seconds watched
    Watch(i64),
    Review,
    RemoveReview,
}

impl AnalyticsAction {
    /// `value` is only looked at for watch, which needs it
    pub fn parse(action: &str, value: Option<i64>) -> Result<Self, String> {
        match action {
            "view" => Ok(Self::View),
            "favorite" => Ok(Self::Favorite),
            "unfavorite" => Ok(Self::Unfavorite),
            "watch" => match value {
                Some(seconds) if seconds >= 0 => Ok(Self::Watch(seconds)),
                Some(seconds) => Err(format!("watch time can't be negative, got {}", seconds)),
                None => Err("watch action requires a value".to_string()),
            },
            "review" => Ok(Self::Review),
            "remove_review" => Ok(Self::RemoveReview),
            other => Err(format!("unknown analytics action '{}'", other)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Favorite => "favorite",
            Self::Unfavorite => "unfavorite",
            Self::Watch(_) => "watch",
            Self::Review => "review",
            Self::RemoveReview => "remove_review",
        }
    }
}

impl fmt::Display for AnalyticsAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// recomputed fields of an analytics row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedScores {
    pub average_rating: f64,
    pub popularity_score: f64,
    pub trending_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsRanking {
    #[default]
    Popular,
    Trending,
}

pub type DynAnalyticsRepository = Arc<dyn AnalyticsRepository + Send + Sync>;

#[automock]
#[async_trait::async_trait]
pub trait AnalyticsRepository {
    async fn get_analytics(
        &self,
        movie_id: i64,
        movie_type: MovieType,
    ) -> Result<Option<MovieAnalytics>>;
    /// new rows start with every derived score at zero
    async fn insert_analytics(
        &self,
        movie_id: i64,
        movie_type: MovieType,
        counters: AnalyticsCounters,
        now: DateTime<Utc>,
    ) -> Result<MovieAnalytics>;
    async fn update_counters(
        &self,
        id: i64,
        counters: AnalyticsCounters,
        now: DateTime<Utc>,
    ) -> Result<MovieAnalytics>;
    /// doesn't touch updated_at, recomputing twice has to give the same row
    async fn update_scores(&self, id: i64, scores: DerivedScores) -> Result<MovieAnalytics>;
    /// mean rating over the reviews table, None without reviews
    async fn average_rating(&self, movie_id: i64, movie_type: MovieType) -> Result<Option<f64>>;
    async fn top_analytics(
        &self,
        ranking: AnalyticsRanking,
        movie_type: Option<MovieType>,
        limit: i64,
    ) -> Result<Vec<MovieAnalytics>>;
}
