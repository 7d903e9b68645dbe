use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use std::sync::Arc;
use tracing::{debug, error};

use crate::{
    database::{
        MovieType,
        analytics::{
            AnalyticsAction, AnalyticsCounters, AnalyticsRanking, DynAnalyticsRepository,
            MovieAnalytics,
        },
    },
    server::{
        error::{AppResult, Error},
        utils::{clock_utils::DynClock, scoring_utils::derive_scores},
    },
};

pub const MAX_TOP_MOVIES: i64 = 100;

pub type DynAnalyticsService = Arc<dyn AnalyticsServiceTrait + Send + Sync>;

#[automock]
#[async_trait]
pub trait AnalyticsServiceTrait {
    /// bumps the raw counters for the pair (creating the row if needed) and recomputes the
    /// derived scores. a failed recompute still returns the counter update
    async fn apply_action(
        &self,
        movie_id: i64,
        movie_type: MovieType,
        action: AnalyticsAction,
    ) -> AppResult<MovieAnalytics>;
    async fn recompute_scores(
        &self,
        movie_id: i64,
        movie_type: MovieType,
    ) -> AppResult<MovieAnalytics>;
    async fn movie_analytics(
        &self,
        movie_id: i64,
        movie_type: MovieType,
    ) -> AppResult<MovieAnalytics>;
    async fn top_movies(
        &self,
        ranking: AnalyticsRanking,
        movie_type: Option<MovieType>,
        limit: i64,
    ) -> AppResult<Vec<MovieAnalytics>>;
}

pub struct AnalyticsService {
    repository: DynAnalyticsRepository,
    clock: DynClock,
}

impl AnalyticsService {
    pub fn new(repository: DynAnalyticsRepository, clock: DynClock) -> Self {
        Self { repository, clock }
    }

    /// `last_update` is the row's updated_at from before the write that triggered this
    async fn recompute(
        &self,
        record: &MovieAnalytics,
        last_update: DateTime<Utc>,
    ) -> anyhow::Result<MovieAnalytics> {
        let raw_average = self
            .repository
            .average_rating(record.movie_id, record.movie_type)
            .await?;

        let scores = derive_scores(
            &record.counters(),
            raw_average,
            last_update,
            self.clock.now(),
        );

        self.repository.update_scores(record.id, scores).await
    }
}

#[async_trait]
impl AnalyticsServiceTrait for AnalyticsService {
    async fn apply_action(
        &self,
        movie_id: i64,
        movie_type: MovieType,
        action: AnalyticsAction,
    ) -> AppResult<MovieAnalytics> {
        let now = self.clock.now();
        metrics::counter!("analytics_actions_total", "action" => action.as_str()).increment(1);

        let (record, last_update) = match self
            .repository
            .get_analytics(movie_id, movie_type)
            .await?
        {
            Some(existing) => {
                let mut counters = existing.counters();
                counters.apply(action);
                let updated = self
                    .repository
                    .update_counters(existing.id, counters, now)
                    .await?;
                (updated, existing.updated_at)
            }
            None => {
                debug!("first analytics action for {} {}", movie_type, movie_id);
                let mut counters = AnalyticsCounters::default();
                counters.apply(action);
                let created = self
                    .repository
                    .insert_analytics(movie_id, movie_type, counters, now)
                    .await?;
                (created, now)
            }
        };

        // scores are derived data, the counters are already stored so don't fail the caller
        match self.recompute(&record, last_update).await {
            Ok(rescored) => Ok(rescored),
            Err(e) => {
                error!(
                    "failed to recompute scores for {} {} after {}: {:?}",
                    movie_type, movie_id, action, e
                );
                metrics::counter!("analytics_recompute_failures_total").increment(1);
                Ok(record)
            }
        }
    }

    async fn recompute_scores(
        &self,
        movie_id: i64,
        movie_type: MovieType,
    ) -> AppResult<MovieAnalytics> {
        let record = match self.repository.get_analytics(movie_id, movie_type).await? {
            Some(existing) => existing,
            None => {
                self.repository
                    .insert_analytics(
                        movie_id,
                        movie_type,
                        AnalyticsCounters::default(),
                        self.clock.now(),
                    )
                    .await?
            }
        };

        Ok(self.recompute(&record, record.updated_at).await?)
    }

    async fn movie_analytics(
        &self,
        movie_id: i64,
        movie_type: MovieType,
    ) -> AppResult<MovieAnalytics> {
        self.repository
            .get_analytics(movie_id, movie_type)
            .await?
            .ok_or_else(|| {
                Error::NotFound(format!("no analytics for {} {}", movie_type, movie_id))
            })
    }

    async fn top_movies(
        &self,
        ranking: AnalyticsRanking,
        movie_type: Option<MovieType>,
        limit: i64,
    ) -> AppResult<Vec<MovieAnalytics>> {
        let limit = limit.clamp(1, MAX_TOP_MOVIES);

        Ok(self
            .repository
            .top_analytics(ranking, movie_type, limit)
            .await?)
    }
}
