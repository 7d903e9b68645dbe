use async_trait::async_trait;
use mockall::automock;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    database::{
        MovieType,
        analytics::AnalyticsAction,
        library::{DynLibraryRepository, Favorite, ProgressUpdate, WatchProgress},
    },
    server::{
        dtos::library_dto::{FavoriteResponse, WatchProgressRequest},
        error::{AppResult, Error},
        services::analytics_services::DynAnalyticsService,
        utils::clock_utils::DynClock,
    },
};

/// share of the runtime after which a movie counts as watched (credits etc.)
pub const COMPLETION_PERCENT: i64 = 90;
pub const DEFAULT_CONTINUE_WATCHING: i64 = 20;

/// widened so huge runtimes can't overflow the percentage math
pub fn is_completed(progress_seconds: i64, duration_seconds: i64) -> bool {
    i128::from(progress_seconds) * 100
        >= i128::from(duration_seconds) * i128::from(COMPLETION_PERCENT)
}

pub type DynLibraryService = Arc<dyn LibraryServiceTrait + Send + Sync>;

#[automock]
#[async_trait]
pub trait LibraryServiceTrait {
    async fn add_favorite(
        &self,
        user_id: &str,
        movie_id: i64,
        movie_type: MovieType,
    ) -> AppResult<FavoriteResponse>;
    async fn remove_favorite(
        &self,
        user_id: &str,
        movie_id: i64,
        movie_type: MovieType,
    ) -> AppResult<FavoriteResponse>;
    async fn favorites(&self, user_id: &str) -> AppResult<Vec<Favorite>>;
    async fn save_progress(
        &self,
        user_id: &str,
        request: WatchProgressRequest,
    ) -> AppResult<WatchProgress>;
    async fn continue_watching(
        &self,
        user_id: &str,
        limit: Option<i64>,
    ) -> AppResult<Vec<WatchProgress>>;
    async fn remove_progress(
        &self,
        user_id: &str,
        movie_id: i64,
        movie_type: MovieType,
    ) -> AppResult<()>;
}

pub struct LibraryService {
    repository: DynLibraryRepository,
    analytics: DynAnalyticsService,
    clock: DynClock,
}

impl LibraryService {
    pub fn new(
        repository: DynLibraryRepository,
        analytics: DynAnalyticsService,
        clock: DynClock,
    ) -> Self {
        Self {
            repository,
            analytics,
            clock,
        }
    }

    async fn track(&self, movie_id: i64, movie_type: MovieType, action: AnalyticsAction) {
        if let Err(e) = self
            .analytics
            .apply_action(movie_id, movie_type, action)
            .await
        {
            warn!(
                "analytics {} for {} {} failed: {}",
                action, movie_type, movie_id, e
            );
        }
    }
}

#[async_trait]
impl LibraryServiceTrait for LibraryService {
    async fn add_favorite(
        &self,
        user_id: &str,
        movie_id: i64,
        movie_type: MovieType,
    ) -> AppResult<FavoriteResponse> {
        let added = self
            .repository
            .add_favorite(user_id, movie_id, movie_type, self.clock.now())
            .await?
            .is_some();

        // favoriting twice must not count twice
        if added {
            self.track(movie_id, movie_type, AnalyticsAction::Favorite)
                .await;
        }

        Ok(FavoriteResponse {
            movie_id,
            movie_type,
            is_favorite: true,
            changed: added,
        })
    }

    async fn remove_favorite(
        &self,
        user_id: &str,
        movie_id: i64,
        movie_type: MovieType,
    ) -> AppResult<FavoriteResponse> {
        let removed = self
            .repository
            .remove_favorite(user_id, movie_id, movie_type)
            .await?;

        if removed {
            self.track(movie_id, movie_type, AnalyticsAction::Unfavorite)
                .await;
        }

        Ok(FavoriteResponse {
            movie_id,
            movie_type,
            is_favorite: false,
            changed: removed,
        })
    }

    async fn favorites(&self, user_id: &str) -> AppResult<Vec<Favorite>> {
        Ok(self.repository.list_favorites(user_id).await?)
    }

    async fn save_progress(
        &self,
        user_id: &str,
        request: WatchProgressRequest,
    ) -> AppResult<WatchProgress> {
        if request.duration_seconds <= 0 {
            return Err(Error::BadRequest(
                "duration has to be positive".to_string(),
            ));
        }

        let progress_seconds = request.progress_seconds.clamp(0, request.duration_seconds);
        let previous = self
            .repository
            .get_watch_progress(user_id, request.movie_id, request.movie_type)
            .await?
            .map(|p| p.progress_seconds)
            .unwrap_or(0);

        let saved = self
            .repository
            .upsert_watch_progress(
                user_id,
                ProgressUpdate {
                    movie_id: request.movie_id,
                    movie_type: request.movie_type,
                    progress_seconds,
                    duration_seconds: request.duration_seconds,
                    completed: is_completed(progress_seconds, request.duration_seconds),
                },
                self.clock.now(),
            )
            .await?;

        // only forward movement counts as watch time, seeking back doesn't subtract
        let watched = progress_seconds - previous;
        if watched > 0 {
            debug!(
                "user {} watched {}s of {} {}",
                user_id, watched, request.movie_type, request.movie_id
            );
            self.track(
                request.movie_id,
                request.movie_type,
                AnalyticsAction::Watch(watched),
            )
            .await;
        }

        Ok(saved)
    }

    async fn continue_watching(
        &self,
        user_id: &str,
        limit: Option<i64>,
    ) -> AppResult<Vec<WatchProgress>> {
        let limit = limit.unwrap_or(DEFAULT_CONTINUE_WATCHING).clamp(1, 100);
        Ok(self
            .repository
            .list_continue_watching(user_id, limit)
            .await?)
    }

    async fn remove_progress(
        &self,
        user_id: &str,
        movie_id: i64,
        movie_type: MovieType,
    ) -> AppResult<()> {
        let deleted = self
            .repository
            .delete_watch_progress(user_id, movie_id, movie_type)
            .await?;

        if !deleted {
            return Err(Error::NotFound("watch progress not found".to_string()));
        }

        Ok(())
    }
}
