use anyhow::Result;
use chrono::{DateTime, Utc};
use mockall::automock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::database::MovieType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Favorite {
    pub id: i64,
    pub user_id: String,
    pub movie_id: i64,
    pub movie_type: MovieType,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WatchProgress {
    pub id: i64,
    pub user_id: String,
    pub movie_id: i64,
    pub movie_type: MovieType,
    pub progress_seconds: i64,
    pub duration_seconds: i64,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub movie_id: i64,
    pub movie_type: MovieType,
    pub progress_seconds: i64,
    pub duration_seconds: i64,
    pub completed: bool,
}

pub type DynLibraryRepository = Arc<dyn LibraryRepository + Send + Sync>;

#[automock]
#[async_trait::async_trait]
pub trait LibraryRepository {
    /// None when the movie was already a favorite
    async fn add_favorite(
        &self,
        user_id: &str,
        movie_id: i64,
        movie_type: MovieType,
        now: DateTime<Utc>,
    ) -> Result<Option<Favorite>>;
    async fn remove_favorite(
        &self,
        user_id: &str,
        movie_id: i64,
        movie_type: MovieType,
    ) -> Result<bool>;
    async fn list_favorites(&self, user_id: &str) -> Result<Vec<Favorite>>;
    async fn get_watch_progress(
        &self,
        user_id: &str,
        movie_id: i64,
        movie_type: MovieType,
    ) -> Result<Option<WatchProgress>>;
    async fn upsert_watch_progress(
        &self,
        user_id: &str,
        update: ProgressUpdate,
        now: DateTime<Utc>,
    ) -> Result<WatchProgress>;
    /// unfinished entries, most recently watched first
    async fn list_continue_watching(&self, user_id: &str, limit: i64)
    -> Result<Vec<WatchProgress>>;
    async fn delete_watch_progress(
        &self,
        user_id: &str,
        movie_id: i64,
        movie_type: MovieType,
    ) -> Result<bool>;
}
