use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::database::MovieType;

/// a week, longer than anything in either catalog
pub const MAX_RUNTIME_SECONDS: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FavoriteRequest {
    #[validate(range(min = 1))]
    pub movie_id: i64,
    pub movie_type: MovieType,
}

#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    pub movie_id: i64,
    pub movie_type: MovieType,
    pub is_favorite: bool,
    /// false when the call didn't change anything
    pub changed: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WatchProgressRequest {
    #[validate(range(min = 1))]
    pub movie_id: i64,
    pub movie_type: MovieType,
    #[validate(range(min = 0, max = MAX_RUNTIME_SECONDS))]
    pub progress_seconds: i64,
    #[validate(range(min = 1, max = MAX_RUNTIME_SECONDS))]
    pub duration_seconds: i64,
}

#[derive(Debug, Deserialize)]
pub struct ContinueWatchingQuery {
    pub limit: Option<i64>,
}
