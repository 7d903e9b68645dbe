use serde::Deserialize;
use validator::Validate;

use crate::database::MovieType;
use crate::database::analytics::AnalyticsRanking;

#[derive(Debug, Deserialize, Validate)]
pub struct AnalyticsActionRequest {
    #[validate(range(min = 1))]
    pub movie_id: i64,
    pub movie_type: MovieType,
    #[validate(length(min = 1, max = 32))]
    pub action: String,
    /// seconds, only used by watch
    pub value: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TopMoviesQuery {
    #[serde(default)]
    pub ranking: AnalyticsRanking,
    pub movie_type: Option<MovieType>,
    pub limit: Option<i64>,
}
