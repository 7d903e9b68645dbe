use axum::{
    Extension, Json, Router,
    extract::{Path, Query},
    routing::{get, post},
};

use crate::{
    database::{
        MovieType,
        analytics::{AnalyticsAction, MovieAnalytics},
    },
    server::{
        dtos::analytics_dto::{AnalyticsActionRequest, TopMoviesQuery},
        error::{AppResult, Error},
        extractors::ValidatedJson,
        services::app_services::AppServices,
    },
};

const DEFAULT_TOP_MOVIES: i64 = 10;

pub struct AnalyticsController;

impl AnalyticsController {
    pub fn app() -> Router {
        Router::new()
            .route("/", post(Self::apply_action))
            .route("/top", get(Self::top_movies))
            .route("/{movie_type}/{movie_id}", get(Self::get_analytics))
            .route(
                "/{movie_type}/{movie_id}/recompute",
                post(Self::recompute_scores),
            )
    }

    /// POST /api/v1/analytics
    ///
    /// anonymous on purpose, views come from logged out visitors too
    ///
    /// request body:
    /// ```json
    /// { "movie_id": 42, "movie_type": "tmdb", "action": "watch", "value": 1800 }
    /// ```
    async fn apply_action(
        Extension(services): Extension<AppServices>,
        ValidatedJson(payload): ValidatedJson<AnalyticsActionRequest>,
    ) -> AppResult<Json<MovieAnalytics>> {
        let action =
            AnalyticsAction::parse(&payload.action, payload.value).map_err(Error::BadRequest)?;

        let record = services
            .analytics
            .apply_action(payload.movie_id, payload.movie_type, action)
            .await?;

        Ok(Json(record))
    }

    /// GET /api/v1/analytics/top?ranking=trending&movie_type=kurdish&limit=10
    async fn top_movies(
        Extension(services): Extension<AppServices>,
        Query(query): Query<TopMoviesQuery>,
    ) -> AppResult<Json<Vec<MovieAnalytics>>> {
        let movies = services
            .analytics
            .top_movies(
                query.ranking,
                query.movie_type,
                query.limit.unwrap_or(DEFAULT_TOP_MOVIES),
            )
            .await?;

        Ok(Json(movies))
    }

    async fn get_analytics(
        Extension(services): Extension<AppServices>,
        Path((movie_type, movie_id)): Path<(MovieType, i64)>,
    ) -> AppResult<Json<MovieAnalytics>> {
        Ok(Json(
            services
                .analytics
                .movie_analytics(movie_id, movie_type)
                .await?,
        ))
    }

    async fn recompute_scores(
        Extension(services): Extension<AppServices>,
        Path((movie_type, movie_id)): Path<(MovieType, i64)>,
    ) -> AppResult<Json<MovieAnalytics>> {
        Ok(Json(
            services
                .analytics
                .recompute_scores(movie_id, movie_type)
                .await?,
        ))
    }
}
