use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::{delete, get},
};

use crate::{
    database::{
        MovieType,
        library::{Favorite, WatchProgress},
    },
    server::{
        dtos::library_dto::{
            ContinueWatchingQuery, FavoriteRequest, FavoriteResponse, WatchProgressRequest,
        },
        error::AppResult,
        extractors::{RequiredAuthentication, ValidatedJson},
    },
};

pub struct LibraryController;

impl LibraryController {
    pub fn app() -> Router {
        Router::new()
            .route(
                "/favorites",
                get(Self::list_favorites).post(Self::add_favorite),
            )
            .route(
                "/favorites/{movie_type}/{movie_id}",
                delete(Self::remove_favorite),
            )
            .route(
                "/progress",
                get(Self::continue_watching).put(Self::save_progress),
            )
            .route(
                "/progress/{movie_type}/{movie_id}",
                delete(Self::remove_progress),
            )
    }

    async fn list_favorites(
        RequiredAuthentication(user_id, services): RequiredAuthentication,
    ) -> AppResult<Json<Vec<Favorite>>> {
        Ok(Json(services.library.favorites(&user_id).await?))
    }

    async fn add_favorite(
        RequiredAuthentication(user_id, services): RequiredAuthentication,
        ValidatedJson(payload): ValidatedJson<FavoriteRequest>,
    ) -> AppResult<Json<FavoriteResponse>> {
        let response = services
            .library
            .add_favorite(&user_id, payload.movie_id, payload.movie_type)
            .await?;

        Ok(Json(response))
    }

    async fn remove_favorite(
        RequiredAuthentication(user_id, services): RequiredAuthentication,
        Path((movie_type, movie_id)): Path<(MovieType, i64)>,
    ) -> AppResult<Json<FavoriteResponse>> {
        let response = services
            .library
            .remove_favorite(&user_id, movie_id, movie_type)
            .await?;

        Ok(Json(response))
    }

    /// GET /api/v1/library/progress
    ///
    /// unfinished movies for the "continue watching" row, newest first
    async fn continue_watching(
        RequiredAuthentication(user_id, services): RequiredAuthentication,
        Query(query): Query<ContinueWatchingQuery>,
    ) -> AppResult<Json<Vec<WatchProgress>>> {
        Ok(Json(
            services
                .library
                .continue_watching(&user_id, query.limit)
                .await?,
        ))
    }

    async fn save_progress(
        RequiredAuthentication(user_id, services): RequiredAuthentication,
        ValidatedJson(payload): ValidatedJson<WatchProgressRequest>,
    ) -> AppResult<Json<WatchProgress>> {
        Ok(Json(services.library.save_progress(&user_id, payload).await?))
    }

    async fn remove_progress(
        RequiredAuthentication(user_id, services): RequiredAuthentication,
        Path((movie_type, movie_id)): Path<(MovieType, i64)>,
    ) -> AppResult<StatusCode> {
        services
            .library
            .remove_progress(&user_id, movie_id, movie_type)
            .await?;

        Ok(StatusCode::NO_CONTENT)
    }
}
