use axum::{
    Extension, Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::{delete, get, post},
};
use tracing::info;

use crate::{
    database::review::{Review, ReviewComment},
    server::{
        dtos::review_dto::{
            CreateCommentRequest, CreateCommentResponse, CreateReviewRequest,
            CreateReviewResponse, ListReviewsQuery, UpdateReviewRequest, VoteRequest,
        },
        error::AppResult,
        extractors::{RequiredAuthentication, ValidatedJson},
        services::app_services::AppServices,
    },
};

pub struct ReviewController;

impl ReviewController {
    pub fn app() -> Router {
        Router::new()
            .route("/", post(Self::create_review).get(Self::list_reviews))
            .route(
                "/{id}",
                get(Self::get_review)
                    .patch(Self::update_review)
                    .delete(Self::delete_review),
            )
            .route(
                "/{id}/comments",
                get(Self::list_comments).post(Self::create_comment),
            )
            .route("/{id}/vote", post(Self::vote))
            .route("/comments/{id}", delete(Self::delete_comment))
    }

    /// POST /api/v1/reviews
    ///
    /// the response carries any achievements the review unlocked so the client can toast them
    async fn create_review(
        RequiredAuthentication(user_id, services): RequiredAuthentication,
        ValidatedJson(payload): ValidatedJson<CreateReviewRequest>,
    ) -> AppResult<(StatusCode, Json<CreateReviewResponse>)> {
        let response = services.reviews.create_review(&user_id, payload).await?;
        Ok((StatusCode::CREATED, Json(response)))
    }

    /// GET /api/v1/reviews?movie_id=..&movie_type=..
    async fn list_reviews(
        Extension(services): Extension<AppServices>,
        Query(query): Query<ListReviewsQuery>,
    ) -> AppResult<Json<Vec<Review>>> {
        let reviews = services
            .reviews
            .movie_reviews(query.movie_id, query.movie_type, query.limit, query.offset)
            .await?;

        Ok(Json(reviews))
    }

    async fn get_review(
        Extension(services): Extension<AppServices>,
        Path(id): Path<i64>,
    ) -> AppResult<Json<Review>> {
        Ok(Json(services.reviews.review(id).await?))
    }

    async fn update_review(
        RequiredAuthentication(user_id, services): RequiredAuthentication,
        Path(id): Path<i64>,
        ValidatedJson(payload): ValidatedJson<UpdateReviewRequest>,
    ) -> AppResult<Json<Review>> {
        let review = services.reviews.update_review(&user_id, id, payload).await?;
        Ok(Json(review))
    }

    async fn delete_review(
        RequiredAuthentication(user_id, services): RequiredAuthentication,
        Path(id): Path<i64>,
    ) -> AppResult<StatusCode> {
        services.reviews.delete_review(&user_id, id).await?;
        Ok(StatusCode::NO_CONTENT)
    }

    async fn list_comments(
        Extension(services): Extension<AppServices>,
        Path(id): Path<i64>,
    ) -> AppResult<Json<Vec<ReviewComment>>> {
        Ok(Json(services.reviews.review_comments(id).await?))
    }

    async fn create_comment(
        RequiredAuthentication(user_id, services): RequiredAuthentication,
        Path(id): Path<i64>,
        ValidatedJson(payload): ValidatedJson<CreateCommentRequest>,
    ) -> AppResult<(StatusCode, Json<CreateCommentResponse>)> {
        let response = services
            .reviews
            .add_comment(&user_id, id, payload.content.trim())
            .await?;

        Ok((StatusCode::CREATED, Json(response)))
    }

    async fn delete_comment(
        RequiredAuthentication(user_id, services): RequiredAuthentication,
        Path(id): Path<i64>,
    ) -> AppResult<StatusCode> {
        services.reviews.delete_comment(&user_id, id).await?;
        Ok(StatusCode::NO_CONTENT)
    }

    /// POST /api/v1/reviews/{id}/vote
    ///
    /// voting again replaces the earlier vote
    async fn vote(
        RequiredAuthentication(user_id, services): RequiredAuthentication,
        Path(id): Path<i64>,
        Json(payload): Json<VoteRequest>,
    ) -> AppResult<Json<Review>> {
        info!(
            "user {} voted review {} as {}",
            user_id,
            id,
            if payload.is_helpful { "helpful" } else { "not helpful" }
        );

        let review = services.reviews.vote(&user_id, id, payload.is_helpful).await?;
        Ok(Json(review))
    }
}
