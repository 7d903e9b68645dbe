use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::database::MovieType;
use crate::database::review::{NewReview, Review, ReviewChanges, ReviewComment};
use crate::server::dtos::achievement_dto::AchievementResponse;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(range(min = 1))]
    pub movie_id: i64,
    pub movie_type: MovieType,
    #[validate(range(min = 1, max = 10))]
    pub rating: i64,
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
    #[serde(default)]
    pub is_spoiler: bool,
    #[serde(default)]
    pub is_coming_soon: bool,
}

impl From<CreateReviewRequest> for NewReview {
    fn from(request: CreateReviewRequest) -> Self {
        Self {
            movie_id: request.movie_id,
            movie_type: request.movie_type,
            rating: request.rating,
            title: request.title,
            content: request.content,
            is_spoiler: request.is_spoiler,
            is_coming_soon: request.is_coming_soon,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[validate(range(min = 1, max = 10))]
    pub rating: Option<i64>,
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 5000))]
    pub content: Option<String>,
    pub is_spoiler: Option<bool>,
}

impl From<UpdateReviewRequest> for ReviewChanges {
    fn from(request: UpdateReviewRequest) -> Self {
        Self {
            rating: request.rating,
            title: request.title,
            content: request.content,
            is_spoiler: request.is_spoiler,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListReviewsQuery {
    pub movie_id: i64,
    pub movie_type: MovieType,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VoteRequest {
    pub is_helpful: bool,
}

#[derive(Debug, Serialize)]
pub struct CreateReviewResponse {
    pub review: Review,
    pub new_achievements: Vec<AchievementResponse>,
}

#[derive(Debug, Serialize)]
pub struct CreateCommentResponse {
    pub comment: ReviewComment,
    pub new_achievements: Vec<AchievementResponse>,
}
