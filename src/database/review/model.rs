use anyhow::Result;
use chrono::{DateTime, Utc};
use mockall::automock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::database::MovieType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: i64,
    pub user_id: String,
    pub movie_id: i64,
    pub movie_type: MovieType,
    /// 1 to 10
    pub rating: i64,
    pub title: Option<String>,
    pub content: String,
    pub is_spoiler: bool,
    /// written before the movie was released
    pub is_coming_soon: bool,
    pub helpful_count: i64,
    pub not_helpful_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReviewComment {
    pub id: i64,
    pub review_id: i64,
    pub user_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub movie_id: i64,
    pub movie_type: MovieType,
    pub rating: i64,
    pub title: Option<String>,
    pub content: String,
    pub is_spoiler: bool,
    pub is_coming_soon: bool,
}

/// None leaves the column as is
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewChanges {
    pub rating: Option<i64>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_spoiler: Option<bool>,
}

pub type DynReviewRepository = Arc<dyn ReviewRepository + Send + Sync>;

#[automock]
#[async_trait::async_trait]
pub trait ReviewRepository {
    async fn insert_review(
        &self,
        user_id: &str,
        review: &NewReview,
        now: DateTime<Utc>,
    ) -> Result<Review>;
    async fn get_review(&self, review_id: i64) -> Result<Option<Review>>;
    async fn list_movie_reviews(
        &self,
        movie_id: i64,
        movie_type: MovieType,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Review>>;
    async fn update_review(
        &self,
        review_id: i64,
        changes: &ReviewChanges,
        now: DateTime<Utc>,
    ) -> Result<Review>;
    /// comments and votes go with it
    async fn delete_review(&self, review_id: i64) -> Result<bool>;
    async fn insert_comment(
        &self,
        review_id: i64,
        user_id: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<ReviewComment>;
    async fn get_comment(&self, comment_id: i64) -> Result<Option<ReviewComment>>;
    async fn list_comments(&self, review_id: i64) -> Result<Vec<ReviewComment>>;
    async fn delete_comment(&self, comment_id: i64) -> Result<bool>;
    /// replaces any earlier vote by the same user and recounts the review's vote totals
    async fn cast_vote(
        &self,
        review_id: i64,
        user_id: &str,
        is_helpful: bool,
        now: DateTime<Utc>,
    ) -> Result<Review>;
}
