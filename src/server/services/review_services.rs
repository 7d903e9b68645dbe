use async_trait::async_trait;
use mockall::automock;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    database::{
        MovieType,
        achievement::UserAchievement,
        analytics::AnalyticsAction,
        review::{DynReviewRepository, NewReview, Review, ReviewChanges, ReviewComment},
    },
    server::{
        dtos::{
            achievement_dto::AchievementResponse,
            review_dto::{
                CreateCommentResponse, CreateReviewRequest, CreateReviewResponse,
                UpdateReviewRequest,
            },
        },
        error::{AppResult, Error},
        services::{
            achievement_services::{Activity, DynAchievementService},
            analytics_services::DynAnalyticsService,
        },
        utils::{
            clock_utils::DynClock,
            ownership_utils::{require_found, require_owned},
        },
    },
};

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

pub type DynReviewService = Arc<dyn ReviewServiceTrait + Send + Sync>;

#[automock]
#[async_trait]
pub trait ReviewServiceTrait {
    async fn create_review(
        &self,
        user_id: &str,
        request: CreateReviewRequest,
    ) -> AppResult<CreateReviewResponse>;
    async fn review(&self, review_id: i64) -> AppResult<Review>;
    async fn movie_reviews(
        &self,
        movie_id: i64,
        movie_type: MovieType,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> AppResult<Vec<Review>>;
    async fn update_review(
        &self,
        user_id: &str,
        review_id: i64,
        request: UpdateReviewRequest,
    ) -> AppResult<Review>;
    async fn delete_review(&self, user_id: &str, review_id: i64) -> AppResult<()>;
    async fn add_comment(
        &self,
        user_id: &str,
        review_id: i64,
        content: &str,
    ) -> AppResult<CreateCommentResponse>;
    async fn review_comments(&self, review_id: i64) -> AppResult<Vec<ReviewComment>>;
    async fn delete_comment(&self, user_id: &str, comment_id: i64) -> AppResult<()>;
    async fn vote(&self, user_id: &str, review_id: i64, is_helpful: bool) -> AppResult<Review>;
}

pub struct ReviewService {
    repository: DynReviewRepository,
    analytics: DynAnalyticsService,
    achievements: DynAchievementService,
    clock: DynClock,
}

impl ReviewService {
    pub fn new(
        repository: DynReviewRepository,
        analytics: DynAnalyticsService,
        achievements: DynAchievementService,
        clock: DynClock,
    ) -> Self {
        Self {
            repository,
            analytics,
            achievements,
            clock,
        }
    }

    // the two helpers below are side effects of the write that already happened, a failure
    // gets logged and the review/comment/vote stays
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

    async fn reward(&self, user_id: &str, activity: Activity) -> Vec<UserAchievement> {
        match self.achievements.record_activity(user_id, activity).await {
            Ok(unlocked) => unlocked,
            Err(e) => {
                warn!("achievements for {} of user {} failed: {}", activity, user_id, e);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl ReviewServiceTrait for ReviewService {
    async fn create_review(
        &self,
        user_id: &str,
        request: CreateReviewRequest,
    ) -> AppResult<CreateReviewResponse> {
        let new_review = NewReview::from(request);
        let review = self
            .repository
            .insert_review(user_id, &new_review, self.clock.now())
            .await?;

        info!(
            "user {} reviewed {} {} ({}/10)",
            user_id, review.movie_type, review.movie_id, review.rating
        );

        self.track(review.movie_id, review.movie_type, AnalyticsAction::Review)
            .await;

        let unlocked = self
            .reward(
                user_id,
                Activity::ReviewCreated {
                    is_coming_soon: review.is_coming_soon,
                },
            )
            .await;

        Ok(CreateReviewResponse {
            review,
            new_achievements: AchievementResponse::from_records(&unlocked),
        })
    }

    async fn review(&self, review_id: i64) -> AppResult<Review> {
        require_found(self.repository.get_review(review_id).await?, "review")
    }

    async fn movie_reviews(
        &self,
        movie_id: i64,
        movie_type: MovieType,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> AppResult<Vec<Review>> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let offset = offset.unwrap_or(0).max(0);

        Ok(self
            .repository
            .list_movie_reviews(movie_id, movie_type, limit, offset)
            .await?)
    }

    async fn update_review(
        &self,
        user_id: &str,
        review_id: i64,
        request: UpdateReviewRequest,
    ) -> AppResult<Review> {
        let existing = require_owned(
            self.repository.get_review(review_id).await?,
            "review",
            |r| r.user_id == user_id,
        )?;

        let changes = ReviewChanges::from(request);
        let rating_changed = changes.rating.is_some_and(|r| r != existing.rating);

        let updated = self
            .repository
            .update_review(review_id, &changes, self.clock.now())
            .await?;

        // average rating is read from the reviews table so only the scores need a refresh
        if rating_changed {
            if let Err(e) = self
                .analytics
                .recompute_scores(updated.movie_id, updated.movie_type)
                .await
            {
                warn!("rescoring after review {} edit failed: {}", review_id, e);
            }
        }

        Ok(updated)
    }

    async fn delete_review(&self, user_id: &str, review_id: i64) -> AppResult<()> {
        let review = require_owned(
            self.repository.get_review(review_id).await?,
            "review",
            |r| r.user_id == user_id,
        )?;

        self.repository.delete_review(review_id).await?;
        info!("user {} deleted review {}", user_id, review_id);

        self.track(
            review.movie_id,
            review.movie_type,
            AnalyticsAction::RemoveReview,
        )
        .await;

        Ok(())
    }

    async fn add_comment(
        &self,
        user_id: &str,
        review_id: i64,
        content: &str,
    ) -> AppResult<CreateCommentResponse> {
        require_found(self.repository.get_review(review_id).await?, "review")?;

        let comment = self
            .repository
            .insert_comment(review_id, user_id, content, self.clock.now())
            .await?;

        let unlocked = self.reward(user_id, Activity::CommentPosted).await;

        Ok(CreateCommentResponse {
            comment,
            new_achievements: AchievementResponse::from_records(&unlocked),
        })
    }

    async fn review_comments(&self, review_id: i64) -> AppResult<Vec<ReviewComment>> {
        require_found(self.repository.get_review(review_id).await?, "review")?;
        Ok(self.repository.list_comments(review_id).await?)
    }

    async fn delete_comment(&self, user_id: &str, comment_id: i64) -> AppResult<()> {
        require_owned(
            self.repository.get_comment(comment_id).await?,
            "comment",
            |c| c.user_id == user_id,
        )?;

        self.repository.delete_comment(comment_id).await?;
        Ok(())
    }

    async fn vote(&self, user_id: &str, review_id: i64, is_helpful: bool) -> AppResult<Review> {
        let review = require_found(self.repository.get_review(review_id).await?, "review")?;

        if review.user_id == user_id {
            return Err(Error::BadRequest(
                "you can't vote on your own review".to_string(),
            ));
        }

        let review = self
            .repository
            .cast_vote(review_id, user_id, is_helpful, self.clock.now())
            .await?;

        // both counters belong to the author, not the voter
        self.reward(&review.user_id, Activity::HelpfulVote).await;
        self.reward(&review.user_id, Activity::ReviewHelpful).await;

        Ok(review)
    }
}
