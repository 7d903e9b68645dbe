mod common;

use chrono::Duration;

use cinereview::MovieType;
use cinereview::server::dtos::review_dto::{CreateReviewRequest, UpdateReviewRequest};
use cinereview::server::error::Error;
use cinereview::server::services::AppServices;

use common::{TestClock, test_services};

fn create_request(movie_id: i64, rating: i64) -> CreateReviewRequest {
    CreateReviewRequest {
        movie_id,
        movie_type: MovieType::Tmdb,
        rating,
        title: Some("Worth it".to_string()),
        content: "great pacing and a strong last act".to_string(),
        is_spoiler: false,
        is_coming_soon: false,
    }
}

async fn review_by(services: &AppServices, user_id: &str, movie_id: i64) -> i64 {
    services
        .reviews
        .create_review(user_id, create_request(movie_id, 8))
        .await
        .unwrap()
        .review
        .id
}

#[tokio::test]
async fn unlock_first_review_and_track_analytics_when_a_review_is_created() {
    let services = test_services(TestClock::new()).await;

    let created = services
        .reviews
        .create_review("alice", create_request(550, 8))
        .await
        .unwrap();

    assert_eq!(created.review.user_id, "alice");
    assert_eq!(created.review.rating, 8);
    assert_eq!(created.review.helpful_count, 0);

    let unlocked: Vec<&str> = created
        .new_achievements
        .iter()
        .map(|a| a.achievement_type.as_str())
        .collect();
    assert_eq!(unlocked, vec!["first_review"]);
    assert_eq!(created.new_achievements[0].points, 10);

    let analytics = services
        .analytics
        .movie_analytics(550, MovieType::Tmdb)
        .await
        .unwrap();
    assert_eq!(analytics.total_reviews, 1);
    assert_eq!(analytics.average_rating, 8.0);
    assert_eq!(analytics.popularity_score, 0.21);

    // second review unlocks nothing new
    let second = services
        .reviews
        .create_review("alice", create_request(551, 6))
        .await
        .unwrap();
    assert!(second.new_achievements.is_empty());
}

#[tokio::test]
async fn page_through_the_reviews_of_a_movie() {
    let services = test_services(TestClock::new()).await;

    for user in ["alice", "bob", "carol"] {
        review_by(&services, user, 550).await;
    }
    review_by(&services, "dave", 551).await;

    let all = services
        .reviews
        .movie_reviews(550, MovieType::Tmdb, None, None)
        .await
        .unwrap();
    assert_eq!(all.len(), 3);

    let page = services
        .reviews
        .movie_reviews(550, MovieType::Tmdb, Some(2), Some(2))
        .await
        .unwrap();
    assert_eq!(page.len(), 1);

    let other_source = services
        .reviews
        .movie_reviews(550, MovieType::Kurdish, None, None)
        .await
        .unwrap();
    assert!(other_source.is_empty());
}

#[tokio::test]
async fn only_let_the_author_edit_a_review() {
    let clock = TestClock::new();
    let services = test_services(clock.clone()).await;
    let review_id = review_by(&services, "alice", 550).await;

    let stolen = services
        .reviews
        .update_review(
            "mallory",
            review_id,
            UpdateReviewRequest {
                rating: Some(1),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(stolen, Err(Error::Forbidden(_))));

    clock.advance(Duration::minutes(5));
    let updated = services
        .reviews
        .update_review(
            "alice",
            review_id,
            UpdateReviewRequest {
                rating: Some(4),
                content: Some("aged badly on a rewatch".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.rating, 4);
    assert_eq!(updated.content, "aged badly on a rewatch");
    assert_eq!(updated.title, Some("Worth it".to_string()));
    assert!(updated.updated_at > updated.created_at);

    // the new rating flows into the movie's scores
    let analytics = services
        .analytics
        .movie_analytics(550, MovieType::Tmdb)
        .await
        .unwrap();
    assert_eq!(analytics.average_rating, 4.0);
}

#[tokio::test]
async fn delete_a_review_with_its_comments_and_untrack_it() {
    let services = test_services(TestClock::new()).await;
    let review_id = review_by(&services, "alice", 550).await;

    services
        .reviews
        .add_comment("bob", review_id, "agreed")
        .await
        .unwrap();

    let forbidden = services.reviews.delete_review("bob", review_id).await;
    assert!(matches!(forbidden, Err(Error::Forbidden(_))));

    services
        .reviews
        .delete_review("alice", review_id)
        .await
        .unwrap();

    assert!(matches!(
        services.reviews.review(review_id).await,
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        services.reviews.review_comments(review_id).await,
        Err(Error::NotFound(_))
    ));

    let analytics = services
        .analytics
        .movie_analytics(550, MovieType::Tmdb)
        .await
        .unwrap();
    assert_eq!(analytics.total_reviews, 0);
}

#[tokio::test]
async fn reward_comments_and_reject_comments_on_missing_reviews() {
    let services = test_services(TestClock::new()).await;
    let review_id = review_by(&services, "alice", 550).await;

    let created = services
        .reviews
        .add_comment("bob", review_id, "the score was great")
        .await
        .unwrap();

    assert_eq!(created.comment.review_id, review_id);
    assert_eq!(created.new_achievements.len(), 1);
    assert_eq!(created.new_achievements[0].achievement_type, "first_comment");

    let missing = services.reviews.add_comment("bob", 9999, "hello?").await;
    assert!(matches!(missing, Err(Error::NotFound(_))));

    let comments = services.reviews.review_comments(review_id).await.unwrap();
    assert_eq!(comments.len(), 1);
}

#[tokio::test]
async fn only_let_the_commenter_delete_a_comment() {
    let services = test_services(TestClock::new()).await;
    let review_id = review_by(&services, "alice", 550).await;
    let comment_id = services
        .reviews
        .add_comment("bob", review_id, "first!")
        .await
        .unwrap()
        .comment
        .id;

    // owning the review isn't enough
    let forbidden = services.reviews.delete_comment("alice", comment_id).await;
    assert!(matches!(forbidden, Err(Error::Forbidden(_))));

    services
        .reviews
        .delete_comment("bob", comment_id)
        .await
        .unwrap();

    assert!(matches!(
        services.reviews.delete_comment("bob", comment_id).await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn count_one_vote_per_user_and_let_them_change_it() {
    let services = test_services(TestClock::new()).await;
    let review_id = review_by(&services, "alice", 550).await;

    services.reviews.vote("bob", review_id, true).await.unwrap();
    let review = services.reviews.vote("bob", review_id, true).await.unwrap();
    assert_eq!(review.helpful_count, 1);
    assert_eq!(review.not_helpful_count, 0);

    services.reviews.vote("carol", review_id, true).await.unwrap();
    let review = services.reviews.vote("bob", review_id, false).await.unwrap();
    assert_eq!(review.helpful_count, 1);
    assert_eq!(review.not_helpful_count, 1);
}

#[tokio::test]
async fn credit_helpful_votes_to_the_author() {
    let services = test_services(TestClock::new()).await;
    let review_id = review_by(&services, "alice", 550).await;

    for voter in ["bob", "carol", "dave"] {
        services.reviews.vote(voter, review_id, true).await.unwrap();
    }

    let summary = services.achievements.user_achievements("alice").await.unwrap();
    let progress_of = |achievement_type: &str| {
        summary
            .achievements
            .iter()
            .find(|a| a.achievement_type == achievement_type)
            .map(|a| a.progress)
            .unwrap()
    };

    assert_eq!(progress_of("popular_reviewer_10"), 3);
    assert_eq!(progress_of("helpful_reviewer_5"), 1);

    // voters get nothing for voting
    let voter = services.achievements.user_achievements("bob").await.unwrap();
    assert_eq!(voter.completed, 0);
}

#[tokio::test]
async fn refuse_votes_on_your_own_review() {
    let services = test_services(TestClock::new()).await;
    let review_id = review_by(&services, "alice", 550).await;

    let result = services.reviews.vote("alice", review_id, true).await;

    assert!(matches!(result, Err(Error::BadRequest(_))));
}
