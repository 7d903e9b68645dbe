mod common;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use cinereview::database::achievement::{
    ACHIEVEMENTS, AchievementCounter, AchievementRepository, EARLY_ADOPTER, FIRST_REVIEW,
    HELPFUL_REVIEWER_5, MOVIE_CRITIC_10, MOVIE_CRITIC_25, MockAchievementRepository,
    POPULAR_REVIEWER_10, UserAchievement,
};
use cinereview::database::review::ReviewRepository;
use cinereview::server::dtos::achievement_dto::ActivityMetadata;
use cinereview::server::error::Error;
use cinereview::server::services::achievement_services::{
    AchievementService, AchievementServiceTrait, Activity,
};
use cinereview::server::utils::clock_utils::Clock;

use common::{TestClock, new_review, seed_reviews, start_time, test_database};
use cinereview::MovieType;

const REVIEW: Activity = Activity::ReviewCreated {
    is_coming_soon: false,
};

fn types(achievements: &[UserAchievement]) -> Vec<&str> {
    achievements
        .iter()
        .map(|a| a.achievement_type.as_str())
        .collect()
}

fn stored_row(
    user_id: &str,
    achievement_type: &str,
    progress: i64,
    target: i64,
    completed_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> UserAchievement {
    UserAchievement {
        id: 1,
        user_id: user_id.to_string(),
        achievement_type: achievement_type.to_string(),
        progress,
        target,
        is_completed: completed_at.is_some(),
        completed_at,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn unlock_first_review_on_the_first_review() {
    let database = Arc::new(test_database().await);
    let clock = TestClock::new();
    let engine = AchievementService::new(database.clone(), clock.clone());

    seed_reviews(&database, "alice", 1, false).await;

    let unlocked = engine.record_activity("alice", REVIEW).await.unwrap();

    assert_eq!(types(&unlocked), vec![FIRST_REVIEW]);
    let first = &unlocked[0];
    assert_eq!(first.progress, 1);
    assert_eq!(first.target, 1);
    assert!(first.is_completed);
    assert_eq!(first.completed_at, Some(start_time()));

    // higher tiers are tracked but not complete
    let critic = database
        .get_user_achievement("alice", MOVIE_CRITIC_10)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(critic.progress, 1);
    assert!(!critic.is_completed);
    assert_eq!(critic.completed_at, None);
}

#[tokio::test]
async fn return_nothing_when_the_same_activity_is_replayed() {
    let database = Arc::new(test_database().await);
    let engine = AchievementService::new(database.clone(), TestClock::new());

    seed_reviews(&database, "alice", 1, false).await;

    let first = engine.record_activity("alice", REVIEW).await.unwrap();
    let second = engine.record_activity("alice", REVIEW).await.unwrap();

    assert_eq!(first.len(), 1);
    assert!(second.is_empty());
}

#[tokio::test]
async fn complete_movie_critic_exactly_at_the_tenth_review() {
    let database = Arc::new(test_database().await);
    let clock = TestClock::new();
    let engine = AchievementService::new(database.clone(), clock.clone());

    seed_reviews(&database, "alice", 9, false).await;
    let at_nine = engine.record_activity("alice", REVIEW).await.unwrap();
    assert!(!types(&at_nine).contains(&MOVIE_CRITIC_10));

    let critic = database
        .get_user_achievement("alice", MOVIE_CRITIC_10)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(critic.progress, 9);
    assert!(!critic.is_completed);

    clock.advance(Duration::hours(2));
    database
        .insert_review("alice", &new_review(1, MovieType::Tmdb, 9), clock.now())
        .await
        .unwrap();

    let at_ten = engine.record_activity("alice", REVIEW).await.unwrap();
    assert_eq!(types(&at_ten), vec![MOVIE_CRITIC_10]);
    assert_eq!(at_ten[0].progress, 10);
    assert_eq!(
        at_ten[0].completed_at,
        Some(start_time() + Duration::hours(2))
    );
}

#[tokio::test]
async fn keep_progress_non_decreasing_while_counts_grow() {
    let database = Arc::new(test_database().await);
    let engine = AchievementService::new(database.clone(), TestClock::new());

    let mut last = 0;
    for _ in 0..4 {
        seed_reviews(&database, "alice", 3, false).await;
        engine.record_activity("alice", REVIEW).await.unwrap();

        let row = database
            .get_user_achievement("alice", MOVIE_CRITIC_25)
            .await
            .unwrap()
            .unwrap();
        assert!(row.progress >= last);
        last = row.progress;
    }
    assert_eq!(last, 12);
}

#[tokio::test]
async fn only_count_early_adopter_for_coming_soon_reviews() {
    let database = Arc::new(test_database().await);
    let engine = AchievementService::new(database.clone(), TestClock::new());

    seed_reviews(&database, "alice", 5, true).await;

    engine.record_activity("alice", REVIEW).await.unwrap();
    assert!(
        database
            .get_user_achievement("alice", EARLY_ADOPTER)
            .await
            .unwrap()
            .is_none()
    );

    let unlocked = engine
        .record_activity(
            "alice",
            Activity::ReviewCreated {
                is_coming_soon: true,
            },
        )
        .await
        .unwrap();

    assert_eq!(types(&unlocked), vec![EARLY_ADOPTER]);
    assert_eq!(unlocked[0].progress, 5);
}

#[tokio::test]
async fn keep_helpful_votes_and_helpfully_voted_reviews_apart() {
    let database = Arc::new(test_database().await);
    let engine = AchievementService::new(database.clone(), TestClock::new());

    let reviews = seed_reviews(&database, "bob", 2, false).await;
    for voter in ["carol", "dave", "erin"] {
        database
            .cast_vote(reviews[0].id, voter, true, start_time())
            .await
            .unwrap();
    }
    // a not helpful vote on the second review doesn't make it a helpfully voted review
    database
        .cast_vote(reviews[1].id, "carol", false, start_time())
        .await
        .unwrap();

    assert_eq!(
        database
            .count_for(AchievementCounter::HelpfulVotes, "bob")
            .await
            .unwrap(),
        3
    );
    assert_eq!(
        database
            .count_for(AchievementCounter::HelpfullyVotedReviews, "bob")
            .await
            .unwrap(),
        1
    );

    engine
        .record_activity("bob", Activity::HelpfulVote)
        .await
        .unwrap();
    engine
        .record_activity("bob", Activity::ReviewHelpful)
        .await
        .unwrap();

    let popular = database
        .get_user_achievement("bob", POPULAR_REVIEWER_10)
        .await
        .unwrap()
        .unwrap();
    let helpful = database
        .get_user_achievement("bob", HELPFUL_REVIEWER_5)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(popular.progress, 3);
    assert_eq!(helpful.progress, 1);
}

#[tokio::test]
async fn never_reopen_a_completed_achievement() {
    let database = Arc::new(test_database().await);
    let clock = TestClock::new();
    let engine = AchievementService::new(database.clone(), clock.clone());

    seed_reviews(&database, "alice", 1, false).await;
    engine.record_activity("alice", REVIEW).await.unwrap();

    clock.advance(Duration::days(3));
    let after = engine
        .update_progress("alice", FIRST_REVIEW, 0)
        .await
        .unwrap();

    assert!(after.is_completed);
    assert_eq!(after.progress, 1);
    assert_eq!(after.completed_at, Some(start_time()));
}

#[tokio::test]
async fn require_progress_to_reach_the_target_when_updated_directly() {
    let database = Arc::new(test_database().await);
    let engine = AchievementService::new(database.clone(), TestClock::new());

    let below = engine
        .update_progress("alice", MOVIE_CRITIC_10, 9)
        .await
        .unwrap();
    assert!(!below.is_completed);
    assert_eq!(below.completed_at, None);

    let at = engine
        .update_progress("alice", MOVIE_CRITIC_10, 10)
        .await
        .unwrap();
    assert!(at.is_completed);
    assert_eq!(at.completed_at, Some(start_time()));
}

#[tokio::test]
async fn reject_unknown_achievements_and_negative_progress() {
    let database = Arc::new(test_database().await);
    let engine = AchievementService::new(database, TestClock::new());

    let unknown = engine.update_progress("alice", "couch_potato", 3).await;
    assert!(matches!(unknown, Err(Error::NotFound(_))));

    let negative = engine.update_progress("alice", FIRST_REVIEW, -1).await;
    assert!(matches!(negative, Err(Error::BadRequest(_))));
}

#[test]
fn reject_unknown_activity_kinds() {
    let parsed = Activity::parse("review_deleted", &ActivityMetadata::default());
    assert!(matches!(parsed, Err(Error::BadRequest(_))));

    let parsed = Activity::parse(
        "review_created",
        &ActivityMetadata {
            is_coming_soon: true,
        },
    )
    .unwrap();
    assert_eq!(
        parsed.counters(),
        vec![
            AchievementCounter::Reviews,
            AchievementCounter::ComingSoonReviews
        ]
    );
}

#[tokio::test]
async fn summarize_the_whole_catalog_with_points_for_completed_entries() {
    let database = Arc::new(test_database().await);
    let engine = AchievementService::new(database.clone(), TestClock::new());

    seed_reviews(&database, "alice", 1, false).await;
    engine.record_activity("alice", REVIEW).await.unwrap();

    let summary = engine.user_achievements("alice").await.unwrap();

    assert_eq!(summary.total, ACHIEVEMENTS.len());
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.total_points, 10);

    let comment = summary
        .achievements
        .iter()
        .find(|a| a.achievement_type == "first_comment")
        .unwrap();
    assert_eq!(comment.progress, 0);
    assert!(!comment.is_completed);
}

#[tokio::test]
async fn delete_progress_on_reset() {
    let database = Arc::new(test_database().await);
    let engine = AchievementService::new(database.clone(), TestClock::new());

    engine
        .update_progress("alice", MOVIE_CRITIC_10, 4)
        .await
        .unwrap();
    engine
        .reset_achievement("alice", MOVIE_CRITIC_10)
        .await
        .unwrap();

    assert!(
        database
            .get_user_achievement("alice", MOVIE_CRITIC_10)
            .await
            .unwrap()
            .is_none()
    );
    assert!(matches!(
        engine.reset_achievement("alice", MOVIE_CRITIC_10).await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn keep_evaluating_other_counters_when_one_count_fails() {
    let mut repository = MockAchievementRepository::new();
    repository
        .expect_count_for()
        .returning(|counter, _| match counter {
            AchievementCounter::Reviews => Err(anyhow::anyhow!("reviews table is locked")),
            _ => Ok(5),
        });
    repository
        .expect_get_user_achievement()
        .returning(|_, _| Ok(None));
    repository.expect_insert_user_achievement().returning(
        |user_id, achievement_type, progress, target, completed_at, now| {
            Ok(stored_row(
                user_id,
                achievement_type,
                progress,
                target,
                completed_at,
                now,
            ))
        },
    );

    let engine = AchievementService::new(Arc::new(repository), TestClock::new());
    let unlocked = engine
        .record_activity(
            "alice",
            Activity::ReviewCreated {
                is_coming_soon: true,
            },
        )
        .await
        .unwrap();

    assert_eq!(types(&unlocked), vec![EARLY_ADOPTER]);
}

#[tokio::test]
async fn keep_evaluating_other_tiers_when_one_write_fails() {
    let mut repository = MockAchievementRepository::new();
    repository.expect_count_for().returning(|_, _| Ok(10));
    repository
        .expect_get_user_achievement()
        .returning(|_, _| Ok(None));
    repository.expect_insert_user_achievement().returning(
        |user_id, achievement_type, progress, target, completed_at, now| {
            if achievement_type == FIRST_REVIEW {
                return Err(anyhow::anyhow!("disk full"));
            }
            Ok(stored_row(
                user_id,
                achievement_type,
                progress,
                target,
                completed_at,
                now,
            ))
        },
    );

    let engine = AchievementService::new(Arc::new(repository), TestClock::new());
    let unlocked = engine.record_activity("alice", REVIEW).await.unwrap();

    assert_eq!(types(&unlocked), vec![MOVIE_CRITIC_10]);
}
