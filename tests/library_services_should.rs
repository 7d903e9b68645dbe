mod common;

use chrono::Duration;

use cinereview::MovieType;
use cinereview::server::dtos::library_dto::{MAX_RUNTIME_SECONDS, WatchProgressRequest};
use cinereview::server::error::Error;
use cinereview::server::services::library_services::is_completed;
use validator::Validate;

use common::{TestClock, test_services};

fn progress(movie_id: i64, progress_seconds: i64, duration_seconds: i64) -> WatchProgressRequest {
    WatchProgressRequest {
        movie_id,
        movie_type: MovieType::Tmdb,
        progress_seconds,
        duration_seconds,
    }
}

#[tokio::test]
async fn count_a_favorite_once_however_often_it_is_added() {
    let services = test_services(TestClock::new()).await;

    let first = services
        .library
        .add_favorite("alice", 550, MovieType::Tmdb)
        .await
        .unwrap();
    let again = services
        .library
        .add_favorite("alice", 550, MovieType::Tmdb)
        .await
        .unwrap();

    assert!(first.changed);
    assert!(again.is_favorite);
    assert!(!again.changed);

    let analytics = services
        .analytics
        .movie_analytics(550, MovieType::Tmdb)
        .await
        .unwrap();
    assert_eq!(analytics.total_favorites, 1);

    let favorites = services.library.favorites("alice").await.unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].movie_id, 550);
}

#[tokio::test]
async fn only_untrack_favorites_that_existed() {
    let services = test_services(TestClock::new()).await;

    services
        .library
        .add_favorite("alice", 550, MovieType::Tmdb)
        .await
        .unwrap();
    services
        .library
        .add_favorite("bob", 550, MovieType::Tmdb)
        .await
        .unwrap();

    let removed = services
        .library
        .remove_favorite("alice", 550, MovieType::Tmdb)
        .await
        .unwrap();
    let nothing = services
        .library
        .remove_favorite("alice", 550, MovieType::Tmdb)
        .await
        .unwrap();

    assert!(removed.changed);
    assert!(!removed.is_favorite);
    assert!(!nothing.changed);

    let analytics = services
        .analytics
        .movie_analytics(550, MovieType::Tmdb)
        .await
        .unwrap();
    assert_eq!(analytics.total_favorites, 1);
}

#[tokio::test]
async fn add_only_forward_progress_to_watch_time() {
    let services = test_services(TestClock::new()).await;

    services
        .library
        .save_progress("alice", progress(550, 600, 6000))
        .await
        .unwrap();
    services
        .library
        .save_progress("alice", progress(550, 1500, 6000))
        .await
        .unwrap();
    // seeking back doesn't subtract anything
    let saved = services
        .library
        .save_progress("alice", progress(550, 1200, 6000))
        .await
        .unwrap();

    assert_eq!(saved.progress_seconds, 1200);
    assert!(!saved.completed);

    let analytics = services
        .analytics
        .movie_analytics(550, MovieType::Tmdb)
        .await
        .unwrap();
    assert_eq!(analytics.total_watch_time, 1500);
}

#[tokio::test]
async fn mark_progress_complete_from_ninety_percent() {
    let services = test_services(TestClock::new()).await;

    let almost = services
        .library
        .save_progress("alice", progress(550, 5399, 6000))
        .await
        .unwrap();
    assert!(!almost.completed);

    let done = services
        .library
        .save_progress("alice", progress(550, 5400, 6000))
        .await
        .unwrap();
    assert!(done.completed);

    // past the end is clamped to the runtime
    let clamped = services
        .library
        .save_progress("alice", progress(551, 9000, 6000))
        .await
        .unwrap();
    assert_eq!(clamped.progress_seconds, 6000);
    assert!(clamped.completed);
}

#[tokio::test]
async fn list_unfinished_movies_most_recent_first() {
    let clock = TestClock::new();
    let services = test_services(clock.clone()).await;

    for movie_id in [1, 2, 3] {
        services
            .library
            .save_progress("alice", progress(movie_id, 300, 6000))
            .await
            .unwrap();
        clock.advance(Duration::minutes(10));
    }
    services
        .library
        .save_progress("alice", progress(2, 5900, 6000))
        .await
        .unwrap();
    clock.advance(Duration::minutes(10));
    services
        .library
        .save_progress("alice", progress(1, 900, 6000))
        .await
        .unwrap();

    let rows = services
        .library
        .continue_watching("alice", None)
        .await
        .unwrap();
    let ids: Vec<i64> = rows.iter().map(|p| p.movie_id).collect();
    assert_eq!(ids, vec![1, 3]);

    let limited = services
        .library
        .continue_watching("alice", Some(1))
        .await
        .unwrap();
    assert_eq!(limited.len(), 1);

    assert!(
        services
            .library
            .continue_watching("bob", None)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn reject_a_zero_runtime() {
    let services = test_services(TestClock::new()).await;

    let result = services
        .library
        .save_progress("alice", progress(550, 0, 0))
        .await;

    assert!(matches!(result, Err(Error::BadRequest(_))));
}

#[tokio::test]
async fn report_missing_progress_on_removal() {
    let services = test_services(TestClock::new()).await;

    services
        .library
        .save_progress("alice", progress(550, 60, 6000))
        .await
        .unwrap();
    services
        .library
        .remove_progress("alice", 550, MovieType::Tmdb)
        .await
        .unwrap();

    let again = services
        .library
        .remove_progress("alice", 550, MovieType::Tmdb)
        .await;
    assert!(matches!(again, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn handle_runtimes_too_large_for_percentage_math() {
    let services = test_services(TestClock::new()).await;
    let huge = i64::MAX / 2;

    let halfway = services
        .library
        .save_progress("alice", progress(550, huge / 2, huge))
        .await
        .unwrap();
    assert!(!halfway.completed);

    let done = services
        .library
        .save_progress("alice", progress(550, huge, huge))
        .await
        .unwrap();
    assert!(done.completed);
}

#[test]
fn compute_completion_without_overflowing() {
    assert!(is_completed(90, 100));
    assert!(!is_completed(89, 100));
    assert!(is_completed(i64::MAX, i64::MAX));
    assert!(!is_completed(i64::MAX / 2, i64::MAX));
}

#[test]
fn reject_runtimes_longer_than_a_week() {
    assert!(progress(550, 60, MAX_RUNTIME_SECONDS).validate().is_ok());
    assert!(progress(550, 60, MAX_RUNTIME_SECONDS + 1).validate().is_err());
    assert!(
        progress(550, MAX_RUNTIME_SECONDS + 1, MAX_RUNTIME_SECONDS)
            .validate()
            .is_err()
    );
}
