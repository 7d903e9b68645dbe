#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use cinereview::database::review::{NewReview, Review, ReviewRepository};
use cinereview::server::services::AppServices;
use cinereview::server::utils::clock_utils::Clock;
use cinereview::{AppConfig, MovieType, SqliteDatabase};

/// clock that only moves when a test tells it to
pub struct TestClock {
    now: Mutex<DateTime<Utc>>,
}

impl TestClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(start_time()),
        })
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
}

pub async fn test_database() -> SqliteDatabase {
    let database = SqliteDatabase::connect_in_memory().await.unwrap();
    database.migrate().await.unwrap();
    database
}

pub async fn test_services(clock: Arc<TestClock>) -> AppServices {
    AppServices::with_clock(
        test_database().await,
        Arc::new(AppConfig::default()),
        clock,
    )
}

pub fn new_review(movie_id: i64, movie_type: MovieType, rating: i64) -> NewReview {
    NewReview {
        movie_id,
        movie_type,
        rating,
        title: None,
        content: "solid watch, would see again".to_string(),
        is_spoiler: false,
        is_coming_soon: false,
    }
}

pub async fn seed_reviews(
    database: &SqliteDatabase,
    user_id: &str,
    count: i64,
    is_coming_soon: bool,
) -> Vec<Review> {
    let mut reviews = Vec::new();
    for i in 0..count {
        let mut review = new_review(1000 + i, MovieType::Tmdb, 7);
        review.is_coming_soon = is_coming_soon;
        reviews.push(
            database
                .insert_review(user_id, &review, start_time())
                .await
                .unwrap(),
        );
    }
    reviews
}
