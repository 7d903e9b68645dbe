//! score formulas for movie analytics. everything here is a pure function of the raw counters
//! and the clock so a recompute with nothing changed lands on the exact same numbers

use chrono::{DateTime, Utc};

use crate::database::analytics::{AnalyticsCounters, DerivedScores};

pub const VIEW_WEIGHT: f64 = 1.0;
pub const REVIEW_WEIGHT: f64 = 5.0;
pub const FAVORITE_WEIGHT: f64 = 3.0;
/// multiplied by average rating and review count
pub const RATED_REVIEW_WEIGHT: f64 = 2.0;
pub const POPULARITY_DIVISOR: f64 = 100.0;
/// trending never decays below this share of popularity
pub const MIN_RECENCY_WEIGHT: f64 = 0.1;

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// one decimal, 0 for a movie nobody reviewed
pub fn average_rating(raw_average: Option<f64>) -> f64 {
    raw_average.map(|avg| round_to(avg, 1)).unwrap_or(0.0)
}

pub fn popularity_score(counters: &AnalyticsCounters, average_rating: f64) -> f64 {
    let views = counters.total_views as f64;
    let reviews = counters.total_reviews as f64;
    let favorites = counters.total_favorites as f64;

    let raw = views * VIEW_WEIGHT
        + reviews * REVIEW_WEIGHT
        + favorites * FAVORITE_WEIGHT
        + average_rating * reviews * RATED_REVIEW_WEIGHT;

    round_to(raw / POPULARITY_DIVISOR, 2)
}

/// elapsed 24h periods between the two (not calendar days), never less than 1 so same day
/// data isn't divided by zero
pub fn days_since(since: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - since).num_days().max(1)
}

/// 1 on the first day, 1/days after that, floored at MIN_RECENCY_WEIGHT
pub fn recency_weight(days: i64) -> f64 {
    (1.0 / days.max(1) as f64).max(MIN_RECENCY_WEIGHT)
}

pub fn trending_score(popularity: f64, since: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    round_to(popularity * recency_weight(days_since(since, now)), 2)
}

pub fn derive_scores(
    counters: &AnalyticsCounters,
    raw_average: Option<f64>,
    since: DateTime<Utc>,
    now: DateTime<Utc>,
) -> DerivedScores {
    let average_rating = average_rating(raw_average);
    let popularity_score = popularity_score(counters, average_rating);

    DerivedScores {
        average_rating,
        popularity_score,
        trending_score: trending_score(popularity_score, since, now),
    }
}
