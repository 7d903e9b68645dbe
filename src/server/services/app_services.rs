use std::sync::Arc;

use tracing::info;

use crate::{
    config::AppConfig,
    database::SqliteDatabase,
    server::utils::{
        clock_utils::{DynClock, SystemClock},
        token_utils::TokenUtil,
    },
};

use super::{
    achievement_services::{AchievementService, DynAchievementService},
    analytics_services::{AnalyticsService, DynAnalyticsService},
    library_services::{DynLibraryService, LibraryService},
    review_services::{DynReviewService, ReviewService},
};

/// everything a handler can reach, cloned into each request through the Extension layer
#[derive(Clone)]
pub struct AppServices {
    pub token_util: Arc<TokenUtil>,
    pub achievements: DynAchievementService,
    pub analytics: DynAnalyticsService,
    pub reviews: DynReviewService,
    pub library: DynLibraryService,
    pub database: Arc<SqliteDatabase>,
    pub config: Arc<AppConfig>,
}

impl AppServices {
    pub fn new(database: SqliteDatabase, config: Arc<AppConfig>) -> Self {
        Self::with_clock(database, config, Arc::new(SystemClock))
    }

    pub fn with_clock(database: SqliteDatabase, config: Arc<AppConfig>, clock: DynClock) -> Self {
        info!("starting services...");

        let token_util = Arc::new(TokenUtil::new(config.access_token_secret.clone()));
        let database = Arc::new(database);

        // the sqlite handle implements every repository trait
        let achievements = Arc::new(AchievementService::new(database.clone(), clock.clone()))
            as DynAchievementService;
        let analytics =
            Arc::new(AnalyticsService::new(database.clone(), clock.clone())) as DynAnalyticsService;

        let reviews = Arc::new(ReviewService::new(
            database.clone(),
            analytics.clone(),
            achievements.clone(),
            clock.clone(),
        )) as DynReviewService;

        let library = Arc::new(LibraryService::new(
            database.clone(),
            analytics.clone(),
            clock,
        )) as DynLibraryService;

        info!("services ok");

        Self {
            token_util,
            achievements,
            analytics,
            reviews,
            library,
            database,
            config,
        }
    }
}
