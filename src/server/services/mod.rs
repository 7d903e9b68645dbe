pub mod achievement_services;
pub mod analytics_services;
pub mod app_services;
pub mod library_services;
pub mod review_services;

pub use achievement_services::DynAchievementService;
pub use analytics_services::DynAnalyticsService;
pub use app_services::AppServices;
pub use library_services::DynLibraryService;
pub use review_services::DynReviewService;
