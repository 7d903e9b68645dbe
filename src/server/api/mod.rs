pub mod achievement_controller;
pub mod analytics_controller;
pub mod health_controller;
pub mod library_controller;
pub mod review_controller;
