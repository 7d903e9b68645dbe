pub mod achievement_dto;
pub mod analytics_dto;
pub mod health_dto;
pub mod library_dto;
pub mod review_dto;
