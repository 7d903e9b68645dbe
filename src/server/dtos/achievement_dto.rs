use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::database::achievement::{AchievementDefinition, UserAchievement, definition};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ActivityMetadata {
    /// set when the review was written for a movie that isn't out yet
    #[serde(default)]
    pub is_coming_soon: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecordActivityRequest {
    #[validate(length(min = 1, max = 64))]
    pub activity: String,
    #[serde(default)]
    pub metadata: ActivityMetadata,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProgressRequest {
    #[validate(range(min = 0))]
    pub progress: i64,
}

/// a catalog entry merged with whatever progress the user has on it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AchievementResponse {
    pub achievement_type: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub points: i64,
    pub progress: i64,
    pub target: i64,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl AchievementResponse {
    pub fn from_progress(definition: &AchievementDefinition, progress: &UserAchievement) -> Self {
        Self {
            achievement_type: definition.achievement_type.to_string(),
            name: definition.name.to_string(),
            description: definition.description.to_string(),
            icon: definition.icon.to_string(),
            points: definition.points,
            progress: progress.progress,
            target: progress.target,
            is_completed: progress.is_completed,
            completed_at: progress.completed_at,
        }
    }

    /// nothing stored for this user yet
    pub fn locked(definition: &AchievementDefinition) -> Self {
        Self {
            achievement_type: definition.achievement_type.to_string(),
            name: definition.name.to_string(),
            description: definition.description.to_string(),
            icon: definition.icon.to_string(),
            points: definition.points,
            progress: 0,
            target: definition.target,
            is_completed: false,
            completed_at: None,
        }
    }

    /// rows whose type was dropped from the catalog are skipped
    pub fn from_records(records: &[UserAchievement]) -> Vec<Self> {
        records
            .iter()
            .filter_map(|record| {
                definition(&record.achievement_type).map(|def| Self::from_progress(def, record))
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct AchievementSummaryResponse {
    pub achievements: Vec<AchievementResponse>,
    pub completed: usize,
    pub total: usize,
    pub total_points: i64,
}

#[derive(Debug, Serialize)]
pub struct RecordActivityResponse {
    pub newly_completed: Vec<AchievementResponse>,
}
