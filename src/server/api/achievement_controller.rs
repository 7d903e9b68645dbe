use axum::{
    Json, Router,
    extract::Path,
    http::StatusCode,
    routing::{get, post, put},
};

use crate::{
    database::achievement::{ACHIEVEMENTS, AchievementDefinition, definition},
    server::{
        dtos::achievement_dto::{
            AchievementResponse, AchievementSummaryResponse, RecordActivityRequest,
            RecordActivityResponse, UpdateProgressRequest,
        },
        error::{AppResult, Error},
        extractors::{RequiredAuthentication, ValidatedJson},
        services::achievement_services::Activity,
    },
};

pub struct AchievementController;

impl AchievementController {
    pub fn app() -> Router {
        Router::new()
            .route("/", get(Self::list_achievements))
            .route("/definitions", get(Self::list_definitions))
            .route("/activity", post(Self::record_activity))
            .route(
                "/{achievement_type}",
                put(Self::update_progress).delete(Self::reset_achievement),
            )
    }

    /// GET /api/v1/achievements
    ///
    /// the full catalog with the caller's progress on each entry
    async fn list_achievements(
        RequiredAuthentication(user_id, services): RequiredAuthentication,
    ) -> AppResult<Json<AchievementSummaryResponse>> {
        Ok(Json(services.achievements.user_achievements(&user_id).await?))
    }

    async fn list_definitions() -> Json<&'static [AchievementDefinition]> {
        Json(ACHIEVEMENTS)
    }

    /// POST /api/v1/achievements/activity
    ///
    /// request body:
    /// ```json
    /// { "activity": "review_created", "metadata": { "is_coming_soon": true } }
    /// ```
    async fn record_activity(
        RequiredAuthentication(user_id, services): RequiredAuthentication,
        ValidatedJson(payload): ValidatedJson<RecordActivityRequest>,
    ) -> AppResult<Json<RecordActivityResponse>> {
        let activity = Activity::parse(&payload.activity, &payload.metadata)?;
        let unlocked = services
            .achievements
            .record_activity(&user_id, activity)
            .await?;

        Ok(Json(RecordActivityResponse {
            newly_completed: AchievementResponse::from_records(&unlocked),
        }))
    }

    async fn update_progress(
        RequiredAuthentication(user_id, services): RequiredAuthentication,
        Path(achievement_type): Path<String>,
        ValidatedJson(payload): ValidatedJson<UpdateProgressRequest>,
    ) -> AppResult<Json<AchievementResponse>> {
        let record = services
            .achievements
            .update_progress(&user_id, &achievement_type, payload.progress)
            .await?;

        let definition = definition(&record.achievement_type).ok_or_else(|| {
            Error::InternalServerErrorWithContext(format!(
                "stored achievement {} has no definition",
                record.achievement_type
            ))
        })?;

        Ok(Json(AchievementResponse::from_progress(definition, &record)))
    }

    async fn reset_achievement(
        RequiredAuthentication(user_id, services): RequiredAuthentication,
        Path(achievement_type): Path<String>,
    ) -> AppResult<StatusCode> {
        services
            .achievements
            .reset_achievement(&user_id, &achievement_type)
            .await?;

        Ok(StatusCode::NO_CONTENT)
    }
}
