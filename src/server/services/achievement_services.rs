// achievement engine, turns activity signals into progress rows and unlocks
use async_trait::async_trait;
use mockall::automock;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::{
    database::achievement::{
        ACHIEVEMENTS, AchievementCounter, AchievementDefinition, DynAchievementRepository,
        UserAchievement, definition, definitions_for,
    },
    server::{
        dtos::achievement_dto::{
            AchievementResponse, AchievementSummaryResponse, ActivityMetadata,
        },
        error::{AppResult, Error},
        utils::clock_utils::DynClock,
    },
};

/// something a user did that can move achievement progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    ReviewCreated { is_coming_soon: bool },
    CommentPosted,
    /// someone voted one of the user's reviews helpful
    HelpfulVote,
    /// one of the user's reviews picked up a helpful vote
    ReviewHelpful,
}

impl Activity {
    pub fn parse(kind: &str, metadata: &ActivityMetadata) -> AppResult<Self> {
        match kind {
            "review_created" => Ok(Self::ReviewCreated {
                is_coming_soon: metadata.is_coming_soon,
            }),
            "comment_posted" => Ok(Self::CommentPosted),
            "helpful_vote" => Ok(Self::HelpfulVote),
            "review_helpful" => Ok(Self::ReviewHelpful),
            other => Err(Error::BadRequest(format!(
                "unknown activity kind '{}'",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReviewCreated { .. } => "review_created",
            Self::CommentPosted => "comment_posted",
            Self::HelpfulVote => "helpful_vote",
            Self::ReviewHelpful => "review_helpful",
        }
    }

    /// counters whose achievements have to be re-evaluated after this activity
    pub fn counters(&self) -> Vec<AchievementCounter> {
        match self {
            Self::ReviewCreated { is_coming_soon } => {
                let mut counters = vec![AchievementCounter::Reviews];
                if *is_coming_soon {
                    counters.push(AchievementCounter::ComingSoonReviews);
                }
                counters
            }
            Self::CommentPosted => vec![AchievementCounter::Comments],
            Self::HelpfulVote => vec![AchievementCounter::HelpfulVotes],
            Self::ReviewHelpful => vec![AchievementCounter::HelpfullyVotedReviews],
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type DynAchievementService = Arc<dyn AchievementServiceTrait + Send + Sync>;

#[automock]
#[async_trait]
pub trait AchievementServiceTrait {
    /// re-evaluates every achievement the activity touches and returns only the ones that
    /// flipped to completed during this call
    async fn record_activity(
        &self,
        user_id: &str,
        activity: Activity,
    ) -> AppResult<Vec<UserAchievement>>;
    /// sets progress directly, completing the achievement if it reaches the target
    async fn update_progress(
        &self,
        user_id: &str,
        achievement_type: &str,
        progress: i64,
    ) -> AppResult<UserAchievement>;
    async fn user_achievements(&self, user_id: &str) -> AppResult<AchievementSummaryResponse>;
    async fn reset_achievement(&self, user_id: &str, achievement_type: &str) -> AppResult<()>;
}

pub struct AchievementService {
    repository: DynAchievementRepository,
    clock: DynClock,
}

impl AchievementService {
    pub fn new(repository: DynAchievementRepository, clock: DynClock) -> Self {
        Self { repository, clock }
    }

    /// create, leave alone or update the progress row for one tier. the bool is true only on
    /// the incomplete -> complete transition
    async fn apply_progress(
        &self,
        user_id: &str,
        definition: &AchievementDefinition,
        progress: i64,
    ) -> anyhow::Result<(UserAchievement, bool)> {
        let now = self.clock.now();

        let existing = self
            .repository
            .get_user_achievement(user_id, definition.achievement_type)
            .await?;

        match existing {
            None => {
                let completed_at = (progress >= definition.target).then_some(now);
                let created = self
                    .repository
                    .insert_user_achievement(
                        user_id,
                        definition.achievement_type,
                        progress,
                        definition.target,
                        completed_at,
                        now,
                    )
                    .await?;
                let newly_completed = created.is_completed;
                Ok((created, newly_completed))
            }
            // finished rows are frozen, replays never move them
            Some(existing) if existing.is_completed => Ok((existing, false)),
            Some(existing) => {
                let completed_at = (progress >= existing.target).then_some(now);
                let updated = self
                    .repository
                    .update_user_achievement(existing.id, progress, completed_at, now)
                    .await?;
                let newly_completed = updated.is_completed;
                Ok((updated, newly_completed))
            }
        }
    }
}

#[async_trait]
impl AchievementServiceTrait for AchievementService {
    async fn record_activity(
        &self,
        user_id: &str,
        activity: Activity,
    ) -> AppResult<Vec<UserAchievement>> {
        debug!("recording {} for user {}", activity, user_id);
        metrics::counter!("achievement_activities_total", "activity" => activity.as_str())
            .increment(1);

        let mut newly_completed = Vec::new();

        for counter in activity.counters() {
            // a failed count only costs the tiers that depend on it
            let count = match self.repository.count_for(counter, user_id).await {
                Ok(count) => count,
                Err(e) => {
                    error!(
                        "failed to count {:?} for user {}, skipping its achievements: {:?}",
                        counter, user_id, e
                    );
                    continue;
                }
            };

            // every tier is checked, a missed lower tier doesn't stop the higher ones
            for definition in definitions_for(counter) {
                match self.apply_progress(user_id, definition, count).await {
                    Ok((achievement, true)) => {
                        info!(
                            "user {} unlocked {} ({}/{})",
                            user_id,
                            achievement.achievement_type,
                            achievement.progress,
                            achievement.target
                        );
                        metrics::counter!(
                            "achievements_unlocked_total",
                            "type" => definition.achievement_type
                        )
                        .increment(1);
                        newly_completed.push(achievement);
                    }
                    Ok((_, false)) => {}
                    Err(e) => {
                        error!(
                            "failed to update {} for user {}: {:?}",
                            definition.achievement_type, user_id, e
                        );
                    }
                }
            }
        }

        Ok(newly_completed)
    }

    async fn update_progress(
        &self,
        user_id: &str,
        achievement_type: &str,
        progress: i64,
    ) -> AppResult<UserAchievement> {
        if progress < 0 {
            return Err(Error::BadRequest(
                "progress can't be negative".to_string(),
            ));
        }

        let definition = definition(achievement_type).ok_or_else(|| {
            Error::NotFound(format!("achievement '{}' does not exist", achievement_type))
        })?;

        let (achievement, newly_completed) =
            self.apply_progress(user_id, definition, progress).await?;

        if newly_completed {
            info!(
                "user {} completed {} through a direct progress update",
                user_id, achievement_type
            );
        }

        Ok(achievement)
    }

    async fn user_achievements(&self, user_id: &str) -> AppResult<AchievementSummaryResponse> {
        let records = self.repository.get_user_achievements(user_id).await?;

        let achievements: Vec<AchievementResponse> = ACHIEVEMENTS
            .iter()
            .map(|def| {
                records
                    .iter()
                    .find(|r| r.achievement_type == def.achievement_type)
                    .map(|r| AchievementResponse::from_progress(def, r))
                    .unwrap_or_else(|| AchievementResponse::locked(def))
            })
            .collect();

        let completed: Vec<&AchievementResponse> =
            achievements.iter().filter(|a| a.is_completed).collect();

        Ok(AchievementSummaryResponse {
            completed: completed.len(),
            total: achievements.len(),
            total_points: completed.iter().map(|a| a.points).sum(),
            achievements,
        })
    }

    async fn reset_achievement(&self, user_id: &str, achievement_type: &str) -> AppResult<()> {
        let deleted = self
            .repository
            .delete_user_achievement(user_id, achievement_type)
            .await?;

        if !deleted {
            return Err(Error::NotFound(format!(
                "no progress stored for achievement '{}'",
                achievement_type
            )));
        }

        info!("user {} reset achievement {}", user_id, achievement_type);
        Ok(())
    }
}
