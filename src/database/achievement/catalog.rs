use serde::Serialize;

use super::model::AchievementCounter;

/// static description of one achievement tier, progress rows point at these through
/// `achievement_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AchievementDefinition {
    pub achievement_type: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub target: i64,
    pub points: i64,
    pub icon: &'static str,
    #[serde(skip)]
    pub counter: AchievementCounter,
}

pub const FIRST_REVIEW: &str = "first_review";
pub const MOVIE_CRITIC_10: &str = "movie_critic_10";
pub const MOVIE_CRITIC_25: &str = "movie_critic_25";
pub const MOVIE_CRITIC_50: &str = "movie_critic_50";
pub const MOVIE_CRITIC_100: &str = "movie_critic_100";
pub const EARLY_ADOPTER: &str = "early_adopter";
pub const FIRST_COMMENT: &str = "first_comment";
pub const ACTIVE_COMMENTER_10: &str = "active_commenter_10";
pub const ACTIVE_COMMENTER_50: &str = "active_commenter_50";
pub const POPULAR_REVIEWER_10: &str = "popular_reviewer_10";
pub const POPULAR_REVIEWER_50: &str = "popular_reviewer_50";
pub const POPULAR_REVIEWER_100: &str = "popular_reviewer_100";
pub const HELPFUL_REVIEWER_5: &str = "helpful_reviewer_5";
pub const HELPFUL_REVIEWER_25: &str = "helpful_reviewer_25";

const fn tier(
    achievement_type: &'static str,
    name: &'static str,
    description: &'static str,
    target: i64,
    points: i64,
    icon: &'static str,
    counter: AchievementCounter,
) -> AchievementDefinition {
    AchievementDefinition {
        achievement_type,
        name,
        description,
        target,
        points,
        icon,
        counter,
    }
}

/// every achievement there is, in display order
pub static ACHIEVEMENTS: &[AchievementDefinition] = &[
    tier(
        FIRST_REVIEW,
        "First Review",
        "Write your first movie review",
        1,
        10,
        "pen",
        AchievementCounter::Reviews,
    ),
    tier(
        MOVIE_CRITIC_10,
        "Movie Critic",
        "Write 10 movie reviews",
        10,
        25,
        "clapperboard",
        AchievementCounter::Reviews,
    ),
    tier(
        MOVIE_CRITIC_25,
        "Seasoned Critic",
        "Write 25 movie reviews",
        25,
        50,
        "film",
        AchievementCounter::Reviews,
    ),
    tier(
        MOVIE_CRITIC_50,
        "Expert Critic",
        "Write 50 movie reviews",
        50,
        100,
        "award",
        AchievementCounter::Reviews,
    ),
    tier(
        MOVIE_CRITIC_100,
        "Master Critic",
        "Write 100 movie reviews",
        100,
        250,
        "trophy",
        AchievementCounter::Reviews,
    ),
    tier(
        EARLY_ADOPTER,
        "Early Adopter",
        "Review 5 movies before they are released",
        5,
        50,
        "hourglass",
        AchievementCounter::ComingSoonReviews,
    ),
    tier(
        FIRST_COMMENT,
        "Conversation Starter",
        "Post your first comment on a review",
        1,
        10,
        "message",
        AchievementCounter::Comments,
    ),
    tier(
        ACTIVE_COMMENTER_10,
        "Active Commenter",
        "Post 10 comments on reviews",
        10,
        25,
        "messages",
        AchievementCounter::Comments,
    ),
    tier(
        ACTIVE_COMMENTER_50,
        "Community Voice",
        "Post 50 comments on reviews",
        50,
        100,
        "megaphone",
        AchievementCounter::Comments,
    ),
    tier(
        POPULAR_REVIEWER_10,
        "Popular Reviewer",
        "Receive 10 helpful votes on your reviews",
        10,
        25,
        "thumbs-up",
        AchievementCounter::HelpfulVotes,
    ),
    tier(
        POPULAR_REVIEWER_50,
        "Crowd Favorite",
        "Receive 50 helpful votes on your reviews",
        50,
        100,
        "heart",
        AchievementCounter::HelpfulVotes,
    ),
    tier(
        POPULAR_REVIEWER_100,
        "Trusted Voice",
        "Receive 100 helpful votes on your reviews",
        100,
        200,
        "star",
        AchievementCounter::HelpfulVotes,
    ),
    tier(
        HELPFUL_REVIEWER_5,
        "Helpful Reviewer",
        "Have 5 different reviews marked as helpful",
        5,
        25,
        "lightbulb",
        AchievementCounter::HelpfullyVotedReviews,
    ),
    tier(
        HELPFUL_REVIEWER_25,
        "Guiding Light",
        "Have 25 different reviews marked as helpful",
        25,
        100,
        "sun",
        AchievementCounter::HelpfullyVotedReviews,
    ),
];

pub fn definition(achievement_type: &str) -> Option<&'static AchievementDefinition> {
    ACHIEVEMENTS
        .iter()
        .find(|d| d.achievement_type == achievement_type)
}

pub fn definitions_for(
    counter: AchievementCounter,
) -> impl Iterator<Item = &'static AchievementDefinition> {
    ACHIEVEMENTS.iter().filter(move |d| d.counter == counter)
}
