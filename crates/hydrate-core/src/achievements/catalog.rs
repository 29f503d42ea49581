//! The fixed achievement catalog.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    /// Consecutive goal days.
    Streak,
    /// Lifetime glasses.
    Total,
    /// Days the goal was met.
    Goal,
    /// One-shot conditions checked against the clock or today's count.
    Special,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub category: AchievementCategory,
    pub requirement: u32,
    pub unlocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<DateTime<Local>>,
}

pub const EARLY_BIRD: &str = "early_bird";
pub const NIGHT_OWL: &str = "night_owl";
pub const OVERACHIEVER: &str = "overachiever";

/// Logging before this hour unlocks the early bird.
pub const EARLY_BIRD_BEFORE_HOUR: u32 = 8;
/// Logging at or after this hour unlocks the night owl.
pub const NIGHT_OWL_FROM_HOUR: u32 = 22;
/// Today's count must reach this multiple of the goal for the overachiever.
pub const OVERACHIEVER_FACTOR: f64 = 1.5;

const CATALOG: [(&str, &str, &str, &str, AchievementCategory, u32); 14] = [
    ("streak_3", "Getting Started", "Maintain 3-day streak", "🔥", AchievementCategory::Streak, 3),
    ("streak_7", "Week Warrior", "Maintain 7-day streak", "⭐", AchievementCategory::Streak, 7),
    ("streak_30", "Monthly Master", "Maintain 30-day streak", "👑", AchievementCategory::Streak, 30),
    ("streak_100", "Century Champion", "Maintain 100-day streak", "💎", AchievementCategory::Streak, 100),
    ("total_50", "First Steps", "Drink 50 glasses total", "💧", AchievementCategory::Total, 50),
    ("total_100", "Hydration Hero", "Drink 100 glasses total", "🌊", AchievementCategory::Total, 100),
    ("total_500", "Water Wizard", "Drink 500 glasses total", "🧙", AchievementCategory::Total, 500),
    ("total_1000", "Legendary Hydrator", "Drink 1000 glasses total", "🏆", AchievementCategory::Total, 1000),
    ("goal_7", "Consistent", "Meet daily goal 7 times", "🎯", AchievementCategory::Goal, 7),
    ("goal_30", "Dedicated", "Meet daily goal 30 times", "🌟", AchievementCategory::Goal, 30),
    ("goal_100", "Unstoppable", "Meet daily goal 100 times", "⚡", AchievementCategory::Goal, 100),
    (EARLY_BIRD, "Early Bird", "Start hydration before 8 AM", "🌅", AchievementCategory::Special, 1),
    (NIGHT_OWL, "Night Owl", "Drink water after 10 PM", "🌙", AchievementCategory::Special, 1),
    (OVERACHIEVER, "Overachiever", "Exceed daily goal by 50%", "🚀", AchievementCategory::Special, 1),
];

/// Every achievement, locked, in catalog order.
pub fn catalog() -> Vec<Achievement> {
    CATALOG
        .iter()
        .map(|(id, title, description, icon, category, requirement)| Achievement {
            id: (*id).to_string(),
            title: (*title).to_string(),
            description: (*description).to_string(),
            icon: (*icon).to_string(),
            category: *category,
            requirement: *requirement,
            unlocked: false,
            unlocked_at: None,
        })
        .collect()
}
