//! Achievement evaluation and progress.

use chrono::{DateTime, Local, Timelike};
use serde::{Deserialize, Serialize};

use super::catalog::{
    catalog, Achievement, AchievementCategory, EARLY_BIRD, EARLY_BIRD_BEFORE_HOUR, NIGHT_OWL,
    NIGHT_OWL_FROM_HOUR, OVERACHIEVER, OVERACHIEVER_FACTOR,
};
use crate::error::Result;
use crate::storage::{keys, KeyValueStore, StoreExt};

const CHECK_ORDER: [AchievementCategory; 4] = [
    AchievementCategory::Streak,
    AchievementCategory::Total,
    AchievementCategory::Goal,
    AchievementCategory::Special,
];

/// Inputs the rules are evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressStats {
    pub current_streak: u32,
    pub total_glasses: u64,
    pub daily_count: u32,
    pub daily_goal: u32,
    pub goals_met_count: u32,
}

/// The persisted part of an achievement. Anything else in a stored entry
/// is ignored, so catalog text can change without a migration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedProgress {
    id: String,
    #[serde(default)]
    unlocked: bool,
    #[serde(default)]
    unlocked_at: Option<DateTime<Local>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AchievementBook {
    achievements: Vec<Achievement>,
}

impl Default for AchievementBook {
    fn default() -> Self {
        Self::new()
    }
}

impl AchievementBook {
    pub fn new() -> Self {
        Self {
            achievements: catalog(),
        }
    }

    /// Catalog merged with whatever progress the store holds.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let saved: Vec<SavedProgress> = store.load_or(keys::ACHIEVEMENTS, Vec::new());
        let mut book = Self::new();
        book.restore(saved);
        book
    }

    /// Persist the full catalog.
    ///
    /// # Errors
    /// Returns an error if the store write fails.
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<()> {
        store.save(keys::ACHIEVEMENTS, &self.achievements)
    }

    fn restore(&mut self, saved: Vec<SavedProgress>) {
        for progress in saved {
            match self.achievements.iter_mut().find(|a| a.id == progress.id) {
                Some(achievement) => {
                    achievement.unlocked = progress.unlocked;
                    achievement.unlocked_at = progress.unlocked_at;
                }
                None => tracing::debug!(id = %progress.id, "dropping progress for retired achievement"),
            }
        }
    }

    /// Unlock every locked achievement whose rule holds at `now`.
    ///
    /// Returns the newly unlocked entries: streak, then total, then goal,
    /// then special, each in catalog order. Unlocked entries are never
    /// evaluated again. Persisting is left to the caller, which should only
    /// save when the result is non-empty.
    pub fn check(&mut self, stats: &ProgressStats, now: DateTime<Local>) -> Vec<Achievement> {
        let hour = now.hour();
        let mut newly_unlocked = Vec::new();

        for category in CHECK_ORDER {
            for achievement in self
                .achievements
                .iter_mut()
                .filter(|a| a.category == category && !a.unlocked)
            {
                if rule_holds(achievement, stats, hour) {
                    achievement.unlocked = true;
                    achievement.unlocked_at = Some(now);
                    tracing::info!(id = %achievement.id, "achievement unlocked");
                    newly_unlocked.push(achievement.clone());
                }
            }
        }

        newly_unlocked
    }

    pub fn all(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn get(&self, id: &str) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked).count()
    }

    pub fn total_count(&self) -> usize {
        self.achievements.len()
    }

    /// Rounded share of unlocked achievements, 0..=100.
    pub fn progress_percentage(&self) -> u32 {
        if self.achievements.is_empty() {
            return 0;
        }
        (self.unlocked_count() as f64 / self.total_count() as f64 * 100.0).round() as u32
    }
}

fn rule_holds(achievement: &Achievement, stats: &ProgressStats, hour: u32) -> bool {
    let requirement = achievement.requirement;
    match achievement.category {
        AchievementCategory::Streak => stats.current_streak >= requirement,
        AchievementCategory::Total => stats.total_glasses >= u64::from(requirement),
        AchievementCategory::Goal => stats.goals_met_count >= requirement,
        AchievementCategory::Special => match achievement.id.as_str() {
            EARLY_BIRD => hour < EARLY_BIRD_BEFORE_HOUR,
            NIGHT_OWL => hour >= NIGHT_OWL_FROM_HOUR,
            OVERACHIEVER => {
                f64::from(stats.daily_count) >= f64::from(stats.daily_goal) * OVERACHIEVER_FACTOR
            }
            _ => false,
        },
    }
}
