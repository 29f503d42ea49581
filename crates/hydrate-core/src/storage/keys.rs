//! Flat key names of the persisted snapshot.

pub const REMAINING_SECONDS: &str = "remainingSeconds";
pub const TOTAL_SECONDS: &str = "totalSeconds";
pub const IS_RUNNING: &str = "isRunning";
pub const IS_PAUSED: &str = "isPaused";

pub const DAILY_COUNT: &str = "dailyCount";
pub const LAST_RESET_DATE: &str = "lastResetDate";
pub const LAST_DRINK_TIME: &str = "lastDrinkTime";
pub const WEEKLY_HISTORY: &str = "weeklyHistory";
pub const TOTAL_GLASSES_ALL_TIME: &str = "totalGlassesAllTime";
pub const CURRENT_STREAK: &str = "currentStreak";
pub const LONGEST_STREAK: &str = "longestStreak";
pub const GOALS_MET_COUNT: &str = "goalsMetCount";
pub const CAFFEINE_COUNT: &str = "caffeineCount";
pub const LAST_CAFFEINE_TIME: &str = "lastCaffeineTime";
pub const WORK_PATTERN_DATA: &str = "workPatternData";

pub const LAST_SMART_REMINDER_TIME: &str = "lastSmartReminderTime";
pub const ACHIEVEMENTS: &str = "achievements";
pub const HAS_SHOWN_WELCOME: &str = "hasShownWelcome";
