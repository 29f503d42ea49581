//! Daily counter, rollover, streaks and derived statistics.
//!
//! Everything that depends on "today" calls [`DailyTracker::check_and_reset_daily`]
//! first. The check is a no-op within a logical day, so it can run before
//! every read and write.

use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};

use super::day::{day_key, logical_day, parse_day_key};
use crate::error::Result;
use crate::storage::{keys, KeyValueStore, StoreExt};

/// Days kept in the history map.
pub const HISTORY_DAYS: usize = 30;
/// Samples kept in the work pattern.
pub const WORK_PATTERN_CAP: usize = 100;
/// Extra glasses recommended per caffeinated drink.
pub const WATER_PER_CAFFEINE: u32 = 2;

/// Drinks logged during one hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourSample {
    pub hour: u32,
    pub drinks: u32,
}

/// What happened at a day boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rollover {
    /// Key of the day that just ended.
    pub ended_day: String,
    pub ended_count: u32,
    pub goal_met: bool,
    /// Logical days between the ended day and today.
    pub days_elapsed: i64,
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// Result of logging one glass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrinkOutcome {
    pub daily_count: u32,
    /// True only on the drink that crosses the goal.
    pub goal_reached: bool,
    pub rollover: Option<Rollover>,
}

#[derive(Debug, Clone)]
pub struct DailyTracker {
    reset_hour: u32,
    daily_count: u32,
    last_reset_date: String,
    weekly_history: BTreeMap<String, u32>,
    total_glasses_all_time: u64,
    current_streak: u32,
    longest_streak: u32,
    goals_met_count: u32,
    caffeine_count: u32,
    last_caffeine_time: Option<DateTime<Local>>,
    last_drink_time: DateTime<Local>,
    work_pattern: Vec<HourSample>,
}

impl DailyTracker {
    /// Fresh tracker whose current day is the logical day of `now`.
    pub fn new(now: DateTime<Local>, reset_hour: u32) -> Self {
        Self {
            reset_hour,
            daily_count: 0,
            last_reset_date: day_key(logical_day(now, reset_hour)),
            weekly_history: BTreeMap::new(),
            total_glasses_all_time: 0,
            current_streak: 0,
            longest_streak: 0,
            goals_met_count: 0,
            caffeine_count: 0,
            last_caffeine_time: None,
            last_drink_time: now,
            work_pattern: Vec::new(),
        }
    }

    /// Load from the store, defaulting each missing or malformed field
    /// independently. Does not roll over; call `check_and_reset_daily`.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, now: DateTime<Local>, reset_hour: u32) -> Self {
        let fresh = Self::new(now, reset_hour);
        Self {
            reset_hour,
            daily_count: store.load_or(keys::DAILY_COUNT, fresh.daily_count),
            last_reset_date: store.load_or(keys::LAST_RESET_DATE, fresh.last_reset_date),
            weekly_history: store.load_or(keys::WEEKLY_HISTORY, fresh.weekly_history),
            total_glasses_all_time: store
                .load_or(keys::TOTAL_GLASSES_ALL_TIME, fresh.total_glasses_all_time),
            current_streak: store.load_or(keys::CURRENT_STREAK, fresh.current_streak),
            longest_streak: store.load_or(keys::LONGEST_STREAK, fresh.longest_streak),
            goals_met_count: store.load_or(keys::GOALS_MET_COUNT, fresh.goals_met_count),
            caffeine_count: store.load_or(keys::CAFFEINE_COUNT, fresh.caffeine_count),
            last_caffeine_time: store.load_or(keys::LAST_CAFFEINE_TIME, fresh.last_caffeine_time),
            last_drink_time: store.load_or(keys::LAST_DRINK_TIME, fresh.last_drink_time),
            work_pattern: store.load_or(keys::WORK_PATTERN_DATA, fresh.work_pattern),
        }
    }

    /// Write every field under its flat key.
    ///
    /// # Errors
    /// Returns the first store write that fails.
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<()> {
        store.save(keys::DAILY_COUNT, &self.daily_count)?;
        store.save(keys::LAST_RESET_DATE, &self.last_reset_date)?;
        store.save(keys::WEEKLY_HISTORY, &self.weekly_history)?;
        store.save(keys::TOTAL_GLASSES_ALL_TIME, &self.total_glasses_all_time)?;
        store.save(keys::CURRENT_STREAK, &self.current_streak)?;
        store.save(keys::LONGEST_STREAK, &self.longest_streak)?;
        store.save(keys::GOALS_MET_COUNT, &self.goals_met_count)?;
        store.save(keys::CAFFEINE_COUNT, &self.caffeine_count)?;
        store.save(keys::LAST_CAFFEINE_TIME, &self.last_caffeine_time)?;
        store.save(keys::LAST_DRINK_TIME, &self.last_drink_time)?;
        store.save(keys::WORK_PATTERN_DATA, &self.work_pattern)?;
        Ok(())
    }

    pub fn reset_hour(&self) -> u32 {
        self.reset_hour
    }

    /// Key of the logical day `now` falls into.
    pub fn today_key(&self, now: DateTime<Local>) -> String {
        day_key(logical_day(now, self.reset_hour))
    }

    /// Roll over to the logical day of `now` if it differs from the stored
    /// day: archive the ended day, settle the streak, trim history, zero the
    /// daily and caffeine counters. Returns `None` within the same day.
    pub fn check_and_reset_daily(&mut self, now: DateTime<Local>, daily_goal: u32) -> Option<Rollover> {
        let today = logical_day(now, self.reset_hour);
        let today_key = day_key(today);
        if self.last_reset_date == today_key {
            return None;
        }

        let ended_day = std::mem::replace(&mut self.last_reset_date, today_key);
        let ended_count = self.daily_count;
        if ended_count > 0 {
            self.weekly_history.insert(ended_day.clone(), ended_count);
        }

        let days_elapsed = days_between(&ended_day, today);
        let goal_met = ended_count >= daily_goal.max(1);
        if goal_met {
            self.current_streak += 1;
            self.longest_streak = self.longest_streak.max(self.current_streak);
        } else {
            self.current_streak = 0;
        }
        // Days skipped entirely had no glasses.
        if days_elapsed > 1 {
            self.current_streak = 0;
        }

        while self.weekly_history.len() > HISTORY_DAYS {
            self.weekly_history.pop_first();
        }

        self.daily_count = 0;
        self.caffeine_count = 0;

        tracing::info!(
            ended_day = %ended_day,
            ended_count,
            goal_met,
            days_elapsed,
            current_streak = self.current_streak,
            "daily rollover"
        );

        Some(Rollover {
            ended_day,
            ended_count,
            goal_met,
            days_elapsed,
            current_streak: self.current_streak,
            longest_streak: self.longest_streak,
        })
    }

    /// Log one glass of water.
    pub fn drank_water(&mut self, now: DateTime<Local>, daily_goal: u32) -> DrinkOutcome {
        let rollover = self.check_and_reset_daily(now, daily_goal);

        let previous = self.daily_count;
        self.daily_count += 1;
        self.total_glasses_all_time += 1;
        self.last_drink_time = now;
        self.record_hour(now.hour());

        let goal_reached = previous < daily_goal && self.daily_count >= daily_goal;
        if goal_reached {
            self.goals_met_count += 1;
        }

        DrinkOutcome {
            daily_count: self.daily_count,
            goal_reached,
            rollover,
        }
    }

    fn record_hour(&mut self, hour: u32) {
        match self.work_pattern.iter_mut().find(|s| s.hour == hour) {
            Some(sample) => sample.drinks += 1,
            None => self.work_pattern.push(HourSample { hour, drinks: 1 }),
        }
        if self.work_pattern.len() > WORK_PATTERN_CAP {
            self.work_pattern.remove(0);
        }
    }

    /// Log one caffeinated drink. Returns today's caffeine count.
    pub fn log_caffeine(&mut self, now: DateTime<Local>, daily_goal: u32) -> (u32, Option<Rollover>) {
        let rollover = self.check_and_reset_daily(now, daily_goal);
        self.caffeine_count += 1;
        self.last_caffeine_time = Some(now);
        (self.caffeine_count, rollover)
    }

    /// Zero today's count without archiving it.
    pub fn reset_daily_count(&mut self, now: DateTime<Local>) {
        self.daily_count = 0;
        self.last_reset_date = self.today_key(now);
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Today's count as stored. Callers that need it to be current should
    /// run `check_and_reset_daily` first.
    pub fn daily_count(&self) -> u32 {
        self.daily_count
    }

    pub fn last_reset_date(&self) -> &str {
        &self.last_reset_date
    }

    pub fn weekly_history(&self) -> &BTreeMap<String, u32> {
        &self.weekly_history
    }

    pub fn total_glasses_all_time(&self) -> u64 {
        self.total_glasses_all_time
    }

    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    pub fn longest_streak(&self) -> u32 {
        self.longest_streak
    }

    pub fn goals_met_count(&self) -> u32 {
        self.goals_met_count
    }

    pub fn caffeine_count(&self) -> u32 {
        self.caffeine_count
    }

    pub fn last_caffeine_time(&self) -> Option<DateTime<Local>> {
        self.last_caffeine_time
    }

    pub fn last_drink_time(&self) -> DateTime<Local> {
        self.last_drink_time
    }

    pub fn work_pattern(&self) -> &[HourSample] {
        &self.work_pattern
    }

    pub fn recommended_water_for_caffeine(&self) -> u32 {
        self.caffeine_count * WATER_PER_CAFFEINE
    }

    pub fn inactive_minutes(&self, now: DateTime<Local>) -> i64 {
        (now - self.last_drink_time).num_minutes()
    }

    /// Mean glasses per archived day, rounded; 0 with no history.
    pub fn weekly_average(&self) -> u32 {
        if self.weekly_history.is_empty() {
            return 0;
        }
        let sum: u64 = self.weekly_history.values().map(|v| u64::from(*v)).sum();
        (sum as f64 / self.weekly_history.len() as f64).round() as u32
    }

    /// Up to three hours with the most drinks, busiest first. Ties go to
    /// the earlier hour.
    pub fn peak_hydration_hours(&self) -> Vec<u32> {
        let mut by_hour: BTreeMap<u32, u32> = BTreeMap::new();
        for sample in &self.work_pattern {
            *by_hour.entry(sample.hour).or_default() += sample.drinks;
        }
        let mut ranked: Vec<(u32, u32)> = by_hour.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.into_iter().take(3).map(|(hour, _)| hour).collect()
    }
}

/// Logical days from `ended` to `today`. Unparseable keys count as one day.
fn days_between(ended: &str, today: NaiveDate) -> i64 {
    match parse_day_key(ended) {
        Some(day) => (today - day).num_days(),
        None => {
            tracing::warn!(key = ended, "unrecognised day key");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::{Days, NaiveDate};
    use proptest::prelude::*;

    /// Local time on the `offset`-th day after 2024-01-01.
    fn day_at(offset: u64, hour: u32, minute: u32) -> DateTime<Local> {
        (NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Days::new(offset))
            .and_hms_opt(hour, minute, 0)
            .unwrap()
            .and_local_timezone(Local)
            .unwrap()
    }

    fn drink_n(tracker: &mut DailyTracker, n: u32, now: DateTime<Local>, goal: u32) {
        for _ in 0..n {
            tracker.drank_water(now, goal);
        }
    }

    #[test]
    fn rollover_is_idempotent_within_a_day() {
        let mut t = DailyTracker::new(day_at(0, 10, 0), 5);
        drink_n(&mut t, 8, day_at(0, 10, 0), 8);

        assert!(t.check_and_reset_daily(day_at(1, 9, 0), 8).is_some());
        assert!(t.check_and_reset_daily(day_at(1, 9, 0), 8).is_none());
        assert!(t.check_and_reset_daily(day_at(1, 23, 0), 8).is_none());
        assert!(t.check_and_reset_daily(day_at(2, 4, 59), 8).is_none());

        assert_eq!(t.weekly_history().len(), 1);
        assert_eq!(t.current_streak(), 1);
    }

    #[test]
    fn rollover_archives_and_zeroes_counters() {
        let mut t = DailyTracker::new(day_at(0, 10, 0), 5);
        drink_n(&mut t, 3, day_at(0, 10, 0), 8);
        t.log_caffeine(day_at(0, 11, 0), 8);

        let rollover = t.check_and_reset_daily(day_at(1, 6, 0), 8).unwrap();
        assert_eq!(rollover.ended_day, "2024-01-01");
        assert_eq!(rollover.ended_count, 3);
        assert!(!rollover.goal_met);
        assert_eq!(t.weekly_history().get("2024-01-01"), Some(&3));
        assert_eq!(t.daily_count(), 0);
        assert_eq!(t.caffeine_count(), 0);
        assert_eq!(t.last_reset_date(), "2024-01-02");
    }

    #[test]
    fn early_morning_drink_counts_toward_previous_day() {
        let mut t = DailyTracker::new(day_at(0, 10, 0), 5);
        drink_n(&mut t, 2, day_at(0, 22, 0), 8);
        let outcome = t.drank_water(day_at(1, 4, 30), 8);
        assert!(outcome.rollover.is_none());
        assert_eq!(outcome.daily_count, 3);
    }

    #[test]
    fn empty_day_is_not_archived_but_breaks_streak() {
        let mut t = DailyTracker::new(day_at(0, 10, 0), 5);
        drink_n(&mut t, 8, day_at(0, 10, 0), 8);
        t.check_and_reset_daily(day_at(1, 10, 0), 8);
        assert_eq!(t.current_streak(), 1);

        let rollover = t.check_and_reset_daily(day_at(2, 10, 0), 8).unwrap();
        assert!(!rollover.goal_met);
        assert_eq!(t.current_streak(), 0);
        assert_eq!(t.longest_streak(), 1);
        assert!(!t.weekly_history().contains_key("2024-01-02"));
    }

    #[test]
    fn skipped_days_break_streak() {
        let mut t = DailyTracker::new(day_at(0, 10, 0), 5);
        drink_n(&mut t, 8, day_at(0, 10, 0), 8);
        let rollover = t.check_and_reset_daily(day_at(3, 10, 0), 8).unwrap();
        assert!(rollover.goal_met);
        assert_eq!(rollover.days_elapsed, 3);
        assert_eq!(t.current_streak(), 0);
        assert_eq!(t.longest_streak(), 1);
    }

    #[test]
    fn goal_reached_fires_once_on_crossing() {
        let mut t = DailyTracker::new(day_at(0, 10, 0), 5);
        drink_n(&mut t, 7, day_at(0, 10, 0), 8);
        assert!(t.drank_water(day_at(0, 11, 0), 8).goal_reached);
        assert!(!t.drank_water(day_at(0, 12, 0), 8).goal_reached);
        assert_eq!(t.goals_met_count(), 1);
        assert_eq!(t.daily_count(), 9);
    }

    #[test]
    fn history_keeps_thirty_most_recent_days() {
        let mut t = DailyTracker::new(day_at(0, 10, 0), 5);
        for day in 0..31 {
            t.drank_water(day_at(day, 10, 0), 8);
        }
        t.check_and_reset_daily(day_at(31, 10, 0), 8);

        assert_eq!(t.weekly_history().len(), HISTORY_DAYS);
        assert!(!t.weekly_history().contains_key("2024-01-01"));
        assert!(t.weekly_history().contains_key("2024-01-02"));
        assert!(t.weekly_history().contains_key("2024-01-31"));
    }

    #[test]
    fn caffeine_recommendation_is_two_glasses_each() {
        let mut t = DailyTracker::new(day_at(0, 10, 0), 5);
        for _ in 0..3 {
            t.log_caffeine(day_at(0, 9, 0), 8);
        }
        assert_eq!(t.caffeine_count(), 3);
        assert_eq!(t.recommended_water_for_caffeine(), 6);
    }

    #[test]
    fn peak_hours_rank_by_drinks_then_hour() {
        let mut t = DailyTracker::new(day_at(0, 6, 0), 5);
        drink_n(&mut t, 1, day_at(0, 8, 0), 20);
        drink_n(&mut t, 3, day_at(0, 14, 0), 20);
        drink_n(&mut t, 2, day_at(0, 10, 0), 20);
        drink_n(&mut t, 2, day_at(0, 9, 0), 20);
        assert_eq!(t.peak_hydration_hours(), vec![14, 9, 10]);
    }

    #[test]
    fn work_pattern_merges_same_hour() {
        let mut t = DailyTracker::new(day_at(0, 6, 0), 5);
        drink_n(&mut t, 2, day_at(0, 9, 0), 8);
        drink_n(&mut t, 1, day_at(0, 9, 45), 8);
        assert_eq!(t.work_pattern(), &[HourSample { hour: 9, drinks: 3 }]);
    }

    #[test]
    fn weekly_average_rounds() {
        let mut t = DailyTracker::new(day_at(0, 10, 0), 5);
        assert_eq!(t.weekly_average(), 0);
        drink_n(&mut t, 5, day_at(0, 10, 0), 8);
        drink_n(&mut t, 6, day_at(1, 10, 0), 8);
        t.check_and_reset_daily(day_at(2, 10, 0), 8);
        // (5 + 6) / 2 = 5.5
        assert_eq!(t.weekly_average(), 6);
    }

    #[test]
    fn reset_daily_count_zeroes_without_archiving() {
        let mut t = DailyTracker::new(day_at(0, 10, 0), 5);
        drink_n(&mut t, 4, day_at(0, 10, 0), 8);
        t.reset_daily_count(day_at(0, 12, 0));
        assert_eq!(t.daily_count(), 0);
        assert!(t.weekly_history().is_empty());
        assert_eq!(t.total_glasses_all_time(), 4);
    }

    #[test]
    fn save_and_load_round_trip() {
        let store = MemoryStore::new();
        let mut t = DailyTracker::new(day_at(0, 10, 0), 5);
        drink_n(&mut t, 8, day_at(0, 10, 0), 8);
        t.check_and_reset_daily(day_at(1, 10, 0), 8);
        t.drank_water(day_at(1, 11, 0), 8);
        t.log_caffeine(day_at(1, 11, 30), 8);
        t.save(&store).unwrap();

        let loaded = DailyTracker::load(&store, day_at(1, 12, 0), 5);
        assert_eq!(loaded.daily_count(), 1);
        assert_eq!(loaded.current_streak(), 1);
        assert_eq!(loaded.total_glasses_all_time(), 9);
        assert_eq!(loaded.caffeine_count(), 1);
        assert_eq!(loaded.weekly_history(), t.weekly_history());
        assert_eq!(loaded.work_pattern(), t.work_pattern());
        assert_eq!(loaded.last_drink_time(), day_at(1, 11, 0));
    }

    #[test]
    fn load_from_empty_store_uses_defaults() {
        let store = MemoryStore::new();
        let t = DailyTracker::load(&store, day_at(4, 3, 0), 5);
        assert_eq!(t.daily_count(), 0);
        assert_eq!(t.last_reset_date(), "2024-01-04");
        assert!(t.weekly_history().is_empty());
    }

    fn trailing_run(counts: &[u32], goal: u32) -> u32 {
        counts.iter().rev().take_while(|c| **c >= goal).count() as u32
    }

    proptest! {
        #[test]
        fn streak_equals_trailing_run_of_goal_days(
            counts in prop::collection::vec(0u32..6, 1..25),
            goal in 1u32..5,
        ) {
            let mut t = DailyTracker::new(day_at(0, 12, 0), 5);
            for (day, count) in counts.iter().enumerate() {
                drink_n(&mut t, *count, day_at(day as u64, 12, 0), goal);
            }
            t.check_and_reset_daily(day_at(counts.len() as u64, 12, 0), goal);

            prop_assert_eq!(t.current_streak(), trailing_run(&counts, goal));
            prop_assert!(t.longest_streak() >= t.current_streak());
        }

        #[test]
        fn history_never_exceeds_bound(days in 1u64..70) {
            let mut t = DailyTracker::new(day_at(0, 12, 0), 5);
            for day in 0..days {
                t.drank_water(day_at(day, 12, 0), 8);
                prop_assert!(t.weekly_history().len() <= HISTORY_DAYS);
            }
        }
    }
}
