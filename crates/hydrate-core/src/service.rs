//! The hydration service: one object owning every piece of core state.
//!
//! Front ends construct a [`Hydration`] once, subscribe to its events, feed
//! it intents and scheduler tasks, and call [`Hydration::dispose`] at
//! teardown. Every mutation is written through to the store before the call
//! returns; store failures are logged and otherwise ignored.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::achievements::{Achievement, AchievementBook, ProgressStats};
use crate::error::{Result, ValidationError};
use crate::events::{Event, EventBus, SubscriptionId};
use crate::protocol::{Intent, Outbound, StateUpdate, StatsSnapshot};
use crate::reminder::{
    InactivityMonitor, Notifier, Reminder, ReminderResponse, SilentNotifier, SmartReminder,
};
use crate::storage::{
    check_range, keys, Config, Database, KeyValueStore, SoundType, StoreExt, GOAL_RANGE,
    INTERVAL_RANGE,
};
use crate::timer::{format_time, Scheduler, Task, TimerEngine};
use crate::tracker::DailyTracker;

/// What logging one glass did.
#[derive(Debug, Clone, PartialEq)]
pub struct DrinkReport {
    pub daily_count: u32,
    pub daily_goal: u32,
    /// True only on the glass that crossed the goal.
    pub goal_reached: bool,
    pub new_achievements: Vec<Achievement>,
    /// Whether the glass started a fresh timer interval.
    pub timer_started: bool,
    /// Whether a new logical day began before the glass was counted.
    pub rolled_over: bool,
}

pub struct Hydration {
    config: Config,
    config_path: Option<PathBuf>,
    store: Box<dyn KeyValueStore>,
    timer: TimerEngine,
    tracker: DailyTracker,
    book: AchievementBook,
    smart: SmartReminder,
    inactivity: InactivityMonitor,
    scheduler: Scheduler,
    bus: EventBus,
    notifier: Box<dyn Notifier>,
    welcome_shown: bool,
    disposed: bool,
}

impl Hydration {
    /// Load every piece of state from `store`, settle a pending day
    /// rollover and arm the scheduler.
    ///
    /// Nothing here fails: missing or malformed values fall back to their
    /// defaults. A timer that was ticking when last saved resumes ticking.
    pub fn open<S>(store: S, config: Config, now: DateTime<Local>) -> Self
    where
        S: KeyValueStore + 'static,
    {
        let store: Box<dyn KeyValueStore> = Box::new(store);
        let timer = TimerEngine::restore(
            store.load_or(keys::REMAINING_SECONDS, 0),
            store.load_or(keys::TOTAL_SECONDS, 0),
            store.load_or(keys::IS_RUNNING, false),
            store.load_or(keys::IS_PAUSED, false),
            config.interval_minutes,
        );
        let tracker = DailyTracker::load(store.as_ref(), now, config.daily_reset_hour);
        let book = AchievementBook::load(store.as_ref());
        let smart = SmartReminder::load(store.as_ref(), now);
        let welcome_shown = store.load_or(keys::HAS_SHOWN_WELCOME, false);

        let mut service = Self {
            config,
            config_path: None,
            store,
            timer,
            tracker,
            book,
            smart,
            inactivity: InactivityMonitor::new(),
            scheduler: Scheduler::new(),
            bus: EventBus::new(),
            notifier: Box::new(SilentNotifier),
            welcome_shown,
            disposed: false,
        };

        service.roll_over(now);
        if service.timer.is_ticking() {
            service.scheduler.arm(Task::Tick);
        }
        service.scheduler.arm(Task::SmartReminderPoll);
        if service.config.inactivity_alerts {
            service.scheduler.arm(Task::InactivityPoll);
        }

        tracing::info!(
            state = ?service.timer.state(),
            remaining = service.timer.remaining_seconds(),
            daily_count = service.tracker.daily_count(),
            "hydration service opened"
        );
        service
    }

    /// Open against the data directory: `config.toml` and `hydrate.db`.
    ///
    /// # Errors
    /// Returns an error if the config file is invalid or the database
    /// cannot be opened.
    pub fn open_default(now: DateTime<Local>) -> Result<Self> {
        let config_path = Config::path()?;
        let config = Config::load_from(&config_path)?;
        let db = Database::open()?;
        Ok(Self::open(db, config, now).with_config_path(config_path))
    }

    /// Save settings changes made through intents to `path`.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self.notifier.set_sound(self.config.sound_enabled);
        self
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn timer(&self) -> &TimerEngine {
        &self.timer
    }

    pub fn tracker(&self) -> &DailyTracker {
        &self.tracker
    }

    pub fn achievements(&self) -> &AchievementBook {
        &self.book
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    // ── Events ───────────────────────────────────────────────────────

    pub fn subscribe<F>(&mut self, handler: F) -> Option<SubscriptionId>
    where
        F: FnMut(&Event) + 'static,
    {
        self.bus.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    fn publish(&mut self, event: Event) {
        self.bus.publish(&event);
    }

    /// Publish, and hand reminder events to the notifier. An immediate
    /// answer is applied on the spot.
    fn deliver(&mut self, event: Event, now: DateTime<Local>) {
        self.bus.publish(&event);
        if self.disposed {
            return;
        }
        let Some(reminder) = Reminder::from_event(&event) else {
            return;
        };
        tracing::info!(?reminder, "reminder");
        if let Some(response) = self.notifier.remind(reminder) {
            self.respond(response, now);
        }
    }

    // ── Timer ────────────────────────────────────────────────────────

    /// Start a fresh interval of `minutes`, or the configured interval.
    pub fn start(&mut self, minutes: Option<u32>, now: DateTime<Local>) {
        self.roll_over(now);
        let minutes = minutes.unwrap_or(self.config.interval_minutes);
        let event = self.timer.start(minutes);
        self.arm(Task::Tick);
        self.persist_timer();
        tracing::info!(minutes, "timer started");
        self.publish(event);
    }

    pub fn pause(&mut self) {
        if let Some(event) = self.timer.pause() {
            self.scheduler.cancel(Task::Tick);
            self.persist_timer();
            tracing::info!(remaining = self.timer.remaining_seconds(), "timer paused");
            self.publish(event);
        }
    }

    pub fn resume(&mut self) {
        if let Some(event) = self.timer.resume() {
            self.arm(Task::Tick);
            self.persist_timer();
            tracing::info!(remaining = self.timer.remaining_seconds(), "timer resumed");
            self.publish(event);
        }
    }

    pub fn stop(&mut self) {
        let event = self.timer.stop();
        self.scheduler.cancel(Task::Tick);
        self.persist_timer();
        tracing::info!("timer stopped");
        self.publish(event);
    }

    /// Stop and re-arm with the configured interval.
    pub fn reset(&mut self) {
        let event = self.timer.reset(self.config.interval_minutes);
        self.scheduler.cancel(Task::Tick);
        self.persist_timer();
        tracing::info!("timer reset");
        self.publish(event);
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self, now: DateTime<Local>) {
        let events = self.timer.tick();
        if events.is_empty() {
            return;
        }
        if !self.timer.is_ticking() {
            self.scheduler.cancel(Task::Tick);
            tracing::info!("timer completed");
        }
        self.persist_timer();
        for event in events {
            self.deliver(event, now);
        }
    }

    /// Change the configured interval. A ticking timer restarts with the
    /// new length; a stopped one is re-armed; a paused one keeps its
    /// remaining time.
    ///
    /// # Errors
    /// Returns an error if `minutes` is outside the accepted range.
    pub fn change_interval(&mut self, minutes: u32, now: DateTime<Local>) -> Result<(), ValidationError> {
        check_range("interval_minutes", minutes, INTERVAL_RANGE)?;
        self.config.interval_minutes = minutes;
        self.persist_config();

        if self.timer.is_ticking() {
            self.start(Some(minutes), now);
        } else if let Some(event) = self.timer.update_interval(minutes) {
            self.persist_timer();
            self.publish(event);
        }
        Ok(())
    }

    // ── Tracking ─────────────────────────────────────────────────────

    /// Settle a pending day boundary. Returns whether one was crossed.
    pub fn roll_over(&mut self, now: DateTime<Local>) -> bool {
        match self.tracker.check_and_reset_daily(now, self.config.daily_goal) {
            Some(_) => {
                self.persist_tracker();
                self.publish(Event::DailyCountChanged { daily_count: 0 });
                true
            }
            None => false,
        }
    }

    /// Log one glass of water.
    ///
    /// Publishes the new count, goal-reached when the goal is crossed and
    /// any achievement unlocks, then starts a fresh interval when
    /// `auto_start` is on or the timer was not ticking.
    pub fn drank_water(&mut self, now: DateTime<Local>) -> DrinkReport {
        let daily_goal = self.config.daily_goal;
        let outcome = self.tracker.drank_water(now, daily_goal);
        self.smart.restamp(now);
        self.inactivity.clear();
        self.persist_tracker();
        self.persist_smart_reminder();
        tracing::info!(daily_count = outcome.daily_count, daily_goal, "water logged");

        if outcome.rollover.is_some() {
            self.publish(Event::DailyCountChanged { daily_count: 0 });
        }
        self.publish(Event::DailyCountChanged {
            daily_count: outcome.daily_count,
        });
        if outcome.goal_reached {
            self.publish(Event::GoalReached {
                daily_count: outcome.daily_count,
                daily_goal,
            });
        }

        let new_achievements = self.book.check(&self.progress_stats(), now);
        if !new_achievements.is_empty() {
            if let Err(e) = self.book.save(self.store.as_ref()) {
                tracing::error!(error = %e, "failed to persist achievements");
            }
            for achievement in &new_achievements {
                self.publish(Event::AchievementUnlocked {
                    achievement: achievement.clone(),
                });
            }
        }

        let timer_started = self.config.auto_start || self.timer.is_idle();
        if timer_started {
            self.start(None, now);
        }

        DrinkReport {
            daily_count: outcome.daily_count,
            daily_goal,
            goal_reached: outcome.goal_reached,
            new_achievements,
            timer_started,
            rolled_over: outcome.rollover.is_some(),
        }
    }

    /// Log one caffeinated drink. Returns today's caffeine count.
    pub fn log_caffeine(&mut self, now: DateTime<Local>) -> u32 {
        let (count, rollover) = self.tracker.log_caffeine(now, self.config.daily_goal);
        self.persist_tracker();
        if rollover.is_some() {
            self.publish(Event::DailyCountChanged { daily_count: 0 });
        }
        tracing::info!(caffeine_count = count, "caffeine logged");
        count
    }

    /// Change the daily goal. Past days and today's count are untouched;
    /// subscribers get the current count again so they can redraw.
    ///
    /// # Errors
    /// Returns an error if `goal` is outside the accepted range.
    pub fn set_daily_goal(&mut self, goal: u32) -> Result<(), ValidationError> {
        check_range("daily_goal", goal, GOAL_RANGE)?;
        self.config.daily_goal = goal;
        self.persist_config();
        self.publish(Event::DailyCountChanged {
            daily_count: self.tracker.daily_count(),
        });
        Ok(())
    }

    /// Zero today's count without touching history or streaks.
    pub fn reset_daily_count(&mut self, now: DateTime<Local>) {
        self.tracker.reset_daily_count(now);
        self.persist_tracker();
        tracing::info!("daily count reset");
        self.publish(Event::DailyCountChanged { daily_count: 0 });
    }

    fn progress_stats(&self) -> ProgressStats {
        ProgressStats {
            current_streak: self.tracker.current_streak(),
            total_glasses: self.tracker.total_glasses_all_time(),
            daily_count: self.tracker.daily_count(),
            daily_goal: self.config.daily_goal,
            goals_met_count: self.tracker.goals_met_count(),
        }
    }

    // ── Settings ─────────────────────────────────────────────────────

    pub fn toggle_sound(&mut self) -> bool {
        self.config.sound_enabled = !self.config.sound_enabled;
        self.notifier.set_sound(self.config.sound_enabled);
        self.persist_config();
        self.config.sound_enabled
    }

    pub fn set_sound_type(&mut self, sound_type: SoundType) {
        self.config.sound_type = sound_type;
        self.persist_config();
    }

    /// Turn the 60-second inactivity poll on or off.
    pub fn set_inactivity_alerts(&mut self, enabled: bool) {
        self.config.inactivity_alerts = enabled;
        self.persist_config();
        if enabled {
            self.arm(Task::InactivityPoll);
        } else {
            self.scheduler.cancel(Task::InactivityPoll);
            self.inactivity.clear();
        }
    }

    /// Whether the one-time welcome is still due. Marks it shown.
    pub fn take_welcome(&mut self) -> bool {
        if self.welcome_shown {
            return false;
        }
        self.welcome_shown = true;
        if let Err(e) = self.store.save(keys::HAS_SHOWN_WELCOME, &true) {
            tracing::error!(error = %e, "failed to persist welcome flag");
        }
        true
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    /// Apply one intent and return the messages to send back.
    pub fn handle_intent(&mut self, intent: Intent, now: DateTime<Local>) -> Vec<Outbound> {
        tracing::debug!(?intent, "intent");
        self.roll_over(now);

        match intent {
            // A bare start continues a paused countdown; an explicit length
            // always begins a fresh interval.
            Intent::Start { minutes: None } if self.timer.is_paused() => self.resume(),
            Intent::Start { minutes } => self.start(minutes, now),
            Intent::Pause => self.pause(),
            Intent::Resume => self.resume(),
            Intent::Stop => self.stop(),
            Intent::Reset => self.reset(),
            Intent::LogWater => {
                self.drank_water(now);
            }
            Intent::LogCaffeine => {
                self.log_caffeine(now);
            }
            Intent::ChangeInterval { interval_minutes } => {
                return match self.change_interval(interval_minutes, now) {
                    Ok(()) => vec![
                        Outbound::IntervalUpdated { interval_minutes },
                        Outbound::Update(self.state_snapshot()),
                    ],
                    Err(e) => vec![Outbound::Error { message: e.to_string() }],
                };
            }
            Intent::ChangeGoal { daily_goal } => {
                return match self.set_daily_goal(daily_goal) {
                    Ok(()) => vec![
                        Outbound::GoalUpdated { daily_goal },
                        Outbound::Update(self.state_snapshot()),
                    ],
                    Err(e) => vec![Outbound::Error { message: e.to_string() }],
                };
            }
            Intent::RequestState => {}
            Intent::RequestStats => return vec![Outbound::Stats(self.stats_snapshot())],
            Intent::ToggleSound => {
                self.toggle_sound();
            }
            Intent::ChangeSoundType { sound_type } => self.set_sound_type(sound_type),
            Intent::PreviewSound { sound_type } => return vec![Outbound::SoundPreview { sound_type }],
            Intent::ResetDailyCount => self.reset_daily_count(now),
            Intent::ReminderResponse { response } => {
                return match response.into_intent() {
                    Some(intent) => self.handle_intent(intent, now),
                    None => Vec::new(),
                };
            }
        }

        vec![Outbound::Update(self.state_snapshot())]
    }

    fn respond(&mut self, response: ReminderResponse, now: DateTime<Local>) {
        tracing::debug!(?response, "reminder answered");
        if let Some(intent) = response.into_intent() {
            self.handle_intent(intent, now);
        }
    }

    /// Handle one firing of a scheduler task.
    pub fn run_task(&mut self, task: Task, now: DateTime<Local>) {
        match task {
            Task::Tick => self.tick(now),
            Task::InactivityPoll => {
                if !self.config.inactivity_alerts {
                    return;
                }
                self.roll_over(now);
                let event = self.inactivity.poll(
                    now,
                    self.tracker.last_drink_time(),
                    self.config.daily_reset_hour,
                );
                if let Some(event) = event {
                    self.deliver(event, now);
                }
            }
            Task::SmartReminderPoll => {
                self.roll_over(now);
                if let Some(event) = self.smart.poll(now, self.timer.is_idle()) {
                    self.persist_smart_reminder();
                    self.deliver(event, now);
                }
            }
        }
    }

    fn arm(&mut self, task: Task) {
        if !self.disposed {
            self.scheduler.arm(task);
        }
    }

    /// Wait for the next scheduler task. `None` once nothing is armed.
    pub async fn next_task(&mut self) -> Option<Task> {
        self.scheduler.next().await
    }

    // ── Snapshots ────────────────────────────────────────────────────

    pub fn state_snapshot(&self) -> StateUpdate {
        StateUpdate {
            remaining_seconds: self.timer.remaining_seconds(),
            total_seconds: self.timer.total_seconds(),
            remaining_display: format_time(self.timer.remaining_seconds()),
            is_running: self.timer.is_running(),
            is_paused: self.timer.is_paused(),
            daily_count: self.tracker.daily_count(),
            daily_goal: self.config.daily_goal,
            interval_minutes: self.config.interval_minutes,
            sound_enabled: self.config.sound_enabled,
            sound_type: self.config.sound_type,
            caffeine_count: self.tracker.caffeine_count(),
        }
    }

    pub fn stats_snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            current_streak: self.tracker.current_streak(),
            longest_streak: self.tracker.longest_streak(),
            total_glasses: self.tracker.total_glasses_all_time(),
            goals_met_count: self.tracker.goals_met_count(),
            weekly_average: self.tracker.weekly_average(),
            weekly_history: self.tracker.weekly_history().clone(),
            peak_hours: self.tracker.peak_hydration_hours(),
            caffeine_count: self.tracker.caffeine_count(),
            recommended_water: self.tracker.recommended_water_for_caffeine(),
            achievements_unlocked: self.book.unlocked_count(),
            achievements_total: self.book.total_count(),
        }
    }

    // ── Teardown ─────────────────────────────────────────────────────

    /// Cancel every scheduled task and drop every subscriber. Idempotent.
    /// State stays readable and operations still persist, but nothing is
    /// published any more.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.scheduler.cancel_all();
        self.bus.close();
        self.disposed = true;
        tracing::info!("hydration service disposed");
    }

    // ── Persistence ──────────────────────────────────────────────────

    fn persist_timer(&self) {
        let store = self.store.as_ref();
        let result = store
            .save(keys::REMAINING_SECONDS, &self.timer.remaining_seconds())
            .and_then(|()| store.save(keys::TOTAL_SECONDS, &self.timer.total_seconds()))
            .and_then(|()| store.save(keys::IS_RUNNING, &self.timer.is_running()))
            .and_then(|()| store.save(keys::IS_PAUSED, &self.timer.is_paused()));
        if let Err(e) = result {
            tracing::error!(error = %e, "failed to persist timer");
        }
    }

    fn persist_tracker(&self) {
        if let Err(e) = self.tracker.save(self.store.as_ref()) {
            tracing::error!(error = %e, "failed to persist daily tracker");
        }
    }

    fn persist_smart_reminder(&self) {
        if let Err(e) = self.smart.save(self.store.as_ref()) {
            tracing::error!(error = %e, "failed to persist smart reminder time");
        }
    }

    fn persist_config(&self) {
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(e) = self.config.save_to(path) {
            tracing::error!(error = %e, "failed to save config");
        }
    }
}

impl Drop for Hydration {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Hydration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hydration")
            .field("config", &self.config)
            .field("timer", &self.timer)
            .field("daily_count", &self.tracker.daily_count())
            .field("scheduler", &self.scheduler)
            .field("bus", &self.bus)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}
