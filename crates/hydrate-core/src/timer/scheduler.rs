//! Periodic task scheduler.
//!
//! Three independent periodic tasks drive the core: the countdown tick
//! (1 s), the inactivity poll (60 s) and the smart-reminder poll (30 min).
//! The scheduler does not run anything itself; `next()` waits for whichever
//! armed task is due and hands it back to the caller, which handles it
//! synchronously. Everything stays on one thread.
//!
//! Intervals are created lazily on the first `next()` after arming, so a
//! scheduler can be armed and cancelled outside a tokio runtime.

use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    Tick,
    InactivityPoll,
    SmartReminderPoll,
}

impl Task {
    pub const ALL: [Task; 3] = [Task::Tick, Task::InactivityPoll, Task::SmartReminderPoll];

    pub fn default_period(self) -> Duration {
        match self {
            Task::Tick => Duration::from_secs(1),
            Task::InactivityPoll => Duration::from_secs(60),
            Task::SmartReminderPoll => Duration::from_secs(30 * 60),
        }
    }
}

#[derive(Debug)]
struct Periodic {
    period: Duration,
    armed: bool,
    interval: Option<Interval>,
}

impl Periodic {
    fn new(period: Duration) -> Self {
        Self {
            period,
            armed: false,
            interval: None,
        }
    }

    /// Arm, restarting the phase: the first firing is one period from the
    /// next poll.
    fn arm(&mut self) {
        self.armed = true;
        self.interval = None;
    }

    fn cancel(&mut self) {
        self.armed = false;
        self.interval = None;
    }

    async fn wait(&mut self) {
        if !self.armed {
            std::future::pending::<()>().await;
        }
        let period = self.period;
        let interval = self.interval.get_or_insert_with(|| {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        interval.tick().await;
    }
}

#[derive(Debug)]
pub struct Scheduler {
    tick: Periodic,
    inactivity: Periodic,
    smart_reminder: Periodic,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::with_periods(
            Task::Tick.default_period(),
            Task::InactivityPoll.default_period(),
            Task::SmartReminderPoll.default_period(),
        )
    }

    pub fn with_periods(tick: Duration, inactivity: Duration, smart_reminder: Duration) -> Self {
        Self {
            tick: Periodic::new(tick),
            inactivity: Periodic::new(inactivity),
            smart_reminder: Periodic::new(smart_reminder),
        }
    }

    fn slot(&self, task: Task) -> &Periodic {
        match task {
            Task::Tick => &self.tick,
            Task::InactivityPoll => &self.inactivity,
            Task::SmartReminderPoll => &self.smart_reminder,
        }
    }

    fn slot_mut(&mut self, task: Task) -> &mut Periodic {
        match task {
            Task::Tick => &mut self.tick,
            Task::InactivityPoll => &mut self.inactivity,
            Task::SmartReminderPoll => &mut self.smart_reminder,
        }
    }

    pub fn arm(&mut self, task: Task) {
        tracing::debug!(?task, "arm");
        self.slot_mut(task).arm();
    }

    pub fn cancel(&mut self, task: Task) {
        if self.is_armed(task) {
            tracing::debug!(?task, "cancel");
        }
        self.slot_mut(task).cancel();
    }

    pub fn cancel_all(&mut self) {
        for task in Task::ALL {
            self.cancel(task);
        }
    }

    pub fn is_armed(&self, task: Task) -> bool {
        self.slot(task).armed
    }

    pub fn armed(&self) -> Vec<Task> {
        Task::ALL.into_iter().filter(|t| self.is_armed(*t)).collect()
    }

    /// Wait for the next due task. Returns `None` immediately when nothing
    /// is armed. Cancel-safe: dropping the future loses no firing.
    pub async fn next(&mut self) -> Option<Task> {
        if self.armed().is_empty() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.tick.wait() => Some(Task::Tick),
            _ = self.inactivity.wait() => Some(Task::InactivityPoll),
            _ = self.smart_reminder.wait() => Some(Task::SmartReminderPoll),
        }
    }
}
