//! Reminder policies and the notifier seam.
//!
//! Two polls can nag the user:
//!
//! - [`SmartReminder`] (30-minute poll, always on): fires when the timer is
//!   stopped or paused and 90 minutes have passed since the last reminder.
//! - [`InactivityMonitor`] (60-second poll, off unless `inactivity_alerts`):
//!   fires after an hour without water during waking hours.
//!
//! How a reminder reaches the user is up to the [`Notifier`]; its answer
//! comes back as a [`ReminderResponse`].

use chrono::{DateTime, Duration, Local, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::events::Event;
use crate::protocol::Intent;
use crate::storage::{keys, KeyValueStore, StoreExt};
use crate::tracker::reset_time_on;

pub const SMART_REMINDER_AFTER_MINUTES: i64 = 90;
pub const INACTIVITY_ALERT_AFTER_MINUTES: i64 = 60;
pub const INACTIVITY_REALERT_AFTER_MINUTES: i64 = 90;
/// Sleep hours start here and run until the daily reset hour.
pub const SLEEP_FROM_HOUR: u32 = 23;
pub const SNOOZE_MINUTES: u32 = 5;

/// A prompt the notifier should put in front of the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reminder {
    TimerComplete,
    Smart,
    Inactivity { inactive_minutes: i64 },
}

impl Reminder {
    /// The reminder carried by an event, if any.
    pub fn from_event(event: &Event) -> Option<Reminder> {
        match event {
            Event::TimerCompleted => Some(Reminder::TimerComplete),
            Event::SmartReminder => Some(Reminder::Smart),
            Event::InactivityAlert { inactive_minutes } => Some(Reminder::Inactivity {
                inactive_minutes: *inactive_minutes,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderResponse {
    LogWater,
    Snooze,
    OpenView,
    Dismiss,
}

impl ReminderResponse {
    /// What the core should do about the answer. Opening a view and
    /// dismissing are the front end's business.
    pub fn into_intent(self) -> Option<Intent> {
        match self {
            ReminderResponse::LogWater => Some(Intent::LogWater),
            ReminderResponse::Snooze => Some(Intent::Start {
                minutes: Some(SNOOZE_MINUTES),
            }),
            ReminderResponse::OpenView | ReminderResponse::Dismiss => None,
        }
    }
}

/// Surfaces reminders to the user.
pub trait Notifier {
    /// Show `reminder`. Return the user's answer if it is known right away;
    /// asynchronous answers arrive later as a `reminder_response` intent.
    fn remind(&mut self, reminder: Reminder) -> Option<ReminderResponse>;

    /// Follow the `sound_enabled` setting. Called on attach and on every toggle.
    fn set_sound(&mut self, _enabled: bool) {}
}

/// Notifier that shows nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn remind(&mut self, _reminder: Reminder) -> Option<ReminderResponse> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct SmartReminder {
    last_sent: DateTime<Local>,
}

impl SmartReminder {
    pub fn new(now: DateTime<Local>) -> Self {
        Self { last_sent: now }
    }

    pub fn load<S: KeyValueStore + ?Sized>(store: &S, now: DateTime<Local>) -> Self {
        Self {
            last_sent: store.load_or(keys::LAST_SMART_REMINDER_TIME, now),
        }
    }

    /// # Errors
    /// Returns an error if the store write fails.
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<()> {
        store.save(keys::LAST_SMART_REMINDER_TIME, &self.last_sent)
    }

    pub fn last_sent(&self) -> DateTime<Local> {
        self.last_sent
    }

    /// Push the next reminder out, e.g. because water was just logged.
    pub fn restamp(&mut self, now: DateTime<Local>) {
        self.last_sent = now;
    }

    /// Run the 30-minute check. `timer_idle` is true when the timer is
    /// stopped or paused.
    pub fn poll(&mut self, now: DateTime<Local>, timer_idle: bool) -> Option<Event> {
        if !timer_idle || now - self.last_sent < Duration::minutes(SMART_REMINDER_AFTER_MINUTES) {
            return None;
        }
        self.last_sent = now;
        Some(Event::SmartReminder)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InactivityMonitor {
    alerted_at: Option<DateTime<Local>>,
}

impl InactivityMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alert_shown(&self) -> bool {
        self.alerted_at.is_some()
    }

    /// Forget the last alert, e.g. because water was just logged.
    pub fn clear(&mut self) {
        self.alerted_at = None;
    }

    /// Run the 60-second check.
    pub fn poll(
        &mut self,
        now: DateTime<Local>,
        last_drink: DateTime<Local>,
        reset_hour: u32,
    ) -> Option<Event> {
        let hour = now.hour();
        if hour >= SLEEP_FROM_HOUR || hour < reset_hour {
            self.alerted_at = None;
            return None;
        }

        if let Some(at) = self.alerted_at {
            if now - at >= Duration::minutes(INACTIVITY_REALERT_AFTER_MINUTES) {
                self.alerted_at = None;
            }
        }
        if self.alerted_at.is_some() {
            return None;
        }

        let reset_time = reset_time_on(now, reset_hour);
        let idle_minutes = if last_drink < reset_time {
            // Last drink was before this morning's reset: count from the
            // reset instead, which leaves an hour to wake up.
            (now - reset_time).num_minutes()
        } else {
            (now - last_drink).num_minutes()
        };

        if idle_minutes < INACTIVITY_ALERT_AFTER_MINUTES {
            return None;
        }
        self.alerted_at = Some(now);
        Some(Event::InactivityAlert {
            inactive_minutes: idle_minutes,
        })
    }
}
