//! Change events and the publish/subscribe bus that carries them.
//!
//! Every state change in the core produces an [`Event`]. The presentation
//! layer and the notifier subscribe once at construction; [`EventBus::close`]
//! unregisters everybody at teardown.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::achievements::Achievement;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Remaining time changed (start, tick, pause, resume, stop, reset).
    TimerUpdated { remaining_seconds: u64 },
    /// Countdown reached zero. Always preceded by a `TimerUpdated` with 0.
    TimerCompleted,
    /// Today's glass count changed, including the reset to zero at rollover.
    DailyCountChanged { daily_count: u32 },
    /// No water logged for a while during waking hours.
    InactivityAlert { inactive_minutes: i64 },
    /// Timer has been idle for a long stretch.
    SmartReminder,
    AchievementUnlocked { achievement: Achievement },
    /// Today's count just crossed the daily goal.
    GoalReached { daily_count: u32, daily_goal: u32 },
}

impl Event {
    /// Short machine name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TimerUpdated { .. } => "timer_updated",
            Event::TimerCompleted => "timer_completed",
            Event::DailyCountChanged { .. } => "daily_count_changed",
            Event::InactivityAlert { .. } => "inactivity_alert",
            Event::SmartReminder => "smart_reminder",
            Event::AchievementUnlocked { .. } => "achievement_unlocked",
            Event::GoalReached { .. } => "goal_reached",
        }
    }
}

pub type SubscriptionId = u64;

type Handler = Box<dyn FnMut(&Event)>;

/// Single-threaded publish/subscribe bus.
///
/// Handlers run synchronously, in subscription order, on the publisher's
/// stack. Once closed the bus drops every handler and ignores further
/// publishes and subscriptions.
#[derive(Default)]
pub struct EventBus {
    next_id: SubscriptionId,
    subscribers: Vec<(SubscriptionId, Handler)>,
    closed: bool,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. Returns `None` if the bus is already closed.
    pub fn subscribe<F>(&mut self, handler: F) -> Option<SubscriptionId>
    where
        F: FnMut(&Event) + 'static,
    {
        if self.closed {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push((id, Box::new(handler)));
        Some(id)
    }

    /// Remove a handler. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn publish(&mut self, event: &Event) {
        if self.closed {
            return;
        }
        tracing::trace!(kind = event.kind(), subscribers = self.subscribers.len(), "publish");
        for (_, handler) in self.subscribers.iter_mut() {
            handler(event);
        }
    }

    /// Drop every subscriber. Idempotent.
    pub fn close(&mut self) {
        self.subscribers.clear();
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("closed", &self.closed)
            .finish()
    }
}
