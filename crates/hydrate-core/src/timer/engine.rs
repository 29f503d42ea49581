//! Countdown timer engine.
//!
//! The engine is a plain state machine with no internal thread. The caller
//! (the service's scheduler) invokes `tick()` once per second while
//! [`TimerEngine::is_ticking`] is true.
//!
//! ## State Transitions
//!
//! ```text
//! Stopped -> Running <-> Paused
//! Running | Paused -> Stopped   (stop, reset, or completion)
//! ```
//!
//! Every command returns the events it produced; nothing is emitted for
//! no-op commands.

use serde::{Deserialize, Serialize};

use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Stopped,
    Running,
    Paused,
}

/// Countdown state.
///
/// Invariants: `is_paused` implies `is_running`, and
/// `remaining_seconds <= total_seconds`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerEngine {
    remaining_seconds: u64,
    total_seconds: u64,
    is_running: bool,
    is_paused: bool,
}

impl TimerEngine {
    /// A stopped timer armed with `minutes`.
    pub fn new(minutes: u32) -> Self {
        let total = minutes_to_seconds(minutes);
        Self {
            remaining_seconds: total,
            total_seconds: total,
            is_running: false,
            is_paused: false,
        }
    }

    /// Rebuild from persisted fields, repairing anything that breaks the
    /// invariants. A zero total (never started) re-arms with `default_minutes`.
    pub fn restore(
        remaining_seconds: u64,
        total_seconds: u64,
        is_running: bool,
        is_paused: bool,
        default_minutes: u32,
    ) -> Self {
        if total_seconds == 0 {
            return Self::new(default_minutes);
        }
        Self {
            remaining_seconds: remaining_seconds.min(total_seconds),
            total_seconds,
            is_running,
            is_paused: is_paused && is_running,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        match (self.is_running, self.is_paused) {
            (false, _) => TimerState::Stopped,
            (true, false) => TimerState::Running,
            (true, true) => TimerState::Paused,
        }
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    /// Whether the once-per-second tick should be armed.
    pub fn is_ticking(&self) -> bool {
        self.is_running && !self.is_paused
    }

    /// Whether the timer is stopped or paused.
    pub fn is_idle(&self) -> bool {
        !self.is_ticking()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a fresh interval, discarding whatever was left of the old one.
    pub fn start(&mut self, minutes: u32) -> Event {
        self.total_seconds = minutes_to_seconds(minutes);
        self.remaining_seconds = self.total_seconds;
        self.is_running = true;
        self.is_paused = false;
        self.update_event()
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.is_running || self.is_paused {
            return None;
        }
        self.is_paused = true;
        Some(self.update_event())
    }

    pub fn resume(&mut self) -> Option<Event> {
        if !self.is_running || !self.is_paused {
            return None;
        }
        self.is_paused = false;
        Some(self.update_event())
    }

    /// Clear the running and paused flags; remaining time is kept.
    pub fn stop(&mut self) -> Event {
        self.is_running = false;
        self.is_paused = false;
        self.update_event()
    }

    /// Stop and re-arm with a full interval of `minutes`.
    pub fn reset(&mut self, minutes: u32) -> Event {
        self.is_running = false;
        self.is_paused = false;
        self.total_seconds = minutes_to_seconds(minutes);
        self.remaining_seconds = self.total_seconds;
        self.update_event()
    }

    /// Re-arm a stopped timer with a new interval. Running or paused
    /// timers are left alone.
    pub fn update_interval(&mut self, minutes: u32) -> Option<Event> {
        if self.is_running {
            return None;
        }
        self.total_seconds = minutes_to_seconds(minutes);
        self.remaining_seconds = self.total_seconds;
        Some(self.update_event())
    }

    /// Advance one second.
    ///
    /// Returns `[TimerUpdated]` on an ordinary tick and
    /// `[TimerUpdated, TimerCompleted]` on the tick that reaches zero, after
    /// which the timer is stopped. Does nothing unless ticking.
    pub fn tick(&mut self) -> Vec<Event> {
        if !self.is_ticking() {
            return Vec::new();
        }
        if self.remaining_seconds == 0 {
            // Restored mid-completion; finish without decrementing.
            self.is_running = false;
            self.is_paused = false;
            return vec![Event::TimerCompleted];
        }

        self.remaining_seconds -= 1;
        let mut events = vec![self.update_event()];
        if self.remaining_seconds == 0 {
            self.is_running = false;
            self.is_paused = false;
            events.push(Event::TimerCompleted);
        }
        events
    }

    fn update_event(&self) -> Event {
        Event::TimerUpdated {
            remaining_seconds: self.remaining_seconds,
        }
    }
}

fn minutes_to_seconds(minutes: u32) -> u64 {
    u64::from(minutes.max(1)) * 60
}

/// Render seconds as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
