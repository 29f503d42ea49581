//! # Hydrate Core Library
//!
//! This library provides the core logic for the hydrate water reminder: a
//! countdown that prompts the user to drink, a daily glass counter with
//! streaks and history, and a small achievement catalog. Front ends (the
//! `hydrate` CLI, or anything speaking the JSON line protocol) are thin
//! layers over the same [`Hydration`] service.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A caller-driven state machine; the caller invokes
//!   `tick()` once per second while the timer runs
//! - **Scheduler**: Three cancellable periodic tasks (tick, inactivity poll,
//!   smart-reminder poll) handed back to the caller one at a time
//! - **Tracker**: Logical-day rollover, bounded history, streaks, caffeine
//!   and drinking-hour patterns
//! - **Achievements**: Fixed catalog evaluated after every logged glass
//! - **Storage**: SQLite key-value persistence and TOML configuration
//!
//! ## Key Components
//!
//! - [`Hydration`]: Owns every piece of state; the entry point for front ends
//! - [`TimerEngine`]: Countdown state machine
//! - [`DailyTracker`]: Day rollover and streak bookkeeping
//! - [`AchievementBook`]: Unlock evaluation and progress
//! - [`Intent`] / [`Outbound`]: Messages exchanged with a front end

pub mod achievements;
pub mod error;
pub mod events;
pub mod protocol;
pub mod reminder;
pub mod service;
pub mod storage;
pub mod timer;
pub mod tracker;

pub use achievements::{Achievement, AchievementBook, AchievementCategory, ProgressStats};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::{Event, EventBus, SubscriptionId};
pub use protocol::{Intent, Outbound, StateUpdate, StatsSnapshot};
pub use reminder::{Notifier, Reminder, ReminderResponse, SilentNotifier};
pub use service::{DrinkReport, Hydration};
pub use storage::{Config, Database, KeyValueStore, MemoryStore, SoundType, StoreExt};
pub use timer::{format_time, Scheduler, Task, TimerEngine, TimerState};
pub use tracker::DailyTracker;
