//! Line protocol between the core and a front end.
//!
//! A front end sends [`Intent`]s and receives [`Outbound`] messages, one
//! JSON object per line, each tagged by `type`:
//!
//! ```text
//! -> {"type":"start","minutes":45}
//! <- {"type":"update","remaining_seconds":2700,"total_seconds":2700,...}
//! <- {"type":"event","event":{"type":"timer_updated","remaining_seconds":2699}}
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::reminder::ReminderResponse;
use crate::storage::SoundType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    /// Start a fresh interval, or resume if paused. `minutes` defaults to
    /// the configured interval.
    Start {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        minutes: Option<u32>,
    },
    Pause,
    Resume,
    Stop,
    Reset,
    LogWater,
    LogCaffeine,
    ChangeInterval { interval_minutes: u32 },
    ChangeGoal { daily_goal: u32 },
    RequestState,
    RequestStats,
    ToggleSound,
    ChangeSoundType { sound_type: SoundType },
    PreviewSound { sound_type: SoundType },
    ResetDailyCount,
    ReminderResponse { response: ReminderResponse },
}

/// Timer, today's progress and settings in one message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateUpdate {
    pub remaining_seconds: u64,
    pub total_seconds: u64,
    /// `remaining_seconds` as `MM:SS`.
    pub remaining_display: String,
    pub is_running: bool,
    pub is_paused: bool,
    pub daily_count: u32,
    pub daily_goal: u32,
    pub interval_minutes: u32,
    pub sound_enabled: bool,
    pub sound_type: SoundType,
    pub caffeine_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_glasses: u64,
    pub goals_met_count: u32,
    pub weekly_average: u32,
    pub weekly_history: BTreeMap<String, u32>,
    pub peak_hours: Vec<u32>,
    pub caffeine_count: u32,
    pub recommended_water: u32,
    pub achievements_unlocked: usize,
    pub achievements_total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    Update(StateUpdate),
    Stats(StatsSnapshot),
    IntervalUpdated { interval_minutes: u32 },
    GoalUpdated { daily_goal: u32 },
    /// Ask the front end to play a sound. Playback is not done here.
    SoundPreview { sound_type: SoundType },
    Error { message: String },
    Event { event: Event },
}

impl From<Event> for Outbound {
    fn from(event: Event) -> Self {
        Outbound::Event { event }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_intents_from_front_end_json() {
        let start: Intent = serde_json::from_str(r#"{"type":"start"}"#).unwrap();
        assert_eq!(start, Intent::Start { minutes: None });

        let start: Intent = serde_json::from_str(r#"{"type":"start","minutes":45}"#).unwrap();
        assert_eq!(start, Intent::Start { minutes: Some(45) });

        let goal: Intent = serde_json::from_str(r#"{"type":"change_goal","daily_goal":10}"#).unwrap();
        assert_eq!(goal, Intent::ChangeGoal { daily_goal: 10 });

        let sound: Intent =
            serde_json::from_str(r#"{"type":"change_sound_type","sound_type":"bell"}"#).unwrap();
        assert_eq!(sound, Intent::ChangeSoundType { sound_type: SoundType::Bell });

        let answer: Intent =
            serde_json::from_str(r#"{"type":"reminder_response","response":"snooze"}"#).unwrap();
        assert_eq!(
            answer,
            Intent::ReminderResponse {
                response: ReminderResponse::Snooze
            }
        );
    }

    #[test]
    fn rejects_unknown_intent() {
        assert!(serde_json::from_str::<Intent>(r#"{"type":"explode"}"#).is_err());
        assert!(serde_json::from_str::<Intent>(r#"{"type":"change_goal"}"#).is_err());
    }

    #[test]
    fn outbound_is_tagged() {
        let msg = Outbound::GoalUpdated { daily_goal: 9 };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"type": "goal_updated", "daily_goal": 9})
        );

        let msg: Outbound = Event::TimerCompleted.into();
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"type": "event", "event": {"type": "timer_completed"}})
        );
    }

    #[test]
    fn update_flattens_state_into_message() {
        let msg = Outbound::Update(StateUpdate {
            remaining_seconds: 90,
            total_seconds: 1800,
            remaining_display: "01:30".into(),
            is_running: true,
            is_paused: false,
            daily_count: 3,
            daily_goal: 8,
            interval_minutes: 30,
            sound_enabled: true,
            sound_type: SoundType::Alarm1,
            caffeine_count: 0,
        });
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "update");
        assert_eq!(value["remaining_display"], "01:30");
        assert_eq!(value["sound_type"], "alarm-1");
    }
}
