use hydrate_core::{Notifier, Reminder, ReminderResponse};
use rand::seq::SliceRandom;

const NUDGES: [&str; 10] = [
    "Your brain is mostly water. Top it up.",
    "Thirsty code is buggy code. Grab a glass.",
    "Feeling foggy? Try water before another coffee.",
    "Your kidneys have been working all day. Send them some water.",
    "Hydration check: when did you last drink?",
    "A glass of water is the cheapest focus boost there is.",
    "Afternoon slump? It might just be thirst.",
    "Coolant levels low. Please refill H2O.",
    "Small sips add up. Have one now.",
    "Future you says thanks for the water.",
];

/// Writes reminders to the log. Answers come back later over stdin.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    sound: bool,
}

impl ConsoleNotifier {
    fn nudge() -> &'static str {
        NUDGES
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(NUDGES[0])
    }
}

impl Notifier for ConsoleNotifier {
    fn remind(&mut self, reminder: Reminder) -> Option<ReminderResponse> {
        match reminder {
            Reminder::TimerComplete => {
                tracing::info!("💧 Time to drink water! Log it, or snooze for 5 minutes.");
            }
            Reminder::Smart => {
                tracing::info!("💧 Friendly reminder: {}", Self::nudge());
            }
            Reminder::Inactivity { inactive_minutes } => {
                tracing::info!(inactive_minutes, "⏰ {}", Self::nudge());
            }
        }
        if self.sound {
            // Terminal bell.
            eprint!("\x07");
        }
        None
    }

    fn set_sound(&mut self, enabled: bool) {
        self.sound = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bell_follows_sound_setting() {
        let mut notifier = ConsoleNotifier::default();
        assert!(!notifier.sound);
        notifier.set_sound(true);
        assert!(notifier.sound);
        assert_eq!(notifier.remind(Reminder::Smart), None);
        notifier.set_sound(false);
        assert!(!notifier.sound);
    }
}
