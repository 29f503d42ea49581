use chrono::Local;
use clap::Subcommand;
use hydrate_core::Intent;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a reminder interval, or resume a paused one
    Start {
        /// Interval length in minutes (defaults to the configured interval)
        #[arg(long, short)]
        minutes: Option<u32>,
    },
    /// Pause the countdown
    Pause,
    /// Resume a paused countdown
    Resume,
    /// Stop the countdown, keeping the remaining time
    Stop,
    /// Stop and re-arm with a full interval
    Reset,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let now = Local::now();
    let mut service = super::open_service(now)?;

    let intent = match action {
        TimerAction::Start { minutes } => Intent::Start { minutes },
        TimerAction::Pause => Intent::Pause,
        TimerAction::Resume => Intent::Resume,
        TimerAction::Stop => Intent::Stop,
        TimerAction::Reset => Intent::Reset,
    };

    super::print_replies(service.handle_intent(intent, now))
}
