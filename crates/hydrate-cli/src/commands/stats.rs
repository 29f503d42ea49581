use chrono::Local;
use clap::Subcommand;
use hydrate_core::{format_time, TimerState};

const BAR_WIDTH: u32 = 20;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Timer and today's progress
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Streaks, totals and drinking patterns
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Glasses per day for the archived days
    History,
    /// Achievement catalog and progress
    Achievements {
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let service = super::open_service(Local::now())?;

    match action {
        StatsAction::Status { json } => {
            let state = service.state_snapshot();
            if json {
                println!("{}", serde_json::to_string_pretty(&state)?);
                return Ok(());
            }
            let timer = match service.timer().state() {
                TimerState::Running => "running",
                TimerState::Paused => "paused",
                TimerState::Stopped => "stopped",
            };
            println!(
                "Timer:    {timer} {} / {}",
                state.remaining_display,
                format_time(state.total_seconds)
            );
            println!("Today:    {}/{} glasses", state.daily_count, state.daily_goal);
            println!("Caffeine: {}", state.caffeine_count);
        }
        StatsAction::Stats { json } => {
            let stats = service.stats_snapshot();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
                return Ok(());
            }
            println!("Current streak:  {} days", stats.current_streak);
            println!("Longest streak:  {} days", stats.longest_streak);
            println!("Total glasses:   {}", stats.total_glasses);
            println!("Goals met:       {}", stats.goals_met_count);
            println!("Daily average:   {}", stats.weekly_average);
            let peaks: Vec<String> = stats.peak_hours.iter().map(|h| format!("{h:02}:00")).collect();
            println!(
                "Peak hours:      {}",
                if peaks.is_empty() { "-".to_string() } else { peaks.join(", ") }
            );
            println!(
                "Caffeine today:  {} (drink {} extra)",
                stats.caffeine_count, stats.recommended_water
            );
            println!(
                "Achievements:    {}/{}",
                stats.achievements_unlocked, stats.achievements_total
            );
        }
        StatsAction::History => {
            let goal = service.config().daily_goal;
            let history = service.tracker().weekly_history();
            if history.is_empty() {
                println!("no history yet");
                return Ok(());
            }
            for (day, count) in history {
                let filled = (*count).min(goal) * BAR_WIDTH / goal.max(1);
                let mark = if *count >= goal { "✓" } else { " " };
                println!(
                    "{day}  {count:>3} {mark} {}",
                    "█".repeat(filled as usize)
                );
            }
        }
        StatsAction::Achievements { json } => {
            let book = service.achievements();
            if json {
                println!("{}", serde_json::to_string_pretty(book.all())?);
                return Ok(());
            }
            for a in book.all() {
                let mark = if a.unlocked { "x" } else { " " };
                println!("[{mark}] {} {:<20} {}", a.icon, a.title, a.description);
            }
            println!(
                "{}/{} unlocked ({}%)",
                book.unlocked_count(),
                book.total_count(),
                book.progress_percentage()
            );
        }
    }
    Ok(())
}
