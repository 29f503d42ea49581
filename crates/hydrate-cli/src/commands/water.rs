use chrono::Local;
use clap::Subcommand;

#[derive(Subcommand)]
pub enum WaterAction {
    /// Log a glass of water
    Drink,
    /// Log a caffeinated drink
    Caffeine,
    /// Zero today's glass count without archiving it
    ResetDay,
}

pub fn run(action: WaterAction) -> Result<(), Box<dyn std::error::Error>> {
    let now = Local::now();
    let mut service = super::open_service(now)?;

    match action {
        WaterAction::Drink => {
            let report = service.drank_water(now);
            if report.goal_reached {
                println!(
                    "🎉 Daily goal reached! ({}/{})",
                    report.daily_count, report.daily_goal
                );
            } else {
                println!("💧 Water logged: {}/{}", report.daily_count, report.daily_goal);
            }
            for achievement in &report.new_achievements {
                println!(
                    "🏆 Achievement unlocked: {} {} ({})",
                    achievement.icon, achievement.title, achievement.description
                );
            }
            if report.timer_started {
                println!(
                    "⏱  Next reminder in {} minutes",
                    service.config().interval_minutes
                );
            }
        }
        WaterAction::Caffeine => {
            let count = service.log_caffeine(now);
            println!(
                "☕ Caffeine logged. Today: {count} cup(s). Recommended: {} extra glasses of water.",
                service.tracker().recommended_water_for_caffeine()
            );
        }
        WaterAction::ResetDay => {
            service.reset_daily_count(now);
            println!("today's count reset to 0");
        }
    }
    Ok(())
}
