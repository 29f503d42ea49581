use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "hydrate", version, about = "Water reminder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Timer(commands::timer::TimerAction),
    #[command(flatten)]
    Water(commands::water::WaterAction),
    #[command(flatten)]
    Stats(commands::stats::StatsAction),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Run the reminder loop, speaking JSON lines on stdin/stdout
    Serve,
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_env("HYDRATE_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let serving = matches!(cli.command, Commands::Serve);
    init_tracing(if serving { "info" } else { "warn" });

    let result = match cli.command {
        Commands::Timer(action) => commands::timer::run(action),
        Commands::Water(action) => commands::water::run(action),
        Commands::Stats(action) => commands::stats::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Serve => commands::serve::run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
