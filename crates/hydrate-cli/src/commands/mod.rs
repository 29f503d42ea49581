pub mod config;
pub mod serve;
pub mod stats;
pub mod timer;
pub mod water;

mod notifier;

use chrono::{DateTime, Local};
use hydrate_core::{Hydration, Outbound};

const WELCOME: &str =
    "💧 Welcome to hydrate! Run `hydrate start` to begin, or `hydrate serve` to keep reminders running.";

/// Open the service over the data directory, greeting first-time users.
pub(crate) fn open_service(now: DateTime<Local>) -> Result<Hydration, Box<dyn std::error::Error>> {
    let mut service = Hydration::open_default(now)?;
    if service.take_welcome() {
        eprintln!("{WELCOME}");
    }
    Ok(service)
}

/// Print replies as pretty JSON. An error reply becomes the command's error.
pub(crate) fn print_replies(replies: Vec<Outbound>) -> Result<(), Box<dyn std::error::Error>> {
    for reply in replies {
        match reply {
            Outbound::Error { message } => return Err(message.into()),
            Outbound::Update(state) => println!("{}", serde_json::to_string_pretty(&state)?),
            other => println!("{}", serde_json::to_string_pretty(&other)?),
        }
    }
    Ok(())
}
