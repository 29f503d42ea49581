//! Long-running reminder loop.
//!
//! Reads one JSON intent per line from stdin and writes one JSON message per
//! line to stdout: replies to intents, plus every core event as it happens.
//! Stops on EOF or Ctrl-C.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::Local;
use hydrate_core::{Hydration, Intent, Outbound};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};

use super::notifier::ConsoleNotifier;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(serve());
    // A pending stdin read would otherwise hold up shutdown.
    runtime.shutdown_background();
    result
}

async fn serve() -> Result<(), Box<dyn std::error::Error>> {
    let mut service = super::open_service(Local::now())?.with_notifier(ConsoleNotifier::default());

    let outbox: Rc<RefCell<Vec<Outbound>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&outbox);
    service.subscribe(move |event| sink.borrow_mut().push(Outbound::from(event.clone())));

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    tracing::info!(armed = ?service.scheduler().armed(), "serving");
    write_message(&mut stdout, &Outbound::Update(service.state_snapshot())).await?;

    loop {
        let replies = tokio::select! {
            Some(task) = service.next_task() => {
                service.run_task(task, Local::now());
                Vec::new()
            }
            line = lines.next_line() => match line? {
                Some(line) => handle_line(&mut service, &line),
                None => {
                    tracing::info!("stdin closed, shutting down");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("received Ctrl-C, shutting down");
                break;
            }
        };

        let events: Vec<Outbound> = outbox.borrow_mut().drain(..).collect();
        for message in events.iter().chain(&replies) {
            write_message(&mut stdout, message).await?;
        }
    }

    service.dispose();
    stdout.flush().await?;
    Ok(())
}

fn handle_line(service: &mut Hydration, line: &str) -> Vec<Outbound> {
    let line = line.trim();
    if line.is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Intent>(line) {
        Ok(intent) => service.handle_intent(intent, Local::now()),
        Err(e) => {
            tracing::warn!(error = %e, "rejected intent");
            vec![Outbound::Error {
                message: format!("invalid intent: {e}"),
            }]
        }
    }
}

async fn write_message(stdout: &mut Stdout, message: &Outbound) -> Result<(), Box<dyn std::error::Error>> {
    let mut json = serde_json::to_string(message)?;
    json.push('\n');
    stdout.write_all(json.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}
