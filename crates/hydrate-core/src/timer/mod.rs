mod engine;
mod scheduler;

pub use engine::{format_time, TimerEngine, TimerState};
pub use scheduler::{Scheduler, Task};
