mod daily;
mod day;

pub use daily::{
    DailyTracker, DrinkOutcome, HourSample, Rollover, HISTORY_DAYS, WATER_PER_CAFFEINE,
    WORK_PATTERN_CAP,
};
pub use day::{day_key, logical_day, parse_day_key, reset_time_on};
