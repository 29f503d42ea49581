mod book;
mod catalog;

pub use book::{AchievementBook, ProgressStats};
pub use catalog::{catalog, Achievement, AchievementCategory};
