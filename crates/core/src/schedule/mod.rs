//! Cron-style schedules evaluated in a named timezone.

mod cron;
mod error;
mod timezone;

pub use cron::CronSchedule;
pub use error::ScheduleError;
pub use timezone::Schedule;
