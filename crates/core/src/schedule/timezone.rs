use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use super::{CronSchedule, ScheduleError};

/// How far ahead `next_fire` searches before giving up.
const LOOKAHEAD_DAYS: u64 = 366 * 5;

/// A cron schedule anchored to an IANA timezone.
#[derive(Debug, Clone)]
pub struct Schedule {
    cron: CronSchedule,
    timezone: Tz,
}

impl Schedule {
    pub fn new(expression: &str, timezone: &str) -> Result<Self, ScheduleError> {
        let cron = CronSchedule::parse(expression)?;
        let timezone = timezone
            .parse::<Tz>()
            .map_err(|_| ScheduleError::UnknownTimezone(timezone.to_string()))?;
        Ok(Self { cron, timezone })
    }

    pub fn cron(&self) -> &CronSchedule {
        &self.cron
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// The calendar date at `at` in the schedule's timezone.
    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.timezone).date_naive()
    }

    /// The first fire time strictly after `after`.
    ///
    /// Local times skipped by a DST change never fire; repeated local times
    /// fire once, at their earlier instant.
    pub fn next_fire(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let start = self.local_date(after);
        (0..=LOOKAHEAD_DAYS)
            .filter_map(|offset| start.checked_add_days(Days::new(offset)))
            .filter(|date| self.cron.matches_date(*date))
            .find_map(|date| {
                self.cron.times_of_day().find_map(|(hour, minute)| {
                    let local = date.and_hms_opt(hour, minute, 0)?;
                    let fire = self
                        .timezone
                        .from_local_datetime(&local)
                        .earliest()?
                        .with_timezone(&Utc);
                    (fire > after).then_some(fire)
                })
            })
    }
}
