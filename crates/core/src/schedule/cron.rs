use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use super::ScheduleError;

/// A parsed five-field cron expression: minute, hour, day of month, month
/// and day of week.
///
/// Each field accepts `*`, numbers, ranges `a-b`, lists `a,b` and steps
/// `*/n` or `a-b/n`. Day of week runs from 0 (Sunday) to 6, with 7 also
/// meaning Sunday. When both day fields are restricted a date matches if
/// either of them does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronSchedule {
    expression: String,
    minutes: u64,
    hours: u64,
    days_of_month: u64,
    months: u64,
    days_of_week: u64,
    day_of_month_any: bool,
    day_of_week_any: bool,
}

struct FieldSpec {
    name: &'static str,
    min: u32,
    max: u32,
}

const MINUTE: FieldSpec = FieldSpec { name: "minute", min: 0, max: 59 };
const HOUR: FieldSpec = FieldSpec { name: "hour", min: 0, max: 23 };
const DAY_OF_MONTH: FieldSpec = FieldSpec { name: "day-of-month", min: 1, max: 31 };
const MONTH: FieldSpec = FieldSpec { name: "month", min: 1, max: 12 };
const DAY_OF_WEEK: FieldSpec = FieldSpec { name: "day-of-week", min: 0, max: 7 };

fn bit(value: u32) -> u64 {
    1u64 << value
}

fn parse_field(spec: &FieldSpec, text: &str) -> Result<u64, ScheduleError> {
    let invalid = || ScheduleError::InvalidField {
        field: spec.name,
        value: text.to_string(),
    };
    let number = |s: &str| -> Result<u32, ScheduleError> {
        let n: u32 = s.parse().map_err(|_| invalid())?;
        if n < spec.min || n > spec.max {
            return Err(invalid());
        }
        Ok(n)
    };

    let mut mask = 0u64;
    for part in text.split(',') {
        let (range, step) = match part.split_once('/') {
            Some((range, step)) => {
                let step: u32 = step.parse().map_err(|_| invalid())?;
                if step == 0 {
                    return Err(invalid());
                }
                (range, Some(step))
            }
            None => (part, None),
        };

        let (start, end) = if range == "*" {
            (spec.min, spec.max)
        } else if let Some((a, b)) = range.split_once('-') {
            (number(a)?, number(b)?)
        } else {
            let n = number(range)?;
            // "5/15" means from 5 to the end of the range in steps of 15.
            if step.is_some() {
                (n, spec.max)
            } else {
                (n, n)
            }
        };
        if start > end {
            return Err(invalid());
        }

        let step = step.unwrap_or(1) as usize;
        for value in (start..=end).step_by(step) {
            mask |= bit(value);
        }
    }
    Ok(mask)
}

impl CronSchedule {
    pub fn parse(expression: &str) -> Result<Self, ScheduleError> {
        let fields: Vec<&str> = expression.split_whitespace().collect();
        let &[minute, hour, dom, month, dow] = fields.as_slice() else {
            return Err(ScheduleError::FieldCount(fields.len()));
        };

        let mut days_of_week = parse_field(&DAY_OF_WEEK, dow)?;
        if days_of_week & bit(7) != 0 {
            days_of_week = (days_of_week & !bit(7)) | bit(0);
        }

        Ok(Self {
            expression: fields.join(" "),
            minutes: parse_field(&MINUTE, minute)?,
            hours: parse_field(&HOUR, hour)?,
            days_of_month: parse_field(&DAY_OF_MONTH, dom)?,
            months: parse_field(&MONTH, month)?,
            days_of_week,
            day_of_month_any: dom == "*",
            day_of_week_any: dow == "*",
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Whether the schedule fires on some minute of `date`.
    pub fn matches_date(&self, date: NaiveDate) -> bool {
        if self.months & bit(date.month()) == 0 {
            return false;
        }
        let dom = self.days_of_month & bit(date.day()) != 0;
        let dow = self.days_of_week & bit(date.weekday().num_days_from_sunday()) != 0;
        match (self.day_of_month_any, self.day_of_week_any) {
            (false, false) => dom || dow,
            _ => dom && dow,
        }
    }

    /// Hour and minute pairs the schedule fires at, in ascending order.
    pub fn times_of_day(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..24)
            .filter(|h| self.hours & bit(*h) != 0)
            .flat_map(move |h| {
                (0..60)
                    .filter(|m| self.minutes & bit(*m) != 0)
                    .map(move |m| (h, m))
            })
    }
}

impl FromStr for CronSchedule {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CronSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}
