//! Countdown Timer
//!
//! Counts down to the end of the day a fixed number of days from page load.
//! The deadline is fixed when the timer starts.

use chrono::{DateTime, Days, Local, TimeZone};
use gloo_timers::callback::Interval;
use web_sys::Element;

use crate::config::CountdownConfig;
use crate::dom;
use crate::error::UiResult;

const MS_PER_SECOND: i64 = 1000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Time left, split into the four display slots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Remaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Remaining {
    fn from_millis(distance: i64) -> Self {
        Self {
            days: distance / MS_PER_DAY,
            hours: distance % MS_PER_DAY / MS_PER_HOUR,
            minutes: distance % MS_PER_HOUR / MS_PER_MINUTE,
            seconds: distance % MS_PER_MINUTE / MS_PER_SECOND,
        }
    }

    /// Zero-padded days, hours, minutes, seconds
    pub fn slots(&self) -> [String; 4] {
        [self.days, self.hours, self.minutes, self.seconds].map(|v| format!("{v:02}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    target_ms: i64,
}

impl Countdown {
    /// Deadline at 23:59:59.999 local time, `days` after `now`
    pub fn starting_at<Tz: TimeZone>(now: &DateTime<Tz>, days: u32) -> Self {
        let fallback = now.timestamp_millis() + i64::from(days) * MS_PER_DAY;
        let target_ms = now
            .date_naive()
            .checked_add_days(Days::new(u64::from(days)))
            .and_then(|date| date.and_hms_milli_opt(23, 59, 59, 999))
            .and_then(|naive| now.timezone().from_local_datetime(&naive).latest())
            .map(|target| target.timestamp_millis())
            .unwrap_or(fallback);
        Self { target_ms }
    }

    pub fn target_ms(&self) -> i64 {
        self.target_ms
    }

    /// `None` once the deadline has passed
    pub fn remaining(&self, now_ms: i64) -> Option<Remaining> {
        let distance = self.target_ms - now_ms;
        (distance >= 0).then(|| Remaining::from_millis(distance))
    }

    #[cfg(test)]
    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.remaining(now_ms).is_none()
    }
}

/// Number elements of the `.countdown-item` slots
struct CountdownView {
    numbers: Vec<Element>,
}

impl CountdownView {
    fn render(&self, remaining: Option<Remaining>) {
        match remaining {
            Some(remaining) => {
                for (number, value) in self.numbers.iter().zip(remaining.slots()) {
                    number.set_text_content(Some(&value));
                }
            }
            None => {
                for number in &self.numbers {
                    number.set_text_content(Some("00"));
                }
            }
        }
    }
}

pub struct CountdownBinding {
    _interval: Interval,
}

impl CountdownBinding {
    pub fn attach(config: CountdownConfig) -> UiResult<Option<Self>> {
        let doc = dom::document()?;
        let numbers: Vec<Element> = dom::query_all(&doc, ".countdown-item")
            .iter()
            .filter_map(|item| dom::query_in(item, ".countdown-number"))
            .collect();
        if numbers.is_empty() {
            log::debug!("[COUNTDOWN] no countdown slots");
            return Ok(None);
        }

        let countdown = Countdown::starting_at(&Local::now(), config.days);
        log::debug!("[COUNTDOWN] deadline at {} ms", countdown.target_ms());
        let view = CountdownView { numbers };
        view.render(countdown.remaining(Local::now().timestamp_millis()));
        let interval = Interval::new(config.tick_ms, move || {
            view.render(countdown.remaining(Local::now().timestamp_millis()));
        });
        Ok(Some(Self { _interval: interval }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_target_is_end_of_day_seven_days_out() {
        let countdown = Countdown::starting_at(&utc("2026-10-18T09:30:00Z"), 7);
        assert_eq!(countdown.target_ms(), utc("2026-10-25T23:59:59.999Z").timestamp_millis());
    }

    #[test]
    fn test_remaining_splits_fields() {
        let start = utc("2026-10-18T09:30:00Z");
        let countdown = Countdown::starting_at(&start, 7);
        let remaining = countdown.remaining(start.timestamp_millis()).unwrap();
        assert_eq!(
            remaining,
            Remaining {
                days: 7,
                hours: 14,
                minutes: 29,
                seconds: 59,
            }
        );
        assert_eq!(remaining.slots(), ["07", "14", "29", "59"].map(String::from));
    }

    #[test]
    fn test_same_instant_renders_identically() {
        let start = utc("2026-10-18T09:30:00Z");
        let countdown = Countdown::starting_at(&start, 7);
        let now = utc("2026-10-20T12:00:00Z").timestamp_millis();
        assert_eq!(countdown.remaining(now), countdown.remaining(now));
        assert_eq!(countdown, Countdown::starting_at(&start, 7));
    }

    #[test]
    fn test_expired_after_deadline() {
        let countdown = Countdown::starting_at(&utc("2026-10-18T09:30:00Z"), 7);
        let after = utc("2026-10-26T00:00:00Z").timestamp_millis();
        assert!(countdown.is_expired(after));
        assert_eq!(countdown.remaining(countdown.target_ms()), Some(Remaining::default()));
    }
}
