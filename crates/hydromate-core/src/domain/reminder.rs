use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A daily reminder window: fire every `interval_minutes` from `start`
/// through `end`.
///
/// Construction is the validation boundary: `start` must be strictly
/// before `end` and the interval at least one minute. Deserialized values
/// go through the same checks, so a `Reminder` in hand is always valid.
/// Absence of a reminder (None at the store level) means reminders are
/// disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawReminder", into = "RawReminder")]
pub struct Reminder {
    start: NaiveTime,
    end: NaiveTime,
    interval_minutes: u32,
}

impl Reminder {
    pub fn new(
        start: NaiveTime,
        end: NaiveTime,
        interval_minutes: u32,
    ) -> Result<Reminder, ValidationError> {
        if start >= end {
            return Err(ValidationError::InvalidTimeRange { start, end });
        }
        if interval_minutes < 1 {
            return Err(ValidationError::InvalidValue {
                field: "interval_minutes".to_string(),
                message: "interval must be at least one minute".to_string(),
            });
        }
        Ok(Reminder {
            start,
            end,
            interval_minutes,
        })
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn interval_minutes(&self) -> u32 {
        self.interval_minutes
    }
}

/// Serde mirror of [`Reminder`] without the invariants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawReminder {
    start: NaiveTime,
    end: NaiveTime,
    interval_minutes: u32,
}

impl TryFrom<RawReminder> for Reminder {
    type Error = ValidationError;

    fn try_from(raw: RawReminder) -> Result<Reminder, ValidationError> {
        Reminder::new(raw.start, raw.end, raw.interval_minutes)
    }
}

impl From<Reminder> for RawReminder {
    fn from(reminder: Reminder) -> RawReminder {
        RawReminder {
            start: reminder.start,
            end: reminder.end,
            interval_minutes: reminder.interval_minutes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn rejects_inverted_window() {
        assert!(Reminder::new(time(22, 0), time(8, 0), 90).is_err());
        assert!(Reminder::new(time(8, 0), time(8, 0), 90).is_err());
    }

    #[test]
    fn rejects_zero_interval() {
        assert!(Reminder::new(time(8, 0), time(22, 0), 0).is_err());
    }

    #[test]
    fn serde_rejects_invalid_payload() {
        let json = r#"{"start":"22:00:00","end":"08:00:00","interval_minutes":90}"#;
        assert!(serde_json::from_str::<Reminder>(json).is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let reminder = Reminder::new(time(8, 0), time(22, 0), 90).unwrap();
        let json = serde_json::to_string(&reminder).unwrap();
        let decoded: Reminder = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, reminder);
    }
}
