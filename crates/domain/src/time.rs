//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp used for `last_triggered`, sensor readings, statistics, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Return the current local wall-clock time of day.
///
/// `time`-kind conditions interpret the local clock, not UTC — a rule
/// window of `22:00`–`06:00` means the user's evening, wherever the hub
/// runs.
#[must_use]
pub fn local_time_of_day() -> chrono::NaiveTime {
    chrono::Local::now().time()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }
}
