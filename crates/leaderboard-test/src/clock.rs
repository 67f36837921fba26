//! Manual clock fixture.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use leaderboard_core::Clock;
use parking_lot::Mutex;

/// Start time of every [`ManualClock`]: 2024-01-01 00:00:00.
pub fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid fixture date")
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::starting_at(epoch())
    }

    pub fn starting_at(now: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Moves the clock forward and returns the new time.
    pub fn advance_secs(&self, secs: i64) -> NaiveDateTime {
        let mut now = self.now.lock();
        *now += Duration::seconds(secs);
        *now
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock()
    }
}
