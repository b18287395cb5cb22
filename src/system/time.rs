//! Time keeping module for PineTime

use chrono::{DateTime, NaiveDateTime, TimeDelta};
use embassy_time::Instant;
use pinetime_habits::{decode_current_time, Error};

/// Known wall-clock time at a point of system uptime
pub struct TimeReference {
    /// Clock time
    time: NaiveDateTime,
    /// Related system time
    instant: Instant,
}

impl TimeReference {
    /// Reference `time` as the current time
    pub fn from_datetime(time: NaiveDateTime) -> Self {
        Self {
            time,
            instant: Instant::now(),
        }
    }

    /// Reference a Unix timestamp as the current time
    pub fn from_timestamp(secs: i64) -> Self {
        let time = DateTime::from_timestamp(secs, 0)
            .map(|t| t.naive_utc())
            .unwrap_or_default();
        Self::from_datetime(time)
    }

    /// Reference from Current Time Service data
    pub fn from_cts_bytes(bytes: &[u8]) -> Result<Self, Error> {
        decode_current_time(bytes).map(Self::from_datetime)
    }
}

pub struct TimeManager {
    reference: TimeReference,
}

impl TimeManager {
    pub fn init(reference: TimeReference) -> Self {
        Self { reference }
    }

    /// Get current time
    pub fn get_time(&self) -> NaiveDateTime {
        let elapsed = Instant::now().duration_since(self.reference.instant);
        self.reference.time + TimeDelta::microseconds(elapsed.as_micros() as i64)
    }

    /// Update time reference
    pub fn set_time(&mut self, reference: TimeReference) {
        self.reference = reference;
    }
}
