//! Minute ticks from the wall clock, and setting it over Bluetooth

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use crate::Error;

/// Size of the Current Time characteristic (0x2a2b)
pub const CURRENT_TIME_LEN: usize = 10;

/// Decode the Current Time characteristic written by the phone.
///
/// Layout: year (u16, little endian), month, day, hours, minutes, seconds,
/// day of week, 1/256 fractions of a second, adjust reason. The phone sends
/// its local time, so no timezone offset applies.
pub fn decode_current_time(bytes: &[u8]) -> Result<NaiveDateTime, Error> {
    if bytes.len() != CURRENT_TIME_LEN {
        return Err(Error::InvalidTime);
    }

    // Year 0 means the phone does not know the date
    let year = u16::from_le_bytes([bytes[0], bytes[1]]) as i32;
    if year == 0 {
        return Err(Error::InvalidTime);
    }
    let milli = bytes[8] as u32 * 1000 / 256;

    NaiveDate::from_ymd_opt(year, bytes[2] as u32, bytes[3] as u32)
        .and_then(|date| {
            date.and_hms_milli_opt(bytes[4] as u32, bytes[5] as u32, bytes[6] as u32, milli)
        })
        .ok_or(Error::InvalidTime)
}

/// Turns the once-a-second clock into once-a-minute ticks
#[derive(Default)]
pub struct MinuteClock {
    /// Minute of the last poll, counted from the epoch
    last_minute: Option<i64>,
}

impl MinuteClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current time. Returns true when a new minute has started.
    ///
    /// The first poll only sets the reference. Any change of minute counts
    /// as a single tick, also when the clock was set backwards or skipped
    /// ahead several minutes.
    pub fn poll(&mut self, now: NaiveDateTime) -> bool {
        let minute = now.and_utc().timestamp().div_euclid(60);
        let ticked = matches!(self.last_minute, Some(last) if last != minute);
        self.last_minute = Some(minute);

        if ticked {
            debug!("Minute tick at {}:{}", now.hour(), now.minute());
        }
        ticked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u32, min: u32, sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 3)
            .unwrap()
            .and_hms_opt(hour, min, sec)
            .unwrap()
    }

    #[test]
    fn ticks_once_per_minute() {
        let mut clock = MinuteClock::new();

        assert!(!clock.poll(at(12, 0, 58)));
        assert!(!clock.poll(at(12, 0, 59)));
        assert!(clock.poll(at(12, 1, 0)));
        assert!(!clock.poll(at(12, 1, 1)));
        assert!(!clock.poll(at(12, 1, 1)));
    }

    #[test]
    fn time_jumps_are_a_single_tick() {
        let mut clock = MinuteClock::new();

        clock.poll(at(12, 0, 0));
        assert!(clock.poll(at(15, 30, 0)));
        assert!(!clock.poll(at(15, 30, 10)));
        assert!(clock.poll(at(9, 0, 0)));
    }

    #[test]
    fn decodes_current_time() {
        // 2024-03-03 14:05:30.5, Sunday, manual adjust
        let bytes = [0xe8, 0x07, 3, 3, 14, 5, 30, 7, 128, 0x01];
        let time = decode_current_time(&bytes).unwrap();

        assert_eq!(
            time,
            NaiveDate::from_ymd_opt(2024, 3, 3)
                .unwrap()
                .and_hms_milli_opt(14, 5, 30, 500)
                .unwrap()
        );
    }

    #[test]
    fn rejects_invalid_current_time() {
        // Unknown year, month 13, hour 24, short payload
        let unknown_year = [0, 0, 3, 3, 14, 5, 30, 7, 0, 0];
        let bad_month = [0xe8, 0x07, 13, 3, 14, 5, 30, 7, 0, 0];
        let bad_hour = [0xe8, 0x07, 3, 3, 24, 5, 30, 7, 0, 0];

        assert_eq!(decode_current_time(&unknown_year), Err(Error::InvalidTime));
        assert_eq!(decode_current_time(&bad_month), Err(Error::InvalidTime));
        assert_eq!(decode_current_time(&bad_hour), Err(Error::InvalidTime));
        assert_eq!(decode_current_time(&[0xe8, 0x07, 3]), Err(Error::InvalidTime));
    }
}
