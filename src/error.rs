//! Errors of the habit core

use core::fmt;

/// Everything that can go wrong below the habit store.
///
/// None of these reach the rotation controller: the store logs them and
/// degrades instead, so the watch face keeps running on a storage fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Slot key outside `0..NUM_HABITS`
    InvalidKey(u8),
    /// Text does not fit into a habit slot
    TooLong,
    /// Text is not valid UTF-8
    InvalidUtf8,
    /// Text has a NUL byte inside
    ContainsNul,
    /// Update message does not carry exactly one field per slot
    FieldCount(usize),
    /// Current Time Service payload is not a valid date and time
    InvalidTime,
    /// Value or region outside the allowed range
    OutOfBounds,
    /// Flash region not aligned to an erase sector
    Misaligned,
    /// Underlying flash operation failed
    Flash,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidKey(key) => write!(f, "invalid habit slot {}", key),
            Error::TooLong => f.write_str("habit text too long"),
            Error::InvalidUtf8 => f.write_str("habit text is not valid UTF-8"),
            Error::ContainsNul => f.write_str("habit text contains a NUL byte"),
            Error::FieldCount(n) => write!(f, "expected {} habit fields, got {}", crate::NUM_HABITS, n),
            Error::InvalidTime => f.write_str("invalid current time"),
            Error::OutOfBounds => f.write_str("value out of bounds"),
            Error::Misaligned => f.write_str("flash region not sector aligned"),
            Error::Flash => f.write_str("flash operation failed"),
        }
    }
}
