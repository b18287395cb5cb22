//! Bounded habit string

use core::{fmt, ops::Deref};

use heapless::String;

use crate::{Error, HABIT_TEXT_CAPACITY, PLACEHOLDER_HABIT};

/// A habit reminder of at most [`HABIT_TEXT_CAPACITY`] bytes.
///
/// Longer input is cut at the last character boundary that still fits, so
/// the text can always be persisted with its terminator in
/// [`crate::HABIT_TEXT_MAX_LEN`] bytes and never shows a split character.
/// A NUL byte terminates the text, as it would in flash.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HabitText(String<HABIT_TEXT_CAPACITY>);

impl HabitText {
    /// Empty text, used as "delete this slot" in updates
    pub const fn empty() -> Self {
        Self(String::new())
    }

    /// Create from `text`, failing if it does not fit or contains a NUL
    pub fn new(text: &str) -> Result<Self, Error> {
        if text.contains('\0') {
            return Err(Error::ContainsNul);
        }
        if text.len() > HABIT_TEXT_CAPACITY {
            return Err(Error::TooLong);
        }
        Ok(Self::truncated(text))
    }

    /// Create from `text`, dropping everything from the first NUL on and
    /// whatever does not fit
    pub fn truncated(text: &str) -> Self {
        let text = text.split('\0').next().unwrap_or_default();
        let mut end = text.len().min(HABIT_TEXT_CAPACITY);
        while !text.is_char_boundary(end) {
            end -= 1;
        }

        let mut inner = String::new();
        // `end` never exceeds the capacity
        let _ = inner.push_str(&text[..end]);
        Self(inner)
    }

    /// Decode a C-style string as stored in flash or sent by the phone.
    ///
    /// Everything from the first NUL byte on is ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        let text = core::str::from_utf8(&bytes[..end]).map_err(|_| Error::InvalidUtf8)?;
        Ok(Self::truncated(text))
    }

    /// The text shown while no habit is stored
    pub fn placeholder() -> Self {
        Self::truncated(PLACEHOLDER_HABIT)
    }

    pub fn is_placeholder(&self) -> bool {
        self.0.as_str() == PLACEHOLDER_HABIT
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for HabitText {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for HabitText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for HabitText {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str())
    }
}
