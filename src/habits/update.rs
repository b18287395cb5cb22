//! Habit update message from the companion app

use crate::{Error, HabitText, NUM_HABITS};

/// Full set of habits sent by the phone.
///
/// Always carries every slot. An empty field clears its slot, so unchanged
/// habits have to be sent again.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HabitUpdate {
    fields: [HabitText; NUM_HABITS],
}

impl HabitUpdate {
    /// Build an update from plain strings, truncating overlong habits
    pub fn from_fields(fields: [&str; NUM_HABITS]) -> Self {
        Self {
            fields: fields.map(HabitText::truncated),
        }
    }

    /// Decode the payload written to the habit characteristic.
    ///
    /// The payload holds the five habits as UTF-8, each separated by a NUL
    /// byte. A NUL after the last habit is accepted but not required.
    pub fn decode(payload: &[u8]) -> Result<Self, Error> {
        let mut count = payload.split(|&b| b == 0).count();
        if count == NUM_HABITS + 1 && payload.last() == Some(&0) {
            count -= 1;
        }
        if count != NUM_HABITS {
            return Err(Error::FieldCount(count));
        }

        let mut update = Self::default();
        for (slot, field) in update.fields.iter_mut().zip(payload.split(|&b| b == 0)) {
            *slot = HabitText::from_bytes(field)?;
        }
        Ok(update)
    }

    /// Text for slot `key`, empty meaning "clear"
    #[cfg(test)]
    pub fn get(&self, key: u8) -> Option<&HabitText> {
        self.fields.get(key as usize)
    }

    /// Slot keys with their new text
    pub fn iter(&self) -> impl Iterator<Item = (u8, &HabitText)> {
        self.fields
            .iter()
            .enumerate()
            .map(|(key, text)| (key as u8, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_five_fields() {
        let update = HabitUpdate::decode(b"Drink water\0\0Stretch\0\0").unwrap();

        assert_eq!(update.get(0).map(|t| t.as_str()), Some("Drink water"));
        assert_eq!(update.get(1).map(|t| t.as_str()), Some(""));
        assert_eq!(update.get(2).map(|t| t.as_str()), Some("Stretch"));
        assert_eq!(update.get(3).map(|t| t.as_str()), Some(""));
        assert_eq!(update.get(4).map(|t| t.as_str()), Some(""));
        assert_eq!(update.get(5), None);
    }

    #[test]
    fn accepts_trailing_terminator() {
        let plain = HabitUpdate::decode(b"a\0b\0c\0d\0e").unwrap();
        let terminated = HabitUpdate::decode(b"a\0b\0c\0d\0e\0").unwrap();
        assert_eq!(plain, terminated);
        assert_eq!(plain, HabitUpdate::from_fields(["a", "b", "c", "d", "e"]));
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert_eq!(HabitUpdate::decode(b""), Err(Error::FieldCount(1)));
        assert_eq!(HabitUpdate::decode(b"a\0b\0c"), Err(Error::FieldCount(3)));
        assert_eq!(
            HabitUpdate::decode(b"a\0b\0c\0d\0e\0f"),
            Err(Error::FieldCount(6))
        );
    }

    #[test]
    fn rejects_invalid_utf8() {
        assert_eq!(
            HabitUpdate::decode(b"a\0\xff\0c\0d\0e"),
            Err(Error::InvalidUtf8)
        );
    }

    #[test]
    fn truncates_long_fields() {
        let long = "y".repeat(80);
        let update = HabitUpdate::from_fields([long.as_str(), "", "", "", ""]);
        assert_eq!(update.get(0).map(|t| t.len()), Some(crate::HABIT_TEXT_CAPACITY));
    }

    #[test]
    fn iterates_in_slot_order() {
        let update = HabitUpdate::from_fields(["a", "", "c", "", "e"]);
        let keys: Vec<u8> = update.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, [0, 1, 2, 3, 4]);
    }
}
