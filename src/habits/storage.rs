//! Storage backends for the habit slots

use crate::{Error, HabitText, NUM_HABITS};

/// Key-value storage for the habit slots.
///
/// Keys are slot indices in `0..NUM_HABITS`. Implementations persist every
/// change right away; there is no flush step.
#[allow(async_fn_in_trait)]
pub trait HabitStorage {
    /// Whether a text is stored at `key`
    async fn contains(&mut self, key: u8) -> Result<bool, Error>;

    /// Text stored at `key`, if any
    async fn load(&mut self, key: u8) -> Result<Option<HabitText>, Error>;

    /// Store `text` at `key`, replacing the previous value
    async fn store(&mut self, key: u8, text: &HabitText) -> Result<(), Error>;

    /// Remove the text at `key`. Removing an empty slot is not an error.
    async fn remove(&mut self, key: u8) -> Result<(), Error>;
}

/// Validate a slot key and turn it into an index
pub(crate) fn slot_index(key: u8) -> Result<usize, Error> {
    let index = key as usize;
    if index < NUM_HABITS {
        Ok(index)
    } else {
        Err(Error::InvalidKey(key))
    }
}

/// Volatile storage in RAM
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    slots: [Option<HabitText>; NUM_HABITS],
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HabitStorage for MemoryStorage {
    async fn contains(&mut self, key: u8) -> Result<bool, Error> {
        Ok(self.slots[slot_index(key)?].is_some())
    }

    async fn load(&mut self, key: u8) -> Result<Option<HabitText>, Error> {
        Ok(self.slots[slot_index(key)?].clone())
    }

    async fn store(&mut self, key: u8, text: &HabitText) -> Result<(), Error> {
        self.slots[slot_index(key)?] = Some(text.clone());
        Ok(())
    }

    async fn remove(&mut self, key: u8) -> Result<(), Error> {
        self.slots[slot_index(key)?] = None;
        Ok(())
    }
}
