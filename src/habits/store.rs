//! Habit store
//!
//! Wraps a [`HabitStorage`] backend with the contract the rotation relies
//! on: reads and existence checks never fail, and a failing write or delete
//! is logged and otherwise ignored so the watch face keeps showing what it
//! showed before.

use super::{storage::HabitStorage, update::HabitUpdate};
use crate::{HabitText, NUM_HABITS};

pub struct HabitStore<S> {
    storage: S,
}

impl<S> HabitStore<S>
where
    S: HabitStorage,
{
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Whether slot `key` currently holds a habit
    pub async fn exists(&mut self, key: u8) -> bool {
        match self.storage.contains(key).await {
            Ok(exists) => exists,
            Err(e) => {
                warn!("Checking habit slot {} failed: {}", key, e);
                false
            }
        }
    }

    /// Habit stored in slot `key`.
    ///
    /// Only meaningful after [`exists`](Self::exists) returned true; yields
    /// `None` if the slot is empty or cannot be read.
    pub async fn read(&mut self, key: u8) -> Option<HabitText> {
        match self.storage.load(key).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Reading habit slot {} failed: {}", key, e);
                None
            }
        }
    }

    /// Persist `text` in slot `key`. Empty text clears the slot.
    pub async fn write(&mut self, key: u8, text: &HabitText) {
        if text.is_empty() {
            return self.delete(key).await;
        }
        if let Err(e) = self.storage.store(key, text).await {
            warn!("Writing habit slot {} failed: {}", key, e);
        }
    }

    /// Clear slot `key`. Clearing an empty slot does nothing.
    pub async fn delete(&mut self, key: u8) {
        if let Err(e) = self.storage.remove(key).await {
            warn!("Deleting habit slot {} failed: {}", key, e);
        }
    }

    /// Apply an update from the phone: every slot is written or cleared
    pub async fn apply(&mut self, update: &HabitUpdate) {
        for (key, text) in update.iter() {
            self.write(key, text).await;
        }
        info!("Habits updated, {} slots in use", self.occupied().await);
    }

    /// Number of slots holding a habit
    pub async fn occupied(&mut self) -> usize {
        let mut count = 0;
        for key in 0..NUM_HABITS as u8 {
            if self.exists(key).await {
                count += 1;
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;

    use super::*;
    use crate::{Error, MemoryStorage};

    /// Backend whose every operation fails, like a worn out flash
    struct BrokenStorage;

    impl HabitStorage for BrokenStorage {
        async fn contains(&mut self, _key: u8) -> Result<bool, Error> {
            Err(Error::Flash)
        }

        async fn load(&mut self, _key: u8) -> Result<Option<HabitText>, Error> {
            Err(Error::Flash)
        }

        async fn store(&mut self, _key: u8, _text: &HabitText) -> Result<(), Error> {
            Err(Error::Flash)
        }

        async fn remove(&mut self, _key: u8) -> Result<(), Error> {
            Err(Error::Flash)
        }
    }

    #[test]
    fn write_then_read_returns_same_text() {
        let mut store = HabitStore::new(MemoryStorage::new());
        let text = HabitText::new(&"z".repeat(crate::HABIT_TEXT_CAPACITY)).unwrap();

        block_on(async {
            store.write(3, &text).await;
            assert!(store.exists(3).await);
            assert_eq!(store.read(3).await, Some(text));
        });
    }

    #[test]
    fn deleting_twice_equals_deleting_once() {
        let mut store = HabitStore::new(MemoryStorage::new());

        block_on(async {
            store.write(0, &HabitText::truncated("Walk")).await;
            store.delete(0).await;
            let once = store.occupied().await;
            store.delete(0).await;
            assert_eq!(store.occupied().await, once);
            assert!(!store.exists(0).await);
        });
    }

    #[test]
    fn writing_empty_text_clears_slot() {
        let mut store = HabitStore::new(MemoryStorage::new());

        block_on(async {
            store.write(1, &HabitText::truncated("Floss")).await;
            store.write(1, &HabitText::empty()).await;
            assert!(!store.exists(1).await);
        });
    }

    #[test]
    fn apply_writes_and_clears_every_slot() {
        let mut store = HabitStore::new(MemoryStorage::new());

        block_on(async {
            store.write(1, &HabitText::truncated("Old habit")).await;
            store
                .apply(&HabitUpdate::from_fields(["Drink water", "", "Stretch", "", ""]))
                .await;

            assert_eq!(store.read(0).await.as_deref(), Some("Drink water"));
            assert!(!store.exists(1).await);
            assert_eq!(store.read(2).await.as_deref(), Some("Stretch"));
            assert_eq!(store.occupied().await, 2);
        });
    }

    #[test]
    fn storage_faults_degrade_silently() {
        let mut store = HabitStore::new(BrokenStorage);

        block_on(async {
            store.write(0, &HabitText::truncated("Meditate")).await;
            store.delete(0).await;
            assert!(!store.exists(0).await);
            assert_eq!(store.read(0).await, None);
            assert_eq!(store.occupied().await, 0);
        });
    }
}
