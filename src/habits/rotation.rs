//! Habit rotation
//!
//! Picks the habit shown on the watch face. The slot table is scanned as a
//! circular buffer starting right after the slot shown last, so empty slots
//! are skipped and the scan wraps around to the start.

use super::{storage::HabitStorage, store::HabitStore, update::HabitUpdate};
use crate::{HabitText, RotationConfig, NUM_HABITS};

/// Slot the scan is anchored on to start over at slot 0
const LAST_SLOT: u8 = NUM_HABITS as u8 - 1;

pub struct RotationController {
    /// Slot shown last, or where the next scan starts
    current_index: u8,
    /// Clock ticks since the last rotation
    ticks_since_rotation: u8,
    config: RotationConfig,
}

impl RotationController {
    pub fn new(config: RotationConfig) -> Self {
        Self {
            current_index: 0,
            ticks_since_rotation: 0,
            config,
        }
    }

    pub fn current_index(&self) -> u8 {
        self.current_index
    }

    pub fn ticks_since_rotation(&self) -> u8 {
        self.ticks_since_rotation
    }

    /// Find the next stored habit after the current one.
    ///
    /// Visits every slot at most once. If none holds a habit, the
    /// placeholder is returned and the index ends up where it started.
    pub async fn scan<S: HabitStorage>(&mut self, store: &mut HabitStore<S>) -> HabitText {
        let start = self.current_index;
        loop {
            self.current_index = (self.current_index + 1) % NUM_HABITS as u8;
            if store.exists(self.current_index).await {
                if let Some(habit) = store.read(self.current_index).await {
                    debug!("Showing habit slot {}", self.current_index);
                    return habit;
                }
            }
            if self.current_index == start {
                break;
            }
        }

        debug!("No habits stored");
        HabitText::placeholder()
    }

    /// Clock tick, nominally once a minute.
    ///
    /// Returns the habit to show if the rotation period is over, `None` if
    /// the display stays as it is.
    pub async fn on_tick<S: HabitStorage>(
        &mut self,
        store: &mut HabitStore<S>,
    ) -> Option<HabitText> {
        self.ticks_since_rotation += 1;
        if self.ticks_since_rotation < self.config.period() {
            return None;
        }

        self.ticks_since_rotation = 0;
        Some(self.scan(store).await)
    }

    /// New habits from the phone.
    ///
    /// Stores them and restarts the rotation at the lowest occupied slot, so
    /// a habit that was just deleted does not linger on screen.
    pub async fn on_update<S: HabitStorage>(
        &mut self,
        store: &mut HabitStore<S>,
        update: &HabitUpdate,
    ) -> HabitText {
        store.apply(update).await;
        self.restart(store).await
    }

    /// First habit to show after boot
    pub async fn on_start<S: HabitStorage>(&mut self, store: &mut HabitStore<S>) -> HabitText {
        self.restart(store).await
    }

    async fn restart<S: HabitStorage>(&mut self, store: &mut HabitStore<S>) -> HabitText {
        self.ticks_since_rotation = 0;
        self.current_index = LAST_SLOT;
        self.scan(store).await
    }
}

impl Default for RotationController {
    fn default() -> Self {
        Self::new(RotationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;

    use super::*;
    use crate::{MemoryStorage, PLACEHOLDER_HABIT};

    fn store_with(fields: [&str; NUM_HABITS]) -> HabitStore<MemoryStorage> {
        let mut store = HabitStore::new(MemoryStorage::new());
        block_on(store.apply(&HabitUpdate::from_fields(fields)));
        store
    }

    #[test]
    fn single_habit_is_found_from_any_start() {
        for occupied in 0..NUM_HABITS {
            let mut fields = [""; NUM_HABITS];
            fields[occupied] = "Only habit";
            let mut store = store_with(fields);

            for start in 0..NUM_HABITS as u8 {
                let mut rotation = RotationController::default();
                rotation.current_index = start;

                for _ in 0..3 {
                    let habit = block_on(rotation.scan(&mut store));
                    assert_eq!(habit.as_str(), "Only habit");
                    assert_eq!(rotation.current_index() as usize, occupied);
                }
            }
        }
    }

    #[test]
    fn empty_table_shows_placeholder() {
        let mut store = store_with([""; NUM_HABITS]);

        for start in 0..NUM_HABITS as u8 {
            let mut rotation = RotationController::default();
            rotation.current_index = start;

            let habit = block_on(rotation.scan(&mut store));
            assert_eq!(habit.as_str(), PLACEHOLDER_HABIT);
            assert_eq!(rotation.current_index(), start);
        }
    }

    #[test]
    fn update_restarts_at_lowest_slot() {
        let mut store = store_with(["a", "b", "c", "d", "e"]);
        let mut rotation = RotationController::new(RotationConfig::EVERY_TICK);

        block_on(async {
            rotation.on_start(&mut store).await;
            rotation.on_tick(&mut store).await;
            rotation.on_tick(&mut store).await;
            assert_eq!(rotation.current_index(), 2);

            let update = HabitUpdate::from_fields(["", "Read", "", "Run", ""]);
            let habit = rotation.on_update(&mut store, &update).await;
            assert_eq!(habit.as_str(), "Read");
            assert_eq!(rotation.current_index(), 1);
            assert_eq!(rotation.ticks_since_rotation(), 0);
        });
    }

    #[test]
    fn rotates_once_per_period() {
        let period = 5;
        let mut store = HabitStore::new(MemoryStorage::new());
        let mut rotation = RotationController::new(RotationConfig::new(period).unwrap());
        let update = HabitUpdate::from_fields(["zero", "", "two", "", "four"]);

        block_on(async {
            let first = rotation.on_update(&mut store, &update).await;
            assert_eq!(first.as_str(), "zero");

            for expected in ["two", "four", "zero", "two"] {
                for _ in 1..period {
                    assert_eq!(rotation.on_tick(&mut store).await, None);
                }
                let habit = rotation.on_tick(&mut store).await;
                assert_eq!(habit.as_deref(), Some(expected));
                assert_eq!(rotation.ticks_since_rotation(), 0);
            }
        });
    }

    #[test]
    fn skips_empty_slots_and_wraps() {
        let mut store = HabitStore::new(MemoryStorage::new());
        let mut rotation = RotationController::default();
        let update = HabitUpdate::from_fields(["Drink water", "", "Stretch", "", ""]);

        block_on(async {
            assert_eq!(
                rotation.on_update(&mut store, &update).await.as_str(),
                "Drink water"
            );
            assert_eq!(rotation.scan(&mut store).await.as_str(), "Stretch");
            assert_eq!(rotation.scan(&mut store).await.as_str(), "Drink water");
        });
    }

    #[test]
    fn placeholder_after_everything_is_deleted() {
        let mut store = store_with(["a", "", "", "", ""]);
        let mut rotation = RotationController::new(RotationConfig::EVERY_TICK);

        block_on(async {
            assert_eq!(rotation.on_start(&mut store).await.as_str(), "a");

            let cleared = HabitUpdate::from_fields([""; NUM_HABITS]);
            let habit = rotation.on_update(&mut store, &cleared).await;
            assert!(habit.is_placeholder());
            assert_eq!(rotation.current_index(), LAST_SLOT);

            for _ in 0..NUM_HABITS {
                let habit = rotation.on_tick(&mut store).await;
                assert!(habit.map_or(false, |h| h.is_placeholder()));
            }
        });
    }

    #[test]
    fn start_shows_persisted_habit() {
        let mut store = store_with(["", "", "", "Journal", ""]);
        let mut rotation = RotationController::default();

        let habit = block_on(rotation.on_start(&mut store));
        assert_eq!(habit.as_str(), "Journal");
    }
}
