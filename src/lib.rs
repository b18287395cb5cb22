//! Habit reminder core for the PineTime watch face.
//!
//! Stores up to [`NUM_HABITS`] short reminder strings received from the
//! companion app and rotates through them on the watch face at a fixed
//! cadence. Everything in here is hardware independent; the firmware in
//! `main.rs` only feeds clock ticks and update messages into a
//! [`RotationController`] and draws whatever it hands back.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod clock;
pub mod config;
pub mod error;
pub mod habits;

pub use clock::{decode_current_time, MinuteClock, CURRENT_TIME_LEN};
pub use config::RotationConfig;
pub use error::Error;
pub use habits::{
    flash::FlashStorage,
    rotation::RotationController,
    storage::{HabitStorage, MemoryStorage},
    store::HabitStore,
    text::HabitText,
    update::HabitUpdate,
};

/// Number of habit slots
pub const NUM_HABITS: usize = 5;

/// Size of a persisted habit string, including the C-style terminator
pub const HABIT_TEXT_MAX_LEN: usize = 50;

/// Usable bytes of a habit string
pub const HABIT_TEXT_CAPACITY: usize = HABIT_TEXT_MAX_LEN - 1;

/// Shown when no slot holds a habit
pub const PLACEHOLDER_HABIT: &str = "Add custom text here using the companion app";
