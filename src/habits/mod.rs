//! Habit slots, their storage and the rotation over them

pub mod flash;
pub mod rotation;
pub mod storage;
pub mod store;
pub mod text;
pub mod update;
