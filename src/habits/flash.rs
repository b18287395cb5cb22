//! Persistent habit storage on NOR flash
//!
//! Every slot owns one erase sector, starting at `base`:
//!
//! ```text
//! | magic | len | pad | pad | text (len bytes) ... | 0xff ...
//! ```
//!
//! An erased sector (all `0xff`) is an empty slot. Writing a slot erases its
//! sector and programs the record in one go, so a slot is either the old
//! record, erased, or the new record, never a mix of two texts.

use embedded_storage_async::nor_flash::{NorFlash, NorFlashError, NorFlashErrorKind};

use super::storage::{slot_index, HabitStorage};
use crate::{Error, HabitText, HABIT_TEXT_CAPACITY, NUM_HABITS};

const RECORD_MAGIC: u8 = 0xa5;
const ERASED: u8 = 0xff;
const HEADER_LEN: usize = 4;
const RECORD_BUF_LEN: usize = 64;

/// Round `len` up to the next multiple of `align`
const fn align_up(len: usize, align: usize) -> usize {
    (len + align - 1) / align * align
}

fn flash_error<E: NorFlashError>(error: E) -> Error {
    match error.kind() {
        NorFlashErrorKind::NotAligned => Error::Misaligned,
        NorFlashErrorKind::OutOfBounds => Error::OutOfBounds,
        _ => Error::Flash,
    }
}

/// Habit slots persisted on a NOR flash region
pub struct FlashStorage<F> {
    /// Flash device
    flash: F,
    /// Offset of the first slot sector
    base: u32,
}

impl<F> FlashStorage<F>
where
    F: NorFlash,
{
    /// Use `NUM_HABITS` erase sectors of `flash` starting at `base`
    pub fn new(flash: F, base: u32) -> Result<Self, Error> {
        if base as usize % F::ERASE_SIZE != 0 {
            return Err(Error::Misaligned);
        }
        if base as usize + NUM_HABITS * F::ERASE_SIZE > flash.capacity() {
            return Err(Error::OutOfBounds);
        }
        let record_len = Self::record_len();
        if record_len > RECORD_BUF_LEN || record_len > F::ERASE_SIZE {
            return Err(Error::OutOfBounds);
        }

        info!("Habit storage at 0x{:x}", base);
        Ok(Self { flash, base })
    }

    /// Give back the flash device
    pub fn release(self) -> F {
        self.flash
    }

    /// Bytes programmed for one record
    fn record_len() -> usize {
        align_up(
            align_up(HEADER_LEN + HABIT_TEXT_CAPACITY, F::WRITE_SIZE),
            F::READ_SIZE,
        )
    }

    fn sector(&self, key: u8) -> Result<u32, Error> {
        Ok(self.base + (slot_index(key)? * F::ERASE_SIZE) as u32)
    }

    async fn read_record(&mut self, key: u8) -> Result<[u8; RECORD_BUF_LEN], Error> {
        let offset = self.sector(key)?;
        let mut buf = [ERASED; RECORD_BUF_LEN];
        self.flash
            .read(offset, &mut buf[..Self::record_len()])
            .await
            .map_err(flash_error)?;
        Ok(buf)
    }
}

impl<F> HabitStorage for FlashStorage<F>
where
    F: NorFlash,
{
    async fn contains(&mut self, key: u8) -> Result<bool, Error> {
        Ok(self.load(key).await?.is_some())
    }

    async fn load(&mut self, key: u8) -> Result<Option<HabitText>, Error> {
        let record = self.read_record(key).await?;
        if record[0] != RECORD_MAGIC {
            return Ok(None);
        }

        let len = record[1] as usize;
        if len > HABIT_TEXT_CAPACITY {
            warn!("Corrupt habit record in slot {}", key);
            return Ok(None);
        }
        HabitText::from_bytes(&record[HEADER_LEN..HEADER_LEN + len]).map(Some)
    }

    async fn store(&mut self, key: u8, text: &HabitText) -> Result<(), Error> {
        let offset = self.sector(key)?;

        let mut record = [ERASED; RECORD_BUF_LEN];
        record[0] = RECORD_MAGIC;
        record[1] = text.len() as u8;
        record[2] = 0;
        record[3] = 0;
        record[HEADER_LEN..HEADER_LEN + text.len()].copy_from_slice(text.as_bytes());

        self.flash
            .erase(offset, offset + F::ERASE_SIZE as u32)
            .await
            .map_err(flash_error)?;
        self.flash
            .write(offset, &record[..align_up(HEADER_LEN + HABIT_TEXT_CAPACITY, F::WRITE_SIZE)])
            .await
            .map_err(flash_error)?;

        debug!("Habit slot {} written", key);
        Ok(())
    }

    async fn remove(&mut self, key: u8) -> Result<(), Error> {
        // Skip the erase cycle for sectors that are already blank
        if self.read_record(key).await?[0] == ERASED {
            return Ok(());
        }

        let offset = self.sector(key)?;
        self.flash
            .erase(offset, offset + F::ERASE_SIZE as u32)
            .await
            .map_err(flash_error)?;

        debug!("Habit slot {} erased", key);
        Ok(())
    }
}
