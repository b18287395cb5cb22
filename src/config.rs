//! Rotation configuration

use crate::Error;

/// How often the watch face moves on to the next habit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RotationConfig {
    /// Clock ticks between two rotations
    period: u8,
}

impl RotationConfig {
    /// Rotate on every tick
    pub const EVERY_TICK: Self = Self { period: 1 };

    /// Rotate every `period` ticks
    pub fn new(period: u8) -> Result<Self, Error> {
        if period == 0 {
            return Err(Error::OutOfBounds);
        }
        Ok(Self { period })
    }

    pub fn period(&self) -> u8 {
        self.period
    }
}

impl Default for RotationConfig {
    /// Five ticks, i.e. every five minutes with minute ticks
    fn default() -> Self {
        Self { period: 5 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_period() {
        assert_eq!(RotationConfig::new(0), Err(Error::OutOfBounds));
        assert_eq!(RotationConfig::new(1), Ok(RotationConfig::EVERY_TICK));
        assert_eq!(RotationConfig::default().period(), 5);
    }
}
