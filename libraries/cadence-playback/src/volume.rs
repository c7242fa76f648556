//! Volume level validation
//!
//! The node takes an integer percentage. Anything outside 0-100, or text
//! that is not an integer, is rejected before it reaches the engine.

use crate::error::{PlaybackError, Result};
use std::fmt;
use std::str::FromStr;

/// Validated volume level (0-100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Volume(u8);

impl Volume {
    /// Highest accepted level
    pub const MAX: u8 = 100;

    /// Validate a raw level
    pub fn new(level: i64) -> Result<Self> {
        u8::try_from(level)
            .ok()
            .filter(|level| *level <= Self::MAX)
            .map(Self)
            .ok_or_else(|| PlaybackError::InvalidVolume(level.to_string()))
    }

    /// Get current volume level (0-100)
    pub fn level(self) -> u8 {
        self.0
    }
}

impl FromStr for Volume {
    type Err = PlaybackError;

    fn from_str(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let level: i64 = trimmed
            .parse()
            .map_err(|_| PlaybackError::InvalidVolume(trimmed.to_string()))?;
        Self::new(level)
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
