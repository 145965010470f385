//! Registry of enabled log levels

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use std::collections::BTreeSet;

/// Levels a logger forwards to its backends.
///
/// Enabling a level twice or disabling one that is not enabled is an error;
/// a failed call leaves the set untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelSet {
    levels: BTreeSet<LogLevel>,
}

impl LevelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every level except `Debug`.
    pub fn defaults() -> Self {
        LogLevel::ALL
            .into_iter()
            .filter(|level| *level != LogLevel::Debug)
            .collect()
    }

    pub fn enable(&mut self, level: LogLevel) -> Result<()> {
        if self.levels.insert(level) {
            Ok(())
        } else {
            Err(LoggerError::LevelAlreadyEnabled { level })
        }
    }

    pub fn disable(&mut self, level: LogLevel) -> Result<()> {
        if self.levels.remove(&level) {
            Ok(())
        } else {
            Err(LoggerError::LevelNotEnabled { level })
        }
    }

    #[inline]
    pub fn contains(&self, level: LogLevel) -> bool {
        self.levels.contains(&level)
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Enabled levels, lowest first.
    pub fn iter(&self) -> impl Iterator<Item = LogLevel> + '_ {
        self.levels.iter().copied()
    }
}

impl FromIterator<LogLevel> for LevelSet {
    fn from_iter<I: IntoIterator<Item = LogLevel>>(iter: I) -> Self {
        Self {
            levels: iter.into_iter().collect(),
        }
    }
}
