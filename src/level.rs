// SPDX-License-Identifier: MIT OR Apache-2.0

//! Severity levels and the runtime-adjustable [`LevelVar`].

use std::fmt::{Debug, Display};
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::error::ParseLevelError;

/// Severity of a log record.
///
/// Levels are ordered; a handler configured at some level accepts that level and
/// everything above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
    /// Diagnostics useful while developing
    Debug,
    /// Normal operation
    #[default]
    Info,
    /// Suspicious condition
    Warn,
    /// Runtime error
    Error,
}

impl Level {
    /// The name written into the `level` field.
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }

    const fn to_u8(self) -> u8 {
        self as u8
    }

    const fn from_u8(raw: u8) -> Level {
        match raw {
            0 => Level::Debug,
            1 => Level::Info,
            2 => Level::Warn,
            _ => Level::Error,
        }
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARN" | "WARNING" => Ok(Level::Warn),
            "ERROR" => Ok(Level::Error),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/**
A level that can be changed while handlers are using it.

Share one `LevelVar` between a handler's options and whatever adjusts verbosity
at runtime:

```
use ctxlog::{HandlerOptions, Level, LevelVar};
use std::sync::Arc;

let program_level = Arc::new(LevelVar::new());
let options = HandlerOptions::new().level(program_level.clone());
program_level.set(Level::Debug);
assert_eq!(program_level.level(), Level::Debug);
# let _ = options;
```
*/
pub struct LevelVar {
    raw: AtomicU8,
}

impl LevelVar {
    /// Creates a variable holding [`Level::Info`].
    pub const fn new() -> Self {
        Self {
            raw: AtomicU8::new(Level::Info.to_u8()),
        }
    }

    pub fn level(&self) -> Level {
        Level::from_u8(self.raw.load(Ordering::Relaxed))
    }

    pub fn set(&self, level: Level) {
        self.raw.store(level.to_u8(), Ordering::Relaxed);
    }
}

impl Default for LevelVar {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for LevelVar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("LevelVar").field(&self.level()).finish()
    }
}

impl From<Level> for LevelVar {
    fn from(level: Level) -> Self {
        let var = LevelVar::new();
        var.set(level);
        var
    }
}

/// Anything that can report a minimum level.
pub trait Leveler: Debug + Send + Sync {
    fn level(&self) -> Level;
}

impl Leveler for Level {
    fn level(&self) -> Level {
        *self
    }
}

impl Leveler for LevelVar {
    fn level(&self) -> Level {
        LevelVar::level(self)
    }
}

impl<T: Leveler + ?Sized> Leveler for Arc<T> {
    fn level(&self) -> Level {
        (**self).level()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("debug".parse::<Level>().unwrap(), Level::Debug);
        assert_eq!("Warning".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!("ERROR".parse::<Level>().unwrap(), Level::Error);
        let err = "loud".parse::<Level>().unwrap_err();
        assert_eq!(err.to_string(), "unknown log level `loud`");
    }

    #[test]
    fn level_var_round_trips_every_level() {
        let var = LevelVar::new();
        assert_eq!(var.level(), Level::Info);
        for level in [Level::Debug, Level::Info, Level::Warn, Level::Error] {
            var.set(level);
            assert_eq!(var.level(), level);
        }
    }

    #[test]
    fn shared_level_var_is_observed_through_arc() {
        let var = Arc::new(LevelVar::new());
        let leveler: Arc<dyn Leveler> = Arc::new(var.clone());
        var.set(Level::Error);
        assert_eq!(leveler.level(), Level::Error);
    }
}
