// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log record type.
//!
//! A [`LogRecord`] is one structured event before serialization: when it
//! happened, how severe it is, the message, where it was logged from, and its
//! attributes.
//!
//! Handlers receive records by reference.  A handler that wants to add
//! attributes on the way through clones the record first, so a caller that
//! emits the same record twice (or to several handlers) always sends what it
//! built.
//!
//! # Example
//!
//! ```rust
//! use ctxlog::{Attr, Level, LogRecord};
//!
//! let mut record = LogRecord::new(Level::Info, "request finished");
//! record.add_attrs([Attr::uint("status", 200)]);
//!
//! let mut enriched = record.clone();
//! enriched.add_attrs([Attr::string("request_id", "r-1")]);
//!
//! assert_eq!(record.attrs().len(), 1);
//! assert_eq!(enriched.attrs().len(), 2);
//! ```

use chrono::{DateTime, Utc};
use std::panic::Location;

use crate::Level;
use crate::attr::Attr;

#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    time: Option<DateTime<Utc>>,
    level: Level,
    message: String,
    source: Option<&'static Location<'static>>,
    attrs: Vec<Attr>,
}

impl LogRecord {
    /// Creates a record stamped with the current time.
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            time: Some(Utc::now()),
            level,
            message: message.into(),
            source: None,
            attrs: Vec::new(),
        }
    }

    /**
    Replaces the timestamp.

    `None` leaves the `time` field out of the output entirely.
    */
    pub fn with_time(mut self, time: Option<DateTime<Utc>>) -> Self {
        self.time = time;
        self
    }

    /// Records where the log call was made.
    pub fn with_source(mut self, source: &'static Location<'static>) -> Self {
        self.source = Some(source);
        self
    }

    /// Appends attributes after the ones already present.
    pub fn add_attrs(&mut self, attrs: impl IntoIterator<Item = Attr>) {
        self.attrs.extend(attrs);
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.time
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source(&self) -> Option<&'static Location<'static>> {
        self.source
    }

    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }
}

/*
Boilerplate notes for LogRecord:

IMPLEMENTED:
- Debug, Clone, PartialEq: derived.  Clone is how handlers enrich without aliasing.

NOT IMPLEMENTED:
- Eq/Hash: attributes may hold floats.
- Default: a record without a level and message is meaningless.
- Display: rendering belongs to handlers.
*/

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_timestamped_and_bare() {
        let record = LogRecord::new(Level::Warn, "disk almost full");
        assert!(record.time().is_some());
        assert_eq!(record.level(), Level::Warn);
        assert_eq!(record.message(), "disk almost full");
        assert!(record.source().is_none());
        assert!(record.attrs().is_empty());
    }

    #[test]
    fn add_attrs_keeps_order() {
        let mut record = LogRecord::new(Level::Info, "m").with_time(None);
        record.add_attrs([Attr::int("a", 1)]);
        record.add_attrs(vec![Attr::int("b", 2), Attr::int("c", 3)]);
        let keys: Vec<_> = record.attrs().iter().map(Attr::key).collect();
        assert_eq!(keys, ["a", "b", "c"]);
        assert!(record.time().is_none());
    }

    #[test]
    fn clones_do_not_share_attrs() {
        let original = LogRecord::new(Level::Info, "m").with_source(Location::caller());
        let mut copy = original.clone();
        copy.add_attrs([Attr::bool("extra", true)]);
        assert!(original.attrs().is_empty());
        assert_eq!(copy.source(), original.source());
    }
}
