// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for [`JsonHandler`](crate::JsonHandler).

use std::fmt::Debug;
use std::sync::Arc;

use crate::attr::Attr;
use crate::level::{Level, Leveler};

/// Key of the built-in timestamp field.
pub const TIME_KEY: &str = "time";
/// Key of the built-in level field.
pub const LEVEL_KEY: &str = "level";
/// Key of the built-in message field.
pub const MESSAGE_KEY: &str = "msg";
/// Key of the built-in source-location field.
pub const SOURCE_KEY: &str = "source";

/// Hook that may rewrite or drop each attribute as it is formatted.
///
/// The first argument is the path of open groups, outermost first.
pub type ReplaceAttr = Arc<dyn Fn(&[String], Attr) -> Attr + Send + Sync>;

/**
Options for a JSON handler.

```
use ctxlog::{Attr, HandlerOptions, Level, TIME_KEY};

// Debug and above, without timestamps.
let options = HandlerOptions::new()
    .level(Level::Debug)
    .replace_attr(|groups, attr| {
        if groups.is_empty() && attr.key() == TIME_KEY {
            Attr::empty()
        } else {
            attr
        }
    });
# let _ = options;
```
*/
#[derive(Clone)]
pub struct HandlerOptions {
    pub(crate) level: Arc<dyn Leveler>,
    pub(crate) add_source: bool,
    pub(crate) replace_attr: Option<ReplaceAttr>,
}

impl HandlerOptions {
    /// Info level, no source location, no rewriting.
    pub fn new() -> Self {
        Self {
            level: Arc::new(Level::Info),
            add_source: false,
            replace_attr: None,
        }
    }

    /// Sets the minimum level.
    ///
    /// Pass an `Arc<LevelVar>` to keep adjusting it after the handler is built.
    pub fn level(mut self, level: impl Leveler + 'static) -> Self {
        self.level = Arc::new(level);
        self
    }

    /// Adds a `source` object with the file and line of each log call.
    pub fn add_source(mut self, add_source: bool) -> Self {
        self.add_source = add_source;
        self
    }

    /// Installs a hook called once per attribute, built-ins included.
    ///
    /// Returning an attribute with an empty key drops the field.
    pub fn replace_attr<F>(mut self, f: F) -> Self
    where
        F: Fn(&[String], Attr) -> Attr + Send + Sync + 'static,
    {
        self.replace_attr = Some(Arc::new(f));
        self
    }

    /// The minimum level as of now.
    pub fn min_level(&self) -> Level {
        self.level.level()
    }
}

impl Default for HandlerOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for HandlerOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerOptions")
            .field("level", &self.level)
            .field("add_source", &self.add_source)
            .field("replace_attr", &self.replace_attr.is_some())
            .finish()
    }
}
