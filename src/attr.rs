// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed key/value attributes.
//!
//! An [`Attr`] pairs a key with a [`Value`].  Attributes are immutable once built;
//! handlers decide how each [`Value`] variant is rendered.
//!
//! ```
//! use ctxlog::{Attr, Value};
//! use std::time::Duration;
//!
//! let attrs = [
//!     Attr::string("user", "alice"),
//!     Attr::int("attempt", 3),
//!     Attr::bool("cached", false),
//!     Attr::duration("elapsed", Duration::from_millis(12)),
//!     Attr::group("http", vec![Attr::uint("status", 200)]),
//! ];
//! assert_eq!(attrs[1].value(), &Value::I64(3));
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Display;
use std::time::Duration;

/// The value half of an [`Attr`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    I64(i64),
    U64(u64),
    F64(f64),
    Bool(bool),
    Duration(Duration),
    Time(DateTime<Utc>),
    /// Arbitrary JSON, written inline.
    Json(serde_json::Value),
    /// Nested attributes.
    Group(Vec<Attr>),
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::I64(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Duration(v) => write!(f, "{v:?}"),
            Value::Time(v) => write!(f, "{}", v.to_rfc3339()),
            Value::Json(v) => write!(f, "{v}"),
            Value::Group(attrs) => {
                f.write_str("[")?;
                for (i, attr) in attrs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{attr}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::I64(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::I64(v.into())
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::U64(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Duration> for Value {
    fn from(v: Duration) -> Self {
        Value::Duration(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Time(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::Json(v)
    }
}

/// A key and its typed value.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    key: String,
    value: Value,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, Value::String(value.into()))
    }

    pub fn int(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, Value::I64(value))
    }

    pub fn uint(key: impl Into<String>, value: u64) -> Self {
        Self::new(key, Value::U64(value))
    }

    pub fn float(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, Value::F64(value))
    }

    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, Value::Bool(value))
    }

    pub fn duration(key: impl Into<String>, value: Duration) -> Self {
        Self::new(key, Value::Duration(value))
    }

    pub fn time(key: impl Into<String>, value: DateTime<Utc>) -> Self {
        Self::new(key, Value::Time(value))
    }

    pub fn json(key: impl Into<String>, value: serde_json::Value) -> Self {
        Self::new(key, Value::Json(value))
    }

    /// Serializes `value` into a [`Value::Json`] attribute.
    pub fn serialize<T: Serialize + ?Sized>(
        key: impl Into<String>,
        value: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::json(key, serde_json::to_value(value)?))
    }

    /**
    Groups `attrs` under `key`.

    A group with an empty key is flattened into its parent by the JSON handler;
    a group with no attributes is left out entirely.
    */
    pub fn group(key: impl Into<String>, attrs: Vec<Attr>) -> Self {
        Self::new(key, Value::Group(attrs))
    }

    /// An attribute with an empty key, which handlers drop.
    ///
    /// Return this from a `replace_attr` hook to remove a field.
    pub fn empty() -> Self {
        Self::new(String::new(), Value::Group(Vec::new()))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_empty() && matches!(&self.value, Value::Group(attrs) if attrs.is_empty())
    }

    pub fn into_parts(self) -> (String, Value) {
        (self.key, self.value)
    }
}

impl Display for Attr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/*
Boilerplate notes for Attr:

- Clone/PartialEq: derived; Value holds f64 so Eq and Hash are out.
- Default: not implemented.  `Attr::empty()` names the one "nothing" attribute explicitly.
- No mutable accessors.  Attributes are shared between context maps and records.
*/
