// SPDX-License-Identifier: MIT OR Apache-2.0

//! A [`Handler`] that writes one JSON object per line.
//!
//! Each record becomes a single line: the built-in `time`, `level` and `msg`
//! fields (plus `source` when enabled), then the handler's own attributes, then
//! the record's attributes, all inside whatever groups are open.
//!
//! ```
//! use ctxlog::context::Context;
//! use ctxlog::{Attr, Handler, HandlerOptions, InMemorySink, JsonHandler, Level, LogRecord};
//!
//! let sink = InMemorySink::new();
//! let handler = JsonHandler::new(sink.clone(), HandlerOptions::new())
//!     .with_attrs(&[Attr::string("service", "billing")])
//!     .with_group("req");
//!
//! let mut record = LogRecord::new(Level::Info, "done").with_time(None);
//! record.add_attrs([Attr::uint("status", 200)]);
//! handler.handle(&Context::background(), &record).unwrap();
//!
//! assert_eq!(
//!     sink.drain_logs(),
//!     r#"{"level":"INFO","msg":"done","service":"billing","req":{"status":200}}"#
//! );
//! ```

use chrono::SecondsFormat;
use parking_lot::Mutex;
use serde_json::{Map, Value as JsonValue};
use std::fmt::Debug;
use std::io::Write;
use std::sync::Arc;

use crate::Level;
use crate::attr::{Attr, Value};
use crate::context::Context;
use crate::error::HandleError;
use crate::handler::Handler;
use crate::log_record::LogRecord;
use crate::options::{HandlerOptions, LEVEL_KEY, MESSAGE_KEY, SOURCE_KEY, TIME_KEY};

/// A group opened with `with_group`, and the attributes added while it was innermost.
#[derive(Debug, Clone)]
struct OpenGroup {
    name: String,
    attrs: Vec<Attr>,
}

const BUILTIN_KEYS: [&str; 4] = [TIME_KEY, LEVEL_KEY, MESSAGE_KEY, SOURCE_KEY];

/// Writes each record as one JSON object, followed by a newline, to a shared sink.
///
/// Clones and derived handlers (`with_attrs`, `with_group`) write to the same sink,
/// and every record is written with a single locked `write_all`.
pub struct JsonHandler<W> {
    sink: Arc<Mutex<W>>,
    options: HandlerOptions,
    /// Attributes added before any group was opened.
    attrs: Vec<Attr>,
    groups: Vec<OpenGroup>,
}

impl<W> Clone for JsonHandler<W> {
    fn clone(&self) -> Self {
        Self {
            sink: self.sink.clone(),
            options: self.options.clone(),
            attrs: self.attrs.clone(),
            groups: self.groups.clone(),
        }
    }
}

impl<W> Debug for JsonHandler<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonHandler")
            .field("options", &self.options)
            .field("attrs", &self.attrs)
            .field("groups", &self.groups)
            .finish_non_exhaustive()
    }
}

impl<W: Write + Send + 'static> JsonHandler<W> {
    /// Creates a handler writing to `sink`, configured by `options`.
    pub fn new(sink: W, options: HandlerOptions) -> Self {
        Self {
            sink: Arc::new(Mutex::new(sink)),
            options,
            attrs: Vec::new(),
            groups: Vec::new(),
        }
    }

    fn build_object(&self, record: &LogRecord) -> Map<String, JsonValue> {
        let mut object = Map::new();
        let mut path = Vec::new();

        if let Some(time) = record.time() {
            self.append(&mut object, &mut path, Attr::time(TIME_KEY, time));
        }
        self.append(
            &mut object,
            &mut path,
            Attr::string(LEVEL_KEY, record.level().as_str()),
        );
        self.append(
            &mut object,
            &mut path,
            Attr::string(MESSAGE_KEY, record.message()),
        );
        if self.options.add_source {
            if let Some(location) = record.source() {
                let source = serde_json::json!({
                    "file": location.file(),
                    "line": location.line(),
                });
                self.append(&mut object, &mut path, Attr::json(SOURCE_KEY, source));
            }
        }
        let mut fields = Map::new();
        for attr in &self.attrs {
            self.append(&mut fields, &mut path, attr.clone());
        }

        // Innermost first: record attributes, then each open group wrapped around them.
        path = self.groups.iter().map(|g| g.name.clone()).collect();
        let mut inner = Map::new();
        for attr in record.attrs() {
            self.append(&mut inner, &mut path, attr.clone());
        }
        for (depth, group) in self.groups.iter().enumerate().rev() {
            path.truncate(depth + 1);
            let mut scoped = Map::new();
            for attr in &group.attrs {
                self.append(&mut scoped, &mut path, attr.clone());
            }
            scoped.extend(inner);
            inner = Map::new();
            if !scoped.is_empty() {
                inner.insert(group.name.clone(), JsonValue::Object(scoped));
            }
        }
        fields.extend(inner);

        // Built-in fields always win over a same-named attribute at the top level.
        for (key, value) in fields {
            if !object.contains_key(&key) && !BUILTIN_KEYS.contains(&key.as_str()) {
                object.insert(key, value);
            }
        }
        object
    }

    fn append(&self, object: &mut Map<String, JsonValue>, path: &mut Vec<String>, attr: Attr) {
        let attr = match &self.options.replace_attr {
            Some(replace) if !matches!(attr.value(), Value::Group(_)) => {
                replace(path.as_slice(), attr)
            }
            _ => attr,
        };
        let (key, value) = attr.into_parts();
        match value {
            Value::Group(attrs) => {
                if attrs.is_empty() {
                    return;
                }
                if key.is_empty() {
                    for attr in attrs {
                        self.append(object, path, attr);
                    }
                    return;
                }
                path.push(key.clone());
                let mut nested = Map::new();
                for attr in attrs {
                    self.append(&mut nested, path, attr);
                }
                path.pop();
                if !nested.is_empty() {
                    object.insert(key, JsonValue::Object(nested));
                }
            }
            value => {
                if !key.is_empty() {
                    object.insert(key, scalar_to_json(value));
                }
            }
        }
    }
}

fn scalar_to_json(value: Value) -> JsonValue {
    match value {
        Value::String(s) => JsonValue::String(s),
        Value::I64(v) => v.into(),
        Value::U64(v) => v.into(),
        Value::F64(v) => serde_json::Number::from_f64(v)
            .map(JsonValue::Number)
            .unwrap_or_else(|| JsonValue::String(non_finite(v).to_string())),
        Value::Bool(v) => v.into(),
        Value::Duration(d) => u64::try_from(d.as_nanos()).unwrap_or(u64::MAX).into(),
        Value::Time(t) => JsonValue::String(t.to_rfc3339_opts(SecondsFormat::Millis, true)),
        Value::Json(v) => v,
        // groups are expanded by `append`; this only sees hook-free nested values
        Value::Group(attrs) => JsonValue::Object(
            attrs
                .into_iter()
                .map(Attr::into_parts)
                .map(|(k, v)| (k, scalar_to_json(v)))
                .collect(),
        ),
    }
}

fn non_finite(v: f64) -> &'static str {
    if v.is_nan() {
        "NaN"
    } else if v.is_sign_positive() {
        "+Inf"
    } else {
        "-Inf"
    }
}

impl<W: Write + Send + 'static> Handler for JsonHandler<W> {
    fn enabled(&self, _ctx: &Context, level: Level) -> bool {
        level >= self.options.min_level()
    }

    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Handler> {
        let mut next = self.clone();
        match next.groups.last_mut() {
            Some(group) => group.attrs.extend_from_slice(attrs),
            None => next.attrs.extend_from_slice(attrs),
        }
        Arc::new(next)
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        let mut next = self.clone();
        if !name.is_empty() {
            next.groups.push(OpenGroup {
                name: name.to_string(),
                attrs: Vec::new(),
            });
        }
        Arc::new(next)
    }

    fn handle(&self, _ctx: &Context, record: &LogRecord) -> Result<(), HandleError> {
        let object = self.build_object(record);
        let mut line = serde_json::to_vec(&JsonValue::Object(object))?;
        line.push(b'\n');
        self.sink.lock().write_all(&line)?;
        Ok(())
    }
}
