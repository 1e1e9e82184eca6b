// SPDX-License-Identifier: MIT OR Apache-2.0

//! The context-aware handler decorator.
//!
//! [`ContextHandler`] wraps another [`Handler`].  When a record is emitted it
//! looks up the attributes attached to the emitting [`Context`] (see
//! [`with_attr`](crate::with_attr)) and adds them to the record before passing it
//! on.  Level filtering, grouping and formatting stay with the wrapped handler.
//!
//! ```
//! use ctxlog::context::Context;
//! use ctxlog::{Attr, ContextHandler, HandlerOptions, InMemorySink, Level, Logger, TIME_KEY};
//!
//! let sink = InMemorySink::new();
//! let handler = ContextHandler::new(
//!     sink.clone(),
//!     HandlerOptions::new().level(Level::Debug).replace_attr(|groups, attr| {
//!         if groups.is_empty() && attr.key() == TIME_KEY { Attr::empty() } else { attr }
//!     }),
//! );
//! let logger = Logger::new(handler);
//!
//! let ctx = Context::background().with_attr("custom_key", "custom_val");
//! logger.debug_ctx(&ctx, "Hello, World!", &[]).unwrap();
//!
//! assert_eq!(
//!     sink.drain_logs(),
//!     r#"{"level":"DEBUG","msg":"Hello, World!","custom_key":"custom_val"}"#
//! );
//! ```

use std::io::Write;
use std::sync::Arc;

use crate::Level;
use crate::attr::Attr;
use crate::context::Context;
use crate::ctx_attrs::ctx_attrs;
use crate::error::HandleError;
use crate::handler::Handler;
use crate::json_handler::JsonHandler;
use crate::log_record::LogRecord;
use crate::options::HandlerOptions;

/// A [`Handler`] that adds context attributes to every record.
///
/// Attributes attached with [`with_attr`](crate::with_attr) or
/// [`with_attrs`](crate::with_attrs) are added after the record's own, and are
/// independent of attributes added with [`Handler::with_attrs`].
#[derive(Debug, Clone)]
pub struct ContextHandler {
    inner: Arc<dyn Handler>,
}

impl ContextHandler {
    /// Creates a `ContextHandler` around a [`JsonHandler`] writing to `sink`.
    pub fn new<W: Write + Send + 'static>(sink: W, options: HandlerOptions) -> Self {
        Self::wrap(JsonHandler::new(sink, options))
    }

    /// Wraps an arbitrary handler.
    pub fn wrap(inner: impl Handler + 'static) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// The wrapped handler.
    pub fn inner(&self) -> &Arc<dyn Handler> {
        &self.inner
    }
}

impl Handler for ContextHandler {
    fn enabled(&self, ctx: &Context, level: Level) -> bool {
        self.inner.enabled(ctx, level)
    }

    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Handler> {
        Arc::new(ContextHandler {
            inner: self.inner.with_attrs(attrs),
        })
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        Arc::new(ContextHandler {
            inner: self.inner.with_group(name),
        })
    }

    fn handle(&self, ctx: &Context, record: &LogRecord) -> Result<(), HandleError> {
        match ctx_attrs(ctx) {
            Some(attrs) => {
                let mut enriched = record.clone();
                enriched.add_attrs(attrs.iter().cloned());
                self.inner.handle(ctx, &enriched)
            }
            None => self.inner.handle(ctx, record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inmemory_sink::InMemorySink;
    use crate::options::TIME_KEY;
    use crate::with_attrs;
    use parking_lot::Mutex;

    fn no_time() -> HandlerOptions {
        HandlerOptions::new().level(Level::Debug).replace_attr(|groups, attr| {
            if groups.is_empty() && attr.key() == TIME_KEY {
                Attr::empty()
            } else {
                attr
            }
        })
    }

    /// Keeps every record it is given.
    #[derive(Debug, Default)]
    struct Recorder {
        records: Arc<Mutex<Vec<LogRecord>>>,
        levels_asked: Arc<Mutex<Vec<Level>>>,
    }

    impl Handler for Recorder {
        fn enabled(&self, _ctx: &Context, level: Level) -> bool {
            self.levels_asked.lock().push(level);
            level >= Level::Warn
        }

        fn with_attrs(&self, _attrs: &[Attr]) -> Arc<dyn Handler> {
            unimplemented!("not exercised")
        }

        fn with_group(&self, _name: &str) -> Arc<dyn Handler> {
            unimplemented!("not exercised")
        }

        fn handle(&self, _ctx: &Context, record: &LogRecord) -> Result<(), HandleError> {
            self.records.lock().push(record.clone());
            Ok(())
        }
    }

    #[test]
    fn enabled_is_delegated() {
        let recorder = Recorder::default();
        let asked = recorder.levels_asked.clone();
        let handler = ContextHandler::wrap(recorder);
        let ctx = Context::background().with_attr("a", "1");
        assert!(!handler.enabled(&ctx, Level::Info));
        assert!(handler.enabled(&ctx, Level::Error));
        assert_eq!(*asked.lock(), [Level::Info, Level::Error]);
    }

    #[test]
    fn context_attrs_are_added_without_touching_the_original() {
        let recorder = Recorder::default();
        let records = recorder.records.clone();
        let handler = ContextHandler::wrap(recorder);

        let mut record = LogRecord::new(Level::Warn, "m");
        record.add_attrs([Attr::string("call_site", "x")]);
        let before = record.clone();

        let ctx = with_attrs(&Context::background(), [("a", "1"), ("b", "2")]);
        handler.handle(&ctx, &record).unwrap();
        assert_eq!(record, before);

        let seen = records.lock();
        assert_eq!(seen.len(), 1);
        let mut keys: Vec<_> = seen[0].attrs().iter().map(Attr::key).collect();
        assert_eq!(keys[0], "call_site");
        keys.sort();
        assert_eq!(keys, ["a", "b", "call_site"]);
    }

    #[test]
    fn record_passes_through_when_no_map() {
        let recorder = Recorder::default();
        let records = recorder.records.clone();
        let handler = ContextHandler::wrap(recorder);
        let record = LogRecord::new(Level::Warn, "m");
        handler.handle(&Context::background(), &record).unwrap();
        assert_eq!(records.lock()[0], record);
    }

    #[test]
    fn output_matches_wrapped_handler_on_miss() {
        let direct_sink = InMemorySink::new();
        let wrapped_sink = InMemorySink::new();
        let direct = JsonHandler::new(direct_sink.clone(), no_time());
        let wrapped = ContextHandler::new(wrapped_sink.clone(), no_time());

        let mut record = LogRecord::new(Level::Info, "same");
        record.add_attrs([Attr::int("n", 1)]);
        let ctx = Context::background();
        direct.handle(&ctx, &record).unwrap();
        wrapped.handle(&ctx, &record).unwrap();

        assert_eq!(direct_sink.drain_logs(), wrapped_sink.drain_logs());
    }

    #[test]
    fn present_but_empty_map_adds_nothing() {
        let sink = InMemorySink::new();
        let handler = ContextHandler::new(sink.clone(), no_time());
        let ctx = with_attrs(&Context::background(), Vec::<(String, String)>::new());
        handler
            .handle(&ctx, &LogRecord::new(Level::Info, "quiet"))
            .unwrap();
        assert_eq!(sink.drain_logs(), r#"{"level":"INFO","msg":"quiet"}"#);
    }

    #[test]
    fn static_and_context_attrs_are_additive() {
        let sink = InMemorySink::new();
        let handler = ContextHandler::new(sink.clone(), no_time())
            .with_attrs(&[Attr::string("service", "billing")]);
        let ctx = Context::background().with_attr("request_id", "r-9");
        handler
            .handle(&ctx, &LogRecord::new(Level::Info, "charged"))
            .unwrap();
        assert_eq!(
            sink.drain_logs(),
            r#"{"level":"INFO","msg":"charged","service":"billing","request_id":"r-9"}"#
        );
    }

    #[test]
    fn context_attrs_land_in_the_open_group() {
        let sink = InMemorySink::new();
        let handler = ContextHandler::new(sink.clone(), no_time()).with_group("req");
        let ctx = Context::background().with_attr("id", "r-1");
        handler
            .handle(&ctx, &LogRecord::new(Level::Info, "grouped"))
            .unwrap();
        assert_eq!(
            sink.drain_logs(),
            r#"{"level":"INFO","msg":"grouped","req":{"id":"r-1"}}"#
        );
    }

    #[test]
    fn derived_handlers_stay_context_aware() {
        let sink = InMemorySink::new();
        let handler = ContextHandler::new(sink.clone(), no_time())
            .with_group("g")
            .with_attrs(&[Attr::bool("static", true)]);
        let ctx = Context::background().with_attr("dynamic", "yes");
        handler
            .handle(&ctx, &LogRecord::new(Level::Info, "both"))
            .unwrap();
        assert_eq!(
            sink.drain_logs(),
            r#"{"level":"INFO","msg":"both","g":{"static":true,"dynamic":"yes"}}"#
        );
    }

    struct ClosedSink;

    impl Write for ClosedSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn sink_errors_pass_through_enriched_records() {
        let handler = ContextHandler::new(ClosedSink, HandlerOptions::new());
        let ctx = with_attrs(&Context::background(), [("request_id", "r-3")]);

        let err = handler
            .handle(&ctx, &LogRecord::new(Level::Info, "lost"))
            .unwrap_err();
        match err {
            HandleError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::BrokenPipe),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
