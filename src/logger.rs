//SPDX-License-Identifier: MIT OR Apache-2.0
use crate::Level;
use crate::attr::Attr;
use crate::context::Context;
use crate::error::HandleError;
use crate::handler::Handler;
use crate::log_record::LogRecord;
use std::panic::Location;
use std::sync::Arc;

/**
The front end for emitting records.

A `Logger` is a cheap handle around an `Arc<dyn Handler>`; clone it freely.

Each level has two methods.  `info` logs against [`Context::current`], `info_ctx`
against an explicit context.  Both return whatever the handler returned, so a
failing sink is visible to the caller.

```
use ctxlog::context::Context;
use ctxlog::{Attr, ContextHandler, HandlerOptions, InMemorySink, Logger};

let sink = InMemorySink::new();
let logger = Logger::new(ContextHandler::new(sink.clone(), HandlerOptions::new()))
    .with(&[Attr::string("component", "checkout")]);

let ctx = Context::background().with_attr("order", "o-77");
logger.info_ctx(&ctx, "order placed", &[Attr::uint("items", 3)]).unwrap();

let line = sink.drain_logs();
assert!(line.contains(r#""msg":"order placed","component":"checkout","items":3,"order":"o-77""#));
```
*/
#[derive(Debug, Clone)]
pub struct Logger {
    handler: Arc<dyn Handler>,
}

impl Logger {
    pub fn new(handler: impl Handler + 'static) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    pub fn from_arc(handler: Arc<dyn Handler>) -> Self {
        Self { handler }
    }

    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    /// A logger whose records all carry `attrs`.
    pub fn with(&self, attrs: &[Attr]) -> Logger {
        if attrs.is_empty() {
            return self.clone();
        }
        Logger::from_arc(self.handler.with_attrs(attrs))
    }

    /// A logger whose further attributes are placed in the group `name`.
    pub fn with_group(&self, name: &str) -> Logger {
        if name.is_empty() {
            return self.clone();
        }
        Logger::from_arc(self.handler.with_group(name))
    }

    pub fn enabled(&self, ctx: &Context, level: Level) -> bool {
        self.handler.enabled(ctx, level)
    }

    /**
    Emits a record at `level`.

    Disabled levels return `Ok(())` without building a record.
    */
    #[track_caller]
    pub fn log(
        &self,
        ctx: &Context,
        level: Level,
        message: &str,
        attrs: &[Attr],
    ) -> Result<(), HandleError> {
        if !self.handler.enabled(ctx, level) {
            return Ok(());
        }
        let mut record = LogRecord::new(level, message).with_source(Location::caller());
        record.add_attrs(attrs.iter().cloned());
        self.handler.handle(ctx, &record)
    }

    #[track_caller]
    pub fn debug_ctx(&self, ctx: &Context, message: &str, attrs: &[Attr]) -> Result<(), HandleError> {
        self.log(ctx, Level::Debug, message, attrs)
    }

    #[track_caller]
    pub fn info_ctx(&self, ctx: &Context, message: &str, attrs: &[Attr]) -> Result<(), HandleError> {
        self.log(ctx, Level::Info, message, attrs)
    }

    #[track_caller]
    pub fn warn_ctx(&self, ctx: &Context, message: &str, attrs: &[Attr]) -> Result<(), HandleError> {
        self.log(ctx, Level::Warn, message, attrs)
    }

    #[track_caller]
    pub fn error_ctx(&self, ctx: &Context, message: &str, attrs: &[Attr]) -> Result<(), HandleError> {
        self.log(ctx, Level::Error, message, attrs)
    }

    #[track_caller]
    pub fn debug(&self, message: &str, attrs: &[Attr]) -> Result<(), HandleError> {
        self.log(&Context::current(), Level::Debug, message, attrs)
    }

    #[track_caller]
    pub fn info(&self, message: &str, attrs: &[Attr]) -> Result<(), HandleError> {
        self.log(&Context::current(), Level::Info, message, attrs)
    }

    #[track_caller]
    pub fn warn(&self, message: &str, attrs: &[Attr]) -> Result<(), HandleError> {
        self.log(&Context::current(), Level::Warn, message, attrs)
    }

    #[track_caller]
    pub fn error(&self, message: &str, attrs: &[Attr]) -> Result<(), HandleError> {
        self.log(&Context::current(), Level::Error, message, attrs)
    }
}

/*
Boilerplate notes.

# Logger

Clone is cheap (one Arc) and is how loggers are passed around.
PartialEq and Eq: same provenance question as for handlers.  Not implemented.
Default: the process default lives in global_logger, not here.
*/
