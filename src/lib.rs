//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# ctxlog

ctxlog attaches structured log attributes to a request-scoped [`Context`](context::Context),
so every record logged with that context carries them, without passing a logger or an
attribute list through every function on the way.

# The problem

A request handler learns things as it goes: a request id, then a user, then an order.
Every log line below that point should mention them.  The usual options are to thread a
logger through every call, rebuilding it as attributes accumulate, or to stash attributes
in mutable shared state and hope concurrent requests don't trample each other.

# The approach

Attributes live on the context.  Each [`with_attr`] or [`with_attrs`] call returns a new
child context holding its own copy of the attribute map; the parent's map is never
touched.  A [`ContextHandler`] wraps a normal handler and, when a record is emitted,
adds the emitting context's attributes to it.

```rust
use ctxlog::context::Context;
use ctxlog::{Attr, ContextHandler, HandlerOptions, InMemorySink, Level, Logger, TIME_KEY};

let sink = InMemorySink::new();
let logger = Logger::new(ContextHandler::new(
    sink.clone(),
    HandlerOptions::new()
        .level(Level::Debug)
        .replace_attr(|groups, a| if groups.is_empty() && a.key() == TIME_KEY { Attr::empty() } else { a }),
));

fn charge(logger: &Logger, ctx: &Context) {
    let ctx = ctx.with_attr("step", "charge");
    logger.info_ctx(&ctx, "charging card", &[]).unwrap();
}

let ctx = Context::background().with_attrs([("request_id", "r-1"), ("user", "alice")]);
charge(&logger, &ctx);
logger.info_ctx(&ctx, "done", &[]).unwrap();

let lines = sink.drain_lines();
assert!(lines[0].contains(r#""step":"charge""#));
assert!(lines[0].contains(r#""request_id":"r-1""#));
assert!(!lines[1].contains("step"));
```

# Output

[`JsonHandler`] writes one JSON object per line: `time`, `level`, `msg`, then attributes.
Static attributes from [`Handler::with_attrs`], context attributes and call-site
attributes all land in the same object, inside any group opened with
[`Handler::with_group`].  The order of context attributes within a line is unspecified.

# Multithreading

Contexts are immutable and `Send + Sync`.  Any number of threads may derive children from
the same parent at once.  Each thread also has a current context ([`Context::current`](context::Context::current)),
and [`ApplyContext`](context::ApplyContext) carries one across `.await` points.
*/

mod attr;
pub mod context;
mod ctx_attrs;
mod ctx_handler;
mod error;
pub mod global_logger;
mod handler;
mod inmemory_sink;
mod json_handler;
mod level;
mod log_record;
mod logger;
mod options;

pub use attr::{Attr, Value};
pub use ctx_attrs::{AttrMap, ctx_attrs, with_attr, with_attr_value, with_attrs};
pub use ctx_handler::ContextHandler;
pub use error::{HandleError, ParseLevelError};
pub use global_logger::{default_logger, set_default_logger};
pub use handler::Handler;
pub use inmemory_sink::InMemorySink;
pub use json_handler::JsonHandler;
pub use level::{Level, LevelVar, Leveler};
pub use log_record::LogRecord;
pub use logger::Logger;
pub use options::{HandlerOptions, LEVEL_KEY, MESSAGE_KEY, ReplaceAttr, SOURCE_KEY, TIME_KEY};
