// SPDX-License-Identifier: MIT OR Apache-2.0

//! The process-wide default logger.
//!
//! Libraries that have no logger passed to them can fall back to
//! [`default_logger`].  The application binds it once, early, with
//! [`set_default_logger`]; after that it never changes, so reading it needs no
//! locking and concurrent initialization cannot race.
//!
//! # Default behavior
//!
//! If nothing was bound before the first [`default_logger`] call, a
//! [`ContextHandler`] writing JSON to stderr at `Info` is bound instead.
//!
//! # Examples
//!
//! ```
//! use ctxlog::context::Context;
//! use ctxlog::{ContextHandler, HandlerOptions, Level, Logger, default_logger, set_default_logger};
//!
//! let logger = Logger::new(ContextHandler::new(
//!     std::io::stderr(),
//!     HandlerOptions::new().level(Level::Debug),
//! ));
//! set_default_logger(logger).expect("bound once at startup");
//!
//! let ctx = Context::background().with_attr("request_id", "r-1");
//! default_logger().debug_ctx(&ctx, "visible at debug", &[]).unwrap();
//!
//! // a second binding is refused and handed back
//! let again = Logger::new(ContextHandler::new(std::io::stderr(), HandlerOptions::new()));
//! assert!(set_default_logger(again).is_err());
//! ```

use std::sync::OnceLock;

use crate::ctx_handler::ContextHandler;
use crate::logger::Logger;
use crate::options::HandlerOptions;

static DEFAULT_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Binds the default logger.
///
/// Fails, returning `logger`, if a default is already bound (including the
/// stderr fallback bound by an earlier [`default_logger`] call).
pub fn set_default_logger(logger: Logger) -> Result<(), Logger> {
    DEFAULT_LOGGER.set(logger)
}

/// Returns the default logger, binding the stderr fallback if none was set.
pub fn default_logger() -> &'static Logger {
    DEFAULT_LOGGER.get_or_init(|| {
        Logger::new(ContextHandler::new(
            std::io::stderr(),
            HandlerOptions::new(),
        ))
    })
}
