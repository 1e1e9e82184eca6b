// SPDX-License-Identifier: MIT OR Apache-2.0
use crate::Level;
use crate::attr::Attr;
use crate::context::Context;
use crate::error::HandleError;
use crate::log_record::LogRecord;
use std::fmt::Debug;
use std::sync::Arc;

pub trait Handler: Debug + Send + Sync {
    /**
    Reports whether records at `level` would be handled.

    Callers check this before building a record, so it should be cheap.
    */
    fn enabled(&self, ctx: &Context, level: Level) -> bool;

    /**
    Returns a handler that behaves like this one, with `attrs` added to every record.

    The attributes belong to whatever group is open on this handler.
    */
    fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Handler>;

    /**
    Returns a handler that places all further attributes, both from later
    [Self::with_attrs] calls and from records, inside the group `name`.
    */
    fn with_group(&self, name: &str) -> Arc<dyn Handler>;

    /**
    Emits the record.

    The record is borrowed; a handler that needs to change it works on a clone.
    Errors are failures of the underlying sink and are returned unchanged.
    */
    fn handle(&self, ctx: &Context, record: &LogRecord) -> Result<(), HandleError>;
}

/*
Boilerplate notes.

# Handler

Clone is replaced by with_attrs/with_group returning new Arc'd handlers, which keeps the trait object-safe.
PartialEq and Eq: unclear whether we'd mean configuration or sink identity.  Not implemented.
Default is not sensible, since handlers need a sink.
Send/Sync are required: one handler is shared by every thread that logs.
*/
