// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request-scoped execution contexts.
//!
//! A [`Context`] is an immutable node in a parent-linked chain.  Each node can
//! carry one extension value under a key type; lookups walk towards the root,
//! so children see what their ancestors carry and may shadow it.  Deriving a
//! child never changes the parent.
//!
//! # Passing contexts
//!
//! The usual way is explicit: functions take `&Context` and derive children
//! as they add request-scoped data.
//!
//! ```rust
//! use ctxlog::context::Context;
//!
//! fn handle(ctx: &Context, user: &str) -> Context {
//!     ctx.with_attr("user", user)
//! }
//!
//! let root = Context::background().with_attr("request_id", "r-1");
//! let ctx = handle(&root, "alice");
//! assert_eq!(ctx.attrs().unwrap().len(), 2);
//! assert_eq!(root.attrs().unwrap().len(), 1);
//! ```
//!
//! # Thread-Local Context
//!
//! Each thread also has a current context, initially [`Context::background`],
//! which the logger's context-free methods use.
//!
//! ```rust
//! use ctxlog::context::Context;
//!
//! Context::current().with_attr("worker", "7").set_current();
//! assert!(Context::current().attrs().is_some());
//! # Context::background().set_current();
//! ```
//!
//! # Async Context Preservation
//!
//! [`ApplyContext`] keeps a context current for every poll of a future, whichever
//! thread polls it.
//!
//! ```rust
//! use ctxlog::context::{ApplyContext, Context};
//! # async fn async_operation() {}
//!
//! # async fn example() {
//! let ctx = Context::background().with_attr("job", "nightly");
//! ApplyContext::new(ctx, async_operation()).await;
//! # }
//! ```

mod apply_context;
mod context_impl;

#[cfg(test)]
mod tests;

pub use apply_context::ApplyContext;
pub use context_impl::Context;
