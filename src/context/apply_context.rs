// SPDX-License-Identifier: MIT OR Apache-2.0

//! Async context preservation.

use std::future::Future;
use std::pin::Pin;
use std::task::Poll;

use super::context_impl::Context;

/// A [`Future`] wrapper that makes a context current while the future is polled.
///
/// Executors move futures between threads and poll unrelated futures on the same
/// thread, so the thread-local [`Context::current`] cannot be relied on across an
/// `.await`.  `ApplyContext` installs its context before each poll and restores
/// whatever was current afterwards.
///
/// # Examples
///
/// ```rust
/// use ctxlog::context::{ApplyContext, Context};
///
/// async fn handle_request() -> Option<String> {
///     Context::current()
///         .attrs()
///         .and_then(|attrs| attrs.get("request_id"))
///         .map(|attr| attr.value().to_string())
/// }
///
/// # async fn example() {
/// let ctx = Context::background().with_attr("request_id", "r-17");
/// let id = ApplyContext::new(ctx, handle_request()).await;
/// assert_eq!(id.as_deref(), Some("r-17"));
/// # }
/// ```
pub struct ApplyContext<F> {
    context: Context,
    fut: Pin<Box<F>>,
}

impl<F> ApplyContext<F> {
    /// Creates a new `ApplyContext` wrapper.
    pub fn new(context: Context, f: F) -> Self {
        Self {
            context,
            fut: Box::pin(f),
        }
    }
}

/// Puts the prior context back when dropped, including while unwinding.
struct RestoreCurrent(Context);

impl Drop for RestoreCurrent {
    fn drop(&mut self) {
        std::mem::take(&mut self.0).set_current();
    }
}

impl<F> Future for ApplyContext<F>
where
    F: Future,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut std::task::Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let _restore = RestoreCurrent(Context::current());
        this.context.clone().set_current();
        this.fut.as_mut().poll(cx)
    }
}
