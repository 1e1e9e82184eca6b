// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core Context implementation.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

/// One extension value and the type that keys it.
struct Slot {
    key: TypeId,
    value: Arc<dyn Any + Send + Sync>,
}

impl std::fmt::Debug for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot").field("key", &self.key).finish_non_exhaustive()
    }
}

/// Internal context data.
///
/// Wrapped in an Arc for cheap cloning.  Never mutated after construction.
#[derive(Debug)]
pub(crate) struct ContextInner {
    pub(crate) parent: Option<Context>,
    slot: Option<Slot>,
}

/// An immutable node in a parent-linked chain of request-scoped values.
///
/// Each node carries at most one extension value, keyed by a type.  Looking a
/// key up walks from the node towards the root and returns the nearest match,
/// so a child transparently sees everything its ancestors carry and can shadow
/// it without touching them.
///
/// Contexts are cheap to clone (Arc-based) and thread-safe.
///
/// # Keys
///
/// The key is a type, usually a private zero-sized struct.  Code that cannot
/// name the type cannot read or overwrite the value, so two modules never
/// collide on a slot.
///
/// ```rust
/// use ctxlog::context::Context;
///
/// struct RequestId;
///
/// let root = Context::background();
/// let ctx = root.with_value(RequestId, 42u64);
/// assert_eq!(ctx.value::<u64>(&RequestId), Some(&42));
/// assert_eq!(root.value::<u64>(&RequestId), None);
///
/// // children inherit, and may shadow
/// let child = ctx.with_value(RequestId, 43u64);
/// assert_eq!(child.value::<u64>(&RequestId), Some(&43));
/// assert_eq!(ctx.value::<u64>(&RequestId), Some(&42));
/// ```
#[derive(Debug, Clone)]
pub struct Context {
    pub(crate) inner: Arc<ContextInner>,
}

impl Drop for ContextInner {
    fn drop(&mut self) {
        // Unlink ancestors one at a time so a long chain cannot exhaust the stack.
        let mut parent = self.parent.take();
        while let Some(context) = parent {
            parent = Arc::into_inner(context.inner).and_then(|mut inner| inner.parent.take());
        }
    }
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Context {}

impl Hash for Context {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.inner).hash(state);
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::background()
    }
}

/// Keys are told apart by type only.
fn key_id<K: Any>(_key: &K) -> TypeId {
    TypeId::of::<K>()
}

static BACKGROUND: OnceLock<Context> = OnceLock::new();

thread_local! {
    static CURRENT: RefCell<Option<Context>> = const { RefCell::new(None) };
}

impl Context {
    /// The shared root context.  It carries no values.
    pub fn background() -> Context {
        BACKGROUND
            .get_or_init(|| Context {
                inner: Arc::new(ContextInner {
                    parent: None,
                    slot: None,
                }),
            })
            .clone()
    }

    /// Returns a child of this context that carries `value` under the type of `key`.
    ///
    /// `self` is left untouched.
    pub fn with_value<V: Any + Send + Sync>(&self, key: impl Any, value: V) -> Context {
        Context {
            inner: Arc::new(ContextInner {
                parent: Some(self.clone()),
                slot: Some(Slot {
                    key: key_id(&key),
                    value: Arc::new(value),
                }),
            }),
        }
    }

    /// Looks up the value stored under the type of `key`.
    ///
    /// The nearest node with that key type wins.  If its value is not a `V`,
    /// the lookup misses rather than continuing to older values.
    pub fn value<V: 'static>(&self, key: &impl Any) -> Option<&V> {
        let key = key_id(key);
        let mut node = self;
        loop {
            if let Some(slot) = &node.inner.slot {
                if slot.key == key {
                    return slot.value.downcast_ref::<V>();
                }
            }
            node = node.inner.parent.as_ref()?;
        }
    }

    /// The context this one was derived from, if any.
    pub fn parent(&self) -> Option<&Context> {
        self.inner.parent.as_ref()
    }

    /// Returns the number of ancestors of this context.
    ///
    /// ```rust
    /// use ctxlog::context::Context;
    ///
    /// struct K;
    /// let root = Context::background();
    /// assert_eq!(root.depth(), 0);
    /// let child = root.with_value(K, 1u8);
    /// assert_eq!(child.depth(), 1);
    /// assert_eq!(child.with_value(K, 2u8).depth(), 2);
    /// ```
    pub fn depth(&self) -> usize {
        let mut level = 0;
        let mut current = self;
        while let Some(parent) = &current.inner.parent {
            level += 1;
            current = parent;
        }
        level
    }

    /// Returns the current context for this thread.
    ///
    /// Every thread starts at [`Context::background`].  The logger's
    /// context-free methods (`info`, `warn`, ...) log against this context.
    ///
    /// ```rust
    /// use ctxlog::context::Context;
    ///
    /// let ctx = Context::current().with_attr("request_id", "r-1");
    /// ctx.clone().set_current();
    /// assert_eq!(Context::current(), ctx);
    /// # Context::background().set_current();
    /// ```
    pub fn current() -> Context {
        CURRENT.with(|current| {
            current
                .borrow()
                .clone()
                .unwrap_or_else(Context::background)
        })
    }

    /// Sets this context as the current thread-local context.
    pub fn set_current(self) {
        CURRENT.with(|current| {
            current.replace(Some(self));
        });
    }
}
