// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log attributes carried by a [`Context`].
//!
//! Each call to [`with_attr`] or [`with_attrs`] returns a *new* child context
//! holding a fresh [`AttrMap`]: a clone of the nearest map reachable from the
//! parent, with the new entries written over it.  Maps are never touched after
//! they are attached, so:
//!
//! - a child never leaks attributes into its parent,
//! - a map read from a context never changes afterwards,
//! - contexts may be shared freely across threads.
//!
//! The map lives in a context slot keyed by a private type, so nothing outside
//! this module can read or overwrite it except through these functions.
//!
//! ```rust
//! use ctxlog::context::Context;
//! use ctxlog::{ctx_attrs, with_attr};
//!
//! let parent = with_attr(&Context::background(), "a", "parent");
//! let child = with_attr(&parent, "a", "child");
//!
//! assert_eq!(ctx_attrs(&parent).unwrap().get("a").unwrap().value().to_string(), "parent");
//! assert_eq!(ctx_attrs(&child).unwrap().get("a").unwrap().value().to_string(), "child");
//! ```

use std::collections::HashMap;
use std::collections::hash_map;

use crate::attr::Attr;
use crate::context::Context;

/// Slot key for the attribute map.
struct CtxAttrsKey;

/// The attributes attached to one context node, keyed by attribute key.
///
/// Iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttrMap {
    entries: HashMap<String, Attr>,
}

impl AttrMap {
    /// The attribute stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Attr> {
        self.entries.get(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True for a map attached with no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the attributes in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Attr> {
        self.entries.values()
    }

    fn insert(&mut self, attr: Attr) {
        self.entries.insert(attr.key().to_string(), attr);
    }
}

impl<'a> IntoIterator for &'a AttrMap {
    type Item = &'a Attr;
    type IntoIter = hash_map::Values<'a, String, Attr>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

impl FromIterator<Attr> for AttrMap {
    fn from_iter<T: IntoIterator<Item = Attr>>(iter: T) -> Self {
        let mut map = AttrMap::default();
        for attr in iter {
            map.insert(attr);
        }
        map
    }
}

/// Returns the attribute map reachable from `ctx`, if any was ever attached.
///
/// `None` means no attribute was attached to `ctx` or any of its ancestors;
/// `Some` of an empty map means an attach happened with no entries.
pub fn ctx_attrs(ctx: &Context) -> Option<&AttrMap> {
    ctx.value::<AttrMap>(&CtxAttrsKey)
}

fn clone_reachable(ctx: &Context) -> AttrMap {
    ctx_attrs(ctx).cloned().unwrap_or_default()
}

/// Returns a child of `ctx` whose attributes include `key` as a string attribute.
///
/// An existing `key` is overwritten in the child only.
pub fn with_attr(ctx: &Context, key: impl Into<String>, value: impl Into<String>) -> Context {
    with_attr_value(ctx, Attr::string(key, value))
}

/// Like [`with_attr`], but keeps the attribute's typed value.
///
/// ```rust
/// use ctxlog::context::Context;
/// use ctxlog::{Attr, Value, ctx_attrs, with_attr_value};
///
/// let ctx = with_attr_value(&Context::background(), Attr::uint("shard", 3));
/// assert_eq!(ctx_attrs(&ctx).unwrap().get("shard").unwrap().value(), &Value::U64(3));
/// ```
pub fn with_attr_value(ctx: &Context, attr: Attr) -> Context {
    let mut map = clone_reachable(ctx);
    map.insert(attr);
    ctx.with_value(CtxAttrsKey, map)
}

/// Returns a child of `ctx` with every entry of `entries` attached as a string attribute.
///
/// The reachable map is cloned once for the whole batch.  With no entries the
/// child still carries a (possibly empty) map of its own.
pub fn with_attrs<I, K, V>(ctx: &Context, entries: I) -> Context
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut map = clone_reachable(ctx);
    for (key, value) in entries {
        map.insert(Attr::string(key, value));
    }
    ctx.with_value(CtxAttrsKey, map)
}

impl Context {
    /// Method form of [`with_attr`].
    pub fn with_attr(&self, key: impl Into<String>, value: impl Into<String>) -> Context {
        with_attr(self, key, value)
    }

    /// Method form of [`with_attrs`].
    pub fn with_attrs<I, K, V>(&self, entries: I) -> Context
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        with_attrs(self, entries)
    }

    /// Method form of [`ctx_attrs`].
    pub fn attrs(&self) -> Option<&AttrMap> {
        ctx_attrs(self)
    }
}
