// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tests for the context module.

use super::apply_context::ApplyContext;
use super::context_impl::Context;
use test_executors::async_test;

struct KeyA;
struct KeyB;

#[test]
fn background_is_shared_and_empty() {
    let a = Context::background();
    let b = Context::background();
    assert_eq!(a, b);
    assert!(a.parent().is_none());
    assert_eq!(a.depth(), 0);
    assert_eq!(a.value::<u32>(&KeyA), None);
}

#[test]
fn value_walks_to_nearest_ancestor() {
    let root = Context::background();
    let with_a = root.with_value(KeyA, 1u32);
    let with_b = with_a.with_value(KeyB, "b");
    let shadowed = with_b.with_value(KeyA, 2u32);

    assert_eq!(with_b.value::<u32>(&KeyA), Some(&1));
    assert_eq!(with_b.value::<&str>(&KeyB), Some(&"b"));
    assert_eq!(shadowed.value::<u32>(&KeyA), Some(&2));
    assert_eq!(with_a.value::<&str>(&KeyB), None);
    assert_eq!(shadowed.parent(), Some(&with_b));
}

#[test]
fn wrong_value_type_is_a_miss() {
    let ctx = Context::background()
        .with_value(KeyA, 1u32)
        .with_value(KeyA, "not a number");
    assert_eq!(ctx.value::<u32>(&KeyA), None);
}

#[test]
fn test_context_equality() {
    let context1 = Context::background().with_value(KeyA, 1u8);
    let context2 = context1.clone();
    let context3 = Context::background().with_value(KeyA, 1u8);

    // Same Arc pointer should be equal
    assert_eq!(context1, context2);

    // Equal contents are not enough
    assert_ne!(context1, context3);
}

#[test]
fn test_context_hash() {
    use std::collections::HashMap;

    let context1 = Context::background().with_attr("a", "1");
    let context2 = context1.clone();
    let context3 = Context::background().with_attr("a", "1");

    let mut map = HashMap::new();
    map.insert(context1.clone(), "value1");
    map.insert(context3.clone(), "value3");

    assert_eq!(map.get(&context1), Some(&"value1"));
    assert_eq!(map.get(&context2), Some(&"value1")); // same as context1
    assert_eq!(map.get(&context3), Some(&"value3"));
    assert_eq!(map.len(), 2);
}

#[test]
fn current_starts_at_background_and_is_per_thread() {
    assert_eq!(
        std::thread::spawn(Context::current).join().unwrap(),
        Context::background()
    );

    let ctx = Context::background().with_attr("thread", "main");
    ctx.clone().set_current();
    assert_eq!(Context::current(), ctx);

    let other = std::thread::spawn(|| Context::current().attrs().is_none())
        .join()
        .unwrap();
    assert!(other);
    Context::background().set_current();
}

#[test]
fn contexts_cross_threads() {
    let ctx = Context::background().with_attr("origin", "parent-thread");
    let seen = std::thread::spawn(move || {
        ctx.attrs()
            .and_then(|attrs| attrs.get("origin"))
            .map(|attr| attr.value().to_string())
    })
    .join()
    .unwrap();
    assert_eq!(seen.as_deref(), Some("parent-thread"));
}

#[async_test]
async fn apply_context_scopes_the_current_context() {
    let outer = Context::background().with_attr("scope", "outer");
    outer.clone().set_current();

    let inner = Context::background().with_attr("scope", "inner");
    let seen = ApplyContext::new(inner.clone(), async { Context::current() }).await;

    assert_eq!(seen, inner);
    assert_eq!(Context::current(), outer);
    Context::background().set_current();
}

#[test]
fn dropping_a_deep_chain_does_not_overflow() {
    std::thread::Builder::new()
        .stack_size(256 * 1024)
        .spawn(|| {
            let mut ctx = Context::background();
            for i in 0..200_000u32 {
                ctx = ctx.with_attr("item", i.to_string());
            }
            assert_eq!(ctx.depth(), 200_000);
            drop(ctx);
        })
        .unwrap()
        .join()
        .unwrap();
    assert_eq!(Context::background().depth(), 0);
}

#[test]
fn shared_ancestors_survive_dropping_a_branch() {
    let parent = Context::background().with_value(KeyA, 7u32);
    let child = parent.with_value(KeyB, "child");
    drop(child);
    assert_eq!(parent.value::<u32>(&KeyA), Some(&7));
}

fn fail_task() -> u8 {
    panic!("task failed")
}

#[test]
fn apply_context_restores_current_when_the_future_panics() {
    use std::future::Future;
    use std::task::Waker;

    let outer = Context::background().with_attr("scope", "outer");
    outer.clone().set_current();

    let inner = Context::background().with_attr("scope", "inner");
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let mut fut = std::pin::pin!(ApplyContext::new(inner, async { fail_task() }));
        let _ = fut
            .as_mut()
            .poll(&mut std::task::Context::from_waker(Waker::noop()));
    }));

    assert!(result.is_err());
    assert_eq!(Context::current(), outer);
    Context::background().set_current();
}
