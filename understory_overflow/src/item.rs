// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overflow items and priority normalization.

use alloc::vec::Vec;

/// A single entry in an overflow-aware sequence.
///
/// The position of an item in its sequence matters: it is the default collapse
/// order (later items collapse first) before priorities are consulted.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OverflowItem<K> {
    /// Unique, stable identifier supplied by the caller.
    pub key: K,
    /// Optional render priority.
    ///
    /// Higher priorities are preferred to stay visible. `None` means "no explicit
    /// priority" and is treated as `0` when ordering collapses.
    pub priority: Option<i32>,
}

impl<K> OverflowItem<K> {
    /// Creates an item with no explicit priority.
    #[must_use]
    pub const fn new(key: K) -> Self {
        Self {
            key,
            priority: None,
        }
    }

    /// Creates an item with an explicit priority.
    #[must_use]
    pub const fn with_priority(key: K, priority: i32) -> Self {
        Self {
            key,
            priority: Some(priority),
        }
    }

    /// Priority used for collapse ordering (`None` is `0`).
    #[must_use]
    pub fn effective_priority(&self) -> i32 {
        self.priority.unwrap_or(0)
    }

    /// Returns `true` if this item carries an explicit priority greater than zero.
    ///
    /// Such items are grouped after the overflow trigger.
    #[must_use]
    pub fn is_prioritized(&self) -> bool {
        self.priority.is_some_and(|p| p > 0)
    }
}

/// Builds overflow items from an arbitrary caller slice.
///
/// `get_key` and `get_priority` receive each source item together with its
/// index. When `get_priority` is `None` every item has no explicit priority.
pub fn items_from<T, K>(
    source: &[T],
    get_key: impl Fn(&T, usize) -> K,
    get_priority: Option<&dyn Fn(&T, usize) -> Option<i32>>,
) -> Vec<OverflowItem<K>> {
    source
        .iter()
        .enumerate()
        .map(|(index, item)| OverflowItem {
            key: get_key(item, index),
            priority: get_priority.and_then(|f| f(item, index)),
        })
        .collect()
}

/// Index at which the overflow trigger is inserted into the rendered sequence.
///
/// The trigger goes immediately before the first item with an explicit priority
/// greater than zero, so callers can group their prioritized items after it. If
/// no such item exists the trigger is appended (the returned index is `len`).
#[must_use]
pub fn trigger_slot<K>(items: &[OverflowItem<K>]) -> usize {
    items
        .iter()
        .position(OverflowItem::is_prioritized)
        .unwrap_or(items.len())
}
