// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration, derived overflow state, and the collapse algorithm.

use alloc::vec;
use alloc::vec::Vec;

use crate::width::clamp_width;
use crate::{OverflowItem, WidthModel};

/// Default number of items that always stay visible.
pub const DEFAULT_MINIMUM_VISIBLE: usize = 2;

/// Default width reserved for the overflow trigger once something overflows.
pub const DEFAULT_TRIGGER_RESERVED_WIDTH: f64 = 60.0;

/// Tuning for the collapse algorithm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverflowConfig {
    /// Number of items kept visible even when the container cannot fit them.
    ///
    /// When the sequence has this many items or fewer, nothing ever overflows
    /// and no trigger is shown. Visual overflow of the container is tolerated.
    pub minimum_visible: usize,
    /// Width set aside for the overflow trigger when at least one item overflows.
    ///
    /// The trigger itself never counts toward the visible budget.
    pub trigger_reserved_width: f64,
}

impl Default for OverflowConfig {
    fn default() -> Self {
        Self {
            minimum_visible: DEFAULT_MINIMUM_VISIBLE,
            trigger_reserved_width: DEFAULT_TRIGGER_RESERVED_WIDTH,
        }
    }
}

impl OverflowConfig {
    /// Returns a copy with a different minimum visible count.
    #[must_use]
    pub const fn with_minimum_visible(mut self, minimum_visible: usize) -> Self {
        self.minimum_visible = minimum_visible;
        self
    }

    /// Returns a copy with a different trigger reservation.
    #[must_use]
    pub fn with_trigger_reserved_width(mut self, width: f64) -> Self {
        self.trigger_reserved_width = clamp_width(width);
        self
    }
}

/// Result of partitioning a sequence into visible and overflowed items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverflowState {
    visible: Vec<bool>,
    visible_count: usize,
    generation: u64,
}

impl OverflowState {
    /// State for an empty sequence.
    #[must_use]
    pub const fn empty(generation: u64) -> Self {
        Self {
            visible: Vec::new(),
            visible_count: 0,
            generation,
        }
    }

    fn all_visible(len: usize, generation: u64) -> Self {
        Self {
            visible: vec![true; len],
            visible_count: len,
            generation,
        }
    }

    /// Item-set generation this state was computed for.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Total number of items covered by this state.
    #[must_use]
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    /// Returns `true` if this state covers no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Returns `true` if the item at `index` stays in the primary layout.
    ///
    /// Out-of-range indices are reported as not visible.
    #[must_use]
    pub fn is_visible(&self, index: usize) -> bool {
        self.visible.get(index).copied().unwrap_or(false)
    }

    /// Number of items that stay in the primary layout.
    #[must_use]
    pub const fn visible_count(&self) -> usize {
        self.visible_count
    }

    /// Number of items moved into the overflow menu.
    #[must_use]
    pub fn overflow_count(&self) -> usize {
        self.visible.len() - self.visible_count
    }

    /// Returns `true` if at least one item overflows.
    #[must_use]
    pub fn is_overflowing(&self) -> bool {
        self.overflow_count() > 0
    }

    /// Indices of visible items, in sequence order.
    pub fn visible_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.visible
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.then_some(i))
    }

    /// Indices of overflowed items, in sequence order.
    pub fn overflow_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.visible
            .iter()
            .enumerate()
            .filter_map(|(i, v)| (!v).then_some(i))
    }
}

/// Partition `items` into visible and overflowed given the available width.
///
/// - Zero items yield an empty state.
/// - With `minimum_visible` items or fewer, every item is visible at any width.
/// - If all items fit, every item is visible and no trigger space is reserved.
/// - Otherwise [`OverflowConfig::trigger_reserved_width`] is taken off the budget
///   and items collapse in collapse order (lowest priority first, later items
///   first among equal priority) until the rest fit or only `minimum_visible`
///   remain.
pub fn compute_overflow<K, M>(
    items: &[OverflowItem<K>],
    model: &mut M,
    available_width: f64,
    config: &OverflowConfig,
    generation: u64,
) -> OverflowState
where
    M: WidthModel<K> + ?Sized,
{
    let len = items.len();
    if len == 0 {
        return OverflowState::empty(generation);
    }
    if len <= config.minimum_visible {
        return OverflowState::all_visible(len, generation);
    }

    let widths: Vec<f64> = items
        .iter()
        .enumerate()
        .map(|(i, item)| clamp_width(model.width_of(&item.key, i)))
        .collect();
    let mut used: f64 = widths.iter().sum();
    let available = clamp_width(available_width);
    if used <= available {
        return OverflowState::all_visible(len, generation);
    }

    let budget = available - clamp_width(config.trigger_reserved_width);
    let mut state = OverflowState::all_visible(len, generation);
    for index in collapse_order(items) {
        if state.visible_count <= config.minimum_visible || used <= budget {
            break;
        }
        state.visible[index] = false;
        state.visible_count -= 1;
        used -= widths[index];
    }

    tracing::trace!(
        generation,
        available,
        visible = state.visible_count,
        overflow = state.overflow_count(),
        "overflow recomputed"
    );
    state
}

/// Indices in the order they are collapsed.
///
/// Lowest effective priority first; among equal priority, later items first.
pub fn collapse_order<K>(items: &[OverflowItem<K>]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| {
        items[a]
            .effective_priority()
            .cmp(&items[b].effective_priority())
            .then_with(|| b.cmp(&a))
    });
    order
}
