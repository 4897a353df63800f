// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small controller that owns the item sequence, width model, and menu state.

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::width::clamp_width;
use crate::{
    OverflowConfig, OverflowItem, OverflowState, WidthModel, compute_overflow, items_from,
    trigger_slot,
};

/// One entry of the rendered sequence produced by [`OverflowController::layout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// The item at `index`. Hidden items keep their slot so hosts can keep
    /// them mounted but invisible.
    Item {
        /// Index into the item sequence.
        index: usize,
        /// Whether the item stays in the primary layout.
        visible: bool,
    },
    /// The overflow trigger. Only present while something overflows.
    Trigger {
        /// Number of items currently in the overflow menu.
        overflow_count: usize,
    },
}

/// Controller for an overflow-aware sequence.
///
/// This type:
/// - owns the item sequence and a [`WidthModel`],
/// - stores the available container width and [`OverflowConfig`],
/// - caches the last computed [`OverflowState`],
/// - tracks whether the overflow menu is open.
///
/// Every change to the key sequence starts a new *generation*. Cached state and
/// measurements from an older generation are never reported for the new one.
///
/// It does *not* know about any widget/view system; hosts observe container
/// resizes, feed widths into the model, and render from [`layout`](Self::layout).
#[derive(Debug)]
pub struct OverflowController<K, M> {
    items: Vec<OverflowItem<K>>,
    index_of: HashMap<K, usize>,
    model: M,
    config: OverflowConfig,
    available_width: f64,
    generation: u64,
    menu_open: bool,

    dirty: bool,
    last_state: OverflowState,
}

impl<K, M> OverflowController<K, M>
where
    K: Clone + Eq + Hash,
    M: WidthModel<K>,
{
    /// Creates an empty controller with the given width `model` and `config`.
    ///
    /// The available width starts at zero until the host reports a measurement.
    #[must_use]
    pub fn new(model: M, config: OverflowConfig) -> Self {
        Self {
            items: Vec::new(),
            index_of: HashMap::new(),
            model,
            config,
            available_width: 0.0,
            generation: 0,
            menu_open: false,
            dirty: true,
            last_state: OverflowState::empty(0),
        }
    }

    /// Creates a controller over `items`.
    #[must_use]
    pub fn with_items(
        items: impl IntoIterator<Item = OverflowItem<K>>,
        model: M,
        config: OverflowConfig,
    ) -> Self {
        let mut controller = Self::new(model, config);
        controller.set_items(items);
        controller
    }

    /// Returns the item sequence.
    #[must_use]
    pub fn items(&self) -> &[OverflowItem<K>] {
        &self.items
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of the item with `key`, if present.
    #[must_use]
    pub fn index_of(&self, key: &K) -> Option<usize> {
        self.index_of.get(key).copied()
    }

    /// Current item-set generation.
    ///
    /// Hosts that measure asynchronously capture this before measuring and
    /// hand it back to [`set_available_width_for`](Self::set_available_width_for).
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Replaces the item sequence.
    ///
    /// If the key sequence changed, a new generation starts and the menu closes.
    /// If only priorities changed, the cached state is invalidated but the
    /// generation is kept.
    pub fn set_items(&mut self, items: impl IntoIterator<Item = OverflowItem<K>>) {
        let items: Vec<OverflowItem<K>> = items.into_iter().collect();
        let same_keys = items.len() == self.items.len()
            && items.iter().zip(&self.items).all(|(a, b)| a.key == b.key);

        if same_keys {
            if items != self.items {
                self.items = items;
                self.dirty = true;
            }
            return;
        }

        self.index_of.clear();
        for (index, item) in items.iter().enumerate() {
            self.index_of.entry(item.key.clone()).or_insert(index);
        }
        debug_assert_eq!(
            self.index_of.len(),
            items.len(),
            "overflow item keys must be unique"
        );

        self.items = items;
        self.generation += 1;
        self.menu_open = false;
        self.dirty = true;
        tracing::debug!(
            generation = self.generation,
            len = self.items.len(),
            "overflow item set changed"
        );
    }

    /// Replaces the item sequence from a caller slice.
    ///
    /// See [`items_from`] for how the callbacks are applied.
    pub fn set_items_from<T>(
        &mut self,
        source: &[T],
        get_key: impl Fn(&T, usize) -> K,
        get_priority: Option<&dyn Fn(&T, usize) -> Option<i32>>,
    ) {
        self.set_items(items_from(source, get_key, get_priority));
    }

    /// Returns the available container width.
    #[must_use]
    pub const fn available_width(&self) -> f64 {
        self.available_width
    }

    /// Sets the available container width, typically from a resize observer.
    pub fn set_available_width(&mut self, width: f64) {
        debug_assert!(
            !width.is_nan(),
            "available width must not be NaN; got {width:?}"
        );
        let width = clamp_width(width);
        if width != self.available_width {
            self.available_width = width;
            self.dirty = true;
        }
    }

    /// Sets the available width measured for a specific item-set generation.
    ///
    /// Returns `false` and ignores the measurement if the item set changed since
    /// the measurement was taken.
    pub fn set_available_width_for(&mut self, generation: u64, width: f64) -> bool {
        if generation != self.generation {
            tracing::debug!(
                stale = generation,
                current = self.generation,
                "ignoring stale overflow measurement"
            );
            return false;
        }
        self.set_available_width(width);
        true
    }

    /// Returns the collapse configuration.
    #[must_use]
    pub const fn config(&self) -> &OverflowConfig {
        &self.config
    }

    /// Replaces the collapse configuration.
    pub fn set_config(&mut self, config: OverflowConfig) {
        if config != self.config {
            self.config = config;
            self.dirty = true;
        }
    }

    /// Returns a shared reference to the width model.
    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Returns a mutable reference to the width model, marking the cached state dirty.
    pub fn model_mut(&mut self) -> &mut M {
        self.dirty = true;
        &mut self.model
    }

    /// Computes or returns the cached overflow state.
    pub fn state(&mut self) -> &OverflowState {
        if self.dirty {
            self.last_state = compute_overflow(
                &self.items,
                &mut self.model,
                self.available_width,
                &self.config,
                self.generation,
            );
            self.dirty = false;
            if self.menu_open && !self.last_state.is_overflowing() {
                self.menu_open = false;
            }
        }
        &self.last_state
    }

    /// Returns `true` if the item at `index` stays in the primary layout.
    #[must_use]
    pub fn is_visible(&mut self, index: usize) -> bool {
        self.state().is_visible(index)
    }

    /// Returns `true` if the item with `key` stays in the primary layout.
    ///
    /// Unknown keys are reported as not visible.
    #[must_use]
    pub fn is_key_visible(&mut self, key: &K) -> bool {
        match self.index_of(key) {
            Some(index) => self.is_visible(index),
            None => false,
        }
    }

    /// Number of items in the overflow menu.
    #[must_use]
    pub fn overflow_count(&mut self) -> usize {
        self.state().overflow_count()
    }

    /// Returns `true` if at least one item overflows.
    #[must_use]
    pub fn is_overflowing(&mut self) -> bool {
        self.state().is_overflowing()
    }

    /// Indices of visible items, in sequence order.
    #[must_use]
    pub fn visible_indices(&mut self) -> Vec<usize> {
        self.state().visible_indices().collect()
    }

    /// Indices of overflowed items, in sequence order.
    #[must_use]
    pub fn overflow_indices(&mut self) -> Vec<usize> {
        self.state().overflow_indices().collect()
    }

    /// Index at which the trigger is inserted; see [`trigger_slot`].
    #[must_use]
    pub fn trigger_slot(&self) -> usize {
        trigger_slot(&self.items)
    }

    /// The rendered sequence: every item in order, with the trigger inserted at
    /// [`trigger_slot`](Self::trigger_slot) when something overflows.
    ///
    /// Empty for zero items.
    #[must_use]
    pub fn layout(&mut self) -> Vec<Slot> {
        let trigger_at = self.trigger_slot();
        let state = self.state();
        let overflow_count = state.overflow_count();
        let mut out = Vec::with_capacity(state.len() + 1);
        for index in 0..state.len() {
            if index == trigger_at && overflow_count > 0 {
                out.push(Slot::Trigger { overflow_count });
            }
            out.push(Slot::Item {
                index,
                visible: state.is_visible(index),
            });
        }
        if trigger_at >= state.len() && overflow_count > 0 {
            out.push(Slot::Trigger { overflow_count });
        }
        out
    }

    /// Returns `true` if the overflow menu is open.
    #[must_use]
    pub fn is_menu_open(&mut self) -> bool {
        // Recomputing may close the menu.
        let _ = self.state();
        self.menu_open
    }

    /// Opens the overflow menu, as when the trigger is activated.
    ///
    /// Does nothing and returns `false` while nothing overflows.
    pub fn open_menu(&mut self) -> bool {
        if self.state().is_overflowing() {
            self.menu_open = true;
        }
        self.menu_open
    }

    /// Closes the overflow menu.
    pub fn close_menu(&mut self) {
        self.menu_open = false;
    }

    /// Toggles the overflow menu and returns whether it is now open.
    pub fn toggle_menu(&mut self) -> bool {
        if self.is_menu_open() {
            self.close_menu();
            false
        } else {
            self.open_menu()
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::{OverflowController, Slot};
    use crate::{FixedWidthModel, MeasuredWidthModel, OverflowConfig, OverflowItem};

    fn toolbar(keys: &[&'static str]) -> OverflowController<&'static str, FixedWidthModel> {
        OverflowController::with_items(
            keys.iter().map(|k| OverflowItem::new(*k)),
            FixedWidthModel::new(100.0),
            OverflowConfig::default(),
        )
    }

    #[test]
    fn state_tracks_available_width() {
        let mut c = toolbar(&["a", "b", "c", "d"]);
        c.set_available_width(400.0);
        assert_eq!(c.overflow_count(), 0);

        // 300 - 60 = 240 leaves room for two items.
        c.set_available_width(300.0);
        assert_eq!(c.overflow_count(), 2);
        assert_eq!(c.visible_indices(), vec![0, 1]);
        assert!(c.is_key_visible(&"b"));
        assert!(!c.is_key_visible(&"c"));
        assert!(!c.is_key_visible(&"missing"));
    }

    #[test]
    fn trigger_is_inserted_before_first_prioritized_item() {
        let mut c = OverflowController::with_items(
            [
                OverflowItem::with_priority("a", 0),
                OverflowItem::new("x"),
                OverflowItem::new("y"),
                OverflowItem::with_priority("b", 2),
            ],
            FixedWidthModel::new(100.0),
            OverflowConfig::default(),
        );
        // 360 - 60 = 300 fits three items, so only "y" collapses.
        c.set_available_width(360.0);
        assert_eq!(c.trigger_slot(), 3);
        assert_eq!(
            c.layout(),
            vec![
                Slot::Item {
                    index: 0,
                    visible: true
                },
                Slot::Item {
                    index: 1,
                    visible: true
                },
                Slot::Item {
                    index: 2,
                    visible: false
                },
                Slot::Trigger { overflow_count: 1 },
                Slot::Item {
                    index: 3,
                    visible: true
                },
            ]
        );
    }

    #[test]
    fn trigger_is_appended_and_hidden_when_not_needed() {
        let mut c = toolbar(&["a", "b", "c"]);
        c.set_available_width(1000.0);
        assert!(
            !c.layout()
                .iter()
                .any(|slot| matches!(slot, Slot::Trigger { .. }))
        );

        c.set_available_width(200.0);
        let layout = c.layout();
        assert_eq!(layout.last(), Some(&Slot::Trigger { overflow_count: 1 }));
    }

    #[test]
    fn zero_items_lay_out_nothing() {
        let mut c = toolbar(&[]);
        c.set_available_width(0.0);
        assert!(c.layout().is_empty());
        assert!(!c.open_menu());
    }

    #[test]
    fn few_items_never_overflow() {
        let mut c = toolbar(&["a", "b"]);
        c.set_available_width(0.0);
        assert_eq!(c.overflow_count(), 0);
        assert_eq!(c.layout().len(), 2);
    }

    #[test]
    fn key_changes_start_a_new_generation() {
        let mut c = toolbar(&["a", "b", "c"]);
        let first = c.generation();

        // Same keys, new priority: state recomputes, generation stays.
        c.set_items([
            OverflowItem::new("a"),
            OverflowItem::new("b"),
            OverflowItem::with_priority("c", 4),
        ]);
        assert_eq!(c.generation(), first);
        assert_eq!(c.trigger_slot(), 2);

        c.set_items([OverflowItem::new("a"), OverflowItem::new("b")]);
        assert_eq!(c.generation(), first + 1);
        assert_eq!(c.state().generation(), first + 1);
        assert_eq!(c.index_of(&"c"), None);
    }

    #[test]
    fn stale_measurements_are_ignored() {
        let mut c = toolbar(&["a", "b", "c", "d"]);
        let measured_for = c.generation();
        c.set_items([
            OverflowItem::new("a"),
            OverflowItem::new("b"),
            OverflowItem::new("c"),
        ]);

        assert!(!c.set_available_width_for(measured_for, 150.0));
        assert_eq!(c.available_width(), 0.0);

        assert!(c.set_available_width_for(c.generation(), 1000.0));
        assert_eq!(c.overflow_count(), 0);
    }

    #[test]
    fn menu_opens_only_while_overflowing() {
        let mut c = toolbar(&["a", "b", "c", "d"]);
        c.set_available_width(1000.0);
        assert!(!c.open_menu());

        c.set_available_width(250.0);
        assert!(c.open_menu());
        assert!(c.is_menu_open());
        assert!(!c.toggle_menu());
        assert!(c.toggle_menu());

        // Growing the container so everything fits closes the menu.
        c.set_available_width(1000.0);
        assert!(!c.is_menu_open());
    }

    #[test]
    fn item_set_change_closes_menu() {
        let mut c = toolbar(&["a", "b", "c", "d"]);
        c.set_available_width(250.0);
        assert!(c.open_menu());
        c.set_items_from(&["x", "y", "z", "w", "v"], |k, _| *k, None);
        assert!(!c.is_menu_open());
        assert_eq!(c.len(), 5);
    }

    #[test]
    fn measured_widths_feed_back_into_state() {
        let mut c = OverflowController::with_items(
            ["file", "edit", "view", "help"].map(OverflowItem::new),
            MeasuredWidthModel::new(50.0),
            OverflowConfig::default(),
        );
        c.set_available_width(200.0);
        assert_eq!(c.overflow_count(), 0);

        c.model_mut().set_width("file", 120.0);
        // 270 > 200: "help" then "view" collapse, then the floor of two stops it.
        assert_eq!(c.overflow_indices(), vec![2, 3]);
        assert_eq!(c.overflow_count(), 2);

        let keys: Vec<_> = c.items().iter().map(|item| item.key).collect();
        c.model_mut().retain(|k| keys.contains(k));
        assert_eq!(c.model().measured(&"file"), Some(120.0));
    }
}
