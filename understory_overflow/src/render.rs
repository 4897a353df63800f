// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render adapter: turns controller state into caller-built views.
//!
//! The adapter is generic over the caller's view type `V`. Every rendering
//! option is a field of [`OverflowCallbacks`]; optional callbacks that are
//! absent are never invoked.

use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use crate::{OverflowController, Slot, WidthModel};

/// Accessible label of the default overflow trigger.
pub const DEFAULT_TRIGGER_LABEL: &str = "More items";

/// Callbacks used by [`render`].
pub struct OverflowCallbacks<'a, T, V> {
    /// Renders one item. The `bool` is `true` when the item is rendered into
    /// the overflow menu rather than the primary layout.
    pub render_item: &'a dyn Fn(&T, usize, bool) -> V,
    /// Wraps all rendered parts into one view (for example a toolbar group).
    /// When absent, [`render`] returns the parts unwrapped.
    pub group_wrapper: Option<&'a dyn Fn(Vec<OverflowPart<V>>) -> V>,
    /// Wraps the overflow menu into one view. When absent, the menu is
    /// returned as an [`OverflowPart::Menu`].
    pub menu_wrapper: Option<&'a dyn Fn(OverflowMenu<V>) -> V>,
    /// Builds the trigger from the current overflow count. When absent, a
    /// [`Trigger::Default`] is used.
    pub menu_trigger: Option<&'a dyn Fn(usize) -> V>,
}

impl<'a, T, V> OverflowCallbacks<'a, T, V> {
    /// Callbacks with only an item renderer.
    pub fn new(render_item: &'a dyn Fn(&T, usize, bool) -> V) -> Self {
        Self {
            render_item,
            group_wrapper: None,
            menu_wrapper: None,
            menu_trigger: None,
        }
    }

    /// Sets the group wrapper.
    #[must_use]
    pub fn with_group_wrapper(mut self, wrap: &'a dyn Fn(Vec<OverflowPart<V>>) -> V) -> Self {
        self.group_wrapper = Some(wrap);
        self
    }

    /// Sets the menu wrapper.
    #[must_use]
    pub fn with_menu_wrapper(mut self, wrap: &'a dyn Fn(OverflowMenu<V>) -> V) -> Self {
        self.menu_wrapper = Some(wrap);
        self
    }

    /// Sets the trigger builder.
    #[must_use]
    pub fn with_menu_trigger(mut self, trigger: &'a dyn Fn(usize) -> V) -> Self {
        self.menu_trigger = Some(trigger);
        self
    }
}

impl<T, V> fmt::Debug for OverflowCallbacks<'_, T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverflowCallbacks")
            .field("render_item", &"..")
            .field("group_wrapper", &self.group_wrapper.is_some())
            .field("menu_wrapper", &self.menu_wrapper.is_some())
            .field("menu_trigger", &self.menu_trigger.is_some())
            .finish()
    }
}

/// The control that opens the overflow menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger<V> {
    /// No trigger builder was supplied; hosts render a subtle "more" button.
    Default {
        /// Accessible label, [`DEFAULT_TRIGGER_LABEL`].
        label: &'static str,
        /// Number of items in the menu.
        overflow_count: usize,
    },
    /// Output of [`OverflowCallbacks::menu_trigger`].
    Custom(V),
}

/// The overflow menu: its trigger plus the overflowed items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverflowMenu<V> {
    /// Trigger control.
    pub trigger: Trigger<V>,
    /// Whether the menu is open.
    pub open: bool,
    /// Number of items in the menu.
    pub overflow_count: usize,
    /// Overflowed items rendered with the overflow flag set. Empty while the
    /// menu is closed.
    pub entries: Vec<V>,
}

/// One piece of rendered output, in sequence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverflowPart<V> {
    /// A visible item in the primary layout.
    Item {
        /// Index into the item sequence.
        index: usize,
        /// Rendered view.
        view: V,
    },
    /// The overflow menu, unwrapped.
    Menu(OverflowMenu<V>),
    /// The overflow menu after [`OverflowCallbacks::menu_wrapper`].
    WrappedMenu(V),
}

/// Result of [`render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverflowOutput<V> {
    /// Nothing to render (no items).
    Empty,
    /// Parts in sequence order; no group wrapper was supplied.
    Parts(Vec<OverflowPart<V>>),
    /// Output of [`OverflowCallbacks::group_wrapper`].
    Group(V),
}

/// Renders the controller's current layout.
///
/// `source` is the caller slice the controller's items were built from; item
/// `i` of the controller renders `source[i]`. Visible items are rendered in
/// place, the menu part sits at the trigger slot, and overflowed items are
/// rendered into the menu only while it is open.
pub fn render<K, M, T, V>(
    controller: &mut OverflowController<K, M>,
    source: &[T],
    callbacks: &OverflowCallbacks<'_, T, V>,
) -> OverflowOutput<V>
where
    K: Clone + Eq + Hash,
    M: WidthModel<K>,
{
    debug_assert_eq!(
        source.len(),
        controller.len(),
        "render source must match the controller's items"
    );
    if controller.is_empty() {
        return OverflowOutput::Empty;
    }

    let open = controller.is_menu_open();
    let layout = controller.layout();
    let mut parts = Vec::with_capacity(layout.len());
    for slot in layout {
        match slot {
            Slot::Item {
                index,
                visible: true,
            } => {
                if let Some(item) = source.get(index) {
                    parts.push(OverflowPart::Item {
                        index,
                        view: (callbacks.render_item)(item, index, false),
                    });
                }
            }
            Slot::Item { visible: false, .. } => {}
            Slot::Trigger { overflow_count } => {
                let menu = render_menu(controller, source, callbacks, overflow_count, open);
                parts.push(match callbacks.menu_wrapper {
                    Some(wrap) => OverflowPart::WrappedMenu(wrap(menu)),
                    None => OverflowPart::Menu(menu),
                });
            }
        }
    }

    match callbacks.group_wrapper {
        Some(wrap) => OverflowOutput::Group(wrap(parts)),
        None => OverflowOutput::Parts(parts),
    }
}

fn render_menu<K, M, T, V>(
    controller: &mut OverflowController<K, M>,
    source: &[T],
    callbacks: &OverflowCallbacks<'_, T, V>,
    overflow_count: usize,
    open: bool,
) -> OverflowMenu<V>
where
    K: Clone + Eq + Hash,
    M: WidthModel<K>,
{
    let trigger = match callbacks.menu_trigger {
        Some(build) => Trigger::Custom(build(overflow_count)),
        None => Trigger::Default {
            label: DEFAULT_TRIGGER_LABEL,
            overflow_count,
        },
    };
    let entries = if open {
        controller
            .overflow_indices()
            .into_iter()
            .filter_map(|index| {
                source
                    .get(index)
                    .map(|item| (callbacks.render_item)(item, index, true))
            })
            .collect()
    } else {
        Vec::new()
    };
    OverflowMenu {
        trigger,
        open,
        overflow_count,
        entries,
    }
}
