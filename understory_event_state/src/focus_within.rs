// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus-within tracking for a subtree.
//!
//! Hosts feed every platform focus-in event to [`FocusWithin::on_focus_in`]. The
//! tracker answers whether focus entered the tracked root (or one of its
//! descendants) or left it, walking ancestors through a [`ParentLookup`].
//!
//! ```
//! use understory_event_state::focus_within::{FocusEvent, FocusWithin};
//!
//! // 1 is the root of the tracked panel; 2 is its child; 9 is elsewhere.
//! let parents = |node: &u32| -> Option<u32> {
//!     match node {
//!         2 => Some(1),
//!         _ => None,
//!     }
//! };
//! let mut panel = FocusWithin::new(Some(1_u32));
//! assert_eq!(panel.on_focus_in(&2, &parents), FocusEvent::Focus);
//! assert!(panel.has_focus());
//! assert_eq!(panel.on_focus_in(&9, &parents), FocusEvent::LoseFocus);
//! ```

/// Parent lookup used to decide whether a node lies inside the tracked root.
pub trait ParentLookup<K> {
    /// Returns the parent of `node`, or `None` for roots and unknown nodes.
    fn parent_of(&self, node: &K) -> Option<K>;
}

impl<K, F> ParentLookup<K> for F
where
    F: Fn(&K) -> Option<K>,
{
    fn parent_of(&self, node: &K) -> Option<K> {
        self(node)
    }
}

/// What a focus-in event means for the tracked subtree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusEvent {
    /// Focus moved to the root or one of its descendants.
    Focus,
    /// Focus moved somewhere outside the root.
    LoseFocus,
}

/// Tracks whether focus is within a subtree.
#[derive(Clone, Debug)]
pub struct FocusWithin<K> {
    root: Option<K>,
    focused: bool,
}

impl<K: PartialEq + Clone> Default for FocusWithin<K> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<K: PartialEq + Clone> FocusWithin<K> {
    /// Tracks `root`. With `None` the tracker is unattached and every focus-in
    /// event reports [`FocusEvent::LoseFocus`].
    pub fn new(root: Option<K>) -> Self {
        Self {
            root,
            focused: false,
        }
    }

    /// The tracked root, if attached.
    pub fn root(&self) -> Option<&K> {
        self.root.as_ref()
    }

    /// Attaches to a different root, or detaches with `None`. Focus is
    /// considered lost until the next focus-in event.
    pub fn set_root(&mut self, root: Option<K>) {
        self.root = root;
        self.focused = false;
    }

    /// Returns `true` if the last focus-in event landed inside the root.
    pub fn has_focus(&self) -> bool {
        self.focused
    }

    /// Classifies a focus-in event on `target`.
    pub fn on_focus_in(&mut self, target: &K, parents: &impl ParentLookup<K>) -> FocusEvent {
        let inside = self
            .root
            .as_ref()
            .is_some_and(|root| is_within(root, target, parents));
        self.focused = inside;
        if inside {
            FocusEvent::Focus
        } else {
            FocusEvent::LoseFocus
        }
    }

    /// Focus left the document entirely (for example the window blurred).
    pub fn on_blur(&mut self) -> Option<FocusEvent> {
        if !self.focused {
            return None;
        }
        self.focused = false;
        Some(FocusEvent::LoseFocus)
    }
}

fn is_within<K: PartialEq + Clone>(root: &K, target: &K, parents: &impl ParentLookup<K>) -> bool {
    let mut node = target.clone();
    loop {
        if node == *root {
            return true;
        }
        match parents.parent_of(&node) {
            Some(parent) => node = parent,
            None => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parents(node: &u32) -> Option<u32> {
        match node {
            4 => Some(3),
            3 => Some(2),
            2 => Some(1),
            _ => None,
        }
    }

    #[test]
    fn descendants_and_root_focus() {
        let mut state = FocusWithin::new(Some(2));
        assert_eq!(state.on_focus_in(&4, &parents), FocusEvent::Focus);
        assert_eq!(state.on_focus_in(&2, &parents), FocusEvent::Focus);
        assert!(state.has_focus());
    }

    #[test]
    fn ancestors_and_strangers_lose_focus() {
        let mut state = FocusWithin::new(Some(2));
        assert_eq!(state.on_focus_in(&1, &parents), FocusEvent::LoseFocus);
        assert_eq!(state.on_focus_in(&7, &parents), FocusEvent::LoseFocus);
        assert!(!state.has_focus());
    }

    #[test]
    fn unattached_root_always_loses_focus() {
        let mut state: FocusWithin<u32> = FocusWithin::default();
        assert_eq!(state.on_focus_in(&4, &parents), FocusEvent::LoseFocus);
        state.set_root(Some(3));
        assert_eq!(state.on_focus_in(&4, &parents), FocusEvent::Focus);
        state.set_root(None);
        assert!(!state.has_focus());
        assert_eq!(state.on_focus_in(&3, &parents), FocusEvent::LoseFocus);
    }

    #[test]
    fn blur_reports_once() {
        let mut state = FocusWithin::new(Some(1));
        assert_eq!(state.on_blur(), None);
        state.on_focus_in(&3, &parents);
        assert_eq!(state.on_blur(), Some(FocusEvent::LoseFocus));
        assert_eq!(state.on_blur(), None);
    }
}
