// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_overflow --heading-base-level=0

//! Understory Overflow: headless overflow collapse for toolbars, tab strips, and breadcrumbs.
//!
//! This crate decides, given a sequence of items and a measured container width,
//! which items stay in the primary layout and which collapse into an overflow
//! menu. It is renderer-agnostic and shared across UI stacks.
//!
//! The core concepts are:
//!
//! - [`OverflowItem`]: a key plus an optional priority. Higher priorities stay
//!   visible longer; among equal priorities, later items collapse first.
//! - [`WidthModel`]: the measurement port. Hosts report per-item widths through it
//!   (for example with [`MeasuredWidthModel`]); nothing here touches a real layout
//!   engine.
//! - [`compute_overflow`]: the collapse algorithm. It keeps at least
//!   [`OverflowConfig::minimum_visible`] items visible and reserves
//!   [`OverflowConfig::trigger_reserved_width`] for the trigger once anything
//!   overflows.
//! - [`OverflowController`]: owns items, width model, available width, and menu
//!   state, and caches the most recent [`OverflowState`]. Changing the key
//!   sequence starts a new generation so stale state and stale measurements are
//!   never shown.
//! - [`render`]: an adapter that walks the controller's [`layout`](OverflowController::layout)
//!   and builds caller views through [`OverflowCallbacks`].
//!
//! Host frameworks are responsible for:
//!
//! - Observing container resizes and calling [`OverflowController::set_available_width`].
//! - Feeding measured item widths into the [`WidthModel`].
//! - Opening the menu when the trigger is activated ([`OverflowController::open_menu`]).
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_overflow::{FixedWidthModel, OverflowConfig, OverflowController, OverflowItem, Slot};
//!
//! // Three 100px items; the last one is pinned with a priority.
//! let mut toolbar = OverflowController::with_items(
//!     [
//!         OverflowItem::new("cut"),
//!         OverflowItem::new("copy"),
//!         OverflowItem::with_priority("share", 1),
//!     ],
//!     FixedWidthModel::new(100.0),
//!     OverflowConfig::default(),
//! );
//!
//! // Room for two items plus the 60px trigger.
//! toolbar.set_available_width(260.0);
//! assert_eq!(toolbar.overflow_count(), 1);
//! assert!(!toolbar.is_key_visible(&"copy"));
//!
//! // The trigger sits before the first prioritized item.
//! assert_eq!(toolbar.layout()[2], Slot::Trigger { overflow_count: 1 });
//! ```
//!
//! All widths live in a caller-chosen 1D coordinate space (typically logical
//! pixels) and are expected to be finite. Negative widths are treated as zero.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod collapse;
mod controller;
mod item;
mod render;
mod width;

pub use collapse::{
    DEFAULT_MINIMUM_VISIBLE, DEFAULT_TRIGGER_RESERVED_WIDTH, OverflowConfig, OverflowState,
    collapse_order, compute_overflow,
};
pub use controller::{OverflowController, Slot};
pub use item::{OverflowItem, items_from, trigger_slot};
pub use render::{
    DEFAULT_TRIGGER_LABEL, OverflowCallbacks, OverflowMenu, OverflowOutput, OverflowPart, Trigger,
    render,
};
pub use width::{FixedWidthModel, MeasuredWidthModel, WidthModel};
