// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_event_state --heading-base-level=0

//! Understory Event State: small headless state machines fed by platform events.
//!
//! Each module tracks one piece of view state that a host derives from its
//! event stream. None of them listens to anything; hosts call the `on_*`
//! methods from their own handlers and read the result.
//!
//! - [`focus_within`]: whether focus is inside a subtree, given a parent lookup.
//! - [`viewport`]: the last measured viewport size, unknown until measured.
//! - [`print_mode`]: whether to render for print, with optional debug shortcuts
//!   that force print mode from the keyboard.
//!
//! ## Features
//!
//! - `std` (default): enables `kurbo/std`.
//! - `libm`: enables `kurbo/libm` for `no_std` builds.
//!
//! This crate is `no_std`.

#![no_std]

pub mod focus_within;
pub mod print_mode;
pub mod viewport;

pub use focus_within::{FocusEvent, FocusWithin, ParentLookup};
pub use print_mode::{Modifiers, PrintMode};
pub use viewport::ViewportSize;
