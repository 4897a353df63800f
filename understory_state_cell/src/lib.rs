// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_state_cell --heading-base-level=0

//! Understory State Cell: view state whose writes can be awaited.
//!
//! A [`TrackedState`] holds one value for a view. Writing returns a
//! [`WriteFuture`] that completes only after the host has committed the write
//! and finished reacting to it, so code can write state and then act on the
//! result (focus the new element, scroll to it, and so on).
//!
//! The host drives the cycle explicitly:
//!
//! - [`TrackedState::commit`] applies the latest written value. Several writes
//!   before a commit are coalesced into one.
//! - [`TrackedState::run_effects`] runs after the host reacted to the commit
//!   and resolves every covered write, in write order, with the committed value.
//! - [`TrackedState::unmount`] (or dropping the cell) resolves whatever is left.
//!
//! Nothing here spawns tasks or needs an executor; futures are woken through
//! their channels and can be polled by any executor the host uses.
//!
//! [`NavBlocker`] builds on tracked state to hold navigation behind a
//! confirmation prompt while views report unsaved work.
//!
//! ## Minimal example
//!
//! ```rust
//! use futures::FutureExt;
//! use understory_state_cell::TrackedState;
//!
//! let mut count = TrackedState::new(0_u32);
//! let first = count.write(1);
//! let second = count.write_with(|n| n + 1);
//!
//! // Reads see the committed value until the host commits.
//! assert_eq!(*count.read(), 0);
//! assert_eq!(*count.live(), 2);
//!
//! assert!(count.commit());
//! assert_eq!(*count.read(), 2);
//! assert_eq!(count.run_effects(), 2);
//!
//! // Both writes were coalesced into the same commit.
//! assert_eq!(first.now_or_never(), Some(2));
//! assert_eq!(second.now_or_never(), Some(2));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod cell;
mod future;
mod nav_block;

pub use cell::{TrackedState, TrackedStateOptions};
pub use future::WriteFuture;
pub use nav_block::{NavBlocker, NavDecision, NavPrompt, PROMPT_CANCEL, PROMPT_OK, PROMPT_TITLE};
