// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Awaitable state writes driven by a hand-rolled "render loop".
//!
//! This example shows how to combine:
//! - `TrackedState` for a list of todo items whose writers await the commit,
//! - `NavBlocker` to hold navigation while a draft is unsaved,
//! - `FocusWithin` and `PrintMode` for event-derived view state.
//!
//! Run:
//! - `cargo run -p understory_demos --example tracked_state`

use futures::executor::block_on;
use futures::future::join;
use kurbo::Size;
use understory_event_state::{FocusEvent, FocusWithin, Modifiers, PrintMode, ViewportSize};
use understory_state_cell::{NavBlocker, NavDecision, TrackedState, TrackedStateOptions};

fn main() {
    let mut todos = TrackedState::with_options(
        Vec::<String>::new(),
        TrackedStateOptions::new()
            .with_name("todos")
            .with_skip_update_if_same(true),
    );

    // Two writers in the same event handler; both see the coalesced result.
    let add_milk = todos.write_with(|list| with_item(list, "milk"));
    let add_eggs = todos.write_with(|list| with_item(list, "eggs"));
    println!("before commit: read = {:?}", todos.read());

    // One "frame": commit, react to the new value, then run effects.
    todos.commit();
    println!("rendering {:?}", todos.read());
    todos.run_effects();

    let (a, b) = block_on(join(add_milk, add_eggs));
    println!("writers resolved with {a:?} and {b:?}");

    // Writing the same list again resolves right away without a commit.
    let same = todos.write(todos.live().clone());
    println!("unchanged write resolved with {:?}", block_on(same));
    println!("needs commit: {}", todos.needs_commit());

    // Navigation blocking while a draft is open.
    let mut blocker = NavBlocker::new();
    let _ = blocker.set_message("draft", Some("You have an unsaved todo."));
    blocker.flush();
    let decision = blocker.request_navigation(|| println!("navigated to /settings"));
    blocker.flush();
    if decision == NavDecision::Blocked
        && let Some(prompt) = blocker.prompt()
    {
        println!(
            "{} [{}] [{}]: {}",
            prompt.title,
            prompt.ok_text,
            prompt.cancel_text,
            prompt.messages.join(" / ")
        );
    }
    blocker.confirm();
    blocker.flush();

    // Event-derived state for the todo panel.
    let parents = |node: &u32| -> Option<u32> { (*node > 1).then(|| node / 2) };
    let mut panel = FocusWithin::new(Some(2_u32));
    for target in [5, 3] {
        let event = panel.on_focus_in(&target, &parents);
        println!(
            "focus on {target}: {}",
            if event == FocusEvent::Focus { "inside" } else { "outside" }
        );
    }

    let mut viewport = ViewportSize::new();
    viewport.on_resize(Size::new(1024.0, 768.0));
    println!("viewport: {:?}", viewport.size());

    let mut print = PrintMode::with_debug_shortcuts();
    print.on_key('p', Modifiers::CTRL | Modifiers::SHIFT | Modifiers::ALT);
    println!("printing: {} (forced: {})", print.is_printing(), print.is_forced());

    // Unmounting resolves anything still in flight.
    let late = todos.write_with(|list| with_item(list, "bread"));
    todos.unmount();
    println!("after unmount: {:?}", block_on(late));
}

fn with_item(list: &[String], item: &str) -> Vec<String> {
    let mut next = list.to_vec();
    next.push(item.to_owned());
    next
}
