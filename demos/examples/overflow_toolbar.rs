// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A text-mode toolbar that collapses into an overflow menu as it shrinks.
//!
//! This example shows how to combine:
//! - `MeasuredWidthModel` fed with per-item widths, as a host would after layout,
//! - `OverflowController` for deciding what stays visible,
//! - `render` with callbacks that build plain strings as "views".
//!
//! Run:
//! - `cargo run -p understory_demos --example overflow_toolbar`

use understory_overflow::{
    MeasuredWidthModel, OverflowCallbacks, OverflowConfig, OverflowController, OverflowMenu,
    OverflowOutput, OverflowPart, Trigger, render,
};

/// A toolbar button: label, measured width, optional priority.
#[derive(Clone, Copy, Debug)]
struct Button {
    label: &'static str,
    width: f64,
    priority: Option<i32>,
}

impl Button {
    const fn new(label: &'static str, width: f64, priority: Option<i32>) -> Self {
        Self {
            label,
            width,
            priority,
        }
    }
}

const BUTTONS: [Button; 6] = [
    Button::new("Bold", 60.0, None),
    Button::new("Italic", 70.0, None),
    Button::new("Underline", 100.0, None),
    Button::new("Link", 60.0, Some(1)),
    Button::new("Undo", 60.0, Some(3)),
    Button::new("Redo", 60.0, Some(2)),
];

fn main() {
    let mut toolbar = OverflowController::new(
        MeasuredWidthModel::new(80.0),
        OverflowConfig::default().with_trigger_reserved_width(40.0),
    );
    let priority = |b: &Button, _: usize| b.priority;
    toolbar.set_items_from(&BUTTONS, |b, _| b.label, Some(&priority));

    // A host measures each button after its first layout pass.
    for b in &BUTTONS {
        toolbar.model_mut().set_width(b.label, b.width);
    }

    let render_item = |b: &Button, _: usize, in_menu: bool| {
        if in_menu {
            format!("  - {}", b.label)
        } else {
            format!("[{}]", b.label)
        }
    };
    let menu_trigger = |count: usize| format!("[+{count}]");
    let menu_wrapper = |menu: OverflowMenu<String>| {
        let trigger = match menu.trigger {
            Trigger::Custom(view) => view,
            Trigger::Default { label, .. } => format!("[{label}]"),
        };
        if menu.open {
            format!("{trigger}\n{}", menu.entries.join("\n"))
        } else {
            trigger
        }
    };
    let callbacks: OverflowCallbacks<'_, Button, String> = OverflowCallbacks::new(&render_item)
        .with_menu_trigger(&menu_trigger)
        .with_menu_wrapper(&menu_wrapper);

    for width in [600.0, 380.0, 260.0, 120.0] {
        toolbar.set_available_width(width);
        println!("width {width}: {} overflowed", toolbar.overflow_count());
        print_output(render(&mut toolbar, &BUTTONS, &callbacks));
    }

    // The user activates the trigger.
    toolbar.open_menu();
    println!("menu opened at width {}:", toolbar.available_width());
    print_output(render(&mut toolbar, &BUTTONS, &callbacks));

    // Growing back until nothing overflows closes the menu on its own.
    toolbar.set_available_width(600.0);
    println!("width 600: menu open = {}", toolbar.is_menu_open());
}

fn print_output(output: OverflowOutput<String>) {
    let OverflowOutput::Parts(parts) = output else {
        return;
    };
    let line: Vec<String> = parts
        .into_iter()
        .map(|part| match part {
            OverflowPart::Item { view, .. } | OverflowPart::WrappedMenu(view) => view,
            OverflowPart::Menu(menu) => format!("[menu: {}]", menu.overflow_count),
        })
        .collect();
    println!("  {}", line.join(" "));
}
