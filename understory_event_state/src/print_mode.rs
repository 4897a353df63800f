// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Print mode tracking.
//!
//! Hosts report changes of the platform's print media query through
//! [`PrintMode::on_media_change`]. With debug shortcuts enabled, print mode can
//! also be forced from the keyboard so print layouts can be inspected on screen:
//!
//! - Ctrl+Shift+Alt with any other key forces print mode on.
//! - Ctrl+Shift+Alt+Q leaves forced mode; the media query decides again.
//!
//! ```
//! use understory_event_state::print_mode::{Modifiers, PrintMode};
//!
//! let mut print = PrintMode::with_debug_shortcuts();
//! let all = Modifiers::CTRL | Modifiers::SHIFT | Modifiers::ALT;
//!
//! assert!(print.on_key('p', all));
//! assert!(print.is_printing() && print.is_forced());
//!
//! // While forced, media changes are remembered but do not win.
//! print.on_media_change(false);
//! assert!(print.is_printing());
//!
//! assert!(print.on_key('q', all));
//! assert!(!print.is_printing());
//! ```

bitflags::bitflags! {
    /// Keyboard modifiers held during a key event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Control.
        const CTRL  = 0b0000_0001;
        /// Shift.
        const SHIFT = 0b0000_0010;
        /// Alt / Option.
        const ALT   = 0b0000_0100;
        /// Meta / Command / Windows.
        const META  = 0b0000_1000;
    }
}

/// Modifiers that make up the debug chord.
pub const DEBUG_CHORD: Modifiers = Modifiers::CTRL.union(Modifiers::SHIFT).union(Modifiers::ALT);

/// Key that leaves forced print mode when pressed with [`DEBUG_CHORD`].
pub const EXIT_KEY: char = 'q';

/// Whether the view should render for print.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrintMode {
    media: bool,
    forced: bool,
    debug_shortcuts: bool,
}

impl PrintMode {
    /// Tracks the media query only.
    pub const fn new() -> Self {
        Self {
            media: false,
            forced: false,
            debug_shortcuts: false,
        }
    }

    /// Tracks the media query and honors the debug chord in [`on_key`](Self::on_key).
    pub const fn with_debug_shortcuts() -> Self {
        Self {
            media: false,
            forced: false,
            debug_shortcuts: true,
        }
    }

    /// Returns `true` if the view should render for print.
    pub const fn is_printing(&self) -> bool {
        self.forced || self.media
    }

    /// Returns `true` while print mode is forced from the keyboard.
    pub const fn is_forced(&self) -> bool {
        self.forced
    }

    /// Records the current print media state. Returns `true` if
    /// [`is_printing`](Self::is_printing) changed.
    pub fn on_media_change(&mut self, matches_print: bool) -> bool {
        let before = self.is_printing();
        self.media = matches_print;
        before != self.is_printing()
    }

    /// Handles a key press. Returns `true` if
    /// [`is_printing`](Self::is_printing) changed.
    ///
    /// Without debug shortcuts, or without the full chord held, keys are
    /// ignored. Extra modifiers such as Meta do not break the chord.
    pub fn on_key(&mut self, key: char, modifiers: Modifiers) -> bool {
        if !self.debug_shortcuts || !modifiers.contains(DEBUG_CHORD) {
            return false;
        }
        let before = self.is_printing();
        if key.eq_ignore_ascii_case(&EXIT_KEY) {
            if self.forced {
                tracing::debug!(media = self.media, "print mode no longer forced");
            }
            self.forced = false;
        } else if !self.forced {
            tracing::warn!("print mode forced by debug shortcut");
            self.forced = true;
        }
        before != self.is_printing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_query_drives_print_mode() {
        let mut print = PrintMode::new();
        assert!(!print.is_printing());
        assert!(print.on_media_change(true));
        assert!(!print.on_media_change(true));
        assert!(print.is_printing());
        assert!(print.on_media_change(false));
    }

    #[test]
    fn shortcuts_ignored_unless_enabled() {
        let mut print = PrintMode::new();
        assert!(!print.on_key('p', DEBUG_CHORD));
        assert!(!print.is_forced());
    }

    #[test]
    fn partial_chord_is_ignored() {
        let mut print = PrintMode::with_debug_shortcuts();
        assert!(!print.on_key('p', Modifiers::CTRL | Modifiers::SHIFT));
        assert!(!print.is_forced());
        assert!(print.on_key('p', DEBUG_CHORD | Modifiers::META));
        assert!(print.is_forced());
    }

    #[test]
    fn exit_falls_back_to_last_media_state() {
        let mut print = PrintMode::with_debug_shortcuts();
        print.on_key('x', DEBUG_CHORD);
        assert!(!print.on_media_change(true));
        assert!(!print.on_key('Q', DEBUG_CHORD));
        assert!(!print.is_forced());
        assert!(print.is_printing());

        print.on_media_change(false);
        print.on_key('x', DEBUG_CHORD);
        assert!(print.on_key('q', DEBUG_CHORD));
        assert!(!print.is_printing());
    }
}
