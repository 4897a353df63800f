// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation blocking: hold navigation behind a confirmation prompt while
//! there is unsaved work.
//!
//! Views register blocking messages by id. When the host is about to navigate
//! it calls [`NavBlocker::request_navigation`]; with no messages the navigation
//! runs immediately, otherwise a [`NavPrompt`] is staged and the navigation is
//! held until the user confirms or cancels. For page unload, hosts use
//! [`NavBlocker::before_unload_message`].

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use crate::{TrackedState, TrackedStateOptions, WriteFuture};

/// Title of the confirmation prompt.
pub const PROMPT_TITLE: &str = "Leave page?";
/// Label of the button that confirms navigation.
pub const PROMPT_OK: &str = "Leave";
/// Label of the button that cancels navigation.
pub const PROMPT_CANCEL: &str = "Cancel";

/// Confirmation prompt shown while navigation is held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavPrompt {
    /// Prompt title.
    pub title: String,
    /// Label of the confirming button.
    pub ok_text: String,
    /// Label of the cancelling button.
    pub cancel_text: String,
    /// Blocking messages, in registration order. Hosts typically show a
    /// single message as a paragraph and several as a list.
    pub messages: Vec<String>,
}

/// Outcome of [`NavBlocker::request_navigation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDecision {
    /// Nothing blocked; the navigation already ran.
    Proceeded,
    /// A prompt was staged; the navigation runs on [`NavBlocker::confirm`].
    Blocked,
}

/// Blocks navigation while any view has registered a message.
pub struct NavBlocker {
    messages: TrackedState<Vec<(String, String)>>,
    prompt: TrackedState<Option<NavPrompt>>,
    held: Option<Box<dyn FnOnce()>>,
}

impl Default for NavBlocker {
    fn default() -> Self {
        Self::new()
    }
}

impl NavBlocker {
    /// Creates a blocker with no messages.
    #[must_use]
    pub fn new() -> Self {
        Self {
            messages: TrackedState::with_options(
                Vec::new(),
                TrackedStateOptions::new()
                    .with_skip_update_if_same(true)
                    .with_name("nav-block messages"),
            ),
            prompt: TrackedState::with_options(
                None,
                TrackedStateOptions::new().with_name("nav-block prompt"),
            ),
            held: None,
        }
    }

    /// Adds, replaces, or (with `None` or an empty message) removes the
    /// blocking message registered under `id`.
    ///
    /// Returns `None` if the message set did not change.
    pub fn set_message(
        &mut self,
        id: &str,
        message: Option<&str>,
    ) -> Option<WriteFuture<Vec<(String, String)>>> {
        let mut next = self.messages.live().clone();
        match message.filter(|m| !m.is_empty()) {
            Some(message) => match next.iter_mut().find(|(k, _)| k == id) {
                Some((_, existing)) => *existing = message.to_string(),
                None => next.push((id.to_string(), message.to_string())),
            },
            None => next.retain(|(k, _)| k != id),
        }
        if next == *self.messages.live() {
            return None;
        }
        Some(self.messages.write(next))
    }

    /// Current blocking messages, in registration order.
    pub fn messages(&self) -> impl Iterator<Item = &str> + '_ {
        self.messages.live().iter().map(|(_, m)| m.as_str())
    }

    /// Returns `true` if navigation would be blocked.
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        !self.messages.live().is_empty()
    }

    /// Message for the host's page-unload handler: all messages joined with
    /// `,`, or `None` when nothing blocks.
    ///
    /// Most browsers show their own generic text instead.
    #[must_use]
    pub fn before_unload_message(&self) -> Option<String> {
        if !self.is_blocking() {
            return None;
        }
        Some(self.messages().collect::<Vec<_>>().join(","))
    }

    /// Navigates with `nav`, unless blocked.
    ///
    /// When blocked, a [`NavPrompt`] is staged and `nav` is held until
    /// [`confirm`](Self::confirm). A newer request replaces a held one.
    pub fn request_navigation(&mut self, nav: impl FnOnce() + 'static) -> NavDecision {
        if !self.is_blocking() {
            nav();
            return NavDecision::Proceeded;
        }
        let prompt = NavPrompt {
            title: PROMPT_TITLE.to_string(),
            ok_text: PROMPT_OK.to_string(),
            cancel_text: PROMPT_CANCEL.to_string(),
            messages: self.messages().map(ToString::to_string).collect(),
        };
        tracing::debug!(
            messages = prompt.messages.len(),
            "navigation blocked, prompting"
        );
        let _ = self.prompt.write(Some(prompt));
        self.held = Some(Box::new(nav));
        NavDecision::Blocked
    }

    /// The prompt to render, once committed.
    #[must_use]
    pub fn prompt(&self) -> Option<&NavPrompt> {
        self.prompt.read().as_ref()
    }

    /// Returns `true` if a navigation is waiting for confirmation.
    #[must_use]
    pub fn has_held_navigation(&self) -> bool {
        self.held.is_some()
    }

    /// Accepts the prompt: clears it and every message, then runs the held
    /// navigation. Returns `false` if nothing was held.
    pub fn confirm(&mut self) -> bool {
        let Some(nav) = self.held.take() else {
            return false;
        };
        let _ = self.prompt.write(None);
        let _ = self.messages.write(Vec::new());
        nav();
        true
    }

    /// Dismisses the prompt and drops the held navigation.
    pub fn cancel(&mut self) {
        self.held = None;
        let _ = self.prompt.write(None);
    }

    /// Commits pending changes and runs their effects.
    pub fn flush(&mut self) {
        self.messages.flush();
        self.prompt.flush();
    }

    /// Marks the owning view as gone; see [`TrackedState::unmount`].
    pub fn unmount(&mut self) {
        self.held = None;
        self.messages.unmount();
        self.prompt.unmount();
    }
}

impl fmt::Debug for NavBlocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavBlocker")
            .field("messages", &self.messages)
            .field("prompt", &self.prompt)
            .field("held", &self.held.is_some())
            .finish()
    }
}
