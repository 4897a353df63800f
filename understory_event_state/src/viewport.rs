// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport size tracking.
//!
//! The size is unknown until the host reports its first measurement, so
//! layout code can tell "not measured yet" apart from a zero-sized viewport.

use kurbo::Size;

/// Last reported viewport size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportSize {
    size: Option<Size>,
}

impl ViewportSize {
    /// Creates a tracker with no measurement yet.
    pub const fn new() -> Self {
        Self { size: None }
    }

    /// The last reported size, or `None` before the first measurement.
    pub const fn size(&self) -> Option<Size> {
        self.size
    }

    /// Records a resize. Returns `true` if the size changed.
    ///
    /// Non-finite or negative extents are clamped to zero.
    pub fn on_resize(&mut self, size: Size) -> bool {
        let size = Size::new(clamp_extent(size.width), clamp_extent(size.height));
        if self.size == Some(size) {
            return false;
        }
        tracing::trace!(width = size.width, height = size.height, "viewport resized");
        self.size = Some(size);
        true
    }

    /// Forgets the measurement, for example when the viewport is detached.
    pub fn reset(&mut self) {
        self.size = None;
    }
}

fn clamp_extent(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
