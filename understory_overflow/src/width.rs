// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Width measurement port and the bundled width models.

use core::hash::Hash;

use hashbrown::HashMap;

/// Source of per-item widths along the overflow axis.
///
/// This is the measurement port of the crate: hosts implement it over whatever
/// layout information they have (measured DOM nodes, text shaping results, fixed
/// estimates), so the collapse logic never touches a real layout engine.
///
/// All widths live in the same coordinate space as the available container width
/// (typically logical pixels). Methods take `&mut self` so implementations are
/// free to measure lazily and cache.
pub trait WidthModel<K> {
    /// Width of the item with the given key at the given index.
    ///
    /// Implementations must return a finite, non-negative value. Negative values
    /// are treated as zero by the collapse algorithm.
    fn width_of(&mut self, key: &K, index: usize) -> f64;
}

impl<K, F> WidthModel<K> for F
where
    F: FnMut(&K, usize) -> f64,
{
    fn width_of(&mut self, key: &K, index: usize) -> f64 {
        self(key, index)
    }
}

/// A [`WidthModel`] where all items share the same width.
#[derive(Debug, Clone, Copy)]
pub struct FixedWidthModel {
    width: f64,
}

impl FixedWidthModel {
    /// Creates a model where every item is `width` wide.
    #[must_use]
    pub fn new(width: f64) -> Self {
        Self {
            width: clamp_width(width),
        }
    }

    /// Sets the uniform width for all items.
    pub fn set_width(&mut self, width: f64) {
        debug_assert!(
            width.is_finite(),
            "FixedWidthModel widths must be finite; got {width:?}"
        );
        self.width = clamp_width(width);
    }

    /// Returns the uniform width.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }
}

impl<K> WidthModel<K> for FixedWidthModel {
    fn width_of(&mut self, _key: &K, _index: usize) -> f64 {
        self.width
    }
}

/// A [`WidthModel`] backed by per-key measurements.
///
/// Items without a measurement use the `estimate`. A typical host starts with a
/// rough estimate, renders, then feeds measured widths back with
/// [`MeasuredWidthModel::set_width`] as layout information becomes available.
/// Measurements are keyed rather than indexed so they survive reordering.
#[derive(Debug, Clone)]
pub struct MeasuredWidthModel<K> {
    widths: HashMap<K, f64>,
    estimate: f64,
}

impl<K: Eq + Hash> MeasuredWidthModel<K> {
    /// Creates an empty model using `estimate` for unmeasured items.
    #[must_use]
    pub fn new(estimate: f64) -> Self {
        Self {
            widths: HashMap::new(),
            estimate: clamp_width(estimate),
        }
    }

    /// Records the measured width of `key`.
    ///
    /// Returns `true` if the stored width changed.
    pub fn set_width(&mut self, key: K, width: f64) -> bool {
        debug_assert!(
            width.is_finite(),
            "MeasuredWidthModel widths must be finite; got {width:?}"
        );
        let width = clamp_width(width);
        match self.widths.insert(key, width) {
            Some(prev) => prev != width,
            None => true,
        }
    }

    /// Forgets the measurement for `key`.
    pub fn remove(&mut self, key: &K) -> Option<f64> {
        self.widths.remove(key)
    }

    /// Forgets all measurements.
    pub fn clear(&mut self) {
        self.widths.clear();
    }

    /// Returns the measured width of `key`, if any.
    #[must_use]
    pub fn measured(&self, key: &K) -> Option<f64> {
        self.widths.get(key).copied()
    }

    /// Returns the width used for unmeasured items.
    #[must_use]
    pub const fn estimate(&self) -> f64 {
        self.estimate
    }

    /// Keeps only measurements whose key satisfies `keep`.
    ///
    /// Hosts call this after the item set changes to drop widths of removed items.
    pub fn retain(&mut self, mut keep: impl FnMut(&K) -> bool) {
        self.widths.retain(|k, _| keep(k));
    }
}

impl<K: Eq + Hash> WidthModel<K> for MeasuredWidthModel<K> {
    fn width_of(&mut self, key: &K, _index: usize) -> f64 {
        self.widths.get(key).copied().unwrap_or(self.estimate)
    }
}

/// Clamps negative (and NaN) widths to zero.
pub(crate) fn clamp_width(width: f64) -> f64 {
    if width.is_nan() || width.is_sign_negative() {
        0.0
    } else {
        width
    }
}
