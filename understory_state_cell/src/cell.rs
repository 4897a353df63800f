// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracked state: awaitable writes over an explicit commit/effects cycle.

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;
use core::mem;

use futures::channel::oneshot;
use smallvec::SmallVec;

use crate::WriteFuture;

type Resolver<T> = oneshot::Sender<T>;
type Resolvers<T> = SmallVec<[Resolver<T>; 2]>;

/// Options for a [`TrackedState`].
pub struct TrackedStateOptions<T> {
    on_change: Option<Box<dyn FnMut(T) -> T>>,
    skip_update_if_same: bool,
    name: Option<String>,
}

impl<T> Default for TrackedStateOptions<T> {
    fn default() -> Self {
        Self {
            on_change: None,
            skip_update_if_same: false,
            name: None,
        }
    }
}

impl<T> TrackedStateOptions<T> {
    /// Default options: no transform, every write commits, no name.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Transform applied to every write before the equality check.
    ///
    /// Runs exactly once per write, synchronously. Not run for writes to an
    /// unmounted cell.
    #[must_use]
    pub fn with_on_change(mut self, on_change: impl FnMut(T) -> T + 'static) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }

    /// Skip the commit when a write equals the latest value.
    ///
    /// Skipped writes still resolve, immediately, together with every write
    /// queued before them.
    #[must_use]
    pub fn with_skip_update_if_same(mut self, skip: bool) -> Self {
        self.skip_update_if_same = skip;
        self
    }

    /// Diagnostic label used in log events.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl<T> fmt::Debug for TrackedStateOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackedStateOptions")
            .field("on_change", &self.on_change.is_some())
            .field("skip_update_if_same", &self.skip_update_if_same)
            .field("name", &self.name)
            .finish()
    }
}

/// A state value whose writers can await the end of the update cycle.
///
/// The host drives two phases, mirroring a render pass:
///
/// 1. [`commit`](Self::commit) makes the latest written value the committed
///    value that [`read`](Self::read) returns.
/// 2. [`run_effects`](Self::run_effects) runs after the host finished reacting
///    to the commit and resolves every write covered by it, in write order.
///
/// Writes issued before a commit are coalesced: one commit, and every
/// [`WriteFuture`] resolves with the committed value. Writes never fail; an
/// unmounted cell resolves them immediately.
pub struct TrackedState<T: Clone + PartialEq> {
    committed: T,
    live: T,
    staged: bool,
    pending: Resolvers<T>,
    awaiting_effects: Resolvers<T>,
    mounted: bool,
    commit_count: u64,
    options: TrackedStateOptions<T>,
}

impl<T: Clone + PartialEq> TrackedState<T> {
    /// Creates a mounted cell holding `initial`.
    ///
    /// Writes wait for a commit right away. Hosts whose first render happens
    /// before the view is attached can [`unmount`](Self::unmount) until then so
    /// those writes resolve immediately, and [`mount`](Self::mount) afterwards.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self::with_options(initial, TrackedStateOptions::default())
    }

    /// Creates a mounted cell holding `initial` with the given options.
    #[must_use]
    pub fn with_options(initial: T, options: TrackedStateOptions<T>) -> Self {
        Self {
            committed: initial.clone(),
            live: initial,
            staged: false,
            pending: SmallVec::new(),
            awaiting_effects: SmallVec::new(),
            mounted: true,
            commit_count: 0,
            options,
        }
    }

    /// The committed value.
    #[must_use]
    pub fn read(&self) -> &T {
        &self.committed
    }

    /// The latest written value, whether or not it has been committed yet.
    ///
    /// Reading it never schedules anything.
    #[must_use]
    pub fn live(&self) -> &T {
        &self.live
    }

    /// Diagnostic label, empty when none was given.
    #[must_use]
    pub fn name(&self) -> &str {
        self.options.name.as_deref().unwrap_or("")
    }

    /// Returns `true` while the owning view is alive.
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Returns `true` if a write is waiting for [`commit`](Self::commit).
    #[must_use]
    pub const fn needs_commit(&self) -> bool {
        self.staged
    }

    /// Number of unresolved writes, committed or not.
    #[must_use]
    pub fn pending_writes(&self) -> usize {
        self.pending.len() + self.awaiting_effects.len()
    }

    /// Number of commits applied so far.
    #[must_use]
    pub const fn commit_count(&self) -> u64 {
        self.commit_count
    }

    /// Writes `value`.
    ///
    /// See [`write_with`](Self::write_with).
    pub fn write(&mut self, value: T) -> WriteFuture<T> {
        self.write_with(move |_| value)
    }

    /// Writes the value computed by `update` from the latest value.
    ///
    /// - Unmounted: completes immediately with `update(latest)`; nothing changes.
    /// - Otherwise the `on_change` transform is applied. With
    ///   `skip_update_if_same`, a result equal to the latest value does not stage
    ///   a commit and every queued write resolves immediately: committed ones
    ///   with the committed value, the rest with the latest value.
    /// - Otherwise the result becomes the latest value and a commit is staged;
    ///   the future completes after the next [`commit`](Self::commit) and
    ///   [`run_effects`](Self::run_effects).
    pub fn write_with(&mut self, update: impl FnOnce(&T) -> T) -> WriteFuture<T> {
        let candidate = update(&self.live);
        if !self.mounted {
            tracing::trace!(
                cell = self.name(),
                "write on unmounted cell resolved without wait"
            );
            return WriteFuture::ready(candidate);
        }

        let value = match self.options.on_change.as_mut() {
            Some(on_change) => on_change(candidate),
            None => candidate,
        };

        let (tx, rx) = oneshot::channel();
        self.pending.push(tx);
        let fut = WriteFuture::waiting(rx, value.clone());

        if self.options.skip_update_if_same && value == self.live {
            tracing::trace!(
                cell = self.name(),
                resolved = self.pending.len(),
                "value unchanged"
            );
            let awaiting = mem::take(&mut self.awaiting_effects);
            resolve(awaiting, &self.committed);
            let resolvers = mem::take(&mut self.pending);
            resolve(resolvers, &self.live);
        } else {
            self.live = value;
            self.staged = true;
        }
        fut
    }

    /// Applies the staged value as the committed value.
    ///
    /// Writes queued so far become due for the next
    /// [`run_effects`](Self::run_effects). Writes from an earlier commit whose
    /// effects never ran resolve first, with that earlier commit's value.
    /// Returns `false` if nothing was staged.
    pub fn commit(&mut self) -> bool {
        if !self.staged {
            return false;
        }
        self.staged = false;
        // Writes from the previous commit keep that commit's value.
        let previous = mem::take(&mut self.awaiting_effects);
        resolve(previous, &self.committed);
        self.committed = self.live.clone();
        self.commit_count += 1;
        let pending = mem::take(&mut self.pending);
        self.awaiting_effects.extend(pending);
        tracing::trace!(
            cell = self.name(),
            commit = self.commit_count,
            waiting = self.awaiting_effects.len(),
            "committed"
        );
        true
    }

    /// Post-commit phase: resolves every write covered by the last commit.
    ///
    /// Writes resolve in the order they were issued, all with the committed
    /// value. Returns how many were resolved.
    pub fn run_effects(&mut self) -> usize {
        let resolvers = mem::take(&mut self.awaiting_effects);
        let count = resolvers.len();
        if count > 0 {
            tracing::trace!(cell = self.name(), count, "resolved after commit");
        }
        resolve(resolvers, &self.committed);
        count
    }

    /// Runs [`commit`](Self::commit) then [`run_effects`](Self::run_effects).
    ///
    /// Returns whether a commit happened.
    pub fn flush(&mut self) -> bool {
        let committed = self.commit();
        self.run_effects();
        committed
    }

    /// Marks the owning view as alive again.
    pub fn mount(&mut self) {
        self.mounted = true;
    }

    /// Marks the owning view as gone.
    ///
    /// Every unresolved write completes now: those covered by a commit with the
    /// committed value, the rest with the latest value. Later writes complete
    /// immediately. No further commits are expected.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.resolve_all();
    }

    fn resolve_all(&mut self) {
        let awaiting = mem::take(&mut self.awaiting_effects);
        let pending = mem::take(&mut self.pending);
        if !awaiting.is_empty() || !pending.is_empty() {
            tracing::debug!(
                cell = self.name(),
                count = awaiting.len() + pending.len(),
                "resolving writes without a commit"
            );
        }
        resolve(awaiting, &self.committed);
        resolve(pending, &self.live);
    }
}

fn resolve<T: Clone>(resolvers: Resolvers<T>, value: &T) {
    for resolver in resolvers {
        // The caller may have dropped its future.
        let _ = resolver.send(value.clone());
    }
}

impl<T: Clone + PartialEq> Drop for TrackedState<T> {
    fn drop(&mut self) {
        self.resolve_all();
    }
}

impl<T: Clone + PartialEq + fmt::Debug> fmt::Debug for TrackedState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackedState")
            .field("committed", &self.committed)
            .field("live", &self.live)
            .field("staged", &self.staged)
            .field("pending", &self.pending.len())
            .field("awaiting_effects", &self.awaiting_effects.len())
            .field("mounted", &self.mounted)
            .field("commit_count", &self.commit_count)
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::Cell;
    use core::future::Future;
    use core::pin::Pin;
    use core::sync::atomic::{AtomicUsize, Ordering};
    use core::task::Context;

    use futures::FutureExt;
    use futures::task::{self, ArcWake};

    use super::{TrackedState, TrackedStateOptions};

    #[test]
    fn write_resolves_after_commit_and_effects() {
        let mut cell = TrackedState::new(0);
        let mut fut = cell.write(4);
        assert_eq!(*cell.live(), 4);
        assert_eq!(*cell.read(), 0);
        assert!(cell.needs_commit());
        assert_eq!((&mut fut).now_or_never(), None);

        assert!(cell.commit());
        assert_eq!(*cell.read(), 4);
        // Committed but effects have not run yet.
        assert_eq!((&mut fut).now_or_never(), None);

        assert_eq!(cell.run_effects(), 1);
        assert_eq!(fut.now_or_never(), Some(4));
        assert_eq!(cell.pending_writes(), 0);
    }

    #[test]
    fn concurrent_writes_are_coalesced() {
        let mut cell = TrackedState::new(0);
        let first = cell.write(1);
        let second = cell.write(2);
        assert_eq!(cell.pending_writes(), 2);

        assert!(cell.flush());
        assert_eq!(cell.commit_count(), 1);
        assert_eq!(first.now_or_never(), Some(2));
        assert_eq!(second.now_or_never(), Some(2));
    }

    struct OrderWaker {
        clock: Arc<AtomicUsize>,
        woken_at: AtomicUsize,
    }

    impl ArcWake for OrderWaker {
        fn wake_by_ref(arc_self: &Arc<Self>) {
            let tick = arc_self.clock.fetch_add(1, Ordering::SeqCst) + 1;
            arc_self.woken_at.store(tick, Ordering::SeqCst);
        }
    }

    #[test]
    fn writes_resolve_in_issue_order() {
        let clock = Arc::new(AtomicUsize::new(0));
        let mut cell = TrackedState::new(0);
        let mut polled: Vec<_> = (1..=3)
            .map(|i| {
                let mut fut = cell.write(i);
                let recorder = Arc::new(OrderWaker {
                    clock: Arc::clone(&clock),
                    woken_at: AtomicUsize::new(0),
                });
                let waker = task::waker(Arc::clone(&recorder));
                let mut cx = Context::from_waker(&waker);
                assert!(Pin::new(&mut fut).poll(&mut cx).is_pending());
                (fut, recorder)
            })
            .collect();

        cell.flush();
        let woken: Vec<_> = polled
            .iter()
            .map(|(_, recorder)| recorder.woken_at.load(Ordering::SeqCst))
            .collect();
        assert_eq!(woken, vec![1, 2, 3]);
        for (fut, _) in &mut polled {
            assert_eq!(fut.now_or_never(), Some(3));
        }
    }

    #[test]
    fn write_after_commit_waits_for_its_own_commit() {
        let mut cell = TrackedState::new(0);
        let early = cell.write(1);
        assert!(cell.commit());
        let mut late = cell.write(2);

        // Effects of the first commit only cover the first write.
        assert_eq!(cell.run_effects(), 1);
        assert_eq!(early.now_or_never(), Some(1));
        assert_eq!((&mut late).now_or_never(), None);

        cell.flush();
        assert_eq!(late.now_or_never(), Some(2));
    }

    #[test]
    fn back_to_back_commits_keep_each_commit_value() {
        let mut cell = TrackedState::new(0);
        let mut first = cell.write(1);
        assert!(cell.commit());
        let second = cell.write(2);
        assert!(cell.commit());

        // The second commit already settled the first one's writes.
        assert_eq!((&mut first).now_or_never(), Some(1));
        assert_eq!(cell.run_effects(), 1);
        assert_eq!(second.now_or_never(), Some(2));
    }

    #[test]
    fn skip_if_same_resolves_committed_writes_first() {
        let options = TrackedStateOptions::new().with_skip_update_if_same(true);
        let mut cell = TrackedState::with_options(0, options);
        let first = cell.write(1);
        assert!(cell.commit());
        let second = cell.write(1);

        assert_eq!(cell.pending_writes(), 0);
        assert_eq!(first.now_or_never(), Some(1));
        assert_eq!(second.now_or_never(), Some(1));
        assert_eq!(cell.run_effects(), 0);
    }

    #[test]
    fn skip_if_same_resolves_without_commit() {
        let options = TrackedStateOptions::new().with_skip_update_if_same(true);
        let mut cell = TrackedState::with_options(5, options);
        let fut = cell.write(5);
        assert!(!cell.needs_commit());
        assert_eq!(fut.now_or_never(), Some(5));
        assert!(!cell.flush());
        assert_eq!(cell.commit_count(), 0);
    }

    #[test]
    fn skip_if_same_also_resolves_earlier_writes() {
        let options = TrackedStateOptions::new().with_skip_update_if_same(true);
        let mut cell = TrackedState::with_options(0, options);
        let first = cell.write(3);
        let second = cell.write(3);
        assert_eq!(first.now_or_never(), Some(3));
        assert_eq!(second.now_or_never(), Some(3));

        // The staged value still commits.
        assert!(cell.flush());
        assert_eq!(*cell.read(), 3);
    }

    #[test]
    fn equal_writes_commit_without_skip() {
        let mut cell = TrackedState::new(5);
        let fut = cell.write(5);
        assert!(cell.flush());
        assert_eq!(cell.commit_count(), 1);
        assert_eq!(fut.now_or_never(), Some(5));
    }

    #[test]
    fn on_change_runs_once_before_equality() {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let options = TrackedStateOptions::new()
            .with_skip_update_if_same(true)
            .with_on_change(move |v: i32| {
                seen.set(seen.get() + 1);
                v.clamp(0, 10)
            });
        let mut cell = TrackedState::with_options(10, options);

        // 42 clamps to 10, which equals the current value.
        let fut = cell.write(42);
        assert_eq!(calls.get(), 1);
        assert!(!cell.needs_commit());
        assert_eq!(fut.now_or_never(), Some(10));

        let fut = cell.write(-3);
        assert_eq!(calls.get(), 2);
        cell.flush();
        assert_eq!(fut.now_or_never(), Some(0));
    }

    #[test]
    fn functional_writes_see_latest_value() {
        let mut cell = TrackedState::new(1);
        let a = cell.write_with(|v| v + 1);
        let b = cell.write_with(|v| v * 10);
        cell.flush();
        assert_eq!(a.now_or_never(), Some(20));
        assert_eq!(b.now_or_never(), Some(20));
    }

    #[test]
    fn unmounted_writes_resolve_immediately() {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let options = TrackedStateOptions::new().with_on_change(move |v: i32| {
            seen.set(seen.get() + 1);
            v
        });
        let mut cell = TrackedState::with_options(1, options);
        cell.unmount();

        let fut = cell.write(9);
        assert_eq!(fut.now_or_never(), Some(9));
        assert_eq!(*cell.read(), 1);
        assert_eq!(*cell.live(), 1);
        assert_eq!(calls.get(), 0);
        assert!(!cell.needs_commit());
    }

    #[test]
    fn unmount_resolves_outstanding_writes() {
        let mut cell = TrackedState::new(0);
        let committed = cell.write(1);
        cell.commit();
        let staged = cell.write(2);

        cell.unmount();
        assert_eq!(committed.now_or_never(), Some(1));
        assert_eq!(staged.now_or_never(), Some(2));
        assert_eq!(cell.pending_writes(), 0);
    }

    #[test]
    fn dropping_the_cell_resolves_writes() {
        let mut cell = TrackedState::new(0);
        let fut = cell.write(6);
        drop(cell);
        assert_eq!(fut.now_or_never(), Some(6));
    }

    #[test]
    fn reads_are_stable_between_writes() {
        let mut cell = TrackedState::new(vec![1, 2]);
        assert_eq!(cell.read(), cell.read());
        let _ = cell.write(vec![3]);
        assert_eq!(cell.read(), &vec![1, 2]);
        cell.flush();
        assert_eq!(cell.read(), &vec![3]);
        assert_eq!(cell.read(), cell.read());
    }

    #[test]
    fn dropped_futures_do_not_block_others() {
        let mut cell = TrackedState::new(0);
        drop(cell.write(1));
        let kept = cell.write(2);
        assert!(cell.flush());
        assert_eq!(kept.now_or_never(), Some(2));
    }

    #[test]
    fn name_is_a_label_only() {
        let options = TrackedStateOptions::new().with_name("zoom");
        let cell = TrackedState::with_options(0_u8, options);
        assert_eq!(cell.name(), "zoom");
        assert_eq!(TrackedState::new(0_u8).name(), "");
    }
}
