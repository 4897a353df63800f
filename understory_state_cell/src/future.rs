// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The future returned by tracked writes.

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use futures::channel::oneshot;

/// Completes once a write has been committed and its effects have run.
///
/// Returned by [`TrackedState::write`](crate::TrackedState::write) and
/// [`TrackedState::write_with`](crate::TrackedState::write_with). The output is
/// the committed value, which may be a later write's value when several writes
/// were coalesced into one commit.
///
/// A `WriteFuture` never fails. If its cell goes away without resolving it, it
/// completes with the value this write produced.
///
/// Dropping the future is fine; the write itself still happens.
#[derive(Debug)]
#[must_use = "dropping the future does not cancel the write, but its result is lost"]
pub struct WriteFuture<T> {
    state: WriteState<T>,
}

#[derive(Debug)]
enum WriteState<T> {
    Ready(Option<T>),
    Waiting {
        rx: oneshot::Receiver<T>,
        fallback: Option<T>,
    },
}

impl<T> WriteFuture<T> {
    /// A future that is already complete.
    pub(crate) fn ready(value: T) -> Self {
        Self {
            state: WriteState::Ready(Some(value)),
        }
    }

    /// A future waiting on `rx`, completing with `fallback` if the sender is lost.
    pub(crate) fn waiting(rx: oneshot::Receiver<T>, fallback: T) -> Self {
        Self {
            state: WriteState::Waiting {
                rx,
                fallback: Some(fallback),
            },
        }
    }
}

// No field is structurally pinned.
impl<T> Unpin for WriteFuture<T> {}

impl<T> Future for WriteFuture<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let this = self.get_mut();
        match &mut this.state {
            WriteState::Ready(value) => {
                Poll::Ready(value.take().expect("WriteFuture polled after completion"))
            }
            WriteState::Waiting { rx, fallback } => match Pin::new(rx).poll(cx) {
                Poll::Ready(Ok(value)) => Poll::Ready(value),
                Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(
                    fallback
                        .take()
                        .expect("WriteFuture polled after completion"),
                ),
                Poll::Pending => Poll::Pending,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::FutureExt;
    use futures::channel::oneshot;

    use super::WriteFuture;

    #[test]
    fn ready_future_completes_immediately() {
        assert_eq!(WriteFuture::ready(3).now_or_never(), Some(3));
    }

    #[test]
    fn waiting_future_completes_on_send() {
        let (tx, rx) = oneshot::channel();
        let mut fut = WriteFuture::waiting(rx, 1);
        assert_eq!((&mut fut).now_or_never(), None);
        tx.send(2).unwrap();
        assert_eq!(fut.now_or_never(), Some(2));
    }

    #[test]
    fn lost_sender_falls_back_to_written_value() {
        let (tx, rx) = oneshot::channel::<i32>();
        let fut = WriteFuture::waiting(rx, 7);
        drop(tx);
        assert_eq!(fut.now_or_never(), Some(7));
    }
}
