//! The Rollover Stage: a one-input/many-output fan-out that delivers the
//! full input sequence to exactly one "active" output at a time, advancing
//! to the next non-cancelled output whenever the active one cancels.
//!
//! A protocol-phase transition (SSL negotiation -> startup/authentication ->
//! query cycle) is exactly this shape: a single backend byte stream handed
//! off between consumers that each only care about their own phase.
//!
//! Single-threaded cooperative, per §5: no internal locking, `Rc<RefCell<_>>`
//! sharing between the `n` output handles and the driver, matching how this
//! corpus never reaches for a mutex around per-connection state.
//!
//! Demand-driven by construction: the upstream [`Stream`] is only ever
//! polled from [`RolloverOutput::poll_next`] of the currently active
//! output, so an element is never produced before some output asks for it —
//! a cancellation that arrives before a poll therefore cannot lose an
//! element, because none was ever requested.

use std::{
    cell::RefCell,
    pin::Pin,
    rc::Rc,
    task::{Context, Poll, Waker},
};

use futures_core::Stream;

use crate::common::trace;

struct Inner<S> {
    upstream: S,
    active_index: usize,
    cancelled: Vec<bool>,
    wakers: Vec<Option<Waker>>,
    /// Set once the upstream has reported `Poll::Ready(None)`: every output,
    /// active or not, is done from that point on, even one whose turn never
    /// arrived.
    finished: bool,
}

impl<S> Inner<S> {
    fn all_cancelled(&self) -> bool {
        self.cancelled.iter().all(|c| *c)
    }

    /// cancel(i)'s advance-to-next-non-cancelled transition.
    fn advance_active(&mut self) {
        for j in self.active_index + 1..self.cancelled.len() {
            if !self.cancelled[j] {
                trace!("rollover: handing off active output {} -> {}", self.active_index, j);
                self.active_index = j;
                if let Some(waker) = self.wakers[j].take() {
                    waker.wake();
                }
                return;
            }
        }
    }
}

/// Splits a single input stream of `T` into `n` outputs, exactly one of
/// which is "active" (receiving elements) at any time.
pub struct RolloverOutput<S> {
    index: usize,
    shared: Rc<RefCell<Inner<S>>>,
}

/// Creates a rollover with `n` outputs over `upstream`, `active_index = 0`.
pub fn rollover<S: Stream>(upstream: S, n: usize) -> Vec<RolloverOutput<S>> {
    assert!(n >= 1, "rollover requires at least one output");
    let shared = Rc::new(RefCell::new(Inner {
        upstream,
        active_index: 0,
        cancelled: vec![false; n],
        wakers: vec![None; n],
        finished: false,
    }));
    (0..n).map(|index| RolloverOutput { index, shared: Rc::clone(&shared) }).collect()
}

impl<S> RolloverOutput<S> {
    /// cancel(i): marks this output cancelled and, if it was active,
    /// advances to the next non-cancelled output. If none remain, the
    /// upstream is simply never polled again — the Rust analogue of
    /// "cancel upstream" for a passive `Stream`.
    pub fn cancel(&self) {
        let mut shared = self.shared.borrow_mut();
        let i = self.index;
        if shared.cancelled[i] {
            return;
        }
        shared.cancelled[i] = true;
        if shared.active_index == i {
            shared.advance_active();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.borrow().cancelled[self.index]
    }

    /// Whether every output has cancelled, i.e. the upstream should itself
    /// be considered cancelled.
    pub fn upstream_cancelled(&self) -> bool {
        self.shared.borrow().all_cancelled()
    }
}

impl<S: Stream + Unpin> Stream for RolloverOutput<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let me = self.get_mut();
        let mut shared = me.shared.borrow_mut();

        if shared.cancelled[me.index] {
            return Poll::Ready(None);
        }
        if shared.finished {
            return Poll::Ready(None);
        }
        if shared.active_index != me.index {
            shared.wakers[me.index] = Some(cx.waker().clone());
            return Poll::Pending;
        }

        // pull from active: this output *is* the active one, so (and only
        // so) its poll is allowed to advance the shared upstream.
        let poll = Pin::new(&mut shared.upstream).poll_next(cx);
        match poll {
            Poll::Ready(None) => {
                // upstream finish: every non-cancelled output observes completion,
                // including one whose turn never arrives.
                shared.finished = true;
                for (idx, waker) in shared.wakers.iter_mut().enumerate() {
                    if idx != me.index {
                        if let Some(waker) = waker.take() {
                            waker.wake();
                        }
                    }
                }
                Poll::Ready(None)
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_executor::block_on_stream;
    use futures_util::stream;

    #[test]
    fn next_on_finish() {
        // Scenario E
        let mut outputs = rollover(stream::iter([1, 2]), 2);
        let out1 = outputs.pop().unwrap();
        let out0 = outputs.pop().unwrap();

        let mut s0 = block_on_stream(out0);
        assert_eq!(s0.next(), Some(1));
        s0.into_inner().cancel();

        let mut s1 = block_on_stream(out1);
        assert_eq!(s1.next(), Some(2));
    }

    #[test]
    fn skip_closed_output() {
        // Scenario F
        let mut outputs = rollover(stream::iter([1, 2]), 3);
        let out2 = outputs.pop().unwrap();
        let out1 = outputs.pop().unwrap();
        let out0 = outputs.pop().unwrap();

        out1.cancel();

        let mut s0 = block_on_stream(out0);
        assert_eq!(s0.next(), Some(1));
        s0.into_inner().cancel();

        let mut s2 = block_on_stream(out2);
        assert_eq!(s2.next(), Some(2));
    }

    #[test]
    fn all_cancelled_reports_upstream_cancellation() {
        let outputs = rollover(stream::iter([1, 2]), 2);
        for out in &outputs {
            out.cancel();
        }
        assert!(outputs[0].upstream_cancelled());
    }

    #[test]
    fn finish_completes_non_cancelled_outputs() {
        let mut outputs = rollover(stream::iter([42]), 1);
        let out0 = outputs.pop().unwrap();
        let mut s0 = block_on_stream(out0);
        assert_eq!(s0.next(), Some(42));
        assert_eq!(s0.next(), None);
    }

    #[test]
    fn pending_output_completes_when_upstream_finishes_before_its_turn() {
        let mut outputs = rollover(stream::iter([1]), 2);
        let out1 = outputs.pop().unwrap();
        let out0 = outputs.pop().unwrap();

        // out1 never becomes active: out0 drains the single element and the
        // upstream finishes while out1 is still pending on its waker.
        let mut s0 = block_on_stream(out0);
        assert_eq!(s0.next(), Some(1));
        assert_eq!(s0.next(), None);

        let mut s1 = block_on_stream(out1);
        assert_eq!(s1.next(), None);
    }

    #[test]
    fn no_element_is_delivered_to_more_than_one_output() {
        let mut outputs = rollover(stream::iter([1, 2]), 2);
        let out1 = outputs.pop().unwrap();
        let out0 = outputs.pop().unwrap();

        let mut s0 = block_on_stream(out0);
        assert_eq!(s0.next(), Some(1));
        s0.into_inner().cancel();
        // out0 never pulls again, so element 2 can only reach out1.

        let mut s1 = block_on_stream(out1);
        assert_eq!(s1.next(), Some(2));
    }
}
