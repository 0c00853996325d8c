//! Shared state, wait receiver, and the blocking wait driver.
//!
//! This is the rendezvous between a completion that may arrive on any
//! thread and a caller that blocks until it does:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                      BLOCKING RENDEZVOUS                         │
//! │                                                                  │
//! │   calling thread                      completing thread          │
//! │        │                                    │                    │
//! │   connect + start ──────────────────────►  (runs)                │
//! │        │                                    │                    │
//! │   latch.wait()  ◄─── slot write + set ───  terminal call         │
//! │        │                                                         │
//! │   take_outcome() ──► Ok(Some(v)) | Err(e) | resume | Ok(None)    │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Outcome Slot Invariant
//!
//! The slot is written at most once, by at most one completion channel,
//! strictly before the latch is set; after the latch is set it is
//! read-only until the waiting thread takes the outcome. The latch's
//! release/acquire pairing (and its mutex on the slow path) makes the
//! write happen-before the read, so the outcome is never observed
//! half-written.
//!
//! # Shared State Lifetime
//!
//! The shared state is created per call, jointly owned by the receiver
//! and the waiting frame through an [`Arc`], and dropped after the outcome
//! has been taken. The joint ownership makes the lifetime requirement —
//! shared state strictly outlives the operation — structural: the receiver
//! keeps its half alive for exactly as long as the operation can still
//! complete, no matter which thread the terminal call lands on.

use crate::latch::Latch;
use crate::outcome::WaitError;
use crate::protocol::{Operation, Receiver, Sender};
use parking_lot::Mutex;
use std::mem;
use std::sync::Arc;
use tracing::trace;

/// The three mutually exclusive states of the outcome slot.
#[derive(Debug)]
enum Slot<T, E> {
    /// No outcome stored; after completion this means "stopped".
    Unset,
    /// The computation failed (typed error or captured panic).
    Failed(WaitError<E>),
    /// The computation produced its single value shape.
    Value(T),
}

/// The synchronized outcome slot bridging completion to the blocking wait.
#[derive(Debug)]
struct Shared<T, E> {
    latch: Latch,
    slot: Mutex<Slot<T, E>>,
}

impl<T, E> Shared<T, E> {
    fn new() -> Self {
        Self {
            latch: Latch::new(),
            slot: Mutex::new(Slot::Unset),
        }
    }

    /// Stores an outcome and runs the completion-signal protocol.
    ///
    /// Called at most once, before the latch is set.
    fn store(&self, outcome: Slot<T, E>) {
        {
            let mut slot = self.slot.lock();
            debug_assert!(
                matches!(*slot, Slot::Unset),
                "completion channel invoked more than once"
            );
            *slot = outcome;
        }
        self.latch.set();
    }

    /// Translates the stored outcome into synchronous control flow.
    ///
    /// Must only be called after the latch has been observed set. A value
    /// becomes `Ok(Some(v))`; a typed error becomes `Err(e)`; a captured
    /// panic is resumed on the calling thread, reproducing the original
    /// payload; an unset slot means the stopped channel ran and becomes
    /// `Ok(None)` without raising anything.
    fn take_outcome(&self) -> Result<Option<T>, E> {
        match mem::replace(&mut *self.slot.lock(), Slot::Unset) {
            Slot::Value(value) => Ok(Some(value)),
            Slot::Failed(WaitError::Error(error)) => Err(error),
            Slot::Failed(WaitError::Panicked(payload)) => payload.resume(),
            Slot::Unset => Ok(None),
        }
    }
}

/// The single-use completion sink bound to a per-call shared state.
///
/// Constructed only by the wait driver; one receiver per wait, never
/// reused. Each channel stores into the slot (or leaves it unset for
/// stopped) and then signals the latch. None of the channels can panic.
#[derive(Debug)]
pub struct WaitReceiver<T, E> {
    shared: Arc<Shared<T, E>>,
}

impl<T, E> Receiver for WaitReceiver<T, E> {
    type Value = T;
    type Error = E;

    fn set_value(self, value: T) {
        self.shared.store(Slot::Value(value));
    }

    fn set_error(self, error: WaitError<E>) {
        self.shared.store(Slot::Failed(error));
    }

    fn set_stopped(self) {
        // Outcome slot stays Unset; only the signal runs.
        self.shared.latch.set();
    }
}

/// The generic fallback: block on a per-call shared-state rendezvous.
///
/// This is the fallback tier of [`SyncWait`]. Override implementations
/// that discover at runtime they cannot take their fast path may call
/// this directly.
pub fn run<S: Sender>(sender: S) -> Result<Option<S::Value>, S::Error> {
    let shared: Arc<Shared<S::Value, S::Error>> = Arc::new(Shared::new());
    let receiver = WaitReceiver {
        shared: Arc::clone(&shared),
    };

    // The operation state lives in this frame, unmoved, from start until
    // the outcome has been taken.
    let mut operation = sender.connect(receiver);
    operation.start();

    trace!("sync_wait: waiting for completion signal");
    shared.latch.wait();
    trace!("sync_wait: completion signalled");
    shared.take_outcome()
}

/// The blocking-wait operation, with tiered customization.
///
/// The provided [`sync_wait`](Self::sync_wait) body is the generic
/// fallback tier. A sender opts in with an empty impl:
///
/// ```ignore
/// impl SyncWait for MySender {}
/// ```
///
/// A sender whose completion scheduler can wait more efficiently (or must,
/// to avoid self-deadlock) overrides the method and delegates to the
/// override tier instead:
///
/// ```ignore
/// impl SyncWait for PoolSender {
///     fn sync_wait(self) -> Result<Option<Self::Value>, Self::Error> {
///         syncbridge::via_scheduler(self)
///     }
/// }
/// ```
///
/// Tier selection is resolved entirely at compile time; see
/// [`dispatch`](crate::dispatch) for the capability predicate.
pub trait SyncWait: Sender {
    /// Blocks the calling thread until this sender completes.
    ///
    /// Returns `Ok(Some(value))` on value completion, `Err(error)` on a
    /// typed error, and `Ok(None)` if the computation was stopped. A
    /// captured panic is resumed on the calling thread.
    fn sync_wait(self) -> Result<Option<Self::Value>, Self::Error> {
        run(self)
    }
}

/// Blocks until the given computation completes.
///
/// The single-sender entry point: dispatches through [`SyncWait`], so a
/// sender with an overriding completion scheduler takes its own path and
/// the generic shared-state rendezvous is never constructed.
pub fn sync_wait<S: SyncWait>(sender: S) -> Result<Option<S::Value>, S::Error> {
    sender.sync_wait()
}

/// A deferred blocking wait, to be completed with a sender later.
///
/// This is the zero-argument form of [`sync_wait`]: a zero-sized
/// algorithm identity carrying no state, for pipeline-style composition
/// where the sender is supplied at the end. It touches no shared state
/// until [`apply`](Self::apply) is called.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncWaitDeferred;

impl SyncWaitDeferred {
    /// Completes the deferred wait with a sender.
    ///
    /// Equivalent to `sync_wait(sender)`, including tier selection.
    pub fn apply<S: SyncWait>(self, sender: S) -> Result<Option<S::Value>, S::Error> {
        sender.sync_wait()
    }
}

/// Returns a deferred, composable blocking wait.
#[must_use]
pub const fn sync_wait_deferred() -> SyncWaitDeferred {
    SyncWaitDeferred
}
