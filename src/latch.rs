//! Single-shot notify-once primitive.
//!
//! [`Latch`] is the synchronization core of the blocking wait: a one-way
//! flag that one thread sets once and another thread waits on. It is
//! deliberately independent of any outcome type so it can be reused
//! wherever a "signal exactly once, wait at most once" rendezvous is
//! needed.
//!
//! # Signalling Protocol
//!
//! The signaller acquires the mutex, stores the flag, releases the mutex,
//! and only then notifies the condition variable. The waiter does an
//! unlocked fast check first, then re-checks under the lock before
//! sleeping. Together these close the window between "no data yet" and
//! "about to sleep": a notification can never be lost, even when it fires
//! before the waiter reaches the condition variable.
//!
//! # Foreign Threads
//!
//! Both [`set`](Latch::set) and [`wait`](Latch::wait) are safe from any
//! thread, including threads no runtime scheduler tracks. The
//! `parking_lot` lock carries no poisoning and no thread-identity
//! bookkeeping, so there is nothing for an unmanaged thread to violate.

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// A one-shot latch: set once, wait until set.
///
/// The flag never resets. Waiting on an already-set latch returns
/// immediately through the lock-free fast path.
#[derive(Debug, Default)]
pub struct Latch {
    flag: AtomicBool,
    lock: Mutex<()>,
    signal: Condvar,
}

impl Latch {
    /// Creates a new, unset latch.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
            lock: Mutex::new(()),
            signal: Condvar::new(),
        }
    }

    /// Sets the latch and wakes the waiter.
    ///
    /// The flag is stored while the mutex is held and the notification is
    /// issued after the mutex is released; combined with the waiter's
    /// re-check under the lock this makes the signal lost-wakeup-free.
    /// The release store also establishes happens-before for anything
    /// written prior to this call, so a fast-path waiter observes it too.
    pub fn set(&self) {
        let guard = self.lock.lock();
        self.flag.store(true, Ordering::Release);
        drop(guard);
        self.signal.notify_one();
    }

    /// Blocks the calling thread until the latch is set.
    ///
    /// Fast path: an unlocked check of the flag, for the common case where
    /// the signal has already fired. Slow path: re-check under the lock,
    /// then sleep on the condition variable. The loop also absorbs
    /// spurious wakeups.
    pub fn wait(&self) {
        if self.flag.load(Ordering::Acquire) {
            return;
        }
        let mut guard = self.lock.lock();
        while !self.flag.load(Ordering::Acquire) {
            self.signal.wait(&mut guard);
        }
    }

    /// Blocks until the latch is set or the timeout elapses.
    ///
    /// Returns true if the latch was set, false on timeout.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        if self.flag.load(Ordering::Acquire) {
            return true;
        }
        let deadline = Instant::now() + timeout;
        let mut guard = self.lock.lock();
        while !self.flag.load(Ordering::Acquire) {
            if self.signal.wait_until(&mut guard, deadline).timed_out() {
                return self.flag.load(Ordering::Acquire);
            }
        }
        true
    }

    /// Returns true if the latch has been set.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
