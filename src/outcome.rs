//! Error-set union and panic payload transport.
//!
//! The error channel of the completion protocol carries a *union* of the
//! outcomes that count as failures: the sender's declared error type, plus
//! one generic opaque case for computations that panicked rather than
//! failing with a typed error. [`WaitError`] is that union; [`PanicPayload`]
//! is the opaque case, holding the original panic value so it can be
//! re-raised unchanged on the waiting thread.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// The original value of a caught panic, transportable across threads.
///
/// Unlike a message-only snapshot, the payload keeps the boxed panic value
/// itself: [`resume`](Self::resume) re-raises it via
/// [`std::panic::resume_unwind`], reproducing the original panic exactly.
pub struct PanicPayload {
    payload: Box<dyn Any + Send + 'static>,
    message: String,
}

impl PanicPayload {
    /// Wraps a payload obtained from [`std::panic::catch_unwind`].
    #[must_use]
    pub fn new(payload: Box<dyn Any + Send + 'static>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "opaque panic payload".to_string()
        };
        Self { payload, message }
    }

    /// Runs a closure, capturing any panic as a payload.
    ///
    /// This is the bridge used by operation states that run work on worker
    /// threads: the worker's panic becomes the generic case of the error
    /// channel instead of tearing the worker down silently.
    pub fn capture<F, R>(f: F) -> Result<R, Self>
    where
        F: FnOnce() -> R,
    {
        panic::catch_unwind(AssertUnwindSafe(f)).map_err(Self::new)
    }

    /// Best-effort panic message for logging and display.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Resumes unwinding with the original payload.
    pub fn resume(self) -> ! {
        panic::resume_unwind(self.payload)
    }
}

impl fmt::Debug for PanicPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanicPayload")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for PanicPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "panic: {}", self.message)
    }
}

/// The unified error-set of a completion: a captured panic or a declared
/// typed error.
///
/// The generic opaque case comes first, mirroring the deduced error-set
/// order (opaque case prepended to the declared types). Deduplication of
/// repeated declared types is inherent here: a sender names a single
/// `Error` type, so the union is always `{panic} ∪ {E}`.
#[derive(Debug, thiserror::Error)]
pub enum WaitError<E> {
    /// The computation panicked; the original payload is preserved.
    #[error("{0}")]
    Panicked(PanicPayload),
    /// The computation failed with its declared error type.
    #[error("{0}")]
    Error(E),
}

impl<E> WaitError<E> {
    /// Returns true if this is the generic opaque (panic) case.
    #[must_use]
    pub const fn is_panicked(&self) -> bool {
        matches!(self, Self::Panicked(_))
    }

    /// Returns true if this is a declared typed error.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl<E> From<E> for WaitError<E> {
    fn from(error: E) -> Self {
        Self::Error(error)
    }
}
