//! Completion protocol traits.
//!
//! These traits describe the asynchronous completion protocol this crate
//! consumes; the composition machinery that builds concrete senders lives
//! elsewhere. The shape is a three-channel handshake:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                   SENDER / RECEIVER HANDSHAKE                    │
//! │                                                                  │
//! │   Sender ── connect(receiver) ──► Operation                      │
//! │                                      │                           │
//! │                                   start()                        │
//! │                                      │   (any thread, later)     │
//! │                                      ├── set_value(v)    ──► ✓   │
//! │                                      ├── set_error(e)    ──► ✗   │
//! │                                      └── set_stopped()   ──► ∅   │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Exactly one channel is invoked, exactly once, as the final action of the
//! operation. Each channel consumes the receiver, so a second terminal call
//! is unrepresentable.
//!
//! # Single Result Shape
//!
//! A sender declares exactly one value type ([`Sender::Value`], already
//! decayed to an owned shape) and one declared error type
//! ([`Sender::Error`]). A computation whose branches would complete with
//! structurally different value shapes cannot implement [`Sender`] and is
//! rejected at compile time, never truncated or coerced:
//!
//! ```compile_fail
//! use std::convert::Infallible;
//! use syncbridge::protocol::{Operation, Receiver, Sender};
//!
//! struct TwoShapes;
//! struct TwoShapesOp<R>(Option<R>);
//!
//! impl<R: Receiver<Value = (i32, String)>> Operation for TwoShapesOp<R> {
//!     fn start(&mut self) {
//!         let r = self.0.take().unwrap();
//!         if std::env::var("ALT").is_ok() {
//!             // Branches disagree on the value shape: this does not build.
//!             r.set_value((1,));
//!         } else {
//!             r.set_value((1, "ok".to_string()));
//!         }
//!     }
//! }
//!
//! impl Sender for TwoShapes {
//!     type Value = (i32, String);
//!     type Error = Infallible;
//!     const SENDS_STOPPED: bool = false;
//!     type Operation<R>
//!         = TwoShapesOp<R>
//!     where
//!         R: Receiver<Value = Self::Value, Error = Self::Error> + Send + 'static;
//!     fn connect<R>(self, receiver: R) -> TwoShapesOp<R>
//!     where
//!         R: Receiver<Value = Self::Value, Error = Self::Error> + Send + 'static,
//!     {
//!         TwoShapesOp(Some(receiver))
//!     }
//! }
//! ```

use crate::outcome::WaitError;

/// A deferred computation with declared possible outcomes.
///
/// Connecting a sender to a matching receiver produces an [`Operation`];
/// starting the operation eventually invokes exactly one of the receiver's
/// completion channels, possibly on another thread.
pub trait Sender: Sized {
    /// The single value shape this sender can complete with.
    ///
    /// This is an owned type: completion passes the value by value into
    /// [`Receiver::set_value`], so references and qualifiers have already
    /// decayed away.
    type Value: Send + 'static;

    /// The declared error payload type.
    ///
    /// Captured panics travel separately as the generic case of
    /// [`WaitError`], so this covers typed domain errors only. Senders that
    /// cannot fail use [`std::convert::Infallible`].
    type Error: Send + 'static;

    /// Whether this sender may complete on the stopped channel.
    const SENDS_STOPPED: bool;

    /// The operation state produced by [`connect`](Self::connect).
    type Operation<R>: Operation
    where
        R: Receiver<Value = Self::Value, Error = Self::Error> + Send + 'static;

    /// Connects this sender to a receiver, producing an operation state.
    ///
    /// The operation owns every resource the computation needs, including
    /// the receiver. It must be started exactly once and must stay alive
    /// until the receiver's terminal call returns.
    fn connect<R>(self, receiver: R) -> Self::Operation<R>
    where
        R: Receiver<Value = Self::Value, Error = Self::Error> + Send + 'static;
}

/// The consumer of a sender's three completion channels.
///
/// A receiver is single-use: every channel takes `self` by value, so at most
/// one terminal call can ever be made. Implementations must not panic inside
/// a channel; a terminal call is the final action of the operation and has
/// nowhere to unwind to.
pub trait Receiver: Sized {
    /// The value shape accepted by the value channel.
    type Value;
    /// The declared error type accepted by the error channel.
    type Error;

    /// Value channel: the computation produced a value.
    fn set_value(self, value: Self::Value);

    /// Error channel: the computation failed.
    ///
    /// Accepts the full error-set union — a declared typed error or a
    /// captured panic payload. Senders with a typed error `e` write
    /// `receiver.set_error(e.into())`.
    fn set_error(self, error: WaitError<Self::Error>);

    /// Stopped channel: the computation was cancelled upstream.
    fn set_stopped(self);
}

/// The live instance of a connected computation.
pub trait Operation {
    /// Starts the computation. Must be called exactly once.
    ///
    /// Completion may happen synchronously inside this call or later on
    /// any thread. The operation state must remain alive until the
    /// receiver's terminal call returns.
    fn start(&mut self);
}

/// Capability: this sender reports a completion scheduler for its value
/// channel.
///
/// A scheduler obtained this way can opt into the blocking-wait override
/// tier by implementing [`SchedulerWait`](crate::dispatch::SchedulerWait);
/// see [`dispatch`](crate::dispatch) for how the tiers are selected.
pub trait WithCompletionScheduler: Sender {
    /// The scheduler on which the value channel completes.
    type Scheduler;

    /// Returns the completion scheduler for the value channel.
    fn completion_scheduler(&self) -> Self::Scheduler;
}
