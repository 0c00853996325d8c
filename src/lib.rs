//! Syncbridge: a blocking rendezvous with a three-channel completion protocol.
//!
//! # Overview
//!
//! Syncbridge lets a calling thread block until an independently scheduled
//! asynchronous computation completes. The computation is described by a
//! [`Sender`](protocol::Sender): a deferred operation that, once connected to
//! a [`Receiver`](protocol::Receiver) and started, eventually invokes exactly
//! one of three terminal completion channels — value, error, or stopped.
//! [`sync_wait`] bridges that protocol back into ordinary synchronous control
//! flow:
//!
//! - value completion returns `Ok(Some(value))`
//! - a typed error returns `Err(error)`
//! - a captured panic is resumed on the calling thread
//! - stopped completion returns `Ok(None)` and raises nothing
//!
//! # Core Guarantees
//!
//! - **Exactly-once delivery**: the outcome slot is written at most once,
//!   by at most one completion channel, and is read-only afterwards
//! - **No lost wakeups**: the completion signal uses a lock-protected
//!   flag with a double-checked wait, so a signal that fires before the
//!   waiter sleeps is never missed
//! - **Single result shape**: a sender declares exactly one value type;
//!   a computation whose branches disagree on shape fails to build
//! - **Foreign-thread safe**: both waiting and signalling are permitted
//!   from threads no runtime scheduler knows about
//!
//! # Customization
//!
//! A sender whose completion scheduler already owns the result can supply
//! its own wait through the override tier in [`dispatch`], bypassing the
//! generic shared-state rendezvous entirely (for example to interleave
//! pending work instead of sleeping, avoiding self-deadlock).
//!
//! # Module Structure
//!
//! - [`protocol`]: Sender/receiver/operation traits (the consumed protocol)
//! - [`outcome`]: Error-set union and panic payload transport
//! - [`latch`]: Single-shot notify-once primitive
//! - [`wait`]: Shared state, wait receiver, and the blocking wait driver
//! - [`dispatch`]: Tiered override/fallback customization
//!
//! # Example
//!
//! ```ignore
//! use syncbridge::sync_wait;
//!
//! // `compute` is any type implementing `Sender` + `SyncWait`.
//! let outcome = sync_wait(compute)?;
//! match outcome {
//!     Some(value) => println!("completed with {value:?}"),
//!     None => println!("computation was stopped"),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod dispatch;
pub mod latch;
pub mod outcome;
pub mod protocol;
pub mod wait;

pub use dispatch::{via_scheduler, SchedulerWait};
pub use latch::Latch;
pub use outcome::{PanicPayload, WaitError};
pub use protocol::{Operation, Receiver, Sender, WithCompletionScheduler};
pub use wait::{sync_wait, sync_wait_deferred, SyncWait, SyncWaitDeferred};
