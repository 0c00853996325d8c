#![allow(dead_code)]
//! Shared integration test senders exercising every completion channel.

use std::convert::Infallible;
use std::thread;
use std::time::Duration;
use syncbridge::{Operation, PanicPayload, Receiver, Sender, SyncWait, WaitError};

/// Completes with its value synchronously inside `start`.
pub struct Just<T>(pub T);

pub struct JustOp<T, R> {
    cell: Option<(T, R)>,
}

impl<T, R: Receiver<Value = T>> Operation for JustOp<T, R> {
    fn start(&mut self) {
        let (value, receiver) = self.cell.take().expect("started twice");
        receiver.set_value(value);
    }
}

impl<T: Send + 'static> Sender for Just<T> {
    type Value = T;
    type Error = Infallible;
    const SENDS_STOPPED: bool = false;
    type Operation<R>
        = JustOp<T, R>
    where
        R: Receiver<Value = T, Error = Infallible> + Send + 'static;

    fn connect<R>(self, receiver: R) -> JustOp<T, R>
    where
        R: Receiver<Value = T, Error = Infallible> + Send + 'static,
    {
        JustOp {
            cell: Some((self.0, receiver)),
        }
    }
}

impl<T: Send + 'static> SyncWait for Just<T> {}

/// Runs a closure on a background worker after a delay; the closure's
/// result (or panic) is delivered on the matching channel.
pub struct Background<F> {
    pub delay: Duration,
    pub work: F,
}

pub struct BackgroundOp<F, R> {
    cell: Option<(Duration, F, R)>,
    worker: Option<thread::JoinHandle<()>>,
}

impl<T, E, F, R> Operation for BackgroundOp<F, R>
where
    T: Send + 'static,
    E: Send + 'static,
    F: FnOnce() -> Result<T, E> + Send + 'static,
    R: Receiver<Value = T, Error = E> + Send + 'static,
{
    fn start(&mut self) {
        let (delay, work, receiver) = self.cell.take().expect("started twice");
        self.worker = Some(thread::spawn(move || {
            thread::sleep(delay);
            match PanicPayload::capture(work) {
                Ok(Ok(value)) => receiver.set_value(value),
                Ok(Err(error)) => receiver.set_error(error.into()),
                Err(payload) => receiver.set_error(WaitError::Panicked(payload)),
            }
        }));
    }
}

impl<F, R> Drop for BackgroundOp<F, R> {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl<T, E, F> Sender for Background<F>
where
    T: Send + 'static,
    E: Send + 'static,
    F: FnOnce() -> Result<T, E> + Send + 'static,
{
    type Value = T;
    type Error = E;
    const SENDS_STOPPED: bool = false;
    type Operation<R>
        = BackgroundOp<F, R>
    where
        R: Receiver<Value = T, Error = E> + Send + 'static;

    fn connect<R>(self, receiver: R) -> BackgroundOp<F, R>
    where
        R: Receiver<Value = T, Error = E> + Send + 'static,
    {
        BackgroundOp {
            cell: Some((self.delay, self.work, receiver)),
            worker: None,
        }
    }
}

impl<T, E, F> SyncWait for Background<F>
where
    T: Send + 'static,
    E: Send + 'static,
    F: FnOnce() -> Result<T, E> + Send + 'static,
{
}

/// Invokes the stopped channel from a background worker.
pub struct StopLater {
    pub delay: Duration,
}

pub struct StopLaterOp<R> {
    cell: Option<(Duration, R)>,
    worker: Option<thread::JoinHandle<()>>,
}

impl<R> Operation for StopLaterOp<R>
where
    R: Receiver + Send + 'static,
{
    fn start(&mut self) {
        let (delay, receiver) = self.cell.take().expect("started twice");
        self.worker = Some(thread::spawn(move || {
            thread::sleep(delay);
            receiver.set_stopped();
        }));
    }
}

impl<R> Drop for StopLaterOp<R> {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Sender for StopLater {
    type Value = String;
    type Error = Infallible;
    const SENDS_STOPPED: bool = true;
    type Operation<R>
        = StopLaterOp<R>
    where
        R: Receiver<Value = String, Error = Infallible> + Send + 'static;

    fn connect<R>(self, receiver: R) -> StopLaterOp<R>
    where
        R: Receiver<Value = String, Error = Infallible> + Send + 'static,
    {
        StopLaterOp {
            cell: Some((self.delay, receiver)),
            worker: None,
        }
    }
}

impl SyncWait for StopLater {}
