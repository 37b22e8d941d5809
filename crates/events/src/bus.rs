//! Publish/subscribe abstraction carrying commit notices (mechanics only).
//!
//! The bus is deliberately lightweight and transport-agnostic:
//!
//! - **At-least-once delivery**: notices may arrive more than once; consumers
//!   must be idempotent.
//! - **Broadcast semantics**: every subscriber sees every published notice.
//! - **No persistence**: the ledger store is the source of truth. A notice
//!   lost after a commit leaves that projection stale until the account's
//!   next mutation or an out-of-band re-notify sweep.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// Receiving end of a bus subscription.
///
/// Designed for single-threaded consumption; a worker typically loops on
/// `recv_timeout` so it can interleave shutdown checks.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Notice bus contract.
///
/// `publish` can fail (e.g. a poisoned in-memory bus, a broker outage); the
/// write path treats that as a stale-projection condition, never as a reason
/// to roll back a commit.
pub trait NoticeBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> NoticeBus<M> for Arc<B>
where
    B: NoticeBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
