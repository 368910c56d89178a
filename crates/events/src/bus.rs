//! Event publishing/subscription abstraction (mechanics only).
//!
//! This module provides the **event bus pattern**: a pub/sub mechanism used to
//! carry provider notifications into the session store, and navigation intents
//! and session snapshots out of it.
//!
//! ## Design Philosophy
//!
//! The bus makes minimal assumptions:
//!
//! - **Transport-agnostic**: in-memory channels today; a browser message port
//!   or a worker channel would fit the same contract.
//! - **Arrival order per subscriber**: each subscription sees messages in the
//!   order they were published.
//! - **No persistence**: the bus distributes, it does not store.
//!
//! ## Unsubscribing
//!
//! A [`Subscription`] *is* the unsubscribe handle. Dropping it closes the
//! receiving end; the bus notices on its next publish and forgets the
//! subscriber.

use std::sync::Arc;
use std::sync::mpsc::Receiver;

/// A subscription to an event stream.
///
/// Each subscription gets a copy of every message published after it was
/// created (broadcast semantics).
///
/// ## Usage Pattern
///
/// ```ignore
/// let subscription = bus.subscribe();
///
/// // UI thread: drain whatever has arrived, never block.
/// while let Ok(event) = subscription.try_recv() {
///     handle(event);
/// }
/// ```
///
/// ## Thread Safety
///
/// Subscriptions are designed for single-threaded consumption, which is how
/// the session store uses them: one owner, one drain loop.
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

    /// Collect everything currently queued without blocking.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Domain-agnostic event bus (pub/sub abstraction).
///
/// ## Architecture Role
///
/// ```text
/// Identity Provider ──AuthStateChanged──▶ Session Store ──NavigationIntent──▶ Router
///                                              │
///                                              └──Session──▶ observers (navbar, screens)
/// ```
///
/// ## Error Handling
///
/// `publish()` can fail (e.g. a poisoned lock). Failures are surfaced to the
/// caller, which decides whether a lost notification matters.
///
/// ## Thread Safety
///
/// The trait requires `Send + Sync` so a provider may publish from whatever
/// task completes its network round trip.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
