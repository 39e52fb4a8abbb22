//! Waiting on several channel operations at once.
//!
//! `select` takes a list of descriptors, each pairing a channel with an
//! intended operation, completes exactly one of them and reports which one.
//! If none of the operations can complete immediately, the calling thread
//! sleeps until one of the involved channels changes state.
//!
//! ### Example
//!
//! ```
//! use sluice::bounded::Channel;
//! use sluice::select::{select, Descriptor};
//!
//! let commands = Channel::new(1).unwrap();
//! let events = Channel::new(1).unwrap();
//! events.send_sync("flushed").unwrap();
//!
//! let mut descriptors = [
//!     Descriptor::send(&commands, "stop"),
//!     Descriptor::recv(&events),
//! ];
//! // The send slot is free, so the first descriptor wins.
//! let (index, result) = select(&mut descriptors);
//! assert_eq!(index, 0);
//! assert!(result.is_ok());
//! ```
//!
//! ### Implementation
//!
//! Each `select` call owns a fresh counting semaphore, its readiness
//! signal. The signal is registered with every channel in the descriptor
//! list before the first poll, and from then on every successful enqueue,
//! dequeue and close on any of those channels posts it once.
//!
//! The call then polls the descriptors in index order, attempting each
//! operation without blocking under that channel's lock. The lowest-indexed
//! descriptor whose operation completes wins; committing under the same lock
//! acquisition that observed readiness means no other descriptor in the call
//! can see a side effect. When a full pass completes nothing, the call
//! sleeps on the signal and re-polls after the next post. Registration since
//! before the first poll guarantees a state change between poll and sleep is
//! not lost: its post is still pending and the sleep returns at once.
//!
//! Before returning, the call unregisters its signal from every channel,
//! including the one it committed on. Register and unregister pair up one
//! list entry per descriptor, so the same channel may appear in the list any
//! number of times.
//!
//! Locks are taken one channel at a time throughout, so a set of concurrent
//! selects with overlapping channel lists cannot form a lock cycle. No
//! fairness across repeated calls is guaranteed: two channels that are
//! permanently ready will always resolve to the lower index.

use crate::bounded::Channel;

mod imp;
#[cfg(test)]
mod test;

pub use self::imp::select;
pub(crate) use self::imp::Signal;

/// The operation a descriptor asks for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    /// Enqueue the descriptor's payload into the channel.
    Send,
    /// Dequeue a message from the channel into the descriptor's slot.
    Recv,
}

/// One intended operation on one channel.
///
/// The payload slot holds the value to enqueue for a send descriptor and
/// receives the dequeued message for a receive descriptor.
pub struct Descriptor<'a, T> {
    channel: &'a Channel<T>,
    direction: Direction,
    payload: Option<T>,
}

impl<'a, T> Descriptor<'a, T> {
    /// Describes sending `val` over `channel`.
    pub fn send(channel: &'a Channel<T>, val: T) -> Descriptor<'a, T> {
        Descriptor {
            channel,
            direction: Direction::Send,
            payload: Some(val),
        }
    }

    /// Describes receiving a message from `channel`.
    pub fn recv(channel: &'a Channel<T>) -> Descriptor<'a, T> {
        Descriptor {
            channel,
            direction: Direction::Recv,
            payload: None,
        }
    }

    /// Returns the direction of this descriptor.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Takes the payload out of the slot.
    ///
    /// After a committed receive this is the received message; for a send
    /// descriptor that did not commit it is the original value. Emptying a
    /// send descriptor before passing it to `select` leaves it permanently
    /// not ready.
    pub fn take(&mut self) -> Option<T> {
        self.payload.take()
    }
}
