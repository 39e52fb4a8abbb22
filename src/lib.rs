//! Bounded channel primitives.
//!
//! This library provides a bounded multiple-producers multiple-consumers
//! channel and a `select` operation which completes the first of several
//! pending channel operations to become ready.
//!
//! A channel owns a fixed-capacity FIFO of messages. Senders block while the
//! buffer is full, receivers block while it is empty, and closing the channel
//! wakes every waiter. Closing is also the only cancellation mechanism: there
//! are no timeouts, and a blocked call returns only once it can complete or
//! the channel is closed.
//!
//! ### Examples
//!
//! Simple usage:
//!
//! ```
//! use std::thread;
//! use sluice::bounded::Channel;
//!
//! // Create a channel with room for ten buffered messages.
//! let chan = Channel::new(10).unwrap();
//!
//! let sender = chan.clone();
//! thread::spawn(move || {
//!     sender.send_sync(10u32).unwrap();
//!     sender.close().unwrap();
//! });
//!
//! assert_eq!(chan.recv_sync().unwrap(), 10);
//! assert_eq!(chan.recv_sync().unwrap_err(), sluice::Error::Closed);
//! ```
//!
//! Selecting:
//!
//! ```
//! use sluice::bounded::Channel;
//! use sluice::select::{select, Descriptor};
//!
//! let first = Channel::new(1).unwrap();
//! let second = Channel::new(1).unwrap();
//! second.send_sync("ready").unwrap();
//!
//! let mut descriptors = [Descriptor::recv(&first), Descriptor::recv(&second)];
//! let (index, result) = select(&mut descriptors);
//! assert_eq!(index, 1);
//! assert!(result.is_ok());
//! assert_eq!(descriptors[1].take(), Some("ready"));
//! ```

use std::error;
use std::fmt;

mod ringbuf;

pub mod bounded;
pub mod select;

/// Errors that can happen during receiving and sending.
///
/// See the individual functions for a list of errors they can return and the
/// specific meaning.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// The channel is closed.
    ///
    /// For receivers this is reported only once the buffer has also been
    /// drained.
    Closed,
    /// The buffer is full (non-blocking send only).
    Full,
    /// The buffer is empty (non-blocking receive only).
    Empty,
    /// The channel has not been closed yet (destroy only).
    StillOpen,
    /// The buffer rejected an operation it had agreed to accept.
    Other,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match *self {
            Error::Closed => "channel is closed",
            Error::Full => "channel buffer is full",
            Error::Empty => "channel buffer is empty",
            Error::StillOpen => "channel is still open",
            Error::Other => "channel buffer rejected the operation",
        };
        f.write_str(msg)
    }
}

impl error::Error for Error {}
