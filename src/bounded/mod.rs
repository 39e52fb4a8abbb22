//! A bounded MPMC channel.
//!
//! Any number of threads can send to and receive from the same channel by
//! cloning an endpoint. Messages are buffered in a fixed-capacity FIFO and
//! delivered in the order they were enqueued.
//!
//! Closing is explicit and one-way. Once a channel is closed, senders fail
//! immediately with `Closed` while receivers first drain the messages that
//! were buffered before the close and only then start reporting `Closed`.
//! Closing is also the only way to interrupt a blocked operation.

use std::sync::Arc;

use crate::select::Signal;
use crate::Error;

mod imp;

/// An endpoint of a bounded MPMC channel.
pub struct Channel<T> {
    data: Arc<imp::Packet<T>>,
}

impl<T> Channel<T> {
    /// Creates a new bounded channel with capacity `cap`.
    ///
    /// Returns `None` if `cap` is zero; rendezvous channels are not
    /// supported.
    pub fn new(cap: usize) -> Option<Channel<T>> {
        if cap == 0 {
            return None;
        }
        Some(Channel {
            data: Arc::new(imp::Packet::new(cap)),
        })
    }

    /// Sends a message over the channel. Blocks if the channel is full.
    ///
    /// The unsent value is handed back inside the error.
    ///
    /// ### Error
    ///
    /// - `Closed` - The channel is closed.
    /// - `Other` - The buffer rejected the message.
    pub fn send_sync(&self, val: T) -> Result<(), (T, Error)> {
        self.data.send_sync(val)
    }

    /// Sends a message over the channel. Does not block if the channel is
    /// full.
    ///
    /// The unsent value is handed back inside the error.
    ///
    /// ### Error
    ///
    /// - `Full` - The buffer is full.
    /// - `Closed` - The channel is closed.
    /// - `Other` - The buffer rejected the message.
    pub fn send_async(&self, val: T) -> Result<(), (T, Error)> {
        self.data.send_async(val)
    }

    /// Receives a message from the channel. Blocks if the channel is empty.
    ///
    /// ### Error
    ///
    /// - `Closed` - The channel is closed and the buffer has been drained.
    pub fn recv_sync(&self) -> Result<T, Error> {
        self.data.recv_sync()
    }

    /// Receives a message from the channel. Does not block if the channel is
    /// empty.
    ///
    /// ### Error
    ///
    /// - `Empty` - The buffer is empty.
    /// - `Closed` - The channel is closed and the buffer has been drained.
    pub fn recv_async(&self) -> Result<T, Error> {
        self.data.recv_async()
    }

    /// Closes the channel.
    ///
    /// All blocked senders, receivers and selects involving this channel
    /// wake up and observe the closed state. The transition happens at most
    /// once.
    ///
    /// ### Error
    ///
    /// - `Closed` - The channel was already closed.
    pub fn close(&self) -> Result<(), Error> {
        self.data.close()
    }

    /// Destroys this endpoint.
    ///
    /// The channel must have been closed first; an open channel is refused
    /// and the endpoint is handed back untouched so the caller can close it
    /// and retry. The buffer and the synchronization primitives are released
    /// once the last endpoint is gone, dropping any messages still buffered.
    /// The caller warrants that no other thread still uses the channel; this
    /// is a documented precondition, not enforced here.
    ///
    /// ### Error
    ///
    /// - `StillOpen` - The channel has not been closed.
    pub fn destroy(self) -> Result<(), (Channel<T>, Error)> {
        if self.data.is_open() {
            return Err((self, Error::StillOpen));
        }
        Ok(())
    }

    /// Returns the number of currently buffered messages.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if no messages are currently buffered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the capacity of the buffer.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Returns `true` if the channel has not been closed.
    pub fn is_open(&self) -> bool {
        self.data.is_open()
    }

    pub(crate) fn register(&self, signal: &Arc<Signal>) {
        self.data.register(signal);
    }

    pub(crate) fn unregister(&self, signal: &Arc<Signal>) {
        self.data.unregister(signal);
    }
}

impl<T> Clone for Channel<T> {
    fn clone(&self) -> Channel<T> {
        Channel {
            data: self.data.clone(),
        }
    }
}
