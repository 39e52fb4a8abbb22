use std::sync::Arc;

use log::trace;
use parking_lot::{Condvar, Mutex, MutexGuard};

use crate::ringbuf::RingBuf;
use crate::select::Signal;
use crate::Error;

/// The state shared by all endpoints of one channel.
pub struct Packet<T> {
    state: Mutex<State<T>>,
    // Senders sleep here while the buffer is full.
    not_full: Condvar,
    // Receivers sleep here while the buffer is empty.
    not_empty: Condvar,
}

struct State<T> {
    buf: RingBuf<T>,
    open: bool,
    // Readiness signals of the selects currently registered on this channel.
    // One entry per registered descriptor, so duplicate descriptors stay
    // balanced across register/unregister.
    signals: Vec<Arc<Signal>>,
}

impl<T> State<T> {
    // Every successful enqueue, dequeue and the close transition must post
    // each attached signal exactly once, while the lock is held.
    fn post_signals(&self) {
        for signal in &self.signals {
            signal.post();
        }
    }
}

impl<T> Packet<T> {
    pub fn new(cap: usize) -> Packet<T> {
        Packet {
            state: Mutex::new(State {
                buf: RingBuf::with_capacity(cap),
                open: true,
                signals: vec![],
            }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
        }
    }

    pub fn send_sync(&self, val: T) -> Result<(), (T, Error)> {
        let mut state = self.state.lock();
        loop {
            // Re-checked on every wakeup; a close broadcast and a spurious
            // wakeup look the same from here.
            if !state.open {
                return Err((val, Error::Closed));
            }
            if !state.buf.is_full() {
                break;
            }
            self.not_full.wait(&mut state);
        }
        self.finish_send(state, val)
    }

    pub fn send_async(&self, val: T) -> Result<(), (T, Error)> {
        let state = self.state.lock();
        if !state.open {
            return Err((val, Error::Closed));
        }
        if state.buf.is_full() {
            return Err((val, Error::Full));
        }
        self.finish_send(state, val)
    }

    // The caller has verified that the channel is open and the buffer is not
    // full, without releasing the lock since.
    fn finish_send(&self, mut state: MutexGuard<'_, State<T>>, val: T) -> Result<(), (T, Error)> {
        if let Err(val) = state.buf.push(val) {
            return Err((val, Error::Other));
        }
        state.post_signals();
        self.not_empty.notify_one();
        Ok(())
    }

    pub fn recv_sync(&self) -> Result<T, Error> {
        let mut state = self.state.lock();
        loop {
            if let Some(val) = state.buf.pop() {
                return Ok(self.finish_recv(state, val));
            }
            // Buffered messages are drained above even after a close; only
            // an empty closed channel reports Closed.
            if !state.open {
                return Err(Error::Closed);
            }
            self.not_empty.wait(&mut state);
        }
    }

    pub fn recv_async(&self) -> Result<T, Error> {
        let mut state = self.state.lock();
        match state.buf.pop() {
            Some(val) => Ok(self.finish_recv(state, val)),
            None if state.open => Err(Error::Empty),
            None => Err(Error::Closed),
        }
    }

    fn finish_recv(&self, state: MutexGuard<'_, State<T>>, val: T) -> T {
        state.post_signals();
        self.not_full.notify_one();
        val
    }

    pub fn close(&self) -> Result<(), Error> {
        let mut state = self.state.lock();
        if !state.open {
            return Err(Error::Closed);
        }
        state.open = false;
        trace!(
            "channel closed with {} buffered messages, {} selects attached",
            state.buf.len(),
            state.signals.len()
        );
        // Every waiter must observe the state change.
        self.not_full.notify_all();
        self.not_empty.notify_all();
        state.post_signals();
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.state.lock().open
    }

    pub fn len(&self) -> usize {
        self.state.lock().buf.len()
    }

    pub fn capacity(&self) -> usize {
        self.state.lock().buf.capacity()
    }

    /// Attaches the readiness signal of an in-flight select.
    pub fn register(&self, signal: &Arc<Signal>) {
        self.state.lock().signals.push(signal.clone());
    }

    /// Detaches one occurrence of a previously registered signal.
    pub fn unregister(&self, signal: &Arc<Signal>) {
        let mut state = self.state.lock();
        if let Some(pos) = state.signals.iter().position(|s| Arc::ptr_eq(s, signal)) {
            state.signals.remove(pos);
        }
    }
}
