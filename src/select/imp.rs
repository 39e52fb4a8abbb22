use std::sync::Arc;

use log::trace;
use parking_lot::{Condvar, Mutex};

use super::{Descriptor, Direction};
use crate::Error;

/// The readiness signal of one `select` call.
///
/// A counting semaphore: channels post it while holding their own lock, the
/// selecting thread waits on it between polling passes. Posts that arrive
/// between a poll and the wait are not lost, they leave the count positive
/// and the wait returns immediately.
pub(crate) struct Signal {
    count: Mutex<usize>,
    cond: Condvar,
}

impl Signal {
    fn new() -> Signal {
        Signal {
            count: Mutex::new(0),
            cond: Condvar::new(),
        }
    }

    pub(crate) fn post(&self) {
        let mut count = self.count.lock();
        *count += 1;
        self.cond.notify_one();
    }

    fn wait(&self) {
        let mut count = self.count.lock();
        while *count == 0 {
            self.cond.wait(&mut count);
        }
        *count -= 1;
    }
}

/// Completes exactly one of the described operations.
///
/// Descriptors are polled in index order and the lowest-indexed one whose
/// operation completes wins. The call blocks until one of them can complete;
/// closing any involved channel is enough to make that happen. Returns the
/// index of the committed descriptor together with the status of its
/// operation, so a `Closed` result still identifies the channel it came
/// from. A committed receive leaves the message in the descriptor's slot,
/// see [`Descriptor::take`].
///
/// The same channel may appear in the list more than once; the entries
/// behave as if they referred to distinct channels.
///
/// ### Panic
///
/// Panics if `descriptors` is empty: with no channel registered, nothing
/// could ever wake the call.
///
/// ### Error
///
/// - `Closed` - The committed descriptor's channel is closed.
/// - `Other` - The committed descriptor's buffer rejected the operation.
pub fn select<T>(descriptors: &mut [Descriptor<'_, T>]) -> (usize, Result<(), Error>) {
    assert!(
        !descriptors.is_empty(),
        "select on an empty descriptor list would never return"
    );
    trace!("select over {} descriptors", descriptors.len());

    let signal = Arc::new(Signal::new());
    for descriptor in descriptors.iter() {
        descriptor.channel.register(&signal);
    }

    let committed = loop {
        match poll(descriptors) {
            Some(committed) => break committed,
            None => signal.wait(),
        }
    };

    for descriptor in descriptors.iter() {
        descriptor.channel.unregister(&signal);
    }

    committed
}

/// One pass over the descriptors in index order. Returns the committed
/// descriptor's index and status, or `None` if nothing was ready.
fn poll<T>(descriptors: &mut [Descriptor<'_, T>]) -> Option<(usize, Result<(), Error>)> {
    for (index, descriptor) in descriptors.iter_mut().enumerate() {
        match descriptor.direction {
            Direction::Send => {
                if let Some(val) = descriptor.payload.take() {
                    match descriptor.channel.send_async(val) {
                        Ok(()) => return Some((index, Ok(()))),
                        Err((val, Error::Full)) => {
                            descriptor.payload = Some(val);
                        }
                        Err((val, err)) => {
                            descriptor.payload = Some(val);
                            return Some((index, Err(err)));
                        }
                    }
                }
            }
            Direction::Recv => match descriptor.channel.recv_async() {
                Ok(val) => {
                    descriptor.payload = Some(val);
                    return Some((index, Ok(())));
                }
                Err(Error::Empty) => {}
                Err(err) => return Some((index, Err(err))),
            },
        }
    }
    None
}
