use std::thread;
use std::time::Duration;

use super::{select, Descriptor, Direction};
use crate::bounded::Channel;
use crate::Error;

fn ms_sleep(ms: u64) {
    thread::sleep(Duration::from_millis(ms));
}

#[test]
fn recv_ready() {
    let chan = Channel::new(2).unwrap();
    chan.send_sync(1u8).unwrap();

    let mut descriptors = [Descriptor::recv(&chan)];
    let (index, result) = select(&mut descriptors);
    assert_eq!(index, 0);
    assert!(result.is_ok());
    assert_eq!(descriptors[0].take(), Some(1));
}

#[test]
fn send_ready() {
    let chan = Channel::new(1).unwrap();

    let mut descriptors = [Descriptor::send(&chan, 1u8)];
    let (index, result) = select(&mut descriptors);
    assert_eq!(index, 0);
    assert!(result.is_ok());
    assert_eq!(descriptors[0].take(), None);
    assert_eq!(chan.recv_async().unwrap(), 1);
}

#[test]
fn send_beats_later_recv() {
    // An empty send slot and a buffered message are both ready; the lower
    // index wins.
    let empty = Channel::new(1).unwrap();
    let full = Channel::new(1).unwrap();
    full.send_sync(1u8).unwrap();

    let mut descriptors = [Descriptor::send(&empty, 2u8), Descriptor::recv(&full)];
    let (index, result) = select(&mut descriptors);
    assert_eq!(index, 0);
    assert!(result.is_ok());
    assert_eq!(empty.recv_async().unwrap(), 2);
    // The other descriptor saw no side effect.
    assert_eq!(full.len(), 1);
    assert_eq!(descriptors[1].take(), None);
}

#[test]
fn lowest_index_wins() {
    let first = Channel::new(1).unwrap();
    let second = Channel::new(1).unwrap();
    first.send_sync(1u8).unwrap();
    second.send_sync(2u8).unwrap();

    let mut descriptors = [Descriptor::recv(&first), Descriptor::recv(&second)];
    let (index, result) = select(&mut descriptors);
    assert_eq!(index, 0);
    assert!(result.is_ok());
    assert_eq!(descriptors[0].take(), Some(1));
    assert_eq!(second.len(), 1);
}

#[test]
fn wait_for_send() {
    let chan = Channel::new(2).unwrap();
    let chan2 = chan.clone();

    thread::spawn(move || {
        ms_sleep(100);
        chan2.send_sync(1u8).unwrap();
    });

    let mut descriptors = [Descriptor::recv(&chan)];
    let (index, result) = select(&mut descriptors);
    assert_eq!(index, 0);
    assert!(result.is_ok());
    assert_eq!(descriptors[0].take(), Some(1));
}

#[test]
fn wait_for_drain() {
    // The only descriptor is a send on a full channel; it commits once a
    // receiver makes room.
    let chan = Channel::new(1).unwrap();
    chan.send_sync(1u8).unwrap();
    let chan2 = chan.clone();

    thread::spawn(move || {
        ms_sleep(100);
        assert_eq!(chan2.recv_sync().unwrap(), 1);
    });

    let mut descriptors = [Descriptor::send(&chan, 2u8)];
    let (index, result) = select(&mut descriptors);
    assert_eq!(index, 0);
    assert!(result.is_ok());
    assert_eq!(chan.recv_sync().unwrap(), 2);
}

#[test]
fn two_empty_channels_one_sender() {
    let first = Channel::<u8>::new(1).unwrap();
    let second = Channel::new(1).unwrap();
    let second2 = second.clone();

    thread::spawn(move || {
        ms_sleep(100);
        second2.send_sync(9u8).unwrap();
    });

    let mut descriptors = [Descriptor::recv(&first), Descriptor::recv(&second)];
    let (index, result) = select(&mut descriptors);
    assert_eq!(index, 1);
    assert!(result.is_ok());
    assert_eq!(descriptors[1].take(), Some(9));
}

#[test]
fn unblocks_on_close() {
    let first = Channel::<u8>::new(1).unwrap();
    let second = Channel::<u8>::new(1).unwrap();
    let second2 = second.clone();

    thread::spawn(move || {
        ms_sleep(100);
        second2.close().unwrap();
    });

    let mut descriptors = [Descriptor::recv(&first), Descriptor::recv(&second)];
    let (index, result) = select(&mut descriptors);
    assert_eq!(index, 1);
    assert_eq!(result.unwrap_err(), Error::Closed);
    assert!(first.is_open());
}

#[test]
fn closed_channel_recv() {
    let chan = Channel::<u8>::new(1).unwrap();
    chan.close().unwrap();

    let mut descriptors = [Descriptor::recv(&chan)];
    let (index, result) = select(&mut descriptors);
    assert_eq!(index, 0);
    assert_eq!(result.unwrap_err(), Error::Closed);
}

#[test]
fn closed_channel_send() {
    let chan = Channel::new(1).unwrap();
    chan.close().unwrap();

    let mut descriptors = [Descriptor::send(&chan, 1u8)];
    let (index, result) = select(&mut descriptors);
    assert_eq!(index, 0);
    assert_eq!(result.unwrap_err(), Error::Closed);
    // The payload was not consumed.
    assert_eq!(descriptors[0].take(), Some(1));
}

#[test]
fn drains_closed_channel() {
    // A buffered message outranks the closed state, same as a plain receive.
    let chan = Channel::new(2).unwrap();
    chan.send_sync(1u8).unwrap();
    chan.close().unwrap();

    let mut descriptors = [Descriptor::recv(&chan)];
    let (index, result) = select(&mut descriptors);
    assert_eq!(index, 0);
    assert!(result.is_ok());
    assert_eq!(descriptors[0].take(), Some(1));

    let mut descriptors = [Descriptor::recv(&chan)];
    let (_, result) = select(&mut descriptors);
    assert_eq!(result.unwrap_err(), Error::Closed);
}

#[test]
fn duplicate_channels() {
    let chan = Channel::new(1).unwrap();
    chan.send_sync(1u8).unwrap();

    let mut descriptors = [Descriptor::recv(&chan), Descriptor::recv(&chan)];
    let (index, result) = select(&mut descriptors);
    assert_eq!(index, 0);
    assert!(result.is_ok());
    assert_eq!(descriptors[0].take(), Some(1));
    assert_eq!(descriptors[1].take(), None);
}

#[test]
fn consecutive_selects() {
    // The readiness signal is detached after every call, so later traffic on
    // the channel must not interfere with a second select.
    let chan = Channel::new(2).unwrap();
    chan.send_sync(1u8).unwrap();
    chan.send_sync(2u8).unwrap();

    let mut descriptors = [Descriptor::recv(&chan)];
    let (_, result) = select(&mut descriptors);
    assert!(result.is_ok());
    assert_eq!(descriptors[0].take(), Some(1));

    let mut descriptors = [Descriptor::recv(&chan)];
    let (_, result) = select(&mut descriptors);
    assert!(result.is_ok());
    assert_eq!(descriptors[0].take(), Some(2));
}

#[test]
fn directions() {
    let chan = Channel::new(1).unwrap();
    let send = Descriptor::send(&chan, 1u8);
    let recv = Descriptor::recv(&chan);
    assert_eq!(send.direction(), Direction::Send);
    assert_eq!(recv.direction(), Direction::Recv);
}

#[test]
fn select_while_sending_and_receiving() {
    // A select sleeping on two channels races plain senders on both; it must
    // wake and commit exactly one message per call until both close.
    let first = Channel::new(1).unwrap();
    let second = Channel::new(1).unwrap();
    let first2 = first.clone();
    let second2 = second.clone();

    let producer_a = thread::spawn(move || {
        for i in 0u32..50 {
            first2.send_sync(i).unwrap();
        }
        first2.close().unwrap();
    });
    let producer_b = thread::spawn(move || {
        for i in 50u32..100 {
            second2.send_sync(i).unwrap();
        }
        second2.close().unwrap();
    });

    let mut received = vec![];
    let mut done = [false, false];
    while !done[0] || !done[1] {
        if done[0] || done[1] {
            // Only one channel left; drain it with a plain receive.
            let rest = if done[0] { &second } else { &first };
            match rest.recv_sync() {
                Ok(val) => received.push(val),
                Err(err) => {
                    assert_eq!(err, Error::Closed);
                    done = [true, true];
                }
            }
            continue;
        }
        let mut descriptors = [Descriptor::recv(&first), Descriptor::recv(&second)];
        let (index, result) = select(&mut descriptors);
        match result {
            Ok(()) => received.push(descriptors[index].take().unwrap()),
            Err(err) => {
                assert_eq!(err, Error::Closed);
                done[index] = true;
            }
        }
    }

    producer_a.join().unwrap();
    producer_b.join().unwrap();

    received.sort();
    assert_eq!(received, (0u32..100).collect::<Vec<_>>());
}
