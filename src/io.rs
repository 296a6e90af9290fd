// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Pluggable input and output providers for a [`Computer`](crate::Computer)
//!
//! Every [`Computer`](crate::Computer) owns one provider it reads `IN` values from, and one
//! provider it writes `OUT` values to. Three providers are included:
//!
//! * [`QueueIo`]: a single FIFO queue. Running out of input suspends the computer with
//!   [`State::AwaitingInput`](crate::State::AwaitingInput).
//! * [`NetworkIo`]: packet-based I/O for networked computers, which never suspends.
//! * [`Shared`]: a handle which lets several computers use the same provider, e.g. to chain one
//!   computer's output into another computer's input.
//!
//! # Example
//!
//! ```
//! use intcode_vm::prelude::*;
//! use intcode_vm::io::Shared;
//!
//! // both computers double their input
//! const DOUBLER: [i64; 9] = [3, 0, 102, 2, 0, 0, 4, 0, 99];
//! let link = Shared::new(QueueIo::new());
//! let mut first = Computer::with_io(DOUBLER, QueueIo::from([5]), link.clone());
//! let mut second = Computer::with_io(DOUBLER, link, QueueIo::new());
//!
//! first.run().unwrap();
//! second.run().unwrap();
//! assert_eq!(second.drain_output(), vec![20]);
//! ```

use std::cell::{Ref, RefCell, RefMut};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::Error;

/// The capabilities a [`Computer`](crate::Computer) needs from its input and output providers
pub trait Io: Clone {
    /// Number of values available right now
    fn count(&self) -> usize;

    /// Whether [`count`](Io::count) is zero
    fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Take the next input value, or return [`None`] if there is none to give
    fn try_take_input(&mut self) -> Option<i64>;

    /// Provide a single input value
    fn add_input(&mut self, value: i64);

    /// Provide every value in `values` as input, in order
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedOperation`] if the provider does not accept bulk input.
    fn fill_input(&mut self, values: impl IntoIterator<Item = i64>) -> Result<(), Error>;

    /// Accept a value written by an `OUT` instruction
    fn output(&mut self, value: i64);

    /// Take the oldest output value not yet taken
    fn take_output(&mut self) -> Option<i64>;

    /// Take every output value not yet taken
    fn drain_output(&mut self) -> Vec<i64> {
        std::iter::from_fn(|| self.take_output()).collect()
    }

    /// Discard everything buffered
    fn clear(&mut self);
}

/// FIFO queue I/O
///
/// Input and output share one queue, so the queue that collects one computer's output can be
/// used, through [`Shared`], as another computer's input.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueueIo {
    queue: VecDeque<i64>,
}

impl QueueIo {
    /// Create an empty queue
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// View the buffered values, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &i64> {
        self.queue.iter()
    }
}

impl<const N: usize> From<[i64; N]> for QueueIo {
    fn from(values: [i64; N]) -> Self {
        values.into_iter().collect()
    }
}

impl FromIterator<i64> for QueueIo {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self {
            queue: iter.into_iter().collect(),
        }
    }
}

impl Io for QueueIo {
    fn count(&self) -> usize {
        self.queue.len()
    }

    fn try_take_input(&mut self) -> Option<i64> {
        self.queue.pop_front()
    }

    fn add_input(&mut self, value: i64) {
        self.queue.push_back(value);
    }

    fn fill_input(&mut self, values: impl IntoIterator<Item = i64>) -> Result<(), Error> {
        self.queue.extend(values);
        Ok(())
    }

    fn output(&mut self, value: i64) {
        self.queue.push_back(value);
    }

    fn take_output(&mut self) -> Option<i64> {
        self.queue.pop_front()
    }

    fn drain_output(&mut self) -> Vec<i64> {
        self.queue.drain(..).collect()
    }

    fn clear(&mut self) {
        self.queue.clear();
    }
}

/// An `(X, Y)` pair sent between networked computers
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Packet {
    #[allow(missing_docs, reason = "trivial")]
    pub x: i64,
    #[allow(missing_docs, reason = "trivial")]
    pub y: i64,
}

impl Packet {
    #[allow(missing_docs, reason = "trivial")]
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Packet-based I/O for a computer on a network
///
/// As input, queued [`Packet`]s are delivered one value at a time: `X`, then `Y`. When nothing is
/// queued, [`try_take_input`](Io::try_take_input) yields [`NetworkIo::IDLE`] instead of
/// suspending, so one starved computer never stalls a round-robin scheduler.
///
/// As output, values are collected into an outbox, which [`take_packet`](NetworkIo::take_packet)
/// splits into addressed packets of the form `destination, X, Y`.
///
/// ```
/// use intcode_vm::io::{Io, NetworkIo, Packet};
/// let mut nic = NetworkIo::new();
/// nic.send(Packet::new(3, 4));
/// assert_eq!(nic.try_take_input(), Some(3));
/// assert_eq!(nic.try_take_input(), Some(4));
/// assert_eq!(nic.try_take_input(), Some(NetworkIo::IDLE));
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NetworkIo {
    packets: VecDeque<Packet>,
    pending: Option<i64>,
    outbox: VecDeque<i64>,
}

impl NetworkIo {
    /// Input given to a computer when no packet is waiting for it
    pub const IDLE: i64 = -1;

    /// Create a provider with no queued packets
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a packet for delivery
    pub fn send(&mut self, packet: Packet) {
        self.packets.push_back(packet);
    }

    /// Number of packets queued for delivery, not counting a half-delivered one
    #[must_use]
    pub fn queued_packets(&self) -> usize {
        self.packets.len()
    }

    /// Take the oldest complete addressed packet out of the outbox
    pub fn take_packet(&mut self) -> Option<(i64, Packet)> {
        if self.outbox.len() < 3 {
            return None;
        }
        let mut next = || self.outbox.pop_front().unwrap_or_default();
        let (dest, x, y) = (next(), next(), next());
        Some((dest, Packet { x, y }))
    }
}

impl Io for NetworkIo {
    fn count(&self) -> usize {
        usize::from(self.pending.is_some()) + self.packets.len() * 2
    }

    fn try_take_input(&mut self) -> Option<i64> {
        if let Some(value) = self.pending.take() {
            return Some(value);
        }
        match self.packets.pop_front() {
            Some(Packet { x, y }) => {
                self.pending = Some(y);
                Some(x)
            }
            None => Some(Self::IDLE),
        }
    }

    /// Overwrites the pending slot, so `value` is the very next input delivered
    fn add_input(&mut self, value: i64) {
        self.pending = Some(value);
    }

    fn fill_input(&mut self, _: impl IntoIterator<Item = i64>) -> Result<(), Error> {
        Err(Error::UnsupportedOperation(
            "network I/O accepts packets, not bulk input",
        ))
    }

    fn output(&mut self, value: i64) {
        self.outbox.push_back(value);
    }

    fn take_output(&mut self) -> Option<i64> {
        self.outbox.pop_front()
    }

    fn clear(&mut self) {
        self.packets.clear();
        self.pending = None;
        self.outbox.clear();
    }
}

/// A reference-counted handle to an I/O provider
///
/// Cloning a `Shared` aliases the provider instead of copying it, so computers cloned along with
/// it keep writing to (or reading from) the same place. Use [`Shared::detach`] for an independent
/// copy.
#[derive(Debug, Default)]
pub struct Shared<P>(Rc<RefCell<P>>);

impl<P> Shared<P> {
    /// Wrap `provider` so it can be shared
    pub fn new(provider: P) -> Self {
        Self(Rc::new(RefCell::new(provider)))
    }

    /// Borrow the shared provider
    ///
    /// Panics if it is currently borrowed mutably
    pub fn borrow(&self) -> Ref<'_, P> {
        self.0.borrow()
    }

    /// Mutably borrow the shared provider
    ///
    /// Panics if it is currently borrowed
    pub fn borrow_mut(&self) -> RefMut<'_, P> {
        self.0.borrow_mut()
    }

    /// Whether `self` and `other` refer to the same provider
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<P: Clone> Shared<P> {
    /// Make a handle to an independent copy of the shared provider
    #[must_use]
    pub fn detach(&self) -> Self {
        Self::new(self.0.borrow().clone())
    }
}

impl<P> Clone for Shared<P> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<P: Io> Io for Shared<P> {
    fn count(&self) -> usize {
        self.0.borrow().count()
    }

    fn try_take_input(&mut self) -> Option<i64> {
        self.0.borrow_mut().try_take_input()
    }

    fn add_input(&mut self, value: i64) {
        self.0.borrow_mut().add_input(value);
    }

    fn fill_input(&mut self, values: impl IntoIterator<Item = i64>) -> Result<(), Error> {
        self.0.borrow_mut().fill_input(values)
    }

    fn output(&mut self, value: i64) {
        self.0.borrow_mut().output(value);
    }

    fn take_output(&mut self) -> Option<i64> {
        self.0.borrow_mut().take_output()
    }

    fn drain_output(&mut self) -> Vec<i64> {
        self.0.borrow_mut().drain_output()
    }

    fn clear(&mut self) {
        self.0.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_is_fifo() {
        let mut queue = QueueIo::from([1, 2]);
        queue.add_input(3);
        queue.fill_input([4, 5]).unwrap();
        assert_eq!(queue.count(), 5);
        assert_eq!(queue.try_take_input(), Some(1));
        assert_eq!(queue.take_output(), Some(2));
        assert_eq!(queue.drain_output(), vec![3, 4, 5]);
        assert!(queue.is_empty());
        assert_eq!(queue.try_take_input(), None);
    }

    #[test]
    fn network_splits_packets() {
        let mut nic = NetworkIo::new();
        nic.send(Packet::new(10, 20));
        nic.send(Packet::new(30, 40));
        assert_eq!(nic.count(), 4);
        assert_eq!(nic.try_take_input(), Some(10));
        assert_eq!(nic.count(), 3);
        assert_eq!(nic.queued_packets(), 1);
        assert_eq!(nic.try_take_input(), Some(20));
        assert_eq!(nic.try_take_input(), Some(30));
        assert_eq!(nic.try_take_input(), Some(40));
        assert!(nic.is_empty());
    }

    #[test]
    fn network_idles_when_empty() {
        let mut nic = NetworkIo::new();
        for _ in 0..3 {
            assert_eq!(nic.try_take_input(), Some(-1));
        }
        assert!(nic.is_empty());
    }

    #[test]
    fn network_add_input_overrides_pending() {
        let mut nic = NetworkIo::new();
        nic.send(Packet::new(1, 2));
        assert_eq!(nic.try_take_input(), Some(1));
        nic.add_input(NetworkIo::IDLE);
        assert_eq!(nic.try_take_input(), Some(NetworkIo::IDLE));
        // the overwritten Y value is gone
        assert_eq!(nic.try_take_input(), Some(NetworkIo::IDLE));
    }

    #[test]
    fn network_rejects_bulk_fill() {
        let mut nic = NetworkIo::new();
        assert!(matches!(
            nic.fill_input([1, 2]),
            Err(Error::UnsupportedOperation(_))
        ));
        assert!(nic.is_empty());
    }

    #[test]
    fn network_outbox_packets() {
        let mut nic = NetworkIo::new();
        for value in [4, 7, 8, 255] {
            nic.output(value);
        }
        assert_eq!(nic.take_packet(), Some((4, Packet::new(7, 8))));
        assert_eq!(nic.take_packet(), None);
        nic.output(1);
        nic.output(2);
        assert_eq!(nic.take_packet(), Some((255, Packet::new(1, 2))));
    }

    #[test]
    fn shared_aliases_until_detached() {
        let a = Shared::new(QueueIo::new());
        let mut b = a.clone();
        let mut detached = a.detach();
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&detached));

        b.output(9);
        assert_eq!(a.count(), 1);
        assert_eq!(detached.count(), 0);
        detached.add_input(1);
        assert_eq!(a.borrow().iter().copied().collect::<Vec<_>>(), vec![9]);
    }
}
