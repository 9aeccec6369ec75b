//! # Kernel synchronization primitives
//!
//! A single [`Mutex`] type generic over its raw lock. Two raw locks are
//! provided:
//!
//! * [`RawSpin`]: test-and-test-and-set; cheapest, not fair.
//! * [`RawTicket`]: FIFO ticket lock; waiters are served in arrival order.
//!
//! Device drivers that issue multi-step register sequences (write an index,
//! then touch a data port) hold the guard for the whole sequence. The guarded
//! value is usually the device handle itself, so the only way to reach the
//! hardware is through the lock.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod mutex;
mod raw;

pub use mutex::{Mutex, MutexGuard};
pub use raw::{RawSpin, RawTicket};

pub type SpinMutex<T> = Mutex<T, RawSpin>;
pub type TicketMutex<T> = Mutex<T, RawTicket>;

impl<T> SpinMutex<T> {
    pub const fn new(value: T) -> Self {
        Self::from_raw(RawSpin::new(), value)
    }
}

impl<T> TicketMutex<T> {
    pub const fn new(value: T) -> Self {
        Self::from_raw(RawTicket::new(), value)
    }
}

pub trait RawLock {
    fn raw_lock(&self);
    fn raw_try_lock(&self) -> bool;
    fn raw_is_locked(&self) -> bool;
}

pub trait RawUnlock {
    /// # Safety
    /// The caller must currently hold the lock.
    unsafe fn raw_unlock(&self);
}
