use crate::{RawLock, RawUnlock};
use core::hint::spin_loop;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Test-and-test-and-set spin lock.
pub struct RawSpin {
    held: AtomicBool,
}

impl Default for RawSpin {
    fn default() -> Self {
        Self::new()
    }
}

impl RawSpin {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            held: AtomicBool::new(false),
        }
    }
}

impl RawLock for RawSpin {
    #[inline]
    fn raw_lock(&self) {
        while self.held.swap(true, Ordering::Acquire) {
            // spin on a plain load until the holder lets go
            while self.held.load(Ordering::Relaxed) {
                spin_loop();
            }
        }
    }

    #[inline]
    fn raw_try_lock(&self) -> bool {
        !self.held.swap(true, Ordering::Acquire)
    }

    #[inline]
    fn raw_is_locked(&self) -> bool {
        self.held.load(Ordering::Relaxed)
    }
}

impl RawUnlock for RawSpin {
    #[inline]
    unsafe fn raw_unlock(&self) {
        self.held.store(false, Ordering::Release);
    }
}

/// FIFO ticket lock.
///
/// Every caller draws a ticket and waits until `owner` reaches it, so
/// contended waiters are served strictly in arrival order.
pub struct RawTicket {
    next: AtomicUsize,
    owner: AtomicUsize,
}

impl Default for RawTicket {
    fn default() -> Self {
        Self::new()
    }
}

impl RawTicket {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicUsize::new(0),
            owner: AtomicUsize::new(0),
        }
    }
}

impl RawLock for RawTicket {
    #[inline]
    fn raw_lock(&self) {
        let ticket = self.next.fetch_add(1, Ordering::Relaxed);
        while self.owner.load(Ordering::Acquire) != ticket {
            spin_loop();
        }
    }

    #[inline]
    fn raw_try_lock(&self) -> bool {
        let owner = self.owner.load(Ordering::Relaxed);
        self.next
            .compare_exchange(
                owner,
                owner.wrapping_add(1),
                Ordering::Acquire,
                Ordering::Relaxed,
            )
            .is_ok()
    }

    #[inline]
    fn raw_is_locked(&self) -> bool {
        self.next.load(Ordering::Relaxed) != self.owner.load(Ordering::Relaxed)
    }
}

impl RawUnlock for RawTicket {
    #[inline]
    unsafe fn raw_unlock(&self) {
        // only the holder writes `owner`
        let t = self.owner.load(Ordering::Relaxed);
        self.owner.store(t.wrapping_add(1), Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_try_lock_fails_while_held() {
        let t = RawTicket::new();
        assert!(t.raw_try_lock());
        assert!(t.raw_is_locked());
        assert!(!t.raw_try_lock());
        unsafe { t.raw_unlock() };
        assert!(!t.raw_is_locked());
        assert!(t.raw_try_lock());
    }

    #[test]
    fn spin_try_lock_fails_while_held() {
        let s = RawSpin::new();
        assert!(s.raw_try_lock());
        assert!(!s.raw_try_lock());
        unsafe { s.raw_unlock() };
        assert!(s.raw_try_lock());
    }

    #[test]
    fn ticket_lock_then_unlock_advances_owner() {
        let t = RawTicket::new();
        for _ in 0..4 {
            t.raw_lock();
            unsafe { t.raw_unlock() };
        }
        assert_eq!(t.next.load(Ordering::Relaxed), 4);
        assert_eq!(t.owner.load(Ordering::Relaxed), 4);
    }
}
