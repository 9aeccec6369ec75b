use crate::{RawLock, RawUnlock};
use core::cell::UnsafeCell;
use core::marker::PhantomData;
use core::ops::{Deref, DerefMut};

/// A value of type `T` that can only be reached while `R` is held.
pub struct Mutex<T, R> {
    raw: R,
    cell: UnsafeCell<T>,
    _no_send_sync: PhantomData<*mut ()>, // !Send/!Sync by default; we implement below
}

unsafe impl<T: Send, R: Sync> Sync for Mutex<T, R> {}
unsafe impl<T: Send, R: Send> Send for Mutex<T, R> {}

impl<T, R> Mutex<T, R> {
    pub const fn from_raw(raw: R, value: T) -> Self {
        Self {
            raw,
            cell: UnsafeCell::new(value),
            _no_send_sync: PhantomData,
        }
    }

    /// Mutable access when you have `&mut self` (no contention possible).
    #[inline]
    pub const fn get_mut(&mut self) -> &mut T {
        self.cell.get_mut()
    }

    /// Consumes the mutex and hands back the protected value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.cell.into_inner()
    }
}

impl<T, R> Mutex<T, R>
where
    R: RawLock + RawUnlock,
{
    /// Blocks until the lock is acquired.
    #[inline]
    pub fn lock(&self) -> MutexGuard<'_, T, R> {
        self.raw.raw_lock();
        MutexGuard { m: self }
    }

    /// Try once; returns immediately.
    #[inline]
    pub fn try_lock(&self) -> Option<MutexGuard<'_, T, R>> {
        if self.raw.raw_try_lock() {
            Some(MutexGuard { m: self })
        } else {
            None
        }
    }

    /// Runs `f` with the lock held for its entire duration.
    #[inline]
    pub fn with_lock<U>(&self, f: impl FnOnce(&mut T) -> U) -> U {
        let mut g = self.lock();
        f(&mut g)
    }

    /// Snapshot of the lock state; stale as soon as it is returned.
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.raw.raw_is_locked()
    }
}

pub struct MutexGuard<'a, T, R>
where
    R: RawUnlock,
{
    m: &'a Mutex<T, R>,
}

impl<T, R> Deref for MutexGuard<'_, T, R>
where
    R: RawUnlock,
{
    type Target = T;

    fn deref(&self) -> &T {
        unsafe { &*self.m.cell.get() }
    }
}

impl<T, R> DerefMut for MutexGuard<'_, T, R>
where
    R: RawUnlock,
{
    fn deref_mut(&mut self) -> &mut T {
        unsafe { &mut *self.m.cell.get() }
    }
}

impl<T, R> Drop for MutexGuard<'_, T, R>
where
    R: RawUnlock,
{
    fn drop(&mut self) {
        // Release publishes the critical section.
        unsafe { self.m.raw.raw_unlock() }
    }
}
