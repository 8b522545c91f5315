//! A blocking reader-writer lock built from two cooperating *gates* that
//! share one piece of protected state.
//!
//! [`RWLock`] grants shared access to any number of readers or exclusive
//! access to a single writer, never both. The [`ReadGate`] and [`WriteGate`]
//! are cheap views on the same lock; acquiring through either returns an RAII
//! guard ([`ReadLockGuard`] / [`WriteLockGuard`]) that releases on drop.
use std::cell::UnsafeCell;
use std::fmt;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::panic::{RefUnwindSafe, UnwindSafe};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::sync::{AcquireTimeoutError, LockStatus};
use crossbeam::utils::CachePadded;

/// The holder counters every gate operation checks and mutates under the one
/// state mutex. `writer_active && readers > 0` never holds outside the
/// critical section that updates the pair.
struct LockState {
    readers: usize,
    writer_active: bool,
}

// region guards

/// RAII structure used to release the shared read access of a lock when
/// dropped.
///
/// This structure is created by [`ReadGate::acquire`], [`ReadGate::try_acquire`]
/// and [`ReadGate::acquire_timeout`].
#[derive(Debug)]
pub struct ReadLockGuard<'rw_lock, T: ?Sized> {
    rw_lock: &'rw_lock RWLock<T>,
}

impl<'rw_lock, T: ?Sized> ReadLockGuard<'rw_lock, T> {
    /// Creates a new `ReadLockGuard`. The lock must already count the caller
    /// as a reader.
    #[inline(always)]
    fn new(rw_lock: &'rw_lock RWLock<T>) -> Self {
        Self { rw_lock }
    }

    /// Returns a reference to the original [`RWLock`].
    #[inline]
    pub fn rw_lock(&self) -> &'rw_lock RWLock<T> {
        self.rw_lock
    }

    /// Returns a reference to the original [`RWLock`] without releasing the
    /// read portion of the lock.
    ///
    /// # Safety
    ///
    /// The lock is read-unlocked later, either by calling
    /// [`RWLock::read_unlock`] or by dropping a guard re-created with
    /// [`RWLock::get_read_locked`].
    #[inline]
    #[must_use]
    pub unsafe fn leak(self) -> &'rw_lock RWLock<T> {
        let rw_lock = self.rw_lock;
        mem::forget(self);

        rw_lock
    }
}

impl<T: ?Sized> Deref for ReadLockGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        unsafe { &*self.rw_lock.value.get() }
    }
}

impl<T: ?Sized> Drop for ReadLockGuard<'_, T> {
    fn drop(&mut self) {
        unsafe {
            self.rw_lock.read_unlock();
        }
    }
}

unsafe impl<T: ?Sized + Sync> Sync for ReadLockGuard<'_, T> {}
unsafe impl<T: ?Sized + Send + Sync> Send for ReadLockGuard<'_, T> {}

/// RAII structure used to release the exclusive write access of a lock when
/// dropped.
///
/// This structure is created by [`WriteGate::acquire`],
/// [`WriteGate::try_acquire`] and [`WriteGate::acquire_timeout`].
pub struct WriteLockGuard<'rw_lock, T: ?Sized> {
    rw_lock: &'rw_lock RWLock<T>,
}

impl<'rw_lock, T: ?Sized> WriteLockGuard<'rw_lock, T> {
    /// Creates a new `WriteLockGuard`. The lock must already be held in write
    /// mode by the caller.
    #[inline(always)]
    fn new(rw_lock: &'rw_lock RWLock<T>) -> Self {
        Self { rw_lock }
    }

    /// Returns a reference to the original [`RWLock`].
    #[inline]
    pub fn rw_lock(&self) -> &'rw_lock RWLock<T> {
        self.rw_lock
    }

    /// Returns a reference to the original [`RWLock`] without releasing the
    /// write portion of the lock.
    ///
    /// # Safety
    ///
    /// The lock is write-unlocked later, either by calling
    /// [`RWLock::write_unlock`] or by dropping a guard re-created with
    /// [`RWLock::get_write_locked`].
    #[inline]
    #[must_use]
    pub unsafe fn leak(self) -> &'rw_lock RWLock<T> {
        let rw_lock = self.rw_lock;
        mem::forget(self);

        rw_lock
    }
}

impl<T: ?Sized> Deref for WriteLockGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        unsafe { &*self.rw_lock.value.get() }
    }
}

impl<T: ?Sized> DerefMut for WriteLockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        unsafe { &mut *self.rw_lock.value.get() }
    }
}

impl<T: ?Sized> Drop for WriteLockGuard<'_, T> {
    fn drop(&mut self) {
        unsafe {
            self.rw_lock.write_unlock();
        }
    }
}

unsafe impl<T: ?Sized + Sync> Sync for WriteLockGuard<'_, T> {}
unsafe impl<T: ?Sized + Send + Sync> Send for WriteLockGuard<'_, T> {}

// endregion

// region gates

/// The read side of an [`RWLock`]: a cheap `Copy` view that admits any number
/// of concurrent readers, but none while a writer is active.
///
/// Created by [`RWLock::read_gate`].
///
/// # Example
///
/// ```rust
/// use rwgate::sync::RWLock;
///
/// let lock = RWLock::new(vec![1, 2, 3]);
/// let gate = lock.read_gate();
///
/// let first = gate.acquire();
/// let second = gate.acquire();
///
/// assert_eq!(*first, *second);
/// ```
pub struct ReadGate<'rw_lock, T: ?Sized> {
    rw_lock: &'rw_lock RWLock<T>,
}

impl<'rw_lock, T: ?Sized> ReadGate<'rw_lock, T> {
    /// Acquires shared read access, blocking the calling thread while a
    /// writer is active.
    ///
    /// The "no writer active" check and the reader-count increment happen as
    /// one step under the lock's state mutex, so a writer cannot slip in
    /// between them.
    #[inline]
    pub fn acquire(&self) -> ReadLockGuard<'rw_lock, T> {
        self.rw_lock.acquire_read();

        ReadLockGuard::new(self.rw_lock)
    }

    /// Acquires shared read access if no writer is active, otherwise returns
    /// [`None`] without blocking.
    #[inline]
    pub fn try_acquire(&self) -> Option<ReadLockGuard<'rw_lock, T>> {
        self.rw_lock
            .try_acquire_read()
            .then(|| ReadLockGuard::new(self.rw_lock))
    }

    /// Acquires shared read access, giving up after `timeout`.
    ///
    /// On timeout the lock state is untouched and the caller owes no release.
    #[inline]
    pub fn acquire_timeout(
        &self,
        timeout: Duration,
    ) -> Result<ReadLockGuard<'rw_lock, T>, AcquireTimeoutError> {
        self.rw_lock.acquire_read_timeout(timeout)?;

        Ok(ReadLockGuard::new(self.rw_lock))
    }

    /// Returns a reference to the [`RWLock`] this gate views.
    #[inline]
    pub fn rw_lock(&self) -> &'rw_lock RWLock<T> {
        self.rw_lock
    }
}

impl<T: ?Sized> Clone for ReadGate<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for ReadGate<'_, T> {}

/// The write side of an [`RWLock`]: a cheap `Copy` view that grants one
/// writer exclusive access, excluding other writers and all readers.
///
/// Created by [`RWLock::write_gate`].
///
/// # Example
///
/// ```rust
/// use rwgate::sync::{LockStatus, RWLock};
///
/// let lock = RWLock::new(0);
///
/// let mut guard = lock.write_gate().acquire();
/// *guard += 1;
/// assert_eq!(lock.status(), LockStatus::WriteLocked);
///
/// drop(guard);
/// assert_eq!(lock.status(), LockStatus::Unlocked);
/// ```
pub struct WriteGate<'rw_lock, T: ?Sized> {
    rw_lock: &'rw_lock RWLock<T>,
}

impl<'rw_lock, T: ?Sized> WriteGate<'rw_lock, T> {
    /// Acquires exclusive write access, blocking the calling thread until no
    /// reader and no writer holds the lock.
    ///
    /// The emptiness check and the `writer_active` transition happen as one
    /// step under the lock's state mutex.
    #[inline]
    pub fn acquire(&self) -> WriteLockGuard<'rw_lock, T> {
        self.rw_lock.acquire_write();

        WriteLockGuard::new(self.rw_lock)
    }

    /// Acquires exclusive write access if the lock is free, otherwise returns
    /// [`None`] without blocking.
    #[inline]
    pub fn try_acquire(&self) -> Option<WriteLockGuard<'rw_lock, T>> {
        self.rw_lock
            .try_acquire_write()
            .then(|| WriteLockGuard::new(self.rw_lock))
    }

    /// Acquires exclusive write access, giving up after `timeout`.
    ///
    /// On timeout the lock state is untouched and the caller owes no release.
    #[inline]
    pub fn acquire_timeout(
        &self,
        timeout: Duration,
    ) -> Result<WriteLockGuard<'rw_lock, T>, AcquireTimeoutError> {
        self.rw_lock.acquire_write_timeout(timeout)?;

        Ok(WriteLockGuard::new(self.rw_lock))
    }

    /// Returns a reference to the [`RWLock`] this gate views.
    #[inline]
    pub fn rw_lock(&self) -> &'rw_lock RWLock<T> {
        self.rw_lock
    }
}

impl<T: ?Sized> Clone for WriteGate<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for WriteGate<'_, T> {}

// endregion

/// A blocking [`reader-writer lock`](std::sync::RwLock) with an explicit
/// gate-based surface.
///
/// This type of lock allows a number of readers or at most one writer at any
/// point in time. The write portion of this lock typically allows
/// modification of the underlying data (exclusive access) and the read
/// portion typically allows read-only access (shared access).
///
/// Callers obtain a [`ReadGate`] or [`WriteGate`] view and acquire through
/// it; the returned guard releases the lock when dropped. Waiting is
/// implemented with one state mutex and one condition variable: every
/// releasing transition to the free state wakes all waiters, and each woken
/// thread re-validates its own condition. No preference is given to either
/// class, so a sustained stream of readers can starve a writer (and the
/// other way around); the lock guarantees mutual exclusion and progress once
/// contention ceases, not fairness.
///
/// # Example
///
/// ```rust
/// use rwgate::sync::RWLock;
///
/// let lock = RWLock::new(String::new());
///
/// {
///     let mut entry = lock.write_gate().acquire();
///     entry.push_str("hello");
/// } // write lock is released when the guard goes out of scope
///
/// let entry = lock.read_gate().acquire();
/// assert_eq!(&*entry, "hello");
/// ```
pub struct RWLock<T: ?Sized> {
    state: CachePadded<Mutex<LockState>>,
    state_changed: Condvar,
    value: UnsafeCell<T>,
}

impl<T> RWLock<T> {
    /// Creates a new `RWLock` in the free state, protecting `value`.
    pub const fn new(value: T) -> Self {
        Self {
            state: CachePadded::new(Mutex::new(LockState {
                readers: 0,
                writer_active: false,
            })),
            state_changed: Condvar::new(),
            value: UnsafeCell::new(value),
        }
    }

    /// Consumes the lock, returning the protected value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }
}

impl<T: ?Sized> RWLock<T> {
    /// Returns the [`ReadGate`] view of this lock.
    #[inline]
    pub fn read_gate(&self) -> ReadGate<'_, T> {
        ReadGate { rw_lock: self }
    }

    /// Returns the [`WriteGate`] view of this lock.
    #[inline]
    pub fn write_gate(&self) -> WriteGate<'_, T> {
        WriteGate { rw_lock: self }
    }

    /// Acquires shared read access. Shorthand for
    /// [`read_gate().acquire()`](ReadGate::acquire).
    #[inline]
    pub fn read(&self) -> ReadLockGuard<'_, T> {
        self.read_gate().acquire()
    }

    /// Acquires exclusive write access. Shorthand for
    /// [`write_gate().acquire()`](WriteGate::acquire).
    #[inline]
    pub fn write(&self) -> WriteLockGuard<'_, T> {
        self.write_gate().acquire()
    }

    /// Non-blocking variant of [`read`](Self::read).
    #[inline]
    pub fn try_read(&self) -> Option<ReadLockGuard<'_, T>> {
        self.read_gate().try_acquire()
    }

    /// Non-blocking variant of [`write`](Self::write).
    #[inline]
    pub fn try_write(&self) -> Option<WriteLockGuard<'_, T>> {
        self.write_gate().try_acquire()
    }

    /// Returns the current [`LockStatus`] of the lock.
    ///
    /// The snapshot is consistent but immediately stale unless the caller
    /// itself holds the lock.
    pub fn status(&self) -> LockStatus {
        let state = self.lock_state();
        if state.writer_active {
            LockStatus::WriteLocked
        } else if state.readers > 0 {
            LockStatus::ReadLocked(state.readers)
        } else {
            LockStatus::Unlocked
        }
    }

    /// Returns a mutable reference to the protected value. No locking is
    /// needed because `&mut self` proves no guard exists.
    #[inline]
    pub fn get_mut(&mut self) -> &mut T {
        self.value.get_mut()
    }

    /// Releases the read portion of the lock without a guard.
    ///
    /// If this was the last reader, all waiters are woken so a blocked writer
    /// can proceed.
    ///
    /// # Safety
    ///
    /// The lock is read-locked and the matching guard was leaked via
    /// [`ReadLockGuard::leak`]. Calling this without a matching acquire is a
    /// contract violation the lock does not detect in release builds.
    pub unsafe fn read_unlock(&self) {
        let mut state = self.lock_state();
        debug_assert!(!state.writer_active, "read_unlock on a write-locked lock");
        debug_assert!(state.readers > 0, "read_unlock on a lock with no readers");

        state.readers -= 1;
        let now_free = state.readers == 0;
        drop(state);

        if now_free {
            self.state_changed.notify_all();
        }
    }

    /// Releases the write portion of the lock without a guard and wakes all
    /// waiters, both blocked readers and blocked writers.
    ///
    /// # Safety
    ///
    /// The lock is write-locked and the matching guard was leaked via
    /// [`WriteLockGuard::leak`]. Calling this without a matching acquire is a
    /// contract violation the lock does not detect in release builds.
    pub unsafe fn write_unlock(&self) {
        let mut state = self.lock_state();
        debug_assert!(state.writer_active, "write_unlock on a lock with no writer");

        state.writer_active = false;
        drop(state);

        self.state_changed.notify_all();
    }

    /// Re-wraps an already read-locked lock into a guard.
    ///
    /// # Safety
    ///
    /// The lock must stay read-locked by the caller for at least the lifetime
    /// of the returned guard, which releases that read hold on drop.
    #[inline]
    pub unsafe fn get_read_locked(&self) -> ReadLockGuard<'_, T> {
        debug_assert!(
            matches!(self.status(), LockStatus::ReadLocked(_)),
            "get_read_locked on a lock not held for read"
        );

        ReadLockGuard::new(self)
    }

    /// Re-wraps an already write-locked lock into a guard.
    ///
    /// # Safety
    ///
    /// The lock must stay write-locked by the caller for at least the
    /// lifetime of the returned guard, which releases the write hold on drop.
    #[inline]
    pub unsafe fn get_write_locked(&self) -> WriteLockGuard<'_, T> {
        debug_assert!(
            self.status() == LockStatus::WriteLocked,
            "get_write_locked on a lock not held for write"
        );

        WriteLockGuard::new(self)
    }

    /// Locks the state mutex. Poisoning is neutralized: the state is a pair
    /// of counters that is consistent at every unlock boundary, so a
    /// panicking holder leaves nothing to recover from.
    #[inline]
    fn lock_state(&self) -> MutexGuard<'_, LockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn acquire_read(&self) {
        let mut state = self.lock_state();
        while state.writer_active {
            state = self
                .state_changed
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        state.readers += 1;
    }

    fn try_acquire_read(&self) -> bool {
        let mut state = self.lock_state();
        if state.writer_active {
            return false;
        }

        state.readers += 1;

        true
    }

    fn acquire_read_timeout(&self, timeout: Duration) -> Result<(), AcquireTimeoutError> {
        let deadline = Instant::now() + timeout;

        let mut state = self.lock_state();
        while state.writer_active {
            let now = Instant::now();
            if now >= deadline {
                return Err(AcquireTimeoutError);
            }

            (state, _) = self
                .state_changed
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
        }

        state.readers += 1;

        Ok(())
    }

    fn acquire_write(&self) {
        let mut state = self.lock_state();
        while state.writer_active || state.readers > 0 {
            state = self
                .state_changed
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        state.writer_active = true;
    }

    fn try_acquire_write(&self) -> bool {
        let mut state = self.lock_state();
        if state.writer_active || state.readers > 0 {
            return false;
        }

        state.writer_active = true;

        true
    }

    fn acquire_write_timeout(&self, timeout: Duration) -> Result<(), AcquireTimeoutError> {
        let deadline = Instant::now() + timeout;

        let mut state = self.lock_state();
        while state.writer_active || state.readers > 0 {
            let now = Instant::now();
            if now >= deadline {
                return Err(AcquireTimeoutError);
            }

            (state, _) = self
                .state_changed
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
        }

        state.writer_active = true;

        Ok(())
    }
}

impl<T: Default> Default for RWLock<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> From<T> for RWLock<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for RWLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("RWLock");
        match self.try_read() {
            Some(guard) => d.field("value", &&*guard),
            None => d.field("value", &format_args!("<locked>")),
        };

        d.finish_non_exhaustive()
    }
}

unsafe impl<T: ?Sized + Send> Send for RWLock<T> {}
unsafe impl<T: ?Sized + Send + Sync> Sync for RWLock<T> {}
impl<T: ?Sized> UnwindSafe for RWLock<T> {}
impl<T: ?Sized> RefUnwindSafe for RWLock<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering::SeqCst;
    use std::sync::mpsc::{self, Sender};
    use std::sync::{Arc, Barrier};
    use std::thread;
    use std::thread::JoinHandle;

    /// Long enough to conclude that a thread which has not made progress is
    /// genuinely blocked, short enough to keep the suite fast.
    const BLOCK_CHECK: Duration = Duration::from_millis(100);
    /// Generous upper bound for events that must happen.
    const LIVENESS: Duration = Duration::from_secs(10);

    #[test]
    fn test_status_follows_acquire_release_pairs() {
        let lock = RWLock::new(());
        assert_eq!(lock.status(), LockStatus::Unlocked);

        let first = lock.read_gate().acquire();
        assert_eq!(lock.status(), LockStatus::ReadLocked(1));

        let second = lock.read_gate().acquire();
        assert_eq!(lock.status(), LockStatus::ReadLocked(2));

        drop(first);
        assert_eq!(lock.status(), LockStatus::ReadLocked(1));

        drop(second);
        assert_eq!(lock.status(), LockStatus::Unlocked);

        let writer = lock.write_gate().acquire();
        assert_eq!(lock.status(), LockStatus::WriteLocked);

        drop(writer);
        assert_eq!(lock.status(), LockStatus::Unlocked);
    }

    #[test]
    fn test_try_acquire_respects_holders() {
        let lock = RWLock::new(1);

        let writer = lock.write_gate().try_acquire().expect("lock is free");
        assert!(lock.read_gate().try_acquire().is_none());
        assert!(lock.write_gate().try_acquire().is_none());
        drop(writer);

        let reader = lock.read_gate().try_acquire().expect("lock is free");
        assert!(
            lock.read_gate().try_acquire().is_some(),
            "a second reader must be admitted alongside the first"
        );
        assert!(lock.write_gate().try_acquire().is_none());
        drop(reader);

        assert!(lock.status().is_unlocked());
    }

    #[test]
    fn test_readers_run_concurrently() {
        const READERS: usize = 4;

        let lock = RWLock::new(0_u32);
        let all_inside = Barrier::new(READERS);

        thread::scope(|scope| {
            for _ in 0..READERS {
                scope.spawn(|| {
                    let guard = lock.read_gate().acquire();
                    // Reaching this barrier requires all readers to be inside
                    // their critical sections at the same time.
                    all_inside.wait();
                    assert_eq!(lock.status(), LockStatus::ReadLocked(READERS));
                    all_inside.wait();
                    drop(guard);
                });
            }
        });

        assert!(lock.status().is_unlocked());
    }

    #[test]
    fn test_readers_wait_for_active_writer() {
        let lock = Arc::new(RWLock::new(()));
        let write_guard = lock.write_gate().acquire();

        let (entered_tx, entered_rx) = mpsc::channel();
        let mut readers: Vec<(JoinHandle<()>, Sender<()>)> = Vec::new();
        for _ in 0..3 {
            let lock = Arc::clone(&lock);
            let entered_tx = entered_tx.clone();
            let (release_tx, release_rx) = mpsc::channel::<()>();

            let handle = thread::spawn(move || {
                let guard = lock.read_gate().acquire();
                entered_tx.send(()).unwrap();
                release_rx.recv().unwrap();
                drop(guard);
            });
            readers.push((handle, release_tx));
        }

        thread::sleep(BLOCK_CHECK);
        assert!(
            entered_rx.try_recv().is_err(),
            "no reader may enter while the writer is active"
        );
        assert_eq!(lock.status(), LockStatus::WriteLocked);

        drop(write_guard);
        for _ in 0..3 {
            entered_rx.recv_timeout(LIVENESS).unwrap();
        }
        assert_eq!(lock.status(), LockStatus::ReadLocked(3));

        for (handle, release) in readers.drain(..2) {
            release.send(()).unwrap();
            handle.join().unwrap();
        }
        assert_eq!(lock.status(), LockStatus::ReadLocked(1));

        let (writer_entered_tx, writer_entered_rx) = mpsc::channel();
        let writer = thread::spawn({
            let lock = Arc::clone(&lock);
            move || {
                let guard = lock.write_gate().acquire();
                writer_entered_tx.send(()).unwrap();
                drop(guard);
            }
        });

        thread::sleep(BLOCK_CHECK);
        assert!(
            writer_entered_rx.try_recv().is_err(),
            "the writer may not enter while a reader remains"
        );

        let (handle, release) = readers.pop().unwrap();
        release.send(()).unwrap();
        handle.join().unwrap();

        writer_entered_rx.recv_timeout(LIVENESS).unwrap();
        writer.join().unwrap();
        assert!(lock.status().is_unlocked());
    }

    #[test]
    fn test_pending_writer_does_not_block_readers() {
        let lock = Arc::new(RWLock::new(()));

        let first = lock.read_gate().acquire();
        let second = lock.read_gate().acquire();

        let (entered_tx, entered_rx) = mpsc::channel();
        let writer = thread::spawn({
            let lock = Arc::clone(&lock);
            move || {
                let _guard = lock.write_gate().acquire();
                entered_tx.send(()).unwrap();
            }
        });

        thread::sleep(BLOCK_CHECK);
        assert!(entered_rx.try_recv().is_err(), "writer entered past readers");

        // The blocked writer gives readers no priority over newcomers.
        let third = lock
            .read_gate()
            .try_acquire()
            .expect("a new reader must be admitted while a writer waits");
        assert_eq!(lock.status(), LockStatus::ReadLocked(3));

        drop(first);
        drop(second);
        drop(third);

        entered_rx.recv_timeout(LIVENESS).unwrap();
        writer.join().unwrap();
        assert!(lock.status().is_unlocked());
    }

    #[test]
    fn test_writers_are_mutually_exclusive() {
        const WRITERS: usize = 4;
        const READERS: usize = 2;
        const ITERATIONS: usize = 200;

        let lock = RWLock::new(0_u64);
        let writers_inside = AtomicUsize::new(0);

        thread::scope(|scope| {
            for _ in 0..WRITERS {
                scope.spawn(|| {
                    for _ in 0..ITERATIONS {
                        let mut guard = lock.write_gate().acquire();
                        assert_eq!(writers_inside.fetch_add(1, SeqCst), 0);

                        let snapshot = *guard;
                        thread::yield_now();
                        *guard = snapshot + 1;

                        assert_eq!(writers_inside.fetch_sub(1, SeqCst), 1);
                        drop(guard);
                    }
                });
            }

            for _ in 0..READERS {
                scope.spawn(|| {
                    for _ in 0..ITERATIONS {
                        let guard = lock.read_gate().acquire();
                        assert_eq!(writers_inside.load(SeqCst), 0);

                        let first = *guard;
                        thread::yield_now();
                        assert_eq!(*guard, first);

                        drop(guard);
                    }
                });
            }
        });

        assert_eq!(lock.into_inner(), (WRITERS * ITERATIONS) as u64);
    }

    #[test]
    fn test_acquire_timeout_leaves_state_unchanged() {
        let lock = RWLock::new(());

        let writer = lock.write_gate().acquire();
        let err = lock
            .read_gate()
            .acquire_timeout(Duration::from_millis(50))
            .unwrap_err();
        assert_eq!(err, AcquireTimeoutError);
        assert_eq!(lock.status(), LockStatus::WriteLocked);

        assert!(lock
            .write_gate()
            .acquire_timeout(Duration::from_millis(50))
            .is_err());
        assert_eq!(lock.status(), LockStatus::WriteLocked);
        drop(writer);

        let reader = lock
            .read_gate()
            .acquire_timeout(Duration::from_millis(50))
            .expect("lock is free");
        assert!(lock
            .write_gate()
            .acquire_timeout(Duration::from_millis(50))
            .is_err());
        assert_eq!(lock.status(), LockStatus::ReadLocked(1));
        drop(reader);

        lock.write_gate()
            .acquire_timeout(Duration::from_millis(50))
            .expect("lock is free");
        assert!(lock.status().is_unlocked());
    }

    #[test]
    fn test_leak_and_manual_unlock() {
        let lock = RWLock::new(7);

        let guard = lock.read_gate().acquire();
        let leaked = unsafe { guard.leak() };
        assert_eq!(leaked.status(), LockStatus::ReadLocked(1));

        let reborrowed = unsafe { leaked.get_read_locked() };
        assert_eq!(*reborrowed, 7);
        drop(reborrowed);
        assert!(lock.status().is_unlocked());

        let guard = lock.write_gate().acquire();
        let leaked = unsafe { guard.leak() };
        assert_eq!(leaked.status(), LockStatus::WriteLocked);

        unsafe { leaked.write_unlock() };
        assert!(lock.status().is_unlocked());
    }

    #[test]
    fn test_get_mut_and_into_inner() {
        let mut lock = RWLock::new(String::from("a"));
        lock.get_mut().push('b');
        assert_eq!(lock.into_inner(), "ab");
    }

    #[test]
    fn test_default_from_and_debug() {
        let lock: RWLock<u32> = RWLock::default();
        assert_eq!(*lock.read(), 0);

        let lock = RWLock::from(5);
        assert!(format!("{lock:?}").contains('5'));

        let _guard = lock.write_gate().acquire();
        assert!(format!("{lock:?}").contains("<locked>"));
    }
}
