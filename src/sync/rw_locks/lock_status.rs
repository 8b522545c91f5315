/// A snapshot of who holds an [`RWLock`](crate::sync::RWLock).
///
/// Returned by [`RWLock::status`](crate::sync::RWLock::status). It describes
/// the lock at the instant the snapshot was taken; other tasks may have
/// acquired or released the lock by the time the caller inspects it, so it is
/// only a reliable source of truth while the caller itself holds the lock.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum LockStatus {
    /// No reader and no writer holds the lock.
    Unlocked,
    /// The lock is held in read mode. The `usize` is the number of readers
    /// currently inside, always at least 1.
    ReadLocked(usize),
    /// The lock is held in write mode by exactly one task.
    WriteLocked,
}

impl LockStatus {
    /// Returns `true` if no one holds the lock.
    #[inline]
    #[must_use]
    pub fn is_unlocked(self) -> bool {
        self == Self::Unlocked
    }

    /// Returns the number of readers holding the lock, or zero if it is
    /// unlocked or write-locked.
    #[inline]
    #[must_use]
    pub fn readers(self) -> usize {
        match self {
            Self::ReadLocked(readers) => readers,
            Self::Unlocked | Self::WriteLocked => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_status_accessors() {
        assert!(LockStatus::Unlocked.is_unlocked());
        assert!(!LockStatus::WriteLocked.is_unlocked());
        assert!(!LockStatus::ReadLocked(1).is_unlocked());

        assert_eq!(LockStatus::Unlocked.readers(), 0);
        assert_eq!(LockStatus::WriteLocked.readers(), 0);
        assert_eq!(LockStatus::ReadLocked(3).readers(), 3);
    }
}
