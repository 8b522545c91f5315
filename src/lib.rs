//! `rwgate` provides a reader-writer lock whose two access modes are exposed
//! as explicit *gates*: a [`ReadGate`](sync::ReadGate) shared by any number of
//! concurrent readers and a [`WriteGate`](sync::WriteGate) granting one task
//! exclusive access. Readers and a writer never hold the lock at the same
//! time.
//!
//! The primitives live in [`sync`] and are re-exported at the crate root.

pub mod sync;

pub use sync::{
    AcquireTimeoutError, LockStatus, RWLock, ReadGate, ReadLockGuard, WriteGate, WriteLockGuard,
};
