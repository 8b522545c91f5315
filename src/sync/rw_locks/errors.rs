use thiserror::Error;

/// The bounded wait of [`ReadGate::acquire_timeout`] or
/// [`WriteGate::acquire_timeout`] expired before the lock became available.
///
/// A timed-out acquire does not touch the lock state: the caller holds
/// nothing and owes no release.
///
/// [`ReadGate::acquire_timeout`]: crate::sync::ReadGate::acquire_timeout
/// [`WriteGate::acquire_timeout`]: crate::sync::WriteGate::acquire_timeout
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
#[error("timed out while waiting to acquire the lock")]
pub struct AcquireTimeoutError;
