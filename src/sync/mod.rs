pub use rw_locks::*;

pub mod rw_locks;
