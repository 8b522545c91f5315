pub mod errors;
pub mod lock_status;
pub mod shared;

pub use errors::*;
pub use lock_status::*;
pub use shared::*;
