mod atomic;
mod interface;
mod lock;
mod mutex;

pub use atomic::*;
pub use interface::*;
pub use lock::*;
