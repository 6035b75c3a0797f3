mod error;
#[cfg(feature = "futures")]
mod futures;
mod generator;
mod id;
mod process;
#[cfg(any(feature = "async-tokio", feature = "async-smol"))]
mod runtime;
mod status;
mod time;

pub use crate::error::*;
#[cfg(feature = "futures")]
pub use crate::futures::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::process::*;
#[cfg(any(feature = "async-tokio", feature = "async-smol"))]
pub use crate::runtime::*;
pub use crate::status::*;
pub use crate::time::*;
