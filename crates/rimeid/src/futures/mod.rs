mod rime;
mod sleep_provider;

pub use rime::*;
pub use sleep_provider::*;
