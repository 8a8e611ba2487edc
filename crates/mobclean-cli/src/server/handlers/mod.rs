//! API request handlers.

mod process;
mod uploads;

pub use process::*;
pub use uploads::*;
