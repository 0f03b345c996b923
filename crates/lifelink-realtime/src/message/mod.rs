//! Wire message definitions.

pub mod types;

pub use types::{ClientMessage, ServerEvent};
