//! Shared types for the name sniper workspace

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
