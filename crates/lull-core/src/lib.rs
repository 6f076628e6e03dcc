//! # lull-core
//!
//! Core types, the sound catalog, and error handling for the Lull
//! relaxation-sound mixer.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
