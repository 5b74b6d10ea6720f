//! # Stowage utils
//!
//! Small shared building blocks: grid wrapper types and logger setup.

pub mod logger;
pub mod types;

pub use types::{GridExtent, GridPos, WorldPos};
