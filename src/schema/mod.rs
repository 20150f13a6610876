//! Entity schema: field specs, views, and serde helpers for typed patches.

mod field;
pub mod patch;

pub use field::*;
