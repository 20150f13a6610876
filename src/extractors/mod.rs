//! Request extractors shared by resource handlers.

pub mod payload;
pub use payload::Payload;
