//! Type definitions

pub mod attribute;
pub mod job;

pub use attribute::*;
pub use job::*;
