//! CLI command implementations.

pub mod common;
pub mod describe;
pub mod layout;
pub mod validate;
