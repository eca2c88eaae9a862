//! Cross-crate trait definitions.

pub mod cache;
pub mod storage;
