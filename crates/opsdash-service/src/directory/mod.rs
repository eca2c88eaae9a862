//! User directory operations.

pub mod service;

pub use service::{DirectoryService, Profile};
