//! The file lifecycle engine.

pub mod service;

pub use service::{EditParams, FileContent, LifecycleService, UploadParams};
