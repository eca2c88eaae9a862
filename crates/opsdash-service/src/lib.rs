//! # opsdash-service
//!
//! Business logic for OpsDash: the file lifecycle engine (upload,
//! edit-submission, approval, deletion, content reads), the read-side
//! query layer, and the user directory operations.

pub mod directory;
pub mod lifecycle;
pub mod query;
