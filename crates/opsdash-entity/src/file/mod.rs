//! File record entities: model and lifecycle state.

pub mod model;
pub mod overview;
pub mod state;

pub use model::{CreateFileRecord, FileRecord};
pub use overview::FileOverview;
pub use state::{ApprovalState, FileState, FileStatus};
