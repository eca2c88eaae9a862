//! Read-side projections for listing screens.

pub mod service;

pub use service::QueryService;
