//! # opsdash-cache
//!
//! In-memory implementation of the [`TtlStore`] trait from
//! `opsdash-core`, used for short-lived state such as pending one-time
//! passwords. Swappable for a persistent or distributed backend without
//! touching consumers.
//!
//! [`TtlStore`]: opsdash_core::traits::cache::TtlStore

pub mod memory;

pub use memory::MemoryTtlStore;
