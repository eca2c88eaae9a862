//! # opsdash-storage
//!
//! Blob storage for OpsDash: the local filesystem [`BlobStore`]
//! implementation and opaque key generation.
//!
//! [`BlobStore`]: opsdash_core::traits::storage::BlobStore

pub mod keys;
pub mod local;

pub use local::LocalBlobStore;
