//! # opsdash-database
//!
//! PostgreSQL connection management, embedded migrations, and repository
//! implementations for OpsDash.
//!
//! Lifecycle-critical repository methods take a `&mut PgConnection` so
//! the service layer can compose them inside a single transaction with
//! row-level locks.

pub mod connection;
pub mod migration;
pub mod repositories;
