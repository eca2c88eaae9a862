//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use opsdash_auth::service::AuthService;
use opsdash_auth::token::TokenService;
use opsdash_cache::MemoryTtlStore;
use opsdash_core::config::AppConfig;
use opsdash_service::directory::DirectoryService;
use opsdash_service::lifecycle::LifecycleService;
use opsdash_service::query::QueryService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool (health checks).
    pub db_pool: PgPool,
    /// Session token codec.
    pub tokens: Arc<TokenService>,
    /// Login flow orchestration.
    pub auth: Arc<AuthService<MemoryTtlStore>>,
    /// File lifecycle engine.
    pub lifecycle: Arc<LifecycleService>,
    /// Read-side projections.
    pub queries: Arc<QueryService>,
    /// User directory.
    pub directory: Arc<DirectoryService>,
}
