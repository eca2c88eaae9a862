//! OpsDash Server — departmental file approval and analytics backend.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use opsdash_core::config::AppConfig;
use opsdash_core::error::AppError;

#[tokio::main]
async fn main() {
    let env = std::env::var("OPSDASH_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting OpsDash v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Data directories ─────────────────────────────────
    for dir in [&config.storage.data_root, &config.storage.upload_root] {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| AppError::internal(format!("Failed to create dir '{dir}': {e}")))?;
    }

    // ── Step 2: Database connection + migrations ─────────────────
    let db = opsdash_database::connection::DatabasePool::connect(&config.database).await?;
    opsdash_database::migration::run_migrations(db.pool()).await?;
    let db_pool = db.into_pool();

    // ── Step 3: Blob store ───────────────────────────────────────
    let blobs: Arc<dyn opsdash_core::traits::storage::BlobStore> =
        Arc::new(opsdash_storage::LocalBlobStore::new(&config.storage.upload_root).await?);
    tracing::info!(root = %config.storage.upload_root, "Blob store initialized");

    // ── Step 4: TTL store ────────────────────────────────────────
    let ttl_store = Arc::new(opsdash_cache::MemoryTtlStore::new(&config.cache));

    // ── Step 5: Repositories ─────────────────────────────────────
    let department_repo = Arc::new(
        opsdash_database::repositories::department::DepartmentRepository::new(db_pool.clone()),
    );
    let user_repo = Arc::new(opsdash_database::repositories::user::UserRepository::new(
        db_pool.clone(),
    ));
    let file_repo = Arc::new(opsdash_database::repositories::file::FileRepository::new(
        db_pool.clone(),
    ));
    let log_repo = Arc::new(
        opsdash_database::repositories::action_log::ActionLogRepository::new(db_pool.clone()),
    );

    // ── Step 6: Auth ─────────────────────────────────────────────
    let tokens = Arc::new(opsdash_auth::token::TokenService::new(&config.auth));
    let otp = opsdash_auth::otp::OtpService::new(Arc::clone(&ttl_store), &config.auth);
    let auth = Arc::new(opsdash_auth::service::AuthService::new(
        Arc::clone(&user_repo),
        otp,
        opsdash_auth::password::PasswordHasher::new(),
        (*tokens).clone(),
    ));

    // ── Step 7: Services ─────────────────────────────────────────
    let lifecycle = Arc::new(opsdash_service::lifecycle::LifecycleService::new(
        db_pool.clone(),
        Arc::clone(&file_repo),
        Arc::clone(&department_repo),
        Arc::clone(&log_repo),
        Arc::clone(&blobs),
    ));
    let queries = Arc::new(opsdash_service::query::QueryService::new(
        Arc::clone(&file_repo),
        Arc::clone(&log_repo),
        Arc::clone(&department_repo),
    ));
    let directory = Arc::new(opsdash_service::directory::DirectoryService::new(
        Arc::clone(&user_repo),
        Arc::clone(&department_repo),
    ));
    tracing::info!("Services initialized");

    // ── Step 8: Build and start HTTP server ──────────────────────
    let app_state = opsdash_api::state::AppState {
        config: Arc::new(config.clone()),
        db_pool: db_pool.clone(),
        tokens,
        auth,
        lifecycle,
        queries,
        directory,
    };

    let app = opsdash_api::router::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("OpsDash server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("OpsDash server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
