//! LibHub Server — Digital Library Identity & Access Service
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use libhub_core::config::AppConfig;
use libhub_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("LIBHUB_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

    let env = std::env::var("LIBHUB_ENV").unwrap_or_else(|_| "development".to_string());

    let env_config_path = format!("config/{}.toml", env);
    let overlay = std::path::Path::new(&env_config_path)
        .exists()
        .then_some(env_config_path.as_str());

    AppConfig::load_layered(&config_path, overlay)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting LibHub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    tracing::info!("Connecting to database...");
    let db_pool = libhub_database::connection::create_pool(&config.database).await?;

    tracing::info!("Running database migrations...");
    libhub_database::migration::run_migrations(&db_pool).await?;

    // ── Step 2: Repositories ─────────────────────────────────────
    let member_repo = Arc::new(libhub_database::repositories::MemberRepository::new(
        db_pool.clone(),
    ));
    let operator_repo = Arc::new(libhub_database::repositories::OperatorRepository::new(
        db_pool.clone(),
    ));
    let session_repo = Arc::new(libhub_database::repositories::SessionRepository::new(
        db_pool.clone(),
    ));
    let book_repo = Arc::new(libhub_database::repositories::BookRepository::new(
        db_pool.clone(),
    ));
    let purchase_repo = Arc::new(libhub_database::repositories::PurchaseRepository::new(
        db_pool.clone(),
    ));

    // ── Step 3: Identity provider boundary ───────────────────────
    tracing::info!(
        provider_url = %config.provider.base_url,
        "Initializing identity provider client..."
    );
    let provider: Arc<dyn libhub_auth::provider::IdentityProvider> = Arc::new(
        libhub_auth::provider::HttpIdentityProvider::new(&config.provider)?,
    );
    let token_verifier = libhub_auth::provider::TokenVerifier::new(Arc::clone(&provider));
    let resolver = libhub_auth::resolver::ProfileResolver::new(
        member_repo.clone(),
        operator_repo.clone(),
    );

    // ── Step 4: Services ─────────────────────────────────────────
    let session_ledger = libhub_service::session::SessionLedger::new(session_repo.clone());
    let login_service = libhub_service::login::LoginService::new(
        Arc::clone(&provider),
        token_verifier.clone(),
        resolver.clone(),
        operator_repo.clone(),
    );
    let access_service =
        libhub_service::access::AccessService::new(book_repo.clone(), purchase_repo.clone());
    let member_service = libhub_service::member::MemberService::new(member_repo.clone());
    let admin_service = libhub_service::admin::AdminService::new(
        member_repo.clone(),
        purchase_repo.clone(),
        session_ledger.clone(),
        Arc::clone(&provider),
    );

    // ── Step 5: Build and start HTTP server ──────────────────────
    let app_state = libhub_api::state::AppState {
        config: Arc::new(config.clone()),
        db_pool: db_pool.clone(),
        provider,
        token_verifier,
        resolver,
        login_service,
        session_ledger,
        access_service,
        member_service,
        admin_service,
    };

    let app = libhub_api::router::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("LibHub server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    tracing::info!("LibHub server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
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
